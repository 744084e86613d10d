//! The documentation model as pretty-printed JSON.

use super::{RenderError, Renderer};
use crate::template::Template;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, template: &Template) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(template)?)
    }
}
