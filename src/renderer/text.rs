//! Text templates rendered with tera: the built-in Markdown and DocBook
//! documents, and user-supplied templates.
//!
//! Autoescaping is off for every template. The output is not necessarily
//! HTML, and descriptions are inserted as authored.
//!
//! Filters available to templates:
//!
//! | Name | Effect |
//! |------|--------|
//! | `p` | wrap each line in `<p>` |
//! | `para` | wrap each line in `<para>` |
//! | `nobr` | line breaks to `<br>` |
//! | `anchor` | name to link target |

use super::{RenderError, Renderer};
use crate::filters;
use crate::template::Template;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

const MARKDOWN: &str = include_str!("../../templates/markdown.tera");
const DOCBOOK: &str = include_str!("../../templates/docbook.tera");

/// A single compiled tera template.
pub struct TextRenderer {
    tera: Tera,
    name: &'static str,
}

impl TextRenderer {
    pub fn markdown() -> Result<Self, RenderError> {
        Self::compile("markdown", MARKDOWN)
    }

    pub fn docbook() -> Result<Self, RenderError> {
        Self::compile("docbook", DOCBOOK)
    }

    /// Compile a user template. Syntax errors surface here, before any
    /// output is produced.
    pub fn custom(source: &str) -> Result<Self, RenderError> {
        Self::compile("custom", source)
    }

    fn compile(name: &'static str, source: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("p", p);
        tera.register_filter("para", para);
        tera.register_filter("nobr", nobr);
        tera.register_filter("anchor", anchor);
        tera.add_raw_template(name, source)
            .map_err(|source| template_error(name, source))?;
        Ok(Self { tera, name })
    }
}

impl Renderer for TextRenderer {
    fn render(&self, template: &Template) -> Result<String, RenderError> {
        let context =
            Context::from_serialize(template).map_err(|source| template_error(self.name, source))?;
        self.tera
            .render(self.name, &context)
            .map_err(|source| template_error(self.name, source))
    }
}

fn template_error(name: &str, source: tera::Error) -> RenderError {
    RenderError::Template {
        name: name.to_string(),
        source,
    }
}

// ============================================================================
// Filters
// ============================================================================

fn string_arg<'a>(filter: &str, value: &'a Value) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))
}

fn p(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(filters::paragraphs(string_arg("p", value)?)))
}

fn para(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(filters::para(string_arg("para", value)?)))
}

fn nobr(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(filters::nobr(string_arg("nobr", value)?)))
}

fn anchor(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(filters::anchor(string_arg("anchor", value)?)))
}
