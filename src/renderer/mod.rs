//! Render strategies: one [`Template`] in, one document out.
//!
//! | Strategy | Engine | Output |
//! |---|---|---|
//! | **HTML** | `maud` | self-contained page, inline CSS |
//! | **JSON** | `serde_json` | the model itself, pretty printed |
//! | **Markdown** | `tera`, embedded template | GitHub-flavoured tables |
//! | **DocBook** | `tera`, embedded template | DocBook 4.5 `<book>` |
//! | **Custom** | `tera`, user template | whatever the template says |
//!
//! The strategy is picked once per invocation by [`select`]: a user template
//! wins, otherwise the configured [`RenderType`] decides. Every strategy
//! implements [`Renderer`], so the plugin loop never cares which one it has.

mod html;
mod json;
mod text;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use text::TextRenderer;

use crate::template::Template;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template '{name}': {}", error_chain(.source))]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// tera reports the useful detail (line, column, missing variable) in the
/// error's sources rather than its top-level message.
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Built-in output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderType {
    #[default]
    Html,
    Markdown,
    Json,
    DocBook,
}

/// Names and extensions that select a built-in format.
const RENDER_TYPES: &[(&str, RenderType)] = &[
    ("html", RenderType::Html),
    ("markdown", RenderType::Markdown),
    ("md", RenderType::Markdown),
    ("json", RenderType::Json),
    ("docbook", RenderType::DocBook),
];

impl RenderType {
    /// Match the first file parameter against the known formats, either as
    /// a bare name (`markdown`) or by extension (`docs.md`).
    pub fn from_template_name(name: &str) -> Option<Self> {
        let key = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or(name);
        RENDER_TYPES
            .iter()
            .find(|(known, _)| *known == key)
            .map(|(_, render_type)| *render_type)
    }
}

/// A way of turning the documentation model into a document.
pub trait Renderer {
    fn render(&self, template: &Template) -> Result<String, RenderError>;
}

/// Pick the strategy for this invocation.
///
/// `custom_template` is the content of the user's template file, if one was
/// configured; it takes precedence over `render_type`.
pub fn select(
    render_type: RenderType,
    custom_template: Option<&str>,
) -> Result<Box<dyn Renderer>, RenderError> {
    if let Some(source) = custom_template {
        return Ok(Box::new(TextRenderer::custom(source)?));
    }
    Ok(match render_type {
        RenderType::Html => Box::new(HtmlRenderer),
        RenderType::Json => Box::new(JsonRenderer),
        RenderType::Markdown => Box::new(TextRenderer::markdown()?),
        RenderType::DocBook => Box::new(TextRenderer::docbook()?),
    })
}
