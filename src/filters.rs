//! Text filters applied to descriptor comments before they reach a document.
//!
//! Comments arrive as raw text with whatever line endings and spacing the
//! author used. The filters here turn that text into markup fragments that
//! the render strategies can drop straight into their output:
//!
//! | Filter | Output | Used by |
//! |--------|--------|---------|
//! | [`paragraphs`] | `<p>a</p><p>b</p>` | HTML |
//! | [`para`] | `<para>a</para><para>b</para>` | DocBook |
//! | [`nobr`] | `a<br>b<br><br>c` | Markdown table cells |
//! | [`anchor`] | `foo_bar-proto` | link targets in every format |
//!
//! All four are pure and are registered under the names `p`, `para`, `nobr`
//! and `anchor` for text templates (see [`crate::renderer`]).

use regex::Regex;
use std::sync::LazyLock;

/// A line ending plus any whitespace that follows it.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n|\r|\r\n)[\t\n\f\r ]*").expect("invalid paragraph regex"));

static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("( )+").expect("invalid space regex"));

/// Two or more consecutive line endings.
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\r\n|\r|\n){2,}").expect("invalid blank line regex"));

static NON_ANCHOR_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9_-]").expect("invalid anchor regex"));

fn wrap_lines(content: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(content.len() + open.len() + close.len());
    for segment in PARAGRAPH_BREAK.split(content) {
        out.push_str(open);
        out.push_str(segment);
        out.push_str(close);
    }
    out
}

/// Wrap every line of `content` in a `<p>` element.
///
/// Whitespace following a line ending is swallowed, so indentation inside a
/// comment block does not leak into the output.
pub fn paragraphs(content: &str) -> String {
    wrap_lines(content, "<p>", "</p>")
}

/// DocBook flavour of [`paragraphs`], using `<para>` elements.
pub fn para(content: &str) -> String {
    wrap_lines(content, "<para>", "</para>")
}

/// Replace line endings with `<br>` so multi-line text fits a table cell.
///
/// Blank lines separate paragraphs, which are joined back with a double
/// `<br><br>`. Runs of spaces collapse to one and the space on either side
/// of a `<br>` is dropped, so the output is stable under a second pass.
pub fn nobr(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    BLANK_LINES
        .split(&normalized)
        .map(|paragraph| SPACE_RUN.replace_all(paragraph, " ").replace(['\r', '\n'], "<br>"))
        .collect::<Vec<_>>()
        .join("<br><br>")
        .replace(" <br>", "<br>")
        .replace("<br> ", "<br>")
}

/// Turn a name into a string usable as an HTML id or URL fragment.
///
/// Slashes become underscores and every other character outside
/// `[A-Za-z0-9_-]` becomes a dash. Distinct names can collide (`a.b` and
/// `a-b` both give `a-b`).
pub fn anchor(name: &str) -> String {
    NON_ANCHOR_CHAR
        .replace_all(&name.replace('/', "_"), "-")
        .into_owned()
}
