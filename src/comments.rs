//! Descriptor comments and exclusion directives.
//!
//! protoc records comments in `SourceCodeInfo`, keyed by the path of field
//! numbers that leads from the file descriptor to the commented element.
//! [`Comments`] indexes those locations once per file; [`Directives`] then
//! applies the configured `@exclude` style markers to the text.

use prost_types::FileDescriptorProto;
use std::collections::HashMap;

/// Field numbers used to build `SourceCodeInfo` paths.
pub mod path {
    pub const FILE_PACKAGE: i32 = 2;
    pub const FILE_MESSAGE: i32 = 4;
    pub const FILE_ENUM: i32 = 5;
    pub const FILE_SERVICE: i32 = 6;
    pub const FILE_EXTENSION: i32 = 7;
    pub const FILE_SYNTAX: i32 = 12;

    pub const MESSAGE_FIELD: i32 = 2;
    pub const MESSAGE_NESTED: i32 = 3;
    pub const MESSAGE_ENUM: i32 = 4;
    pub const MESSAGE_EXTENSION: i32 = 6;

    pub const ENUM_VALUE: i32 = 2;

    pub const SERVICE_METHOD: i32 = 2;
}

/// Comment text for every commented element of one file.
#[derive(Debug, Default)]
pub struct Comments {
    by_path: HashMap<Vec<i32>, String>,
}

impl Comments {
    pub fn new(file: &FileDescriptorProto) -> Self {
        let by_path = file
            .source_code_info
            .iter()
            .flat_map(|info| &info.location)
            .filter_map(|location| {
                let text = join_comment(location.leading_comments(), location.trailing_comments());
                (!text.is_empty()).then(|| (location.path.clone(), text))
            })
            .collect();
        Self { by_path }
    }

    /// Comment attached to the element at `path`, or an empty string.
    pub fn get(&self, path: &[i32]) -> &str {
        self.by_path.get(path).map_or("", String::as_str)
    }

    /// Description of the file itself: the comment on `syntax`, or failing
    /// that the one on `package`.
    pub fn file_comment(&self) -> &str {
        match self.get(&[path::FILE_SYNTAX]) {
            "" => self.get(&[path::FILE_PACKAGE]),
            comment => comment,
        }
    }
}

/// Leading comment, then trailing comment, each line with protoc's single
/// leading space removed.
fn join_comment(leading: &str, trailing: &str) -> String {
    let mut text = String::new();
    if !leading.is_empty() {
        text.push_str(&scrub(leading));
        text.push('\n');
    }
    text.push_str(&scrub(trailing));
    text.trim().to_string()
}

fn scrub(comment: &str) -> String {
    comment
        .lines()
        .map(|line| line.strip_prefix(' ').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Block and line exclusion markers.
#[derive(Debug, Clone)]
pub struct Directives<'a> {
    pub block: &'a [String],
    pub line: &'a [String],
}

impl Directives<'_> {
    /// Apply the markers to a description.
    ///
    /// Returns `None` when the description opens with a block directive,
    /// meaning the element itself must not be documented. Otherwise lines
    /// carrying a line directive and paragraphs opening with a block
    /// directive are removed.
    pub fn apply(&self, description: &str) -> Option<String> {
        if self.opens_block(description.trim_start_matches(['*', '/', '\n', ' '])) {
            return None;
        }

        let kept_lines: Vec<&str> = description
            .lines()
            .filter(|line| !self.line.iter().any(|d| line.contains(d.as_str())))
            .collect();
        let kept_lines = kept_lines.join("\n");

        let paragraphs: Vec<&str> = kept_lines
            .split("\n\n")
            .filter(|paragraph| !self.opens_block(paragraph.trim_start()))
            .collect();

        Some(paragraphs.join("\n\n").trim().to_string())
    }

    /// Whether the element carrying `description` is excluded.
    pub fn excludes(&self, description: &str) -> bool {
        self.apply(description).is_none()
    }

    fn opens_block(&self, text: &str) -> bool {
        self.block.iter().any(|directive| {
            text.strip_prefix(directive.as_str())
                .is_some_and(starts_token)
        })
    }
}

/// A directive only counts as a whole token: `@exclude` must not fire on
/// `@excluded` or `@exclude-line`.
fn starts_token(rest: &str) -> bool {
    rest.chars().next().is_none_or(|c| !c.is_alphanumeric() && c != '-' && c != '_')
}
