//! # protoc-gen-doc
//!
//! A `protoc` plugin that turns `.proto` files into documentation. protoc
//! runs it with a serialized `CodeGeneratorRequest` on stdin and reads a
//! `CodeGeneratorResponse` from stdout:
//!
//! ```text
//! protoc --doc_out=./docs --doc_opt=markdown,api.md:exclude_patterns=^google/ api/*.proto
//! ```
//!
//! # Pipeline
//!
//! ```text
//! 1. Options   --doc_opt string    →  PluginOptions
//! 2. Select    file_to_generate    →  exclude_patterns  →  groups by directory
//! 3. Model     each group          →  Template (names resolved, comments attached)
//! 4. Render    Template            →  HTML | Markdown | JSON | DocBook | custom
//! ```
//!
//! Every stage except the optional template read is a pure function of the
//! request, so each is unit-tested on descriptors built in memory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`options`] | Parses the `--doc_opt` parameter string |
//! | [`grouping`] | Exclusion patterns and output directory grouping |
//! | [`template`] | Documentation model built from file descriptors |
//! | [`comments`] | `SourceCodeInfo` comments and `@exclude` directives |
//! | [`renderer`] | Render strategies (maud HTML, JSON, tera text templates) |
//! | [`filters`] | Comment text filters shared by the renderers |
//! | [`plugin`] | Request → response orchestration |
//! | [`protocol`] | protoc plugin wire messages and capability constants |
//!
//! # Design Decisions
//!
//! ## Maud for HTML, Tera for Text
//!
//! The default HTML page is generated with [Maud](https://maud.lambda.xyz/):
//! malformed markup is a build error and descriptor text is escaped by
//! default. Markdown, DocBook and user templates need a runtime template
//! language, so they go through [tera](https://keats.github.io/tera/) with
//! the [`filters`] registered as tera filters.
//!
//! ## Custom Templates
//!
//! A first parameter that is not a known format (`html`, `md`, `markdown`,
//! `json`, `docbook`, or a file with one of those extensions) is read as a
//! tera template. It sees the same camelCase model the JSON output contains,
//! so `json` output is the reference for what a template can use.

pub mod comments;
pub mod filters;
pub mod grouping;
pub mod options;
pub mod plugin;
pub mod protocol;
pub mod renderer;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
