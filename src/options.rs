//! Plugin parameter parsing.
//!
//! protoc hands the plugin a single parameter string, taken from
//! `--doc_opt=...`. Only its first line is read:
//!
//! ```text
//! <TYPE|TEMPLATE_FILE>,<OUTPUT_FILE>[,default|source_relative][:OPTION,OPTION,...]
//! ```
//!
//! ## File Parameters
//!
//! The part before the first `:` names what to render and where:
//!
//! - `html,index.html` renders the built-in HTML document into `index.html`
//! - `tmpl.md,README.md` infers Markdown from the `.md` extension
//! - `custom.tpl,docs.txt` renders the user template `custom.tpl`
//! - `markdown,api.md,source_relative` writes one `api.md` next to each
//!   source directory instead of a single file at the output root
//!
//! Leaving it empty keeps the defaults (HTML into `index.html`).
//!
//! ## Options
//!
//! The part after the first `:` is a comma-separated list:
//!
//! | Option | Effect |
//! |--------|--------|
//! | `camel_case_fields=true\|false` | Render field names in lowerCamelCase |
//! | `exclude_patterns=RE[,RE...]` | Skip files whose path matches any `RE` |
//! | `exclude_directive=TOKEN` | Extra block-exclusion marker (besides `@exclude`) |
//! | `exclude_line_directive=TOKEN` | Extra line-exclusion marker (besides `@exclude-line`) |
//!
//! `exclude_patterns` is the only option that takes several values: bare
//! tokens right after it are further patterns, so
//! `exclude_patterns=a\.proto$,b\.proto$` excludes both files.

use crate::renderer::RenderType;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_OUTPUT_FILE: &str = "index.html";
pub const DEFAULT_EXCLUDE_DIRECTIVE: &str = "@exclude";
pub const DEFAULT_EXCLUDE_LINE_DIRECTIVE: &str = "@exclude-line";

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    #[error("Invalid {option} value: {value}")]
    InvalidBool { option: &'static str, value: String },
    #[error("Invalid exclude pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Configuration for one plugin invocation.
///
/// Built once by [`parse_options`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct PluginOptions {
    /// Built-in strategy used when no template file is given.
    pub render_type: RenderType,
    /// User template to render instead of a built-in one.
    pub template_file: Option<String>,
    /// Base name of each generated file; the directory comes from grouping.
    pub output_file: String,
    /// Files whose path matches any of these are left out.
    pub exclude_patterns: Vec<Regex>,
    /// Group output by each file's source directory.
    pub source_relative: bool,
    pub camel_case_fields: bool,
    /// Markers that drop a whole element or paragraph from the docs.
    pub exclude_directives: Vec<String>,
    /// Markers that drop a single comment line.
    pub exclude_line_directives: Vec<String>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            render_type: RenderType::Html,
            template_file: None,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            exclude_patterns: Vec::new(),
            source_relative: false,
            camel_case_fields: false,
            exclude_directives: vec![DEFAULT_EXCLUDE_DIRECTIVE.to_string()],
            exclude_line_directives: vec![DEFAULT_EXCLUDE_LINE_DIRECTIVE.to_string()],
        }
    }
}

/// Which option a bare (`=`-less) token continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    None,
    ExcludePatterns,
}

/// Parse the plugin parameter string.
///
/// Options after the `:` are applied first, then the file parameters. The
/// first invalid token aborts parsing.
pub fn parse_options(parameter: &str) -> Result<PluginOptions, OptionsError> {
    let mut options = PluginOptions::default();

    let line = parameter.lines().next().unwrap_or_default();
    let (file_params, option_list) = match line.split_once(':') {
        Some((files, opts)) => (files, Some(opts)),
        None => (line, None),
    };

    if let Some(option_list) = option_list {
        apply_option_list(&mut options, option_list)?;
    }

    if file_params.is_empty() {
        debug!("no file parameters, keeping default render type and output file");
        return Ok(options);
    }
    apply_file_params(&mut options, file_params)?;

    Ok(options)
}

fn apply_option_list(options: &mut PluginOptions, list: &str) -> Result<(), OptionsError> {
    let mut continuation = Continuation::None;

    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let Some((key, value)) = token.split_once('=') else {
            match continuation {
                Continuation::ExcludePatterns => {
                    options.exclude_patterns.push(compile_pattern(token)?);
                    continue;
                }
                Continuation::None => return Err(OptionsError::InvalidOption(token.to_string())),
            }
        };

        continuation = Continuation::None;
        match key {
            "camel_case_fields" => {
                options.camel_case_fields = match value {
                    "true" => true,
                    "false" => false,
                    _ => {
                        return Err(OptionsError::InvalidBool {
                            option: "camel_case_fields",
                            value: value.to_string(),
                        });
                    }
                };
            }
            "exclude_patterns" => {
                continuation = Continuation::ExcludePatterns;
                if !value.is_empty() {
                    options.exclude_patterns.push(compile_pattern(value)?);
                }
            }
            "exclude_directive" => {
                if !value.is_empty() {
                    options.exclude_directives.push(value.to_string());
                }
            }
            "exclude_line_directive" => {
                if !value.is_empty() {
                    options.exclude_line_directives.push(value.to_string());
                }
            }
            _ => return Err(OptionsError::InvalidOption(key.to_string())),
        }
    }

    Ok(())
}

fn apply_file_params(options: &mut PluginOptions, file_params: &str) -> Result<(), OptionsError> {
    let invalid = || OptionsError::InvalidParameter(file_params.to_string());

    let parts: Vec<&str> = file_params.split(',').collect();
    let (template, output, layout) = match parts.as_slice() {
        [template, output] => (*template, *output, None),
        [template, output, layout] => (*template, *output, Some(*layout)),
        _ => return Err(invalid()),
    };

    options.output_file = base_name(output);
    options.source_relative = match layout {
        None | Some("default") => false,
        Some("source_relative") => true,
        Some(_) => return Err(invalid()),
    };

    match RenderType::from_template_name(template) {
        Some(render_type) => {
            options.render_type = render_type;
            options.template_file = None;
        }
        None if template.is_empty() => options.template_file = None,
        None => options.template_file = Some(template.to_string()),
    }

    Ok(())
}

fn compile_pattern(pattern: &str) -> Result<Regex, OptionsError> {
    Regex::new(pattern).map_err(|source| OptionsError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Last element of a slash-separated path, ignoring trailing slashes.
fn base_name(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    trimmed
        .rsplit_once('/')
        .map_or(trimmed, |(_, name)| name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(options: &PluginOptions) -> Vec<&str> {
        options.exclude_patterns.iter().map(Regex::as_str).collect()
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn empty_parameter_gives_defaults() {
        let options = parse_options("").unwrap();
        assert_eq!(options.render_type, RenderType::Html);
        assert_eq!(options.template_file, None);
        assert_eq!(options.output_file, "index.html");
        assert!(!options.source_relative);
        assert!(!options.camel_case_fields);
        assert!(options.exclude_patterns.is_empty());
        assert_eq!(options.exclude_directives, vec!["@exclude"]);
        assert_eq!(options.exclude_line_directives, vec!["@exclude-line"]);
    }

    #[test]
    fn options_only_keeps_file_defaults() {
        let options = parse_options(":camel_case_fields=true").unwrap();
        assert!(options.camel_case_fields);
        assert_eq!(options.output_file, "index.html");
        assert_eq!(options.render_type, RenderType::Html);
        assert_eq!(options.template_file, None);
        assert!(!options.source_relative);
    }

    #[test]
    fn only_first_line_is_read() {
        let options = parse_options("markdown,doc.md\nthis is ignored").unwrap();
        assert_eq!(options.render_type, RenderType::Markdown);
        assert_eq!(options.output_file, "doc.md");
    }

    // =========================================================================
    // File parameters
    // =========================================================================

    #[test]
    fn type_name_selects_render_type() {
        for (param, expected) in [
            ("html,out.html", RenderType::Html),
            ("markdown,out.md", RenderType::Markdown),
            ("md,out.md", RenderType::Markdown),
            ("json,out.json", RenderType::Json),
            ("docbook,out.xml", RenderType::DocBook),
        ] {
            let options = parse_options(param).unwrap();
            assert_eq!(options.render_type, expected, "param: {param}");
            assert_eq!(options.template_file, None);
        }
    }

    #[test]
    fn known_extension_clears_template_file() {
        let options = parse_options("tmpl.html,out.html").unwrap();
        assert_eq!(options.template_file, None);
        assert_eq!(options.render_type, RenderType::Html);
        assert_eq!(options.output_file, "out.html");
        assert!(!options.source_relative);
    }

    #[test]
    fn unknown_extension_is_a_template_path() {
        let options = parse_options("custom.tpl,docs/out.md,source_relative").unwrap();
        assert_eq!(options.template_file.as_deref(), Some("custom.tpl"));
        assert_eq!(options.render_type, RenderType::Html);
        assert_eq!(options.output_file, "out.md");
        assert!(options.source_relative);
    }

    #[test]
    fn default_layout_is_not_source_relative() {
        let options = parse_options("html,index.html,default").unwrap();
        assert!(!options.source_relative);
    }

    #[test]
    fn output_file_is_reduced_to_base_name() {
        let options = parse_options("json,a/b/c/doc.json").unwrap();
        assert_eq!(options.output_file, "doc.json");
    }

    #[test]
    fn missing_comma_is_invalid() {
        for param in ["html", "index.html", "custom.tpl:camel_case_fields=true"] {
            let err = parse_options(param).unwrap_err();
            assert!(
                matches!(err, OptionsError::InvalidParameter(_)),
                "param: {param}, got {err:?}"
            );
        }
    }

    #[test]
    fn too_many_parts_is_invalid() {
        let err = parse_options("html,index.html,default,extra").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidParameter(p) if p == "html,index.html,default,extra"));
    }

    #[test]
    fn unknown_layout_is_invalid() {
        let err = parse_options("html,index.html,flat").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidParameter(_)));
    }

    // =========================================================================
    // Options
    // =========================================================================

    #[test]
    fn exclude_patterns_with_bare_continuation() {
        let options =
            parse_options(r"html,index.html:exclude_patterns=\.internal\.proto$,another\.proto$")
                .unwrap();
        assert_eq!(patterns(&options), vec![r"\.internal\.proto$", r"another\.proto$"]);
        assert!(options.exclude_patterns[0].is_match("foo.internal.proto"));
        assert!(!options.exclude_patterns.iter().any(|p| p.is_match("foo.proto")));
    }

    #[test]
    fn exclude_patterns_accumulate_across_keys() {
        let options = parse_options(":exclude_patterns=a,exclude_patterns=b,c").unwrap();
        assert_eq!(patterns(&options), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_exclude_pattern_is_ignored_but_opens_continuation() {
        let options = parse_options(":exclude_patterns=,a").unwrap();
        assert_eq!(patterns(&options), vec!["a"]);
    }

    #[test]
    fn bare_token_without_context_is_invalid() {
        let err = parse_options(":stray").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidOption(t) if t == "stray"));
    }

    #[test]
    fn bare_token_after_other_key_is_invalid() {
        let err = parse_options(":exclude_patterns=a,camel_case_fields=true,b").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidOption(t) if t == "b"));
    }

    #[test]
    fn unknown_key_is_invalid() {
        let err = parse_options("html,index.html:colour=blue").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidOption(k) if k == "colour"));
    }

    #[test]
    fn camel_case_fields_rejects_non_bool() {
        let err = parse_options(":camel_case_fields=yes").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidBool { value, .. } if value == "yes"));
    }

    #[test]
    fn camel_case_fields_last_value_wins() {
        let options = parse_options(":camel_case_fields=true,camel_case_fields=false").unwrap();
        assert!(!options.camel_case_fields);
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = parse_options(":exclude_patterns=(unclosed").unwrap_err();
        assert!(matches!(err, OptionsError::Pattern { pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn directives_append_to_defaults() {
        let options = parse_options(
            ":exclude_directive=@internal,exclude_line_directive=@nodoc,exclude_directive=@hide",
        )
        .unwrap();
        assert_eq!(options.exclude_directives, vec!["@exclude", "@internal", "@hide"]);
        assert_eq!(options.exclude_line_directives, vec!["@exclude-line", "@nodoc"]);
    }

    #[test]
    fn empty_directive_values_are_ignored() {
        let options = parse_options(":exclude_directive=,exclude_line_directive=").unwrap();
        assert_eq!(options.exclude_directives, vec!["@exclude"]);
        assert_eq!(options.exclude_line_directives, vec!["@exclude-line"]);
    }

    #[test]
    fn blank_tokens_are_skipped() {
        let options = parse_options(":, ,camel_case_fields=true,,").unwrap();
        assert!(options.camel_case_fields);
    }

    #[test]
    fn options_are_checked_before_file_parameters() {
        let err = parse_options("nocomma:bogus=1").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidOption(k) if k == "bogus"));
    }

    #[test]
    fn base_name_edge_cases() {
        assert_eq!(base_name("out.html"), "out.html");
        assert_eq!(base_name("docs/out.md"), "out.md");
        assert_eq!(base_name("docs/"), "docs");
        assert_eq!(base_name("/"), "/");
        assert_eq!(base_name(""), ".");
    }
}
