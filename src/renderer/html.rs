//! Self-contained HTML page.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Names and types are escaped by maud; descriptions are escaped first and
//! then split into `<p>` elements with [`filters::paragraphs`].
//!
//! ## Page Layout
//!
//! ```text
//! Protocol Documentation
//! ├── Table of Contents      files, then their messages/enums/extensions/services
//! ├── <file>                 one section per file, in group order
//! │   ├── messages           field table, nested extension table
//! │   ├── enums              value table
//! │   ├── extensions         file-level extension table
//! │   └── services           method table
//! └── Scalar Value Types
//! ```
//!
//! Every element gets an id from [`filters::anchor`] of its full name, so a
//! field type links to the section documenting it.

use super::{RenderError, Renderer};
use crate::filters;
use crate::template::{Enum, Extension, File, Message, Options, ScalarValue, Service, Template};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../../static/style.css");

/// Renders the HTML strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, template: &Template) -> Result<String, RenderError> {
        Ok(render_page(template).into_string())
    }
}

fn render_page(template: &Template) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Protocol Documentation" }
                style { (PreEscaped(CSS)) }
            }
            body {
                h1 id="title" { "Protocol Documentation" }
                (table_of_contents(&template.files))
                @for file in &template.files {
                    (file_section(file))
                }
                (scalar_table(&template.scalar_value_types))
            }
        }
    }
}

/// Escape a comment and break it into paragraphs.
fn description(text: &str) -> Markup {
    let escaped: Markup = html! { (text) };
    PreEscaped(filters::paragraphs(&escaped.into_string()))
}

/// A type name linking to the section that documents it.
fn type_link(long_type: &str, full_type: &str) -> Markup {
    html! {
        a href={ "#" (filters::anchor(full_type)) } { (long_type) }
    }
}

fn deprecated_badge(options: &Options) -> Markup {
    html! {
        @if options.contains_key("deprecated") {
            strong.deprecated { "Deprecated." } " "
        }
    }
}

// ============================================================================
// Table of contents
// ============================================================================

fn table_of_contents(files: &[File]) -> Markup {
    html! {
        h2 { "Table of Contents" }
        div id="toc-container" {
            ul id="toc" {
                @for file in files {
                    li {
                        a href={ "#" (filters::anchor(&file.name)) } { (file.name) }
                        ul {
                            @for message in &file.messages {
                                li {
                                    a href={ "#" (filters::anchor(&message.full_name)) } {
                                        span.badge { "M" } (message.long_name)
                                    }
                                }
                            }
                            @for enumeration in &file.enums {
                                li {
                                    a href={ "#" (filters::anchor(&enumeration.full_name)) } {
                                        span.badge { "E" } (enumeration.long_name)
                                    }
                                }
                            }
                            @if file.has_extensions {
                                li {
                                    a href={ "#" (filters::anchor(&file.name)) "-extensions" } {
                                        span.badge { "X" } "File-level Extensions"
                                    }
                                }
                            }
                            @for service in &file.services {
                                li {
                                    a href={ "#" (filters::anchor(&service.full_name)) } {
                                        span.badge { "S" } (service.name)
                                    }
                                }
                            }
                        }
                    }
                }
                li {
                    a href="#scalar-value-types" { "Scalar Value Types" }
                }
            }
        }
    }
}

// ============================================================================
// File sections
// ============================================================================

fn file_section(file: &File) -> Markup {
    html! {
        div.file-heading {
            h2 id=(filters::anchor(&file.name)) { (file.name) }
            a href="#title" { "Top" }
        }
        (description(&file.description))
        @for message in &file.messages {
            (message_section(message))
        }
        @for enumeration in &file.enums {
            (enum_section(enumeration))
        }
        @if file.has_extensions {
            h3 id={ (filters::anchor(&file.name)) "-extensions" } { "File-level Extensions" }
            (extension_table(&file.extensions))
        }
        @for service in &file.services {
            (service_section(service))
        }
    }
}

fn message_section(message: &Message) -> Markup {
    html! {
        h3 id=(filters::anchor(&message.full_name)) { (message.long_name) }
        (deprecated_badge(&message.options))
        (description(&message.description))
        @if message.has_fields {
            table.field-table {
                thead {
                    tr { td { "Field" } td { "Type" } td { "Label" } td { "Description" } }
                }
                tbody {
                    @for field in &message.fields {
                        tr {
                            td { (field.name) }
                            td { (type_link(&field.long_type, &field.full_type)) }
                            td { (field.label) }
                            td {
                                (deprecated_badge(&field.options))
                                (description(&field.description))
                                @if !field.default_value.is_empty() {
                                    p { "Default: " (field.default_value) }
                                }
                            }
                        }
                    }
                }
            }
        }
        @if message.has_extensions {
            br;
            (extension_table(&message.extensions))
        }
    }
}

fn extension_table(extensions: &[Extension]) -> Markup {
    html! {
        table.extension-table {
            thead {
                tr { td { "Extension" } td { "Type" } td { "Base" } td { "Number" } td { "Description" } }
            }
            tbody {
                @for extension in extensions {
                    tr {
                        td { (extension.name) }
                        td { (type_link(&extension.long_type, &extension.full_type)) }
                        td { (type_link(&extension.containing_long_type, &extension.containing_full_type)) }
                        td { (extension.number) }
                        td {
                            (description(&extension.description))
                            @if !extension.default_value.is_empty() {
                                p { "Default: " (extension.default_value) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn enum_section(enumeration: &Enum) -> Markup {
    html! {
        h3 id=(filters::anchor(&enumeration.full_name)) { (enumeration.long_name) }
        (deprecated_badge(&enumeration.options))
        (description(&enumeration.description))
        table.enum-table {
            thead {
                tr { td { "Name" } td { "Number" } td { "Description" } }
            }
            tbody {
                @for value in &enumeration.values {
                    tr {
                        td { (value.name) }
                        td { (value.number) }
                        td {
                            (deprecated_badge(&value.options))
                            (description(&value.description))
                        }
                    }
                }
            }
        }
    }
}

fn service_section(service: &Service) -> Markup {
    html! {
        h3 id=(filters::anchor(&service.full_name)) { (service.name) }
        (deprecated_badge(&service.options))
        (description(&service.description))
        table.enum-table {
            thead {
                tr { td { "Method Name" } td { "Request Type" } td { "Response Type" } td { "Description" } }
            }
            tbody {
                @for method in &service.methods {
                    tr {
                        td { (method.name) }
                        td {
                            (type_link(&method.request_long_type, &method.request_full_type))
                            @if method.request_streaming { " stream" }
                        }
                        td {
                            (type_link(&method.response_long_type, &method.response_full_type))
                            @if method.response_streaming { " stream" }
                        }
                        td {
                            (deprecated_badge(&method.options))
                            (description(&method.description))
                        }
                    }
                }
            }
        }
    }
}

fn scalar_table(scalars: &[ScalarValue]) -> Markup {
    html! {
        h2 id="scalar-value-types" { "Scalar Value Types" }
        table.scalar-value-types-table {
            thead {
                tr {
                    td { ".proto Type" } td { "Notes" } td { "C++" } td { "Java" } td { "Python" }
                    td { "Go" } td { "C#" } td { "PHP" } td { "Ruby" }
                }
            }
            tbody {
                @for scalar in scalars {
                    tr id=(filters::anchor(&scalar.proto_type)) {
                        td { (scalar.proto_type) }
                        td { (scalar.notes) }
                        td { (scalar.cpp_type) }
                        td { (scalar.java_type) }
                        td { (scalar.python_type) }
                        td { (scalar.go_type) }
                        td { (scalar.cs_type) }
                        td { (scalar.php_type) }
                        td { (scalar.ruby_type) }
                    }
                }
            }
        }
    }
}
