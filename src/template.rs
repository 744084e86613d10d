//! The documentation model handed to every render strategy.
//!
//! A [`Template`] is built from one group of file descriptors. It flattens
//! nested messages and enums, resolves type references to readable names,
//! attaches comments, and drops anything a block directive excludes. Text
//! templates see it as their context; the JSON strategy serializes it as is.
//!
//! ## Naming
//!
//! Every named element carries three names:
//!
//! ```text
//! name       Inner
//! longName   Outer.Inner        (relative to the package)
//! fullName   acme.v1.Outer.Inner
//! ```
//!
//! Field and method types follow the same scheme (`type`, `longType`,
//! `fullType`). Scalars use their proto keyword for all three.
//!
//! ## Ordering
//!
//! Messages, enums, services and file-level extensions are sorted by long
//! name. Fields, enum values and methods keep declaration order. Files keep
//! the order of their group.

use crate::comments::{Comments, Directives, path};
use crate::options::PluginOptions;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    ServiceDescriptorProto,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Descriptor options surfaced in the docs (currently only `deprecated`).
pub type Options = BTreeMap<String, Value>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub files: Vec<File>,
    pub scalar_value_types: Vec<ScalarValue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub name: String,
    pub description: String,
    pub package: String,
    pub has_enums: bool,
    pub has_extensions: bool,
    pub has_messages: bool,
    pub has_services: bool,
    pub enums: Vec<Enum>,
    pub extensions: Vec<Extension>,
    pub messages: Vec<Message>,
    pub services: Vec<Service>,
    pub options: Options,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub description: String,
    pub has_extensions: bool,
    pub has_fields: bool,
    pub has_oneofs: bool,
    pub extensions: Vec<Extension>,
    pub fields: Vec<MessageField>,
    pub options: Options,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageField {
    pub name: String,
    pub description: String,
    pub label: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub long_type: String,
    pub full_type: String,
    #[serde(rename = "ismap")]
    pub is_map: bool,
    #[serde(rename = "isoneof")]
    pub is_oneof: bool,
    #[serde(rename = "oneofdecl")]
    pub oneof_decl: String,
    pub default_value: String,
    pub options: Options,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enum {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub description: String,
    pub values: Vec<EnumValue>,
    pub options: Options,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    pub number: String,
    pub description: String,
    pub options: Options,
}

/// An extension field, declared at file level or inside a message (the
/// scope).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub description: String,
    pub label: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub long_type: String,
    pub full_type: String,
    pub number: i32,
    pub default_value: String,
    pub containing_type: String,
    pub containing_long_type: String,
    pub containing_full_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_long_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_full_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub description: String,
    pub methods: Vec<ServiceMethod>,
    pub options: Options,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMethod {
    pub name: String,
    pub description: String,
    pub request_type: String,
    pub request_long_type: String,
    pub request_full_type: String,
    pub request_streaming: bool,
    pub response_type: String,
    pub response_long_type: String,
    pub response_full_type: String,
    pub response_streaming: bool,
    pub options: Options,
}

/// One row of the scalar value type table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarValue {
    pub proto_type: String,
    pub notes: String,
    pub cpp_type: String,
    pub cs_type: String,
    pub go_type: String,
    pub java_type: String,
    pub php_type: String,
    pub python_type: String,
    pub ruby_type: String,
}

// proto, notes, C++, C#, Go, Java, PHP, Python, Ruby
const SCALAR_VALUES: &[[&str; 9]] = &[
    ["double", "", "double", "double", "float64", "double", "float", "float", "Float"],
    ["float", "", "float", "float", "float32", "float", "float", "float", "Float"],
    [
        "int32",
        "Uses variable-length encoding. Inefficient for encoding negative numbers – if your field is likely to have negative values, use sint32 instead.",
        "int32", "int", "int32", "int", "integer", "int", "Bignum or Fixnum (as required)",
    ],
    [
        "int64",
        "Uses variable-length encoding. Inefficient for encoding negative numbers – if your field is likely to have negative values, use sint64 instead.",
        "int64", "long", "int64", "long", "integer/string", "int/long", "Bignum",
    ],
    [
        "uint32", "Uses variable-length encoding.",
        "uint32", "uint", "uint32", "int", "integer", "int/long", "Bignum or Fixnum (as required)",
    ],
    [
        "uint64", "Uses variable-length encoding.",
        "uint64", "ulong", "uint64", "long", "integer/string", "int/long", "Bignum or Fixnum (as required)",
    ],
    [
        "sint32",
        "Uses variable-length encoding. Signed int value. These more efficiently encode negative numbers than regular int32s.",
        "int32", "int", "int32", "int", "integer", "int", "Bignum or Fixnum (as required)",
    ],
    [
        "sint64",
        "Uses variable-length encoding. Signed int value. These more efficiently encode negative numbers than regular int64s.",
        "int64", "long", "int64", "long", "integer/string", "int/long", "Bignum",
    ],
    [
        "fixed32", "Always four bytes. More efficient than uint32 if values are often greater than 2^28.",
        "uint32", "uint", "uint32", "int", "integer", "int", "Bignum or Fixnum (as required)",
    ],
    [
        "fixed64", "Always eight bytes. More efficient than uint64 if values are often greater than 2^56.",
        "uint64", "ulong", "uint64", "long", "integer/string", "int/long", "Bignum",
    ],
    [
        "sfixed32", "Always four bytes.",
        "int32", "int", "int32", "int", "integer", "int", "Bignum or Fixnum (as required)",
    ],
    [
        "sfixed64", "Always eight bytes.",
        "int64", "long", "int64", "long", "integer/string", "int/long", "Bignum",
    ],
    ["bool", "", "bool", "bool", "bool", "boolean", "boolean", "boolean", "TrueClass/FalseClass"],
    [
        "string", "A string must always contain UTF-8 encoded or 7-bit ASCII text.",
        "string", "string", "string", "String", "string", "str/unicode", "String (UTF-8)",
    ],
    [
        "bytes", "May contain any arbitrary sequence of bytes.",
        "string", "ByteString", "[]byte", "ByteString", "string", "str", "String (ASCII-8BIT)",
    ],
];

pub fn scalar_value_types() -> Vec<ScalarValue> {
    SCALAR_VALUES
        .iter()
        .map(|[proto, notes, cpp, cs, go, java, php, python, ruby]| ScalarValue {
            proto_type: proto.to_string(),
            notes: notes.to_string(),
            cpp_type: cpp.to_string(),
            cs_type: cs.to_string(),
            go_type: go.to_string(),
            java_type: java.to_string(),
            php_type: php.to_string(),
            python_type: python.to_string(),
            ruby_type: ruby.to_string(),
        })
        .collect()
}

// ============================================================================
// Type resolution
// ============================================================================

#[derive(Debug, Clone)]
struct TypeInfo {
    package: String,
    map_entry: bool,
}

/// Every message and enum declared anywhere in the request, keyed by fully
/// qualified name without the leading dot.
#[derive(Debug, Default)]
pub struct TypeIndex {
    types: HashMap<String, TypeInfo>,
}

/// The three spellings of a type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeNames {
    name: String,
    long_name: String,
    full_name: String,
}

impl TypeIndex {
    pub fn new<'a>(files: impl IntoIterator<Item = &'a FileDescriptorProto>) -> Self {
        let mut index = Self::default();
        for file in files {
            let package = file.package();
            let prefix = qualify(package, "");
            for message in &file.message_type {
                index.add_message(package, &prefix, message);
            }
            for enumeration in &file.enum_type {
                index.add(package, format!("{prefix}{}", enumeration.name()), false);
            }
        }
        index
    }

    fn add_message(&mut self, package: &str, prefix: &str, message: &DescriptorProto) {
        let full_name = format!("{prefix}{}", message.name());
        let map_entry = message
            .options
            .as_ref()
            .is_some_and(|options| options.map_entry());
        let nested_prefix = format!("{full_name}.");
        for nested in &message.nested_type {
            self.add_message(package, &nested_prefix, nested);
        }
        for enumeration in &message.enum_type {
            self.add(package, format!("{nested_prefix}{}", enumeration.name()), false);
        }
        self.add(package, full_name, map_entry);
    }

    fn add(&mut self, package: &str, full_name: String, map_entry: bool) {
        self.types.insert(
            full_name,
            TypeInfo {
                package: package.to_string(),
                map_entry,
            },
        );
    }

    fn is_map_entry(&self, full_name: &str) -> bool {
        self.types.get(full_name).is_some_and(|info| info.map_entry)
    }

    /// Names for a `.pkg.Outer.Inner` style reference. Unknown references
    /// keep their full name as the long name.
    fn resolve(&self, reference: &str) -> TypeNames {
        let full_name = reference.trim_start_matches('.');
        let long_name = self
            .types
            .get(full_name)
            .and_then(|info| full_name.strip_prefix(&qualify(&info.package, "")))
            .unwrap_or(full_name);
        TypeNames {
            name: full_name.rsplit('.').next().unwrap_or(full_name).to_string(),
            long_name: long_name.to_string(),
            full_name: full_name.to_string(),
        }
    }

    fn field_type(&self, field: &FieldDescriptorProto) -> TypeNames {
        if !field.type_name().is_empty() {
            return self.resolve(field.type_name());
        }
        let keyword = scalar_keyword(field.r#type()).to_string();
        TypeNames {
            name: keyword.clone(),
            long_name: keyword.clone(),
            full_name: keyword,
        }
    }
}

/// `package.name`, or just `name` outside a package.
fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn scalar_keyword(field_type: Type) -> &'static str {
    match field_type {
        Type::Double => "double",
        Type::Float => "float",
        Type::Int64 => "int64",
        Type::Uint64 => "uint64",
        Type::Int32 => "int32",
        Type::Fixed64 => "fixed64",
        Type::Fixed32 => "fixed32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Group => "group",
        Type::Message => "message",
        Type::Bytes => "bytes",
        Type::Uint32 => "uint32",
        Type::Enum => "enum",
        Type::Sfixed32 => "sfixed32",
        Type::Sfixed64 => "sfixed64",
        Type::Sint32 => "sint32",
        Type::Sint64 => "sint64",
    }
}

/// protoc's default JSON name: underscores dropped, the letter after each
/// one upper-cased.
fn lower_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn deprecated_options(deprecated: bool) -> Options {
    let mut options = Options::new();
    if deprecated {
        options.insert("deprecated".to_string(), Value::Bool(true));
    }
    options
}

fn child_path(parent: &[i32], field: i32, index: usize) -> Vec<i32> {
    let mut path = parent.to_vec();
    path.push(field);
    path.push(i32::try_from(index).unwrap_or(i32::MAX));
    path
}

// ============================================================================
// Building
// ============================================================================

impl Template {
    /// Build the model for one group of files.
    pub fn new(files: &[&FileDescriptorProto], index: &TypeIndex, options: &PluginOptions) -> Self {
        let directives = Directives {
            block: &options.exclude_directives,
            line: &options.exclude_line_directives,
        };
        let files = files
            .iter()
            .map(|&file| {
                FileBuilder {
                    file,
                    comments: Comments::new(file),
                    directives: directives.clone(),
                    index,
                    camel_case_fields: options.camel_case_fields,
                }
                .build()
            })
            .collect();

        Self {
            files,
            scalar_value_types: scalar_value_types(),
        }
    }
}

struct FileBuilder<'a> {
    file: &'a FileDescriptorProto,
    comments: Comments,
    directives: Directives<'a>,
    index: &'a TypeIndex,
    camel_case_fields: bool,
}

impl FileBuilder<'_> {
    fn build(&self) -> File {
        let file = self.file;
        let mut messages = Vec::new();
        let mut enums = Vec::new();

        for (i, message) in file.message_type.iter().enumerate() {
            let path = child_path(&[], path::FILE_MESSAGE, i);
            self.collect_message(message, &path, None, &mut messages, &mut enums);
        }
        for (i, enumeration) in file.enum_type.iter().enumerate() {
            let path = child_path(&[], path::FILE_ENUM, i);
            enums.extend(self.build_enum(enumeration, &path, None));
        }

        let mut extensions: Vec<Extension> = file
            .extension
            .iter()
            .enumerate()
            .filter_map(|(i, field)| {
                self.build_extension(field, &child_path(&[], path::FILE_EXTENSION, i), None)
            })
            .collect();

        let mut services: Vec<Service> = file
            .service
            .iter()
            .enumerate()
            .filter_map(|(i, service)| {
                self.build_service(service, &child_path(&[], path::FILE_SERVICE, i))
            })
            .collect();

        messages.sort_by(|a, b| a.long_name.cmp(&b.long_name));
        enums.sort_by(|a, b| a.long_name.cmp(&b.long_name));
        extensions.sort_by(|a, b| a.long_name.cmp(&b.long_name));
        services.sort_by(|a, b| a.long_name.cmp(&b.long_name));

        let deprecated = file
            .options
            .as_ref()
            .is_some_and(|options| options.deprecated());

        File {
            name: file.name().to_string(),
            description: self.describe(self.comments.file_comment()).unwrap_or_default(),
            package: file.package().to_string(),
            has_enums: !enums.is_empty(),
            has_extensions: !extensions.is_empty(),
            has_messages: !messages.is_empty(),
            has_services: !services.is_empty(),
            enums,
            extensions,
            messages,
            services,
            options: deprecated_options(deprecated),
        }
    }

    fn describe(&self, comment: &str) -> Option<String> {
        self.directives.apply(comment)
    }

    fn proto3(&self) -> bool {
        self.file.syntax() == "proto3"
    }

    fn full_name(&self, long_name: &str) -> String {
        qualify(self.file.package(), long_name)
    }

    fn collect_message(
        &self,
        message: &DescriptorProto,
        path: &[i32],
        parent: Option<&str>,
        messages: &mut Vec<Message>,
        enums: &mut Vec<Enum>,
    ) {
        let Some(description) = self.describe(self.comments.get(path)) else {
            return;
        };
        let long_name = match parent {
            Some(parent) => format!("{parent}.{}", message.name()),
            None => message.name().to_string(),
        };

        for (i, nested) in message.nested_type.iter().enumerate() {
            let nested_path = child_path(path, path::MESSAGE_NESTED, i);
            self.collect_message(nested, &nested_path, Some(&long_name), messages, enums);
        }
        for (i, enumeration) in message.enum_type.iter().enumerate() {
            let enum_path = child_path(path, path::MESSAGE_ENUM, i);
            enums.extend(self.build_enum(enumeration, &enum_path, Some(&long_name)));
        }

        let fields: Vec<MessageField> = message
            .field
            .iter()
            .enumerate()
            .filter_map(|(i, field)| {
                self.build_field(field, &child_path(path, path::MESSAGE_FIELD, i), message)
            })
            .collect();

        let scope = self.index.resolve(&format!(".{}", self.full_name(&long_name)));
        let extensions: Vec<Extension> = message
            .extension
            .iter()
            .enumerate()
            .filter_map(|(i, field)| {
                let ext_path = child_path(path, path::MESSAGE_EXTENSION, i);
                self.build_extension(field, &ext_path, Some((long_name.as_str(), &scope)))
            })
            .collect();

        let deprecated = message
            .options
            .as_ref()
            .is_some_and(|options| options.deprecated());

        messages.push(Message {
            name: message.name().to_string(),
            full_name: self.full_name(&long_name),
            long_name,
            description,
            has_extensions: !extensions.is_empty(),
            has_fields: !fields.is_empty(),
            has_oneofs: fields.iter().any(|f| f.is_oneof),
            extensions,
            fields,
            options: deprecated_options(deprecated),
        });
    }

    fn build_field(
        &self,
        field: &FieldDescriptorProto,
        path: &[i32],
        message: &DescriptorProto,
    ) -> Option<MessageField> {
        let description = self.describe(self.comments.get(path))?;
        let names = self.index.field_type(field);

        let name = if self.camel_case_fields {
            match field.json_name() {
                "" => lower_camel_case(field.name()),
                json_name => json_name.to_string(),
            }
        } else {
            field.name().to_string()
        };

        let oneof_decl = field
            .oneof_index
            .filter(|_| !field.proto3_optional())
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| message.oneof_decl.get(i))
            .map(|decl| decl.name().to_string());

        let is_map = field.label() == Label::Repeated
            && field.r#type() == Type::Message
            && self.index.is_map_entry(&names.full_name);

        let deprecated = field
            .options
            .as_ref()
            .is_some_and(|options| options.deprecated());

        Some(MessageField {
            name,
            description,
            label: self.label(field).to_string(),
            type_name: names.name,
            long_type: names.long_name,
            full_type: names.full_name,
            is_map,
            is_oneof: oneof_decl.is_some(),
            oneof_decl: oneof_decl.unwrap_or_default(),
            default_value: field.default_value().to_string(),
            options: deprecated_options(deprecated),
        })
    }

    fn label(&self, field: &FieldDescriptorProto) -> &'static str {
        match field.label() {
            Label::Repeated => "repeated",
            Label::Required => "required",
            Label::Optional if !self.proto3() || field.proto3_optional() => "optional",
            Label::Optional => "",
        }
    }

    fn build_enum(
        &self,
        enumeration: &EnumDescriptorProto,
        path: &[i32],
        parent: Option<&str>,
    ) -> Option<Enum> {
        let description = self.describe(self.comments.get(path))?;
        let long_name = match parent {
            Some(parent) => format!("{parent}.{}", enumeration.name()),
            None => enumeration.name().to_string(),
        };

        let values = enumeration
            .value
            .iter()
            .enumerate()
            .filter_map(|(i, value)| {
                let value_path = child_path(path, path::ENUM_VALUE, i);
                let description = self.describe(self.comments.get(&value_path))?;
                let deprecated = value
                    .options
                    .as_ref()
                    .is_some_and(|options| options.deprecated());
                Some(EnumValue {
                    name: value.name().to_string(),
                    number: value.number().to_string(),
                    description,
                    options: deprecated_options(deprecated),
                })
            })
            .collect();

        let deprecated = enumeration
            .options
            .as_ref()
            .is_some_and(|options| options.deprecated());

        Some(Enum {
            name: enumeration.name().to_string(),
            full_name: self.full_name(&long_name),
            long_name,
            description,
            values,
            options: deprecated_options(deprecated),
        })
    }

    fn build_extension(
        &self,
        field: &FieldDescriptorProto,
        path: &[i32],
        scope: Option<(&str, &TypeNames)>,
    ) -> Option<Extension> {
        let description = self.describe(self.comments.get(path))?;
        let names = self.index.field_type(field);
        let containing = self.index.resolve(field.extendee());
        let long_name = match scope {
            Some((scope_name, _)) => format!("{scope_name}.{}", field.name()),
            None => field.name().to_string(),
        };

        Some(Extension {
            name: field.name().to_string(),
            full_name: self.full_name(&long_name),
            long_name,
            description,
            label: self.label(field).to_string(),
            type_name: names.name,
            long_type: names.long_name,
            full_type: names.full_name,
            number: field.number(),
            default_value: field.default_value().to_string(),
            containing_type: containing.name,
            containing_long_type: containing.long_name,
            containing_full_type: containing.full_name,
            scope_type: scope.map(|(_, names)| names.name.clone()),
            scope_long_type: scope.map(|(_, names)| names.long_name.clone()),
            scope_full_type: scope.map(|(_, names)| names.full_name.clone()),
        })
    }

    fn build_service(&self, service: &ServiceDescriptorProto, path: &[i32]) -> Option<Service> {
        let description = self.describe(self.comments.get(path))?;

        let methods = service
            .method
            .iter()
            .enumerate()
            .filter_map(|(i, method)| {
                let method_path = child_path(path, path::SERVICE_METHOD, i);
                let description = self.describe(self.comments.get(&method_path))?;
                let request = self.index.resolve(method.input_type());
                let response = self.index.resolve(method.output_type());
                let deprecated = method
                    .options
                    .as_ref()
                    .is_some_and(|options| options.deprecated());
                Some(ServiceMethod {
                    name: method.name().to_string(),
                    description,
                    request_type: request.name,
                    request_long_type: request.long_name,
                    request_full_type: request.full_name,
                    request_streaming: method.client_streaming(),
                    response_type: response.name,
                    response_long_type: response.long_name,
                    response_full_type: response.full_name,
                    response_streaming: method.server_streaming(),
                    options: deprecated_options(deprecated),
                })
            })
            .collect();

        let deprecated = service
            .options
            .as_ref()
            .is_some_and(|options| options.deprecated());

        Some(Service {
            name: service.name().to_string(),
            full_name: self.full_name(service.name()),
            long_name: service.name().to_string(),
            description,
            methods,
            options: deprecated_options(deprecated),
        })
    }
}
