//! Shared test utilities for the protoc-gen-doc test suite.
//!
//! Provides descriptor builders, a realistic fixture file, and lookup
//! helpers that work with the documentation model (`File`, `Message`, ...).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let files = [common_file(), booking_file()];
//! let template = Template::new(&refs, &TypeIndex::new(&files), &options);
//!
//! let booking = find_message(&template.files[1], "Booking");
//! let price = find_field(booking, "price");
//! assert_eq!(price.full_type, "acme.common.Money");
//! ```

use crate::template::{Enum, File, Message, MessageField};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, EnumValueOptions,
    FieldDescriptorProto, FieldOptions, FileDescriptorProto, MessageOptions,
    MethodDescriptorProto, OneofDescriptorProto, ServiceDescriptorProto, SourceCodeInfo,
};

// =========================================================================
// Descriptor builders
// =========================================================================

/// A bare file descriptor with a name and package.
pub fn proto_file(name: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: (!package.is_empty()).then(|| package.to_string()),
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// A singular scalar field.
pub fn scalar_field(name: &str, number: i32, field_type: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(field_type as i32),
        ..Default::default()
    }
}

/// A singular field referencing a message or enum by fully qualified name.
pub fn named_field(
    name: &str,
    number: i32,
    field_type: Type,
    type_name: &str,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar_field(name, number, field_type)
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub fn enum_type(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(name, number)| EnumValueDescriptorProto {
                name: Some(name.to_string()),
                number: Some(*number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        ..Default::default()
    }
}

pub fn comment(path: &[i32], leading: &str) -> Location {
    Location {
        path: path.to_vec(),
        leading_comments: Some(leading.to_string()),
        ..Default::default()
    }
}

// =========================================================================
// Fixtures
// =========================================================================

/// `common/money.proto` in package `acme.common`.
pub fn common_file() -> FileDescriptorProto {
    FileDescriptorProto {
        message_type: vec![message(
            "Money",
            vec![
                scalar_field("currency_code", 1, Type::String),
                scalar_field("units", 2, Type::Int64),
            ],
        )],
        source_code_info: Some(SourceCodeInfo {
            location: vec![comment(&[4, 0], " An amount of money.\n")],
        }),
        ..proto_file("common/money.proto", "acme.common")
    }
}

/// `booking/v1/booking.proto`: one of everything, with comments and
/// directives.
///
/// ```text
/// Booking                (id, slot, labels, phone|email, note?, legacy_code,
///   Slot                  internal_flags @exclude, price)
///     enum Kind
///   LabelsEntry          map<string, string>
///   extend FieldOptions { audit_tag }
/// BookingStatusChanged
/// InternalAudit          @exclude
/// enum Status            STATUS_HELD has an @internal comment
/// service BookingService Create, Watch (server streaming)
/// extend MessageOptions { booking_ref }
/// ```
pub fn booking_file() -> FileDescriptorProto {
    let pkg = ".acme.booking.v1";

    let mut phone = scalar_field("phone", 4, Type::String);
    phone.oneof_index = Some(0);
    let mut email = scalar_field("email", 5, Type::String);
    email.oneof_index = Some(0);
    let mut note = scalar_field("note", 6, Type::String);
    note.oneof_index = Some(1);
    note.proto3_optional = Some(true);
    let mut legacy_code = scalar_field("legacy_code", 7, Type::Int32);
    legacy_code.json_name = Some("legacyCode".to_string());
    legacy_code.options = Some(FieldOptions {
        deprecated: Some(true),
        ..Default::default()
    });
    let mut labels = named_field("labels", 3, Type::Message, &format!("{pkg}.Booking.LabelsEntry"));
    labels.label = Some(Label::Repeated as i32);

    let mut slot = message(
        "Slot",
        vec![
            scalar_field("start", 1, Type::Int64),
            named_field("kind", 2, Type::Enum, &format!("{pkg}.Booking.Slot.Kind")),
        ],
    );
    slot.enum_type = vec![enum_type("Kind", &[("KIND_UNSPECIFIED", 0), ("KIND_ROOM", 1)])];

    let mut labels_entry = message(
        "LabelsEntry",
        vec![
            scalar_field("key", 1, Type::String),
            scalar_field("value", 2, Type::String),
        ],
    );
    labels_entry.options = Some(MessageOptions {
        map_entry: Some(true),
        ..Default::default()
    });

    let mut audit_tag = scalar_field("audit_tag", 50002, Type::String);
    audit_tag.extendee = Some(".google.protobuf.FieldOptions".to_string());

    let mut booking = message(
        "Booking",
        vec![
            scalar_field("id", 1, Type::String),
            named_field("slot", 2, Type::Message, &format!("{pkg}.Booking.Slot")),
            labels,
            phone,
            email,
            note,
            legacy_code,
            scalar_field("internal_flags", 8, Type::Int32),
            named_field("price", 9, Type::Message, ".acme.common.Money"),
        ],
    );
    booking.nested_type = vec![slot, labels_entry];
    booking.oneof_decl = vec![
        OneofDescriptorProto {
            name: Some("contact".to_string()),
            ..Default::default()
        },
        OneofDescriptorProto {
            name: Some("_note".to_string()),
            ..Default::default()
        },
    ];
    booking.extension = vec![audit_tag];

    let status_changed = message(
        "BookingStatusChanged",
        vec![
            scalar_field("booking_id", 1, Type::String),
            named_field("status", 2, Type::Enum, &format!("{pkg}.Status")),
        ],
    );
    let internal = message("InternalAudit", vec![scalar_field("actor", 1, Type::String)]);

    let mut status = enum_type(
        "Status",
        &[("STATUS_UNSPECIFIED", 0), ("STATUS_CONFIRMED", 1), ("STATUS_HELD", 2)],
    );
    status.value[1].options = Some(EnumValueOptions {
        deprecated: Some(false),
        ..Default::default()
    });

    let mut watch = method("Watch", &format!("{pkg}.Booking"), &format!("{pkg}.BookingStatusChanged"));
    watch.server_streaming = Some(true);
    let service = ServiceDescriptorProto {
        name: Some("BookingService".to_string()),
        method: vec![
            method("Create", &format!("{pkg}.Booking"), &format!("{pkg}.Booking")),
            watch,
        ],
        ..Default::default()
    };

    let mut booking_ref = scalar_field("booking_ref", 50001, Type::String);
    booking_ref.extendee = Some(".google.protobuf.MessageOptions".to_string());

    FileDescriptorProto {
        dependency: vec!["common/money.proto".to_string()],
        message_type: vec![booking, status_changed, internal],
        enum_type: vec![status],
        service: vec![service],
        extension: vec![booking_ref],
        source_code_info: Some(SourceCodeInfo {
            location: vec![
                comment(&[12], " Booking related messages.\n"),
                comment(&[4, 0], " A reservation of a slot.\n"),
                comment(&[4, 0, 2, 0], " Unique booking id.\n"),
                comment(&[4, 0, 2, 7], " @exclude internal use only\n"),
                comment(&[4, 2], " @exclude\n Not for the docs.\n"),
                comment(&[5, 0], " Lifecycle of a booking.\n TODO rename @exclude-line\n"),
                comment(&[5, 0, 2, 2], " @internal held for manual review\n"),
                comment(&[6, 0], " Manages bookings.\n"),
                comment(&[6, 0, 2, 1], " Streams status changes.\n"),
            ],
        }),
        ..proto_file("booking/v1/booking.proto", "acme.booking.v1")
    }
}

// =========================================================================
// Model lookups (panic with a clear message on miss)
// =========================================================================

/// Find a message by long name. Panics if not found.
pub fn find_message<'a>(file: &'a File, long_name: &str) -> &'a Message {
    file.messages
        .iter()
        .find(|m| m.long_name == long_name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = file.messages.iter().map(|m| m.long_name.as_str()).collect();
            panic!("message '{long_name}' not found in {}. Available: {names:?}", file.name)
        })
}

/// Find a field by name within a message. Panics if not found.
pub fn find_field<'a>(message: &'a Message, name: &str) -> &'a MessageField {
    message
        .fields
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = message.fields.iter().map(|f| f.name.as_str()).collect();
            panic!(
                "field '{name}' not found in message '{}'. Available: {names:?}",
                message.long_name
            )
        })
}

/// Find an enum by long name. Panics if not found.
pub fn find_enum<'a>(file: &'a File, long_name: &str) -> &'a Enum {
    file.enums
        .iter()
        .find(|e| e.long_name == long_name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = file.enums.iter().map(|e| e.long_name.as_str()).collect();
            panic!("enum '{long_name}' not found in {}. Available: {names:?}", file.name)
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Names of the given descriptors, in order.
pub fn file_names(files: &[&FileDescriptorProto]) -> Vec<String> {
    files.iter().map(|f| f.name().to_string()).collect()
}
