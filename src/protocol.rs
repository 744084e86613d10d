//! protoc plugin wire messages.
//!
//! Mirrors `google/protobuf/compiler/plugin.proto`. Descriptor messages are
//! taken from `prost-types`; only the request/response envelope is declared
//! here so the edition fields of the response are available.

use prost_types::FileDescriptorProto;

/// `CodeGeneratorResponse.Feature.FEATURE_SUPPORTS_EDITIONS`.
pub const FEATURE_SUPPORTS_EDITIONS: u64 = 2;

/// Features advertised on every response.
pub const SUPPORTED_FEATURES: u64 = FEATURE_SUPPORTS_EDITIONS;

/// `Edition.EDITION_LEGACY`.
pub const MINIMUM_EDITION: i32 = 900;

/// `Edition.EDITION_2024`.
pub const MAXIMUM_EDITION: i32 = 1001;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Version {
    #[prost(int32, optional, tag = "1")]
    pub major: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub minor: Option<i32>,
    #[prost(int32, optional, tag = "3")]
    pub patch: Option<i32>,
    #[prost(string, optional, tag = "4")]
    pub suffix: Option<String>,
}

/// What protoc sends on stdin.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CodeGeneratorRequest {
    /// Files named on the protoc command line, in command-line order.
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    /// The `--doc_opt` value.
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(message, optional, tag = "3")]
    pub compiler_version: Option<Version>,
    /// Every file in `file_to_generate` plus everything they import,
    /// topologically ordered.
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptorProto>,
}

/// What the plugin writes to stdout.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CodeGeneratorResponse {
    #[prost(string, optional, tag = "1")]
    pub error: Option<String>,
    #[prost(uint64, optional, tag = "2")]
    pub supported_features: Option<u64>,
    #[prost(int32, optional, tag = "3")]
    pub minimum_edition: Option<i32>,
    #[prost(int32, optional, tag = "4")]
    pub maximum_edition: Option<i32>,
    #[prost(message, repeated, tag = "15")]
    pub file: Vec<GeneratedFile>,
}

/// `CodeGeneratorResponse.File`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GeneratedFile {
    /// Path relative to the `--doc_out` directory, `/`-separated.
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub insertion_point: Option<String>,
    #[prost(string, optional, tag = "15")]
    pub content: Option<String>,
}

impl GeneratedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            insertion_point: None,
            content: Some(content.into()),
        }
    }
}
