//! The request → response pipeline.
//!
//! ```text
//! CodeGeneratorRequest
//!   │  parameter ──► parse_options ──► PluginOptions
//!   │  template_file ──► read once ──► renderer::select
//!   │  file_to_generate ──► exclude_files ──► group_by_directory
//!   ▼
//! for each group: Template::new ──► Renderer::render ──► GeneratedFile
//!   ▼
//! CodeGeneratorResponse (+ supported features, edition bounds)
//! ```
//!
//! Any failure aborts the whole invocation; no partial response is built.

use crate::grouping::{exclude_files, group_by_directory};
use crate::options::{OptionsError, parse_options};
use crate::protocol::{
    CodeGeneratorRequest, CodeGeneratorResponse, GeneratedFile, MAXIMUM_EDITION, MINIMUM_EDITION,
    SUPPORTED_FEATURES,
};
use crate::renderer::{self, RenderError};
use crate::template::{Template, TypeIndex};
use prost_types::FileDescriptorProto;
use std::collections::HashMap;
use std::fs;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PluginError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Run the plugin on one request.
pub fn generate(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse, PluginError> {
    let options = parse_options(request.parameter())?;
    debug!(
        render_type = ?options.render_type,
        template_file = ?options.template_file,
        output_file = %options.output_file,
        source_relative = options.source_relative,
        "parsed plugin options"
    );

    let custom_template = options
        .template_file
        .as_deref()
        .map(read_template)
        .transpose()?;
    let renderer = renderer::select(options.render_type, custom_template.as_deref())?;

    let requested = files_to_generate(request);
    let files = exclude_files(&requested, &options.exclude_patterns);
    if files.len() < requested.len() {
        debug!(excluded = requested.len() - files.len(), "dropped files matching exclude_patterns");
    }

    let index = TypeIndex::new(&request.proto_file);
    let groups = group_by_directory(&files, options.source_relative);

    let mut response = CodeGeneratorResponse {
        supported_features: Some(SUPPORTED_FEATURES),
        minimum_edition: Some(MINIMUM_EDITION),
        maximum_edition: Some(MAXIMUM_EDITION),
        ..Default::default()
    };
    for (dir, group) in &groups {
        let template = Template::new(group, &index, &options);
        let content = renderer.render(&template)?;
        let name = dir.join(&options.output_file);
        info!(file = %name, protos = group.len(), "generated");
        response.file.push(GeneratedFile::new(name, content));
    }

    Ok(response)
}

fn read_template(path: &str) -> Result<String, PluginError> {
    debug!(path, "reading custom template");
    fs::read_to_string(path).map_err(|source| PluginError::TemplateRead {
        path: path.to_string(),
        source,
    })
}

/// Descriptors named in `file_to_generate`, in that order. Everything else
/// in `proto_file` is only there to resolve type references.
fn files_to_generate(request: &CodeGeneratorRequest) -> Vec<&FileDescriptorProto> {
    let by_name: HashMap<&str, &FileDescriptorProto> = request
        .proto_file
        .iter()
        .map(|file| (file.name(), file))
        .collect();

    request
        .file_to_generate
        .iter()
        .filter_map(|name| {
            let file = by_name.get(name.as_str()).copied();
            if file.is_none() {
                warn!(file = %name, "requested file has no descriptor, skipping");
            }
            file
        })
        .collect()
}
