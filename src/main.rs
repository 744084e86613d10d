use clap::Parser;
use prost::Message;
use protoc_gen_doc::plugin::{self, PluginError};
use protoc_gen_doc::protocol::CodeGeneratorRequest;
use std::io::{self, Read, Write};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to decode CodeGeneratorRequest: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "protoc-gen-doc")]
#[command(about = "Documentation generator plugin for protoc")]
#[command(long_about = "\
Documentation generator plugin for protoc

Not meant to be run by hand: protoc starts it, writes a CodeGeneratorRequest
to stdin and reads the CodeGeneratorResponse from stdout.

  protoc --doc_out=./docs --doc_opt=<TYPE|TEMPLATE>,<OUTPUT>[,source_relative][:OPTIONS] *.proto

Types: html (default), markdown/md, json, docbook. Any other first value is
read as a tera template file.

Options (comma-separated, after ':'):
  camel_case_fields=true|false     field names in lowerCamelCase
  exclude_patterns=RE[,RE...]      skip files whose path matches
  exclude_directive=TOKEN          extra block marker besides @exclude
  exclude_line_directive=TOKEN     extra line marker besides @exclude-line

Diagnostics go to stderr; set RUST_LOG (e.g. RUST_LOG=debug) to see them.")]
#[command(version = version_string())]
struct Cli {
    /// Log pipeline progress to stderr (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // stdout carries the response, so logs must go to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("protoc-gen-doc: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;
    let request = CodeGeneratorRequest::decode(input.as_slice())?;

    let response = plugin::generate(&request)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.encode_to_vec())?;
    stdout.flush()?;
    Ok(())
}
