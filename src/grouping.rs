//! Choosing which files to document and which output file each lands in.
//!
//! Files whose path matches an exclusion pattern are dropped first. The rest
//! are grouped by output directory:
//!
//! ```text
//! default layout                    source_relative layout
//!
//! index.html                        index.html          (root-level files)
//!   ├── a.proto                       └── a.proto
//!   ├── api/v1/b.proto              api/v1/index.html
//!   └── api/v1/c.proto                ├── b.proto
//!                                     └── c.proto
//! ```
//!
//! Within a group files keep the order protoc listed them in, since that
//! order drives section order in the rendered document.

use prost_types::FileDescriptorProto;
use regex::Regex;
use std::collections::BTreeMap;

/// Directory an output file is written to, relative to `--doc_out`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputDir {
    /// The `--doc_out` directory itself.
    Root,
    /// A source-relative directory such as `api/v1`.
    Source(String),
}

impl OutputDir {
    /// Output directory for a file path under the source-relative layout.
    ///
    /// The directory part is cleaned lexically: empty and `.` segments go
    /// away and `..` cancels the segment before it, so `./a.proto` and
    /// `a.proto` share the root group.
    pub fn for_source(path: &str) -> Self {
        let Some((dir, _)) = path.rsplit_once('/') else {
            return Self::Root;
        };
        let mut segments: Vec<&str> = Vec::new();
        for segment in dir.split('/') {
            match segment {
                "" | "." => {}
                ".." if segments.last().is_some_and(|last| *last != "..") => {
                    segments.pop();
                }
                _ => segments.push(segment),
            }
        }
        if segments.is_empty() {
            Self::Root
        } else {
            Self::Source(segments.join("/"))
        }
    }

    /// Path of `file_name` inside this directory, `/`-separated as protoc
    /// expects.
    pub fn join(&self, file_name: &str) -> String {
        match self {
            Self::Root => file_name.to_string(),
            Self::Source(dir) => format!("{dir}/{file_name}"),
        }
    }
}

/// Files assigned to each output directory.
pub type Groups<'a> = BTreeMap<OutputDir, Vec<&'a FileDescriptorProto>>;

/// Drop every file whose name matches any of `patterns`, keeping the order
/// of the rest.
pub fn exclude_files<'a>(
    files: &[&'a FileDescriptorProto],
    patterns: &[Regex],
) -> Vec<&'a FileDescriptorProto> {
    files
        .iter()
        .copied()
        .filter(|file| !patterns.iter().any(|p| p.is_match(file.name())))
        .collect()
}

/// Partition files by output directory.
///
/// Without `source_relative` everything lands in [`OutputDir::Root`].
pub fn group_by_directory<'a>(
    files: &[&'a FileDescriptorProto],
    source_relative: bool,
) -> Groups<'a> {
    let mut groups = Groups::new();
    for &file in files {
        let dir = if source_relative {
            OutputDir::for_source(file.name())
        } else {
            OutputDir::Root
        };
        groups.entry(dir).or_default().push(file);
    }
    groups
}
