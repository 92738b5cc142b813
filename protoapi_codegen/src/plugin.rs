//! Output files of a generator run.

use crate::binding::{resolve_file, FileDescriptor};
use crate::config::Config;
use crate::error::Result;
use crate::frame::build_frame;

/// Rendered file, ready to be written by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output root, e.g. `library/v1/library.api.rs`.
    pub name: String,
    pub content: String,
}

/// Output path for a source file: its `.proto` extension is replaced with `.api.rs`.
pub fn output_name(source: &str) -> String {
    let stem = source.strip_suffix(".proto").unwrap_or(source);
    format!("{stem}.api.rs")
}

/// Generate one file per descriptor. Fails on the first file that can't be
/// generated, no partial output is returned.
pub fn generate(files: &[FileDescriptor], config: &Config) -> Result<Vec<GeneratedFile>> {
    files.iter().map(|file| generate_file(file, config)).collect()
}

pub fn generate_file(file: &FileDescriptor, config: &Config) -> Result<GeneratedFile> {
    let data = resolve_file(file, config)
        .inspect_err(|err| tracing::error!(source = %file.name, %err, "failed to resolve file"))?;
    let content = build_frame(&data, config)?;

    tracing::debug!(source = %file.name, services = data.services.len(), "generated file");

    Ok(GeneratedFile {
        name: output_name(&file.name),
        content,
    })
}
