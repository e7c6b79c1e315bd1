//! Document export.
//!
//! This module serializes a `Document` to pretty-printed JSON and writes it to
//! disk atomically, with optional gzip compression and backup creation.

use crate::config::Config;
use crate::document::tree::Document;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes a document as JSON indented by `indent_size` spaces.
///
/// # Examples
///
/// ```
/// use blockquill::document::tree::Document;
/// use blockquill::file::saver::to_json_string;
///
/// let json = to_json_string(&Document::default(), 2).unwrap();
/// assert_eq!(json, "{\n  \"version\": \"1.2.0\",\n  \"blocks\": []\n}");
/// ```
pub fn to_json_string(document: &Document, indent_size: usize) -> Result<String> {
    let indent = " ".repeat(indent_size);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .context("Failed to serialize document")?;
    String::from_utf8(buffer).context("Serialized document is not valid UTF-8")
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Saves a document to `path`.
///
/// The JSON is indented per `config.indent_size` and ends with a newline.
/// Targets ending in `.gz` are gzip-compressed. If `config.create_backup` is
/// set and the target exists, it is copied to `<name>.bak` first.
///
/// # Examples
///
/// ```no_run
/// use blockquill::config::Config;
/// use blockquill::document::tree::Document;
/// use blockquill::file::saver::save_document_file;
///
/// save_document_file("page.json", &Document::default(), &Config::default()).unwrap();
/// ```
///
/// # Atomic Write
///
/// The data is written to a temporary file next to the target, which is then
/// renamed over the target, so the target is never left partially written.
pub fn save_document_file<P: AsRef<Path>>(
    path: P,
    document: &Document,
    config: &Config,
) -> Result<()> {
    let path = path.as_ref();
    let should_compress = path.to_string_lossy().ends_with(".gz");

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let mut json_str = to_json_string(document, config.indent_size)?;
    json_str.push('\n');

    write_file_atomic(path, json_str.as_bytes(), should_compress)?;
    tracing::info!(
        "saved {} blocks to {}",
        crate::document::tree::count_blocks(&document.blocks),
        path.display()
    );

    Ok(())
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}
