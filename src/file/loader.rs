//! Document import.
//!
//! Reads documents in the export format back into a `Document`, from a file
//! (optionally gzip-compressed) or from stdin, and checks the tree invariants
//! before handing the document to the editor.

use crate::document::tree::Document;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parses a document from JSON text and validates it.
///
/// # Errors
///
/// Returns an error if the text is not a valid document, if two blocks share
/// an id, or if a non-columns block carries inner blocks.
pub fn parse_document(content: &str) -> Result<Document> {
    let document: Document = serde_json::from_str(content).context("Failed to parse document")?;
    document.validate().context("Invalid document structure")?;
    Ok(document)
}

/// Loads and parses a document file.
///
/// Files with a `.gz` extension are decompressed first.
///
/// # Examples
///
/// ```no_run
/// use blockquill::file::loader::load_document_file;
///
/// let document = load_document_file("page.json").unwrap();
/// println!("{} root blocks", document.blocks.len());
/// ```
pub fn load_document_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref).context("Failed to read file")?
    };

    let document = parse_document(&content)
        .with_context(|| format!("Failed to load {}", path_ref.display()))?;
    tracing::debug!(
        "loaded {} root blocks from {}",
        document.blocks.len(),
        path_ref.display()
    );
    Ok(document)
}

/// Loads and parses a document from standard input.
///
/// Gzip input is detected by its magic bytes.
pub fn load_document_from_stdin() -> Result<Document> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")?
    };

    parse_document(&content).context("Failed to parse document from stdin")
}

fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzip data")?;
    Ok(content)
}
