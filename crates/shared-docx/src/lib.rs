//! DOCX loading
//!
//! Opens a Word document container and extracts the ordered paragraph
//! text, page headers, table count and core properties into a
//! [`shared_types::Document`].

pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod parser;
pub mod properties;

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use shared_types::Document;
use tracing::{debug, info};
use zip::result::ZipError;
use zip::ZipArchive;

pub use error::DocxError;
pub use parser::{parse_part, PartText, CELL_SEPARATOR};
pub use properties::parse_core_properties;

const BODY_PART: &str = "word/document.xml";
const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// File extensions accepted by [`load_docx_file`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &["docx"];

/// Largest decompressed size accepted for any single part
pub const MAX_PART_BYTES: u64 = 32 * 1024 * 1024;

/// Load a document from in-memory DOCX bytes
pub fn load_docx(source: &str, bytes: &[u8]) -> Result<Document, DocxError> {
    load_docx_with_limit(source, bytes, MAX_PART_BYTES)
}

/// Load a document, rejecting any part that inflates past `max_part_bytes`
pub fn load_docx_with_limit(
    source: &str,
    bytes: &[u8],
    max_part_bytes: u64,
) -> Result<Document, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocxError::UnreadableDocument(format!("not a DOCX container: {}", e)))?;

    let body_xml = read_part(&mut archive, BODY_PART, max_part_bytes)?.ok_or_else(|| {
        DocxError::UnreadableDocument(format!("missing {} part", BODY_PART))
    })?;
    let body = parse_part(&body_xml)?;

    if body.paragraphs.is_empty() {
        return Err(DocxError::EmptyDocument);
    }

    let mut header_parts: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("word/header") && name.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    header_parts.sort();

    let mut headers = Vec::new();
    for part in &header_parts {
        if let Some(xml) = read_part(&mut archive, part, max_part_bytes)? {
            headers.extend(parse_part(&xml)?.paragraphs);
        }
    }

    let properties = read_part(&mut archive, CORE_PROPERTIES_PART, max_part_bytes)?
        .map(|xml| parse_core_properties(&xml))
        .unwrap_or_default();

    debug!(
        "{}: {} paragraphs, {} tables, {} header lines",
        source,
        body.paragraphs.len(),
        body.table_count,
        headers.len()
    );

    Ok(Document {
        source: source.to_string(),
        paragraphs: body.paragraphs,
        headers,
        table_count: body.table_count,
        properties,
    })
}

/// Load a document from disk. Only `.docx` files are accepted.
pub fn load_docx_file(path: &Path) -> Result<Document, DocxError> {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);
    if !supported {
        return Err(DocxError::UnreadableDocument(format!(
            "unsupported format for {}; only DOCX files are supported",
            source
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        DocxError::UnreadableDocument(format!("cannot read {}: {}", path.display(), e))
    })?;
    let document = load_docx(&source, &bytes)?;
    info!("Successfully parsed: {}", source);
    Ok(document)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    limit: u64,
) -> Result<Option<Vec<u8>>, DocxError> {
    let too_large = || {
        DocxError::UnreadableDocument(format!("{} exceeds {} bytes uncompressed", name, limit))
    };

    match archive.by_name(name) {
        Ok(file) => {
            // Declared size may lie, so the read is capped as well
            if file.size() > limit {
                return Err(too_large());
            }
            let mut buf = Vec::new();
            file.take(limit + 1).read_to_end(&mut buf).map_err(|e| {
                DocxError::UnreadableDocument(format!("cannot read {}: {}", name, e))
            })?;
            if buf.len() as u64 > limit {
                return Err(too_large());
            }
            Ok(Some(buf))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(DocxError::UnreadableDocument(format!(
            "cannot open {}: {}",
            name, e
        ))),
    }
}
