//! Text extraction — converts an uploaded PDF into one flat text blob.

use std::io::Write;

use anyhow::Context;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::AppError;

/// Extracts the text content of a PDF, concatenating pages in page order
/// separated by newlines.
///
/// The upload is staged through a per-request temporary file that is deleted
/// when this function returns, whether extraction succeeds or not.
///
/// A document with no pages, or whose pages are all whitespace, is an
/// extraction failure: no fields can be derived from it.
pub fn extract_resume_text(data: &[u8]) -> Result<String, AppError> {
    let mut tmp = NamedTempFile::new().context("failed to create a scratch file for the upload")?;
    tmp.write_all(data)
        .context("failed to write the upload to a scratch file")?;

    let pages = pdf_extract::extract_text_by_pages(tmp.path())
        .map_err(|e| AppError::Extraction(format!("failed to read PDF: {e}")))?;

    debug!("extracted text from {} page(s)", pages.len());

    let text = pages.join("\n");
    if text.trim().is_empty() {
        return Err(AppError::Extraction(
            "document contains no extractable text".to_string(),
        ));
    }

    Ok(text)
}
