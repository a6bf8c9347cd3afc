use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// True when the payload carries the PDF header (leading whitespace allowed).
pub fn looks_like_pdf(data: &[u8]) -> bool {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    data[start..].starts_with(PDF_MAGIC)
}

/// Extracts and cleans the text of an uploaded resume.
///
/// Parsing is CPU-bound and the extractor may panic on malformed files, so it
/// runs on the blocking pool and a panic surfaces as `PdfExtraction`.
pub async fn extract_resume_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::PdfExtraction(format!("PDF parser aborted: {e}")))?
        .map_err(|e| AppError::PdfExtraction(e.to_string()))?;

    let text = clean_pdf_text(&raw);
    if text.is_empty() {
        return Err(AppError::EmptyPdf);
    }

    info!("Extracted {} characters from {size}-byte PDF", text.chars().count());
    debug!("Extracted resume text: {text}");
    Ok(text)
}

/// Trims every line, drops blank lines, collapses whitespace runs and strips NUL/BOM artifacts.
fn clean_pdf_text(text: &str) -> String {
    text.lines()
        .map(|line| {
            line.replace(['\u{0}', '\u{FEFF}'], "")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
