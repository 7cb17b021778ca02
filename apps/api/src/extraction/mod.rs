//! Text Extractor: format dispatch from an accepted upload to plain text.
//!
//! Decoders are synchronous and CPU-bound, so they run on the blocking pool.
//! A decoder panic surfaces as a `JoinError` and is reported as a failed
//! extraction instead of taking the process down.

use std::path::Path;

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use thiserror::Error;
use tracing::info;

use crate::upload::DocumentKind;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read scratch file: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF decoding failed: {0}")]
    Pdf(String),

    #[error("Word document decoding failed: {0}")]
    Word(String),

    #[error("decoder task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),

    #[error("document contains no extractable text")]
    Empty,
}

/// Plain text derived from an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub content: String,
}

/// Reads the file at `path` and decodes it according to `kind`.
/// `kind` is the format accepted at upload; the stored file name is never re-inspected.
pub async fn extract(path: &Path, kind: DocumentKind) -> Result<ExtractedText, ExtractionError> {
    let bytes = tokio::fs::read(path).await?;
    let byte_len = bytes.len();

    let content = tokio::task::spawn_blocking(move || decode(&bytes, kind)).await??;
    if content.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    info!(
        stage = "extraction",
        kind = kind.as_str(),
        bytes = byte_len,
        chars = content.chars().count(),
        "text extracted"
    );
    Ok(ExtractedText { content })
}

/// Synchronous format dispatch.
pub fn decode(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Doc | DocumentKind::Docx => extract_word(bytes),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Legacy binary `.doc` files are not OOXML and fail here with `Word`.
fn extract_word(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Word(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => push_paragraph(&mut text, p),
            DocumentChild::Table(t) => push_table(&mut text, t),
            _ => {}
        }
    }
    Ok(text)
}

fn push_paragraph(out: &mut String, paragraph: &Paragraph) {
    push_paragraph_children(out, &paragraph.children);
    out.push('\n');
}

fn push_paragraph_children(out: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(out, &link.children),
            _ => {}
        }
    }
}

fn push_table(out: &mut String, table: &Table) {
    let cells = table
        .rows
        .iter()
        .flat_map(|TableChild::TableRow(row)| row.cells.iter())
        .map(|TableRowChild::TableCell(cell)| cell);

    for cell in cells {
        for content in &cell.children {
            match content {
                TableCellContent::Paragraph(p) => push_paragraph(out, p),
                TableCellContent::Table(t) => push_table(out, t),
                _ => {}
            }
        }
    }
}
