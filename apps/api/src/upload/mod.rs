//! Upload Receiver: validates the multipart form and streams the resume into scratch storage.

pub mod scratch;

use std::path::Path;

use axum::extract::multipart::{Field, Multipart};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::upload::scratch::ScratchFile;

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "jobDescription";
/// Allowance on top of the file limit for boundaries, headers and the job description.
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Accepted resume formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
}

impl DocumentKind {
    pub const ALLOWED: &'static str = ".pdf, .doc, .docx";

    /// Case-insensitive lookup from a bare extension (`"PDF"`, `".docx"`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_filename(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }
}

/// A resume persisted to scratch storage for the duration of one request.
#[derive(Debug)]
pub struct UploadedDocument {
    pub scratch: ScratchFile,
    pub original_name: String,
    pub kind: DocumentKind,
    pub size_bytes: usize,
}

impl UploadedDocument {
    pub fn stored_path(&self) -> &Path {
        self.scratch.path()
    }
}

/// Everything the analysis pipeline needs from the form.
#[derive(Debug)]
pub struct ResumeUpload {
    pub document: UploadedDocument,
    pub job_description: String,
}

/// Reads the whole form. Any rejection drops the partially written scratch
/// file, so nothing is retained on failure.
pub async fn receive_upload(
    mut multipart: Multipart,
    upload_dir: &Path,
    max_bytes: usize,
) -> Result<ResumeUpload, AppError> {
    let mut document: Option<UploadedDocument> = None;
    let mut job_description = String::new();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                if document.is_some() {
                    return Err(AppError::InvalidUpload(
                        "Only one resume file may be uploaded".to_string(),
                    ));
                }
                document = Some(store_resume(field, upload_dir, max_bytes).await?);
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                job_description = field.text().await.map_err(invalid_form)?;
            }
            other => {
                warn!(field = ?other, "ignoring unexpected form field");
            }
        }
    }

    let document = document.ok_or_else(|| AppError::InvalidUpload("No file uploaded".to_string()))?;
    info!(
        stage = "upload",
        file = %document.original_name,
        kind = document.kind.as_str(),
        bytes = document.size_bytes,
        "resume stored"
    );
    Ok(ResumeUpload {
        document,
        job_description,
    })
}

async fn store_resume(
    mut field: Field<'_>,
    upload_dir: &Path,
    max_bytes: usize,
) -> Result<UploadedDocument, AppError> {
    let original_name = field
        .file_name()
        .map(str::to_string)
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::InvalidUpload("No file uploaded".to_string()))?;

    let kind = DocumentKind::from_filename(&original_name).ok_or_else(|| {
        AppError::InvalidUpload(format!(
            "Only PDF, DOC, or DOCX files are allowed ({})",
            DocumentKind::ALLOWED
        ))
    })?;

    let (scratch, mut file) = ScratchFile::create(upload_dir, &original_name)
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("creating scratch file")))?;

    let mut size_bytes = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(invalid_form)? {
        size_bytes += chunk.len();
        if size_bytes > max_bytes {
            return Err(AppError::InvalidUpload(format!(
                "File too large. Maximum size is {} bytes",
                max_bytes
            )));
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("writing scratch file")))?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("flushing scratch file")))?;

    if size_bytes == 0 {
        return Err(AppError::InvalidUpload("Uploaded file is empty".to_string()));
    }

    Ok(UploadedDocument {
        scratch,
        original_name,
        kind,
        size_bytes,
    })
}

fn invalid_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::InvalidUpload(format!("Invalid multipart request: {}", e.body_text()))
}
