//! Scratch storage: request-scoped files that are removed exactly once.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::{File, OpenOptions};
use tracing::{debug, warn};
use uuid::Uuid;

/// Owns one scratch file. The file is removed by `remove` or, failing that,
/// when the guard is dropped, so every exit path of a request cleans up.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    removed: bool,
}

impl ScratchFile {
    /// Creates a new empty file in `dir` named after `original_name`.
    /// The directory is created if absent; an existing file is never reused.
    pub async fn create(dir: &Path, original_name: &str) -> std::io::Result<(Self, File)> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(unique_name(original_name));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        debug!(path = %path.display(), "scratch file created");
        Ok((Self { path, removed: false }, file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file now. Failure is logged and not returned.
    pub async fn remove(mut self) {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "scratch file removed"),
            Err(e) => warn!(path = %self.path.display(), "failed to remove scratch file: {e}"),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        // Blocking unlink on purpose: Drop cannot await and a single unlink is cheap.
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), "failed to remove scratch file: {e}");
            }
        }
    }
}

/// `<utc nanos>-<8 hex>-<sanitized name>`.
pub fn unique_name(original_name: &str) -> String {
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let nonce = Uuid::new_v4().simple().to_string();
    format!("{nanos}-{}-{}", &nonce[..8], sanitize_filename(original_name))
}

/// Longest stem kept from the client name; the stored name stays far below NAME_MAX.
pub const MAX_STEM_BYTES: usize = 100;
pub const MAX_EXTENSION_BYTES: usize = 16;

/// Keeps the final path component, maps whitespace runs to `_` and anything
/// outside `[A-Za-z0-9._-]` to `_`. The extension is always preserved and the
/// stem is capped at `MAX_STEM_BYTES`.
pub fn sanitize_filename(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let mut out = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for ch in base.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            out.push(ch);
        } else {
            out.push('_');
        }
    }

    // `out` is ASCII from here on, so byte slicing is safe.
    let (stem, extension) = match out.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (out.as_str(), ""),
    };
    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() {
        "upload"
    } else {
        &stem[..stem.len().min(MAX_STEM_BYTES)]
    };
    let extension = &extension[..extension.len().min(MAX_EXTENSION_BYTES)];

    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_whitespace_runs() {
        assert_eq!(sanitize_filename("My  Resume 2024.pdf"), "My_Resume_2024.pdf");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_filename("C:\\Users\\jane\\cv.docx"), "cv.docx");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("résumé;rm -rf.pdf"), "r_sum__rm_-rf.pdf");
    }

    #[test]
    fn test_sanitize_never_empty_or_hidden() {
        assert_eq!(sanitize_filename(".."), "upload");
        assert_eq!(sanitize_filename(".hidden.pdf"), "hidden.pdf");
    }

    #[test]
    fn test_sanitize_keeps_extension_of_dot_only_stem() {
        assert_eq!(sanitize_filename("..pdf"), "upload.pdf");
        assert_eq!(sanitize_filename("...DOCX"), "upload.DOCX");
    }

    #[test]
    fn test_sanitize_caps_long_stem_and_keeps_extension() {
        let long = format!("{}.pdf", "a".repeat(240));
        let sanitized = sanitize_filename(&long);
        assert_eq!(sanitized, format!("{}.pdf", "a".repeat(MAX_STEM_BYTES)));

        // Multi-byte characters collapse to `_` before the cap is applied.
        let wide = format!("{}.docx", "é".repeat(200));
        assert_eq!(sanitize_filename(&wide).len(), MAX_STEM_BYTES + ".docx".len());
    }

    #[test]
    fn test_unique_name_fits_name_max() {
        let long = format!("{}.pdf", "a".repeat(1000));
        let name = unique_name(&long);
        assert!(name.len() < 255, "len {}", name.len());
        assert!(name.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_create_accepts_long_client_name() {
        let dir = tempfile::tempdir().unwrap();
        let long = format!("{}.pdf", "a".repeat(244));
        let (scratch, _file) = ScratchFile::create(dir.path(), &long).await.unwrap();
        assert!(scratch.path().exists());
    }

    #[test]
    fn test_unique_names_differ() {
        let a = unique_name("cv.pdf");
        let b = unique_name("cv.pdf");
        assert_ne!(a, b);
        assert!(a.ends_with("-cv.pdf"));
    }

    #[tokio::test]
    async fn test_create_makes_directory_and_remove_deletes() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("uploads");

        let (scratch, _file) = ScratchFile::create(&dir, "cv.pdf").await.unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());

        scratch.remove().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let (scratch, _file) = ScratchFile::create(dir.path(), "cv.pdf").await.unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
