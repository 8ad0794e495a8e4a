use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two upload surfaces with their own type and size policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Illustration attached to a question by the superuser.
    QuestionImage,
    /// Evidence document attached to a questionnaire response.
    ResponseDocument,
}

impl UploadKind {
    pub fn subdir(&self) -> &'static str {
        match self {
            UploadKind::QuestionImage => "questions",
            UploadKind::ResponseDocument => "responses",
        }
    }

    pub fn max_bytes(&self) -> usize {
        match self {
            UploadKind::QuestionImage => 5 * 1024 * 1024,
            UploadKind::ResponseDocument => 10 * 1024 * 1024,
        }
    }

    pub fn allows(&self, content_type: &str) -> bool {
        match self {
            UploadKind::QuestionImage => {
                matches!(content_type, "image/jpeg" | "image/png")
            }
            UploadKind::ResponseDocument => matches!(
                content_type,
                "application/pdf"
                    | "application/msword"
                    | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    | "application/vnd.ms-excel"
                    | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
        }
    }
}

/// Builds the stored file name: upload instant plus a random suffix, keeping
/// the original extension.
pub fn stored_file_name(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    format!(
        "{}_{}{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    )
}

/// Validates and writes an uploaded file, returning the path relative to the
/// upload root.
pub async fn store_upload(
    upload_root: &str,
    kind: UploadKind,
    original_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<String, UploadError> {
    if !kind.allows(content_type) {
        return Err(UploadError::UnsupportedType(content_type.to_string()));
    }

    let limit = kind.max_bytes();
    if bytes.len() > limit {
        return Err(UploadError::TooLarge { limit });
    }

    let dir = PathBuf::from(upload_root).join(kind.subdir());
    tokio::fs::create_dir_all(&dir).await?;

    let file_name = stored_file_name(original_name);
    tokio::fs::write(dir.join(&file_name), bytes).await?;

    Ok(format!("{}/{}", kind.subdir(), file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_images_accept_only_jpeg_and_png() {
        assert!(UploadKind::QuestionImage.allows("image/jpeg"));
        assert!(UploadKind::QuestionImage.allows("image/png"));
        assert!(!UploadKind::QuestionImage.allows("image/gif"));
        assert!(!UploadKind::QuestionImage.allows("application/pdf"));
    }

    #[test]
    fn response_documents_accept_office_formats() {
        assert!(UploadKind::ResponseDocument.allows("application/pdf"));
        assert!(UploadKind::ResponseDocument.allows(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
        assert!(!UploadKind::ResponseDocument.allows("image/png"));
    }

    #[test]
    fn stored_name_keeps_the_extension() {
        let name = stored_file_name("증빙자료.pdf");
        assert!(name.ends_with(".pdf"));

        let bare = stored_file_name("README");
        assert!(!bare.contains('.'));
    }

    #[tokio::test]
    async fn store_rejects_oversized_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let too_big = vec![0u8; UploadKind::QuestionImage.max_bytes() + 1];

        let err = store_upload(
            dir.path().to_str().unwrap(),
            UploadKind::QuestionImage,
            "photo.png",
            "image/png",
            &too_big,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, UploadError::TooLarge { .. }));
    }

    #[tokio::test]
    async fn store_writes_under_the_kind_subdir() {
        let dir = tempfile::tempdir().unwrap();

        let rel = store_upload(
            dir.path().to_str().unwrap(),
            UploadKind::ResponseDocument,
            "evidence.pdf",
            "application/pdf",
            b"%PDF-1.4",
        )
        .await
        .unwrap();

        assert!(rel.starts_with("responses/"));
        let written = tokio::fs::read(dir.path().join(&rel)).await.unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }
}
