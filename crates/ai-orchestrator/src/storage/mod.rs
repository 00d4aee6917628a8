//! Backends that persist generated files.

mod http;
mod local;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpStorage;
pub use local::LocalStorage;

/// A base64 encoded file to persist.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct File {
    /// The file content, base64 encoded.
    pub base64_content: String,
    /// The MIME type, like `image/png`.
    pub mime_type: String,
}

impl File {
    /// Creates a new file.
    #[inline]
    pub fn new<C, M>(base64_content: C, mime_type: M) -> Self
    where
        C: Into<String>,
        M: Into<String>,
    {
        Self {
            base64_content: base64_content.into(),
            mime_type: mime_type.into(),
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        if self.base64_content.is_empty() || self.mime_type.is_empty() {
            return Err(StorageError::InvalidFile(
                "Invalid file content or type".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Errors returned by [`Storage`] backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file is empty or cannot be decoded.
    #[error("{0}")]
    InvalidFile(String),
    /// The storage service could not be reached or returned garbage.
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),
    /// The storage service answered with an error status.
    #[error("HTTP request failed with status {0}")]
    Status(reqwest::StatusCode),
    /// The storage service refused the file.
    #[error("File saving failed: {0}")]
    Rejected(String),
    /// Writing to the local disk failed.
    #[error("failed to write file")]
    Io(#[from] std::io::Error),
}

/// Somewhere to put generated files.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persists the file and returns a URL or path that refers to it.
    async fn persist_file(&self, file: File) -> Result<String, StorageError>;
}
