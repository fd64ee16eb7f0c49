//! File content provider
//!
//! The pipeline never reads storage itself: it asks a [`FileContentProvider`]
//! for the base64 content and original name of each referenced file.

mod local;

pub use local::LocalFileProvider;

use crate::domain::AttachmentRef;
use async_trait::async_trait;
use thiserror::Error;

/// File provider error types
#[derive(Error, Debug)]
pub enum FileProviderError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Content of a stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub base64: String,
    pub original_name: String,
}

impl FileContent {
    pub fn new(base64: impl Into<String>, original_name: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
            original_name: original_name.into(),
        }
    }
}

/// Trait for file stores that can hand out attachment content
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileContentProvider: Send + Sync {
    async fn get_file_details(
        &self,
        attachment: &AttachmentRef,
    ) -> Result<FileContent, FileProviderError>;
}
