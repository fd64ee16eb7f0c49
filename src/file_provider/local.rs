//! Local directory file provider

use super::{FileContent, FileContentProvider, FileProviderError};
use crate::domain::AttachmentRef;
use async_trait::async_trait;
use base64::Engine;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Serves attachment content from files under a base directory.
///
/// The attachment's `path` is used when present, otherwise its `file_id`
/// doubles as the file name.
pub struct LocalFileProvider {
    base_dir: PathBuf,
}

impl LocalFileProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn locate(&self, attachment: &AttachmentRef) -> Result<PathBuf, FileProviderError> {
        let relative = attachment
            .path
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| attachment.file_id.to_string());

        let relative = Path::new(&relative);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(FileProviderError::InvalidPath(
                relative.display().to_string(),
            ));
        }

        Ok(self.base_dir.join(relative))
    }
}

#[async_trait]
impl FileContentProvider for LocalFileProvider {
    async fn get_file_details(
        &self,
        attachment: &AttachmentRef,
    ) -> Result<FileContent, FileProviderError> {
        let path = self.locate(attachment)?;
        debug!("Reading attachment {} from {}", attachment.file_id, path.display());

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileProviderError::NotFound(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let original_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| attachment.file_id.to_string());

        Ok(FileContent {
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
            original_name,
        })
    }
}
