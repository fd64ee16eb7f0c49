//! Attachment resolution
//!
//! Fetches every referenced file from the [`FileContentProvider`], checks its
//! size and tags it inline or regular. The first failure aborts the rest.

use crate::domain::{AttachmentRef, ResolvedAttachment};
use crate::error::{AppError, Result};
use crate::file_provider::FileContentProvider;
use crate::service::size::validate_attachment_size;
use futures::stream::{self, StreamExt, TryStreamExt};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error};

pub struct AttachmentResolver {
    file_provider: Arc<dyn FileContentProvider>,
    max_attachment_size_bytes: u64,
    concurrency: usize,
}

impl AttachmentResolver {
    /// Resolver fetching one attachment at a time
    pub fn new(
        file_provider: Arc<dyn FileContentProvider>,
        max_attachment_size_bytes: u64,
    ) -> Self {
        Self {
            file_provider,
            max_attachment_size_bytes,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` fetches in flight. Results keep input order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn resolve(&self, attachments: &[AttachmentRef]) -> Result<Vec<ResolvedAttachment>> {
        if attachments.is_empty() {
            return Ok(Vec::new());
        }

        stream::iter(attachments)
            .map(|attachment| self.resolve_one(attachment))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    async fn resolve_one(&self, attachment: &AttachmentRef) -> Result<ResolvedAttachment> {
        let content = self
            .file_provider
            .get_file_details(attachment)
            .await
            .map_err(|e| {
                error!("Failed to resolve attachment {}: {}", attachment.file_id, e);
                AppError::from(e)
            })?;

        let size = validate_attachment_size(
            &content.base64,
            &content.original_name,
            self.max_attachment_size_bytes,
        )?;

        debug!(
            "Resolved attachment {} ({}, {} bytes, embedded={})",
            attachment.file_id, content.original_name, size, attachment.embedded
        );
        counter!("mailersend_dispatch_attachments_resolved_total").increment(1);

        let resolved = if attachment.embedded {
            ResolvedAttachment::inline(content.base64, content.original_name, attachment.file_id)
        } else {
            ResolvedAttachment::regular(content.base64, content.original_name)
        };

        Ok(resolved.with_file_name(attachment.file_name.clone()))
    }
}
