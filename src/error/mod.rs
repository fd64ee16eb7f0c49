//! Unified error handling for the dispatch pipeline

use thiserror::Error;

/// Pipeline-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors that stop a send before the provider is called.
///
/// Provider-side problems never show up here: they are classified into a
/// [`crate::domain::DispatchOutcome`] instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the caller sent something unusable.
    ///
    /// Client errors must not be retried as-is.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::BadRequest(_))
    }

    /// Message safe to show to the end user
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// Short machine-readable kind, used as a metrics label and in CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::BadRequest(_) => "bad_request",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<crate::file_provider::FileProviderError> for AppError {
    fn from(err: crate::file_provider::FileProviderError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
