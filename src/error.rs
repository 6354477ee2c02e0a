use crate::models::TransferReceipt;
use thiserror::Error;

/// Result of one upload request, handed back to the presentation layer
pub type TransferOutcome = Result<TransferReceipt, TransferError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error(
        "The file size ({size} bytes) exceeds the {} MB limit. Please upload a smaller file.",
        .limit / 1024 / 1024
    )]
    Oversize { size: u64, limit: u64 },

    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),

    #[error("Failed to save local copy: {0}")]
    Staging(String),

    #[error("Storage authorization failed: {0}")]
    Authorization(String),

    #[error("An error occurred during upload: {0}")]
    Transmission(String),
}

impl TransferError {
    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::Oversize { .. } => "FILE_TOO_LARGE",
            TransferError::InvalidRequest(_) => "INVALID_REQUEST",
            TransferError::Staging(_) => "STAGING_FAILED",
            TransferError::Authorization(_) => "AUTHORIZATION_FAILED",
            TransferError::Transmission(_) => "TRANSMISSION_FAILED",
        }
    }
}
