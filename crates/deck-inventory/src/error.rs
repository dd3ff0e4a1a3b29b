//! Error types for deck-inventory

/// Failure reported by an inventory provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Inventory provider not available")]
    Unavailable,

    #[error("{0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed provider data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Acquisition errors. Callers turn these into an empty inventory plus a notice.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("This feature is only available on Android (running on {0})")]
    PlatformUnsupported(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl AcquisitionError {
    /// Message to show the user, without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            AcquisitionError::PlatformUnsupported(_) => {
                "This feature is only available on Android".to_string()
            }
            AcquisitionError::Provider(e) => {
                let message = e.to_string();
                if message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    message
                }
            }
        }
    }
}
