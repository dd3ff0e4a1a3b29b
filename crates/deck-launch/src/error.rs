//! Error types for deck-launch

/// Classified launch failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    /// The target could not be resolved or started in its profile.
    #[error("{0}")]
    NotFound(String),

    /// No launch service was provided.
    #[error("Cannot launch apps - launch service not available")]
    Unavailable,

    #[error("{0}")]
    Other(String),
}

/// A store channel rejected the URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot open {url}: {reason}")]
pub struct OpenUrlError {
    pub url: String,
    pub reason: String,
}
