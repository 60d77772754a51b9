/// Convenience result type used across Panreel.
pub type PanreelResult<T> = Result<T, PanreelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PanreelError {
    /// A snippet or overlay region with non-positive dimensions.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Video generation was requested with zero snippets.
    #[error("timeline is empty: at least one snippet is required")]
    EmptyTimeline,

    /// A required image or narration asset could not be loaded.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// The external video sink reported a failure.
    #[error("sink failure: {0}")]
    SinkFailure(String),

    /// Invalid user-provided or storyboard data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The render was cancelled via its [`CancelToken`](crate::CancelToken).
    #[error("render cancelled")]
    Cancelled,

    /// The render deadline elapsed before the pipeline finished.
    #[error("render deadline exceeded")]
    DeadlineExceeded,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanreelError {
    /// Build a [`PanreelError::InvalidRegion`] value.
    pub fn invalid_region(msg: impl Into<String>) -> Self {
        Self::InvalidRegion(msg.into())
    }

    /// Build a [`PanreelError::MissingAsset`] value.
    pub fn missing_asset(msg: impl Into<String>) -> Self {
        Self::MissingAsset(msg.into())
    }

    /// Build a [`PanreelError::SinkFailure`] value.
    pub fn sink_failure(msg: impl Into<String>) -> Self {
        Self::SinkFailure(msg.into())
    }

    /// Build a [`PanreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
