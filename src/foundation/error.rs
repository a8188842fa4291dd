/// Result alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Every failure the engine can report.
///
/// All of these are handled inside the tile that produced them. The gallery logs them and
/// falls back to the tile's static poster; none of them interrupts other tiles.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Invalid engine or region configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Observation target was absent or unmounted.
    #[error("observation skipped: {0}")]
    ObservationSkipped(String),

    /// Unsupported stream format or platform.
    #[error("stream attach failed: {0}")]
    StreamAttachFailed(String),

    /// Frame seek, capture or encode failed.
    #[error("thumbnail failed: {0}")]
    ThumbnailFailed(String),

    /// A pending play request was interrupted by a pause.
    #[error("playback interrupted: {0}")]
    PlaybackInterrupted(String),

    /// Genuine decode or network failure during playback.
    #[error("playback error: {0}")]
    PlaybackError(String),

    /// Error raised by a platform adapter.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Build [`EngineError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build [`EngineError::ObservationSkipped`].
    pub fn observation_skipped(msg: impl Into<String>) -> Self {
        Self::ObservationSkipped(msg.into())
    }

    /// Build [`EngineError::StreamAttachFailed`].
    pub fn stream_attach_failed(msg: impl Into<String>) -> Self {
        Self::StreamAttachFailed(msg.into())
    }

    /// Build [`EngineError::ThumbnailFailed`].
    pub fn thumbnail_failed(msg: impl Into<String>) -> Self {
        Self::ThumbnailFailed(msg.into())
    }

    /// Build [`EngineError::PlaybackInterrupted`].
    pub fn playback_interrupted(msg: impl Into<String>) -> Self {
        Self::PlaybackInterrupted(msg.into())
    }

    /// Build [`EngineError::PlaybackError`].
    pub fn playback_error(msg: impl Into<String>) -> Self {
        Self::PlaybackError(msg.into())
    }

    /// Whether this condition is part of normal operation and should only be logged at debug level.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::ObservationSkipped(_) | Self::PlaybackInterrupted(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
