use thiserror::Error;

/// Everything that can go wrong while loading or playing media.
///
/// None of these are fatal. Each one is logged where it happens and the
/// screen falls back to a safe default (sample catalog, last known playback
/// state).
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media folder access was denied")]
    PermissionDenied,

    #[error("failed to load media catalog: {0}")]
    CatalogLoadFailure(String),

    #[error("failed to open {uri}: {reason}")]
    PlaybackOpenFailure { uri: String, reason: String },

    #[error("playback control failed: {0}")]
    PlaybackControlFailure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn open_failure(uri: &str, reason: impl std::fmt::Display) -> Self {
        MediaError::PlaybackOpenFailure {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn control_failure(reason: impl std::fmt::Display) -> Self {
        MediaError::PlaybackControlFailure(reason.to_string())
    }
}

pub type MediaResult<T> = Result<T, MediaError>;
