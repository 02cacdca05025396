//! Keypad adapter error types.

use std::path::PathBuf;

use mediacenter_domain::error::MediaCenterError;

/// Errors specific to the keypad adapter.
#[derive(Debug, thiserror::Error)]
pub enum KeypadError {
    /// The input device could not be opened.
    #[error("failed to open input device {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from an open device failed.
    #[error("failed to read input event")]
    Read(#[source] std::io::Error),
}

impl KeypadError {
    /// Convert into a [`MediaCenterError::Transport`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> MediaCenterError {
        MediaCenterError::Transport(Box::new(self))
    }
}

impl From<KeypadError> for MediaCenterError {
    fn from(err: KeypadError) -> Self {
        err.into_domain()
    }
}
