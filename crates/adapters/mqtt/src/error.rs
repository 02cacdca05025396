//! MQTT adapter error types.

use mediacenter_domain::error::MediaCenterError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),

    /// A discovery payload could not be encoded.
    #[error("failed to encode MQTT payload")]
    Payload(#[from] serde_json::Error),
}

impl MqttError {
    /// Convert into a [`MediaCenterError::Transport`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> MediaCenterError {
        MediaCenterError::Transport(Box::new(self))
    }
}

impl From<MqttError> for MediaCenterError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
