//! Input device read loop.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use evdev::{Device, InputEvent};
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};

use crate::error::KeypadError;
use crate::event::key_press;

/// Stable path the udev rule gives the keypad.
pub const DEFAULT_DEVICE: &str = "/dev/input/keypad";

const REOPEN_DELAY: Duration = Duration::from_secs(5);

/// Forward the name of every key pressed on `events` to `keys`.
///
/// Returns once `events` ends or nobody listens on `keys` anymore.
///
/// # Errors
///
/// Returns [`KeypadError::Read`] if the event stream yields an error.
pub async fn forward_key_presses<S>(
    events: S,
    keys: &mpsc::Sender<String>,
) -> Result<(), KeypadError>
where
    S: Stream<Item = io::Result<InputEvent>>,
{
    let mut events = std::pin::pin!(events);
    while let Some(event) = events.next().await {
        let Some(name) = key_press(&event.map_err(KeypadError::Read)?) else {
            continue;
        };
        tracing::debug!(key = %name, "key pressed");
        if keys.send(name).await.is_err() {
            break;
        }
    }
    Ok(())
}

/// Read loop keeping the keypad open for the lifetime of the process.
///
/// The device is reopened after a delay when it disappears (keypad
/// unplugged) or fails; the loop ends once the receiving side of the key
/// channel is dropped.
pub struct KeypadReader {
    path: PathBuf,
    keys: mpsc::Sender<String>,
    reopen_delay: Duration,
}

impl KeypadReader {
    pub fn new(path: impl Into<PathBuf>, keys: mpsc::Sender<String>) -> Self {
        Self {
            path: path.into(),
            keys,
            reopen_delay: REOPEN_DELAY,
        }
    }

    #[must_use]
    pub fn with_reopen_delay(mut self, delay: Duration) -> Self {
        self.reopen_delay = delay;
        self
    }

    /// Run until the key channel is closed.
    pub async fn run(self) {
        loop {
            match self.read_device().await {
                Ok(()) if self.keys.is_closed() => break,
                Ok(()) => {
                    tracing::warn!(path = %self.path.display(), "keypad closed, reopening");
                }
                Err(err) => {
                    tracing::warn!(%err, path = %self.path.display(), "keypad read failed, reopening");
                }
            }
            tokio::select! {
                () = tokio::time::sleep(self.reopen_delay) => {}
                () = self.keys.closed() => break,
            }
        }
        tracing::info!("keypad reader stopped");
    }

    async fn read_device(&self) -> Result<(), KeypadError> {
        let open_error = |source| KeypadError::Open {
            path: self.path.clone(),
            source,
        };
        let events = Device::open(&self.path)
            .and_then(Device::into_event_stream)
            .map_err(open_error)?;
        tracing::info!(path = %self.path.display(), "keypad opened");
        forward_key_presses(events, &self.keys).await
    }
}
