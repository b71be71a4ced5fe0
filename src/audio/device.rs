//! Audio device data models.
//!
//! Defines the playback device snapshot and the audio error types.

use thiserror::Error;

/// A playback device as reported by the OS at enumeration time.
///
/// Immutable snapshot: the list is taken once at startup and is not
/// refreshed when devices are plugged or unplugged while running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackDevice {
    /// Unique Windows device ID (opaque string from IMMDevice::GetId)
    pub id: String,

    /// Human-readable device name (from device properties)
    pub name: String,
}

impl PlaybackDevice {
    /// Create a new PlaybackDevice.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Audio service error types.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("COM initialization failed: {0}")]
    ComInitFailed(#[source] windows::core::Error),

    #[error("Failed to enumerate devices: {0}")]
    EnumerationFailed(#[source] windows::core::Error),

    #[error("String conversion error: {0}")]
    StringConversion(String),

    #[error("Failed to run set-default command: {0}")]
    CommandSpawnFailed(#[source] std::io::Error),
}
