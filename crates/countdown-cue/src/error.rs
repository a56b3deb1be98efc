//! Error types for the countdown sound.

use crate::lifecycle::ResourceState;

/// Faults raised while building or driving the playback resource.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SoundError {
    /// The resource could not be constructed: the asset is missing or
    /// corrupt, or no output device / decoder is available.
    #[error("Failed to initialize sound resource: {0}")]
    InitializationFailure(String),

    /// Playback was requested while no usable resource exists.
    #[error("player not initialized")]
    NotInitialized,

    /// The output backend faulted while starting, stopping, preparing or
    /// changing the volume of the resource.
    #[error("Playback error: {0}")]
    PlaybackFault(String),

    /// A volume that is not a number was requested.
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// The resource was asked to move between two lifecycle states that are
    /// not connected.
    #[error("Invalid resource transition from {from} to {to}")]
    InvalidTransition {
        from: ResourceState,
        to: ResourceState,
    },
}

impl SoundError {
    /// Create an initialization failure.
    pub fn init(message: impl Into<String>) -> Self {
        Self::InitializationFailure(message.into())
    }

    /// Create a playback fault.
    pub fn playback(message: impl Into<String>) -> Self {
        Self::PlaybackFault(message.into())
    }
}

impl From<rodio::StreamError> for SoundError {
    fn from(err: rodio::StreamError) -> Self {
        Self::InitializationFailure(format!("audio output unavailable: {err}"))
    }
}

impl From<rodio::decoder::DecoderError> for SoundError {
    fn from(err: rodio::decoder::DecoderError) -> Self {
        Self::InitializationFailure(format!("asset could not be decoded: {err}"))
    }
}

impl From<rodio::PlayError> for SoundError {
    fn from(err: rodio::PlayError) -> Self {
        Self::PlaybackFault(err.to_string())
    }
}

/// A specialized Result type for sound operations.
pub type Result<T> = std::result::Result<T, SoundError>;
