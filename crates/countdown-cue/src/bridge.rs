//! The surface a host runtime calls.
//!
//! Every call resolves to `Ok(bool)` or rejects with a [`Rejection`] carrying
//! a stable [`ErrorCode`] and a human-readable message. Nothing here panics
//! the host.
//!
//! Hosts that marshal calls as JSON can use [`SoundModule::handle_json`]:
//!
//! ```
//! use countdown_cue::{MemoryBackend, SoundConfig, SoundModule};
//!
//! let mut module = SoundModule::new(MemoryBackend::new(), SoundConfig::default());
//! let reply = module.handle_json(r#"{"method":"setVolume","volume":1.5}"#).unwrap();
//! assert_eq!(reply, r#"{"ok":true,"value":true}"#);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use countdown_cue_core::logging::targets;

use crate::asset::SoundAsset;
use crate::backend::AudioBackend;
use crate::config::SoundConfig;
use crate::controller::SoundController;
use crate::error::SoundError;
use crate::lifecycle::ResourceState;
use crate::output::RodioBackend;

/// Stable failure codes reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Play was requested but no resource could be built.
    PlayerNull,
    /// The backend faulted while starting playback.
    PlayError,
    /// The backend faulted while applying a volume, or the volume was NaN.
    VolumeError,
    /// The backend faulted while halting playback.
    StopError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayerNull => "PLAYER_NULL",
            Self::PlayError => "PLAY_ERROR",
            Self::VolumeError => "VOLUME_ERROR",
            Self::StopError => "STOP_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Rejection {
    pub code: ErrorCode,
    pub message: String,
}

impl Rejection {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn from_error(code: ErrorCode, err: &SoundError) -> Self {
        Self::new(code, err.to_string())
    }
}

/// Outcome of one host call.
pub type Resolution = std::result::Result<bool, Rejection>;

/// A call decoded from the host's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum HostCall {
    Play,
    Stop,
    SetVolume { volume: f64 },
}

/// The JSON reply for one host call.
///
/// Serializes as `{"ok":true,"value":true}` or
/// `{"ok":false,"code":"PLAYER_NULL","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Resolution> for HostReply {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Ok(value) => Self {
                ok: true,
                value: Some(value),
                code: None,
                message: None,
            },
            Err(rejection) => Self {
                ok: false,
                value: None,
                code: Some(rejection.code),
                message: Some(rejection.message),
            },
        }
    }
}

/// The countdown sound as exposed to a host runtime.
///
/// Construct it when the host context is created and call
/// [`teardown`](Self::teardown) when it is destroyed (dropping the module
/// does the same).
pub struct SoundModule<B: AudioBackend = RodioBackend> {
    controller: SoundController<B>,
}

impl SoundModule<RodioBackend> {
    /// A module playing the embedded countdown through the default output
    /// device.
    pub fn with_default_output(config: SoundConfig) -> Self {
        Self::new(RodioBackend::new(), config)
    }
}

impl<B: AudioBackend> SoundModule<B> {
    /// A module playing the embedded countdown through `backend`.
    pub fn new(backend: B, config: SoundConfig) -> Self {
        Self::with_asset(backend, SoundAsset::countdown(), config)
    }

    /// A module playing `asset` through `backend`.
    pub fn with_asset(backend: B, asset: SoundAsset, config: SoundConfig) -> Self {
        tracing::debug!(target: targets::BRIDGE, asset = asset.name(), "sound module created");
        Self {
            controller: SoundController::with_config(backend, asset, config),
        }
    }

    /// Play the countdown from the start.
    ///
    /// Rejects with `PLAYER_NULL` when no resource could be built and with
    /// `PLAY_ERROR` for any other fault.
    pub fn play(&mut self) -> Resolution {
        self.controller.play().map_err(|err| {
            let code = match &err {
                SoundError::NotInitialized => ErrorCode::PlayerNull,
                _ => ErrorCode::PlayError,
            };
            reject("play", code, &err)
        })
    }

    /// Set the volume, clamped to `[0.0, 1.0]`.
    pub fn set_volume(&mut self, volume: f64) -> Resolution {
        self.controller
            .set_volume(volume as f32)
            .map(|_| true)
            .map_err(|err| reject("setVolume", ErrorCode::VolumeError, &err))
    }

    /// Stop playback. Succeeds when nothing is playing.
    pub fn stop(&mut self) -> Resolution {
        self.controller
            .stop()
            .map_err(|err| reject("stop", ErrorCode::StopError, &err))
    }

    /// Release the playback resource. Safe to call more than once.
    pub fn teardown(&mut self) {
        tracing::debug!(target: targets::BRIDGE, "sound module torn down");
        self.controller.teardown();
    }

    /// Dispatch a decoded host call.
    pub fn invoke(&mut self, call: HostCall) -> Resolution {
        match call {
            HostCall::Play => self.play(),
            HostCall::Stop => self.stop(),
            HostCall::SetVolume { volume } => self.set_volume(volume),
        }
    }

    /// Decode a JSON call, dispatch it and encode the reply.
    ///
    /// Only malformed JSON is an error; failed calls are encoded as
    /// `"ok": false` replies.
    pub fn handle_json(&mut self, request: &str) -> serde_json::Result<String> {
        let call: HostCall = serde_json::from_str(request)?;
        let reply = HostReply::from(self.invoke(call));
        serde_json::to_string(&reply)
    }

    /// The lifecycle state of the underlying resource.
    pub fn state(&self) -> ResourceState {
        self.controller.state()
    }

    pub fn controller(&self) -> &SoundController<B> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SoundController<B> {
        &mut self.controller
    }
}

fn reject(method: &str, code: ErrorCode, err: &SoundError) -> Rejection {
    tracing::warn!(target: targets::BRIDGE, method, %code, "call rejected: {}", err);
    Rejection::from_error(code, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings_match_serde() {
        for code in [
            ErrorCode::PlayerNull,
            ErrorCode::PlayError,
            ErrorCode::VolumeError,
            ErrorCode::StopError,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::new(ErrorCode::PlayerNull, "player not initialized");
        assert_eq!(rejection.to_string(), "PLAYER_NULL: player not initialized");
    }

    #[test]
    fn test_host_call_decoding() {
        let call: HostCall = serde_json::from_str(r#"{"method":"play"}"#).unwrap();
        assert_eq!(call, HostCall::Play);

        let call: HostCall = serde_json::from_str(r#"{"method":"setVolume","volume":0.25}"#).unwrap();
        assert_eq!(call, HostCall::SetVolume { volume: 0.25 });

        assert!(serde_json::from_str::<HostCall>(r#"{"method":"rewind"}"#).is_err());
    }

    #[test]
    fn test_reply_encoding() {
        let ok = HostReply::from(Ok(true));
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"ok":true,"value":true}"#);

        let err = HostReply::from(Err(Rejection::new(ErrorCode::StopError, "boom")));
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"ok":false,"code":"STOP_ERROR","message":"boom"}"#
        );
    }
}
