//! Countdown Cue.
//!
//! Plays one embedded "3-2-1" countdown sound on behalf of a host runtime.
//! The host gets three calls (play, stop, set volume) plus construction and
//! teardown hooks, and every call resolves to a success flag or a stable
//! error code with a message.
//!
//! - [`SoundModule`]: the host-facing surface, including JSON dispatch.
//! - [`SoundController`]: owns the playback resource and its lifecycle.
//! - [`AudioBackend`] / [`Voice`]: the output seam, implemented by
//!   [`RodioBackend`] for real devices and [`MemoryBackend`] for silent runs.
//!
//! # Example
//!
//! ```ignore
//! use countdown_cue::{SoundConfig, SoundModule};
//!
//! let mut module = SoundModule::with_default_output(SoundConfig::default());
//! module.set_volume(1.0)?;
//! module.play()?;
//! module.stop()?;
//! module.teardown();
//! ```
//!
//! ## Supported Formats
//!
//! The embedded asset is WAV. Assets passed to
//! [`SoundModule::with_asset`] may be WAV, MP3, OGG Vorbis or FLAC.

mod error;
pub mod asset;
pub mod backend;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod lifecycle;
pub mod memory;
pub mod output;

pub use error::{Result, SoundError};

// Re-export commonly used types at the crate root
pub use asset::{Cue, SoundAsset, COUNTDOWN_ASSET_NAME};
pub use backend::{AudioBackend, Voice};
pub use bridge::{ErrorCode, HostCall, HostReply, Rejection, Resolution, SoundModule};
pub use config::{SoundConfig, DEFAULT_VOLUME};
pub use controller::SoundController;
pub use lifecycle::ResourceState;
pub use memory::{Fault, MemoryBackend, MemoryProbe, VoiceEvent};
pub use output::{RodioBackend, RodioVoice};
