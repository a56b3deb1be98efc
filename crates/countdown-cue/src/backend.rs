//! The seam between the controller and an audio output.
//!
//! [`AudioBackend`] opens one [`Voice`] per playback resource. The production
//! implementation is [`RodioBackend`](crate::output::RodioBackend);
//! [`MemoryBackend`](crate::memory::MemoryBackend) plays nothing and records
//! what it was asked to do.

use crate::asset::{Cue, SoundAsset};
use crate::error::Result;

/// An output able to decode an asset into a playable voice.
pub trait AudioBackend {
    /// The voice type this backend hands out.
    type Voice: Voice;

    /// Decode `asset` and return a voice parked at position zero, ready to
    /// start, with `volume` already applied.
    ///
    /// Errors here are initialization failures.
    fn open(&mut self, asset: &SoundAsset, volume: f32) -> Result<Self::Voice>;

    /// Close the output device once no voice is left. The next
    /// [`open`](Self::open) opens it again.
    fn close(&mut self) {}
}

/// One decoded sound bound to an output.
///
/// Voices move to a worker thread for re-preparation, hence `Send`.
pub trait Voice: Send + 'static {
    /// Rewind to the start of `cue` and play it. Replaces any playback in
    /// progress.
    fn start(&mut self, cue: Cue) -> Result<()>;

    /// Silence the voice. Afterwards it needs [`prepare`](Self::prepare)
    /// before it can start without decoding again.
    fn halt(&mut self) -> Result<()>;

    /// Decode the asset again and park at position zero. May be slow.
    fn prepare(&mut self) -> Result<()>;

    /// Apply a volume in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Whether sound is currently coming out of this voice.
    fn is_playing(&self) -> bool;

    /// Free output and decoder resources. The voice is not used afterwards.
    fn release(&mut self);
}
