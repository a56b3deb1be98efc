//! Audio output through rodio.

use std::io::Cursor;

use bytes::Bytes;
use countdown_cue_core::logging::targets;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::asset::{Cue, SoundAsset};
use crate::backend::{AudioBackend, Voice};
use crate::error::Result;

/// Plays through the system's default output device.
///
/// The device is opened on the first [`open`](AudioBackend::open), so
/// constructing the backend never fails. The output stream is not `Send`;
/// keep the backend (and the controller owning it) on the host's thread.
#[derive(Default)]
pub struct RodioBackend {
    /// Kept alive for as long as any voice may play.
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the output device has been opened.
    pub fn is_open(&self) -> bool {
        self.output.is_some()
    }

    fn handle(&mut self) -> Result<OutputStreamHandle> {
        if let Some((_, handle)) = &self.output {
            return Ok(handle.clone());
        }
        let (stream, handle) = OutputStream::try_default()?;
        tracing::debug!(target: targets::BACKEND, "opened default audio output");
        self.output = Some((stream, handle.clone()));
        Ok(handle)
    }
}

impl AudioBackend for RodioBackend {
    type Voice = RodioVoice;

    fn open(&mut self, asset: &SoundAsset, volume: f32) -> Result<RodioVoice> {
        let handle = self.handle()?;
        let bytes = asset.bytes().clone();
        let sink = build_sink(&handle, &bytes, Cue::Full, volume)?;
        tracing::debug!(target: targets::BACKEND, asset = asset.name(), "decoded asset");
        Ok(RodioVoice {
            handle,
            bytes,
            sink,
            volume,
            primed: true,
        })
    }

    fn close(&mut self) {
        if self.output.take().is_some() {
            tracing::debug!(target: targets::BACKEND, "closed default audio output");
        }
    }
}

/// A rodio [`Sink`] holding the decoded asset.
pub struct RodioVoice {
    handle: OutputStreamHandle,
    bytes: Bytes,
    sink: Sink,
    volume: f32,
    /// The sink holds a paused, untouched copy of the full asset.
    primed: bool,
}

/// Decode `bytes` into a new paused sink positioned at the start of `cue`.
fn build_sink(handle: &OutputStreamHandle, bytes: &Bytes, cue: Cue, volume: f32) -> Result<Sink> {
    let source = Decoder::new(Cursor::new(bytes.clone()))?;
    let sink = Sink::try_new(handle)?;
    sink.pause();
    sink.set_volume(volume);

    let source = source.skip_duration(cue.offset());
    match cue.length() {
        Some(length) => sink.append(source.take_duration(length)),
        None => sink.append(source),
    }
    Ok(sink)
}

impl Voice for RodioVoice {
    fn start(&mut self, cue: Cue) -> Result<()> {
        if !(self.primed && cue == Cue::Full) {
            self.sink.stop();
            self.sink = build_sink(&self.handle, &self.bytes, cue, self.volume)?;
        }
        self.primed = false;
        self.sink.play();
        Ok(())
    }

    fn halt(&mut self) -> Result<()> {
        self.sink.pause();
        self.sink.stop();
        self.primed = false;
        Ok(())
    }

    fn prepare(&mut self) -> Result<()> {
        self.sink = build_sink(&self.handle, &self.bytes, Cue::Full, self.volume)?;
        self.primed = true;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume;
        self.sink.set_volume(volume);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn release(&mut self) {
        self.sink.stop();
        self.primed = false;
    }
}
