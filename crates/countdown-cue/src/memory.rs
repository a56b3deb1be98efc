//! A silent backend that records what it is asked to do.
//!
//! Useful for hosts running without an audio device (kiosk previews, CI) and
//! for exercising the controller in tests. Every voice operation appends a
//! [`VoiceEvent`] to a journal that a [`MemoryProbe`] can read, and failures
//! can be injected per operation with [`MemoryProbe::inject`].

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::asset::{Cue, SoundAsset};
use crate::backend::{AudioBackend, Voice};
use crate::error::{Result, SoundError};

/// Identifies a voice handed out by a [`MemoryBackend`].
pub type VoiceId = u64;

/// One recorded backend operation.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    Opened { voice: VoiceId, asset: String, volume: f32 },
    Started { voice: VoiceId, cue: Cue, offset: Duration },
    Halted { voice: VoiceId },
    Prepared { voice: VoiceId },
    VolumeSet { voice: VoiceId, volume: f32 },
    Released { voice: VoiceId },
    /// The backend's output was closed.
    Closed,
}

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Open,
    Start,
    Halt,
    Prepare,
    Volume,
}

#[derive(Default)]
struct Journal {
    events: Vec<VoiceEvent>,
    faults: HashSet<Fault>,
    prepare_delay: Duration,
    next_voice: VoiceId,
    output_open: bool,
    /// Bumped each time playing voices are made to run out.
    finish_epoch: u64,
}

impl Journal {
    fn fail_if(&self, fault: Fault) -> Result<()> {
        if !self.faults.contains(&fault) {
            return Ok(());
        }
        let message = format!("injected {fault:?} fault");
        Err(match fault {
            Fault::Open => SoundError::init(message),
            _ => SoundError::playback(message),
        })
    }
}

/// A backend that produces no sound.
///
/// Opening an empty asset fails the way a missing file would.
#[derive(Default)]
pub struct MemoryBackend {
    journal: Arc<Mutex<Journal>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle for inspecting this backend after it has been moved into a
    /// controller.
    pub fn probe(&self) -> MemoryProbe {
        MemoryProbe {
            journal: self.journal.clone(),
        }
    }
}

impl AudioBackend for MemoryBackend {
    type Voice = MemoryVoice;

    fn open(&mut self, asset: &SoundAsset, volume: f32) -> Result<MemoryVoice> {
        let mut journal = self.journal.lock();
        journal.fail_if(Fault::Open)?;
        if asset.is_empty() {
            return Err(SoundError::init(format!("asset '{}' is empty", asset.name())));
        }

        let id = journal.next_voice;
        journal.next_voice += 1;
        journal.output_open = true;
        journal.events.push(VoiceEvent::Opened {
            voice: id,
            asset: asset.name().to_string(),
            volume,
        });

        Ok(MemoryVoice {
            id,
            journal: self.journal.clone(),
            playing: false,
            started_in: 0,
            volume,
        })
    }

    fn close(&mut self) {
        let mut journal = self.journal.lock();
        if journal.output_open {
            journal.output_open = false;
            journal.events.push(VoiceEvent::Closed);
        }
    }
}

/// Voice handed out by [`MemoryBackend`].
pub struct MemoryVoice {
    id: VoiceId,
    journal: Arc<Mutex<Journal>>,
    playing: bool,
    /// Finish epoch current when the last start happened.
    started_in: u64,
    volume: f32,
}

impl MemoryVoice {
    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Voice for MemoryVoice {
    fn start(&mut self, cue: Cue) -> Result<()> {
        let mut journal = self.journal.lock();
        journal.fail_if(Fault::Start)?;
        journal.events.push(VoiceEvent::Started {
            voice: self.id,
            cue,
            offset: cue.offset(),
        });
        self.playing = true;
        self.started_in = journal.finish_epoch;
        Ok(())
    }

    fn halt(&mut self) -> Result<()> {
        let mut journal = self.journal.lock();
        journal.fail_if(Fault::Halt)?;
        journal.events.push(VoiceEvent::Halted { voice: self.id });
        self.playing = false;
        Ok(())
    }

    fn prepare(&mut self) -> Result<()> {
        let delay = self.journal.lock().prepare_delay;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let mut journal = self.journal.lock();
        journal.fail_if(Fault::Prepare)?;
        journal.events.push(VoiceEvent::Prepared { voice: self.id });
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        let mut journal = self.journal.lock();
        journal.fail_if(Fault::Volume)?;
        journal.events.push(VoiceEvent::VolumeSet {
            voice: self.id,
            volume,
        });
        self.volume = volume;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing && self.started_in == self.journal.lock().finish_epoch
    }

    fn release(&mut self) {
        self.playing = false;
        self.journal
            .lock()
            .events
            .push(VoiceEvent::Released { voice: self.id });
    }
}

/// Read access to a [`MemoryBackend`]'s journal and fault switches.
#[derive(Clone)]
pub struct MemoryProbe {
    journal: Arc<Mutex<Journal>>,
}

impl MemoryProbe {
    /// Every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<VoiceEvent> {
        self.journal.lock().events.clone()
    }

    /// Drop the recorded events.
    pub fn clear_events(&self) {
        self.journal.lock().events.clear();
    }

    /// Number of voices opened so far.
    pub fn voices_opened(&self) -> u64 {
        self.journal.lock().next_voice
    }

    /// Make `fault` fail until [`heal`](Self::heal) is called.
    pub fn inject(&self, fault: Fault) {
        self.journal.lock().faults.insert(fault);
    }

    /// Stop failing `fault`.
    pub fn heal(&self, fault: Fault) {
        self.journal.lock().faults.remove(&fault);
    }

    /// Make every `prepare` take at least `delay`.
    pub fn set_prepare_delay(&self, delay: Duration) {
        self.journal.lock().prepare_delay = delay;
    }

    /// Every playing voice behaves as if its sound ran to the end.
    pub fn finish_playback(&self) {
        self.journal.lock().finish_epoch += 1;
    }

    /// Whether the backend's output is currently open.
    pub fn is_output_open(&self) -> bool {
        self.journal.lock().output_open
    }
}
