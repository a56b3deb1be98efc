//! The sound controller.
//!
//! [`SoundController`] owns the single playback resource bound to the
//! countdown asset and applies the host's play, stop and volume requests to
//! it.
//!
//! # Example
//!
//! ```ignore
//! use countdown_cue::{RodioBackend, SoundController};
//!
//! let mut sound = SoundController::new(RodioBackend::new());
//! sound.set_volume(0.8)?;
//! sound.play()?;
//! sound.stop()?;
//! sound.wait_until_ready()?; // optional: the next play() waits anyway
//! sound.teardown();
//! ```
//!
//! # Re-preparation after stop
//!
//! Stopping halts the voice at once and decodes the asset again on a worker
//! thread, so `stop()` returns without waiting for it. Any later `play()`,
//! `play_cue()` or `teardown()` first waits for that work to finish; a play
//! request can never reach a voice that is half prepared.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use parking_lot::Mutex;

use countdown_cue_core::logging::targets;
use countdown_cue_core::{ConnectionId, Signal};

use crate::asset::{Cue, SoundAsset};
use crate::backend::{AudioBackend, Voice};
use crate::config::{clamp_volume, SoundConfig};
use crate::error::{Result, SoundError};
use crate::lifecycle::{PlaybackResource, ResourceState};

type SharedResource<V> = Arc<Mutex<PlaybackResource<V>>>;

/// Completion of a background re-preparation.
struct Preparation {
    done: Receiver<Result<()>>,
    /// Outcome picked up by [`is_finished`](Self::is_finished) before `wait`.
    outcome: Option<Result<()>>,
}

fn worker_exited() -> SoundError {
    SoundError::playback("re-preparation worker exited")
}

impl Preparation {
    fn new(done: Receiver<Result<()>>) -> Self {
        Self {
            done,
            outcome: None,
        }
    }

    /// True once the worker reported, or exited without reporting.
    fn is_finished(&mut self) -> bool {
        if self.outcome.is_some() {
            return true;
        }
        match self.done.try_recv() {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                true
            }
            Err(TryRecvError::Disconnected) => {
                self.outcome = Some(Err(worker_exited()));
                true
            }
            Err(TryRecvError::Empty) => false,
        }
    }

    fn wait(self) -> Result<()> {
        match self.outcome {
            Some(outcome) => outcome,
            None => self.done.recv().unwrap_or_else(|_| Err(worker_exited())),
        }
    }
}

/// Owns the playback resource and serializes requests against it.
///
/// The host is expected to call one method at a time; the only internal
/// concurrency is the re-preparation started by [`stop`](Self::stop).
pub struct SoundController<B: AudioBackend> {
    backend: B,
    asset: SoundAsset,
    volume: f32,
    enabled: bool,
    resource: Option<SharedResource<B::Voice>>,
    /// Reported by [`state`](Self::state) while no resource exists.
    detached_state: ResourceState,
    pending: Option<Preparation>,
    state_changed: Signal<ResourceState>,
}

impl<B: AudioBackend> SoundController<B> {
    /// Create a controller for the embedded countdown asset with default
    /// settings. The resource is built on the first play.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SoundAsset::countdown(), SoundConfig::default())
    }

    /// Create a controller for `asset` with explicit settings.
    pub fn with_config(backend: B, asset: SoundAsset, config: SoundConfig) -> Self {
        let mut controller = Self {
            backend,
            asset,
            volume: config.clamped_volume(),
            enabled: config.enabled,
            resource: None,
            detached_state: ResourceState::Uninitialized,
            pending: None,
            state_changed: Signal::new(),
        };
        if config.preload {
            controller.initialize();
        }
        controller
    }

    /// Build the playback resource and apply the current volume.
    ///
    /// Failures are logged and leave the controller without a resource; the
    /// next play tries again. An existing resource is released and replaced.
    pub fn initialize(&mut self) {
        self.settle_preparation();
        self.release_resource();

        match self.backend.open(&self.asset, self.volume) {
            Ok(voice) => {
                let mut resource = PlaybackResource::new(voice);
                if let Err(err) = resource.transition(ResourceState::Ready) {
                    tracing::error!(target: targets::CONTROLLER, "fresh resource rejected: {}", err);
                    return;
                }
                self.resource = Some(Arc::new(Mutex::new(resource)));
                tracing::info!(
                    target: targets::CONTROLLER,
                    asset = self.asset.name(),
                    volume = self.volume,
                    "sound resource ready"
                );
                self.state_changed.emit(ResourceState::Ready);
            }
            Err(err) => {
                tracing::error!(
                    target: targets::CONTROLLER,
                    asset = self.asset.name(),
                    "failed to initialize sound resource: {}",
                    err
                );
            }
        }
    }

    /// Play the whole asset from the start.
    ///
    /// Returns `Ok(true)` once playback has begun, or `Ok(false)` when the
    /// controller is disabled and the request was suppressed.
    pub fn play(&mut self) -> Result<bool> {
        self.play_cue(Cue::Full)
    }

    /// Play one section of the asset, restarting any playback in progress.
    pub fn play_cue(&mut self, cue: Cue) -> Result<bool> {
        self.settle_preparation();

        if !self.enabled {
            tracing::debug!(target: targets::CONTROLLER, ?cue, "sound disabled, play suppressed");
            return Ok(false);
        }

        if self.resource.is_none() {
            self.initialize();
        }
        let Some(resource) = self.resource.clone() else {
            return Err(SoundError::NotInitialized);
        };

        let mut guard = resource.lock();
        guard.check(ResourceState::Playing)?;
        if let Err(err) = guard.voice.start(cue) {
            drop(guard);
            tracing::warn!(
                target: targets::CONTROLLER,
                ?cue,
                "playback failed, resource will be rebuilt on next play: {}",
                err
            );
            self.release_resource();
            return Err(err);
        }
        let previous = guard.transition(ResourceState::Playing)?;
        drop(guard);

        tracing::debug!(target: targets::CONTROLLER, ?cue, "playback started");
        if previous != ResourceState::Playing {
            self.state_changed.emit(ResourceState::Playing);
        }
        Ok(true)
    }

    /// Halt playback if the resource is playing.
    ///
    /// Re-preparation for the next play runs in the background; use
    /// [`wait_until_ready`](Self::wait_until_ready) to wait for it. Without a
    /// resource, or when nothing is playing, this changes nothing.
    pub fn stop(&mut self) -> Result<bool> {
        let Some(resource) = self.resource.clone() else {
            return Ok(true);
        };

        let mut guard = resource.lock();
        if guard.state() != ResourceState::Playing {
            return Ok(true);
        }

        if !guard.voice.is_playing() {
            // Finished on its own; the voice rebuilds itself on the next start.
            guard.transition(ResourceState::Ready)?;
            drop(guard);
            self.state_changed.emit(ResourceState::Ready);
            return Ok(true);
        }

        guard.voice.halt()?;
        guard.transition(ResourceState::Ready)?;
        drop(guard);

        tracing::debug!(target: targets::CONTROLLER, "playback stopped");
        self.state_changed.emit(ResourceState::Ready);
        self.pending = Some(self.spawn_preparation(resource));
        Ok(true)
    }

    /// Clamp `volume` to `[0.0, 1.0]`, remember it, and apply it to the live
    /// resource if there is one. Returns the stored value.
    pub fn set_volume(&mut self, volume: f32) -> Result<f32> {
        let volume = clamp_volume(volume).ok_or(SoundError::InvalidVolume(volume))?;
        self.volume = volume;

        if let Some(resource) = &self.resource {
            resource.lock().voice.set_volume(volume)?;
        }
        tracing::trace!(target: targets::CONTROLLER, volume, "volume set");
        Ok(volume)
    }

    /// Release the resource and close the backend's output. Called once when
    /// the host context goes away.
    ///
    /// Calling it again does nothing. A later play reopens the output and
    /// builds a fresh resource.
    pub fn teardown(&mut self) {
        self.settle_preparation();
        if self.release_resource() {
            tracing::info!(target: targets::CONTROLLER, "sound resource released");
        }
        self.backend.close();
    }

    /// Block until a re-preparation started by [`stop`](Self::stop) has
    /// finished.
    ///
    /// If it failed, the resource is released and the error returned; the
    /// next play rebuilds the resource.
    pub fn wait_until_ready(&mut self) -> Result<()> {
        let Some(preparation) = self.pending.take() else {
            return Ok(());
        };
        preparation.wait().inspect_err(|err| {
            tracing::warn!(
                target: targets::CONTROLLER,
                "re-preparation failed, releasing resource: {}",
                err
            );
            self.release_resource();
        })
    }

    /// Whether a re-preparation is still running.
    pub fn is_preparing(&mut self) -> bool {
        self.pending.as_mut().is_some_and(|p| !p.is_finished())
    }

    /// Enable or disable audible playback.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The stored volume, always within `[0.0, 1.0]`.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// The lifecycle state of the resource.
    ///
    /// Blocks while a running re-preparation holds the resource.
    pub fn state(&self) -> ResourceState {
        match &self.resource {
            Some(resource) => resource.lock().state(),
            None => self.detached_state,
        }
    }

    /// Whether a playback resource currently exists.
    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    /// The asset this controller plays.
    pub fn asset(&self) -> &SoundAsset {
        &self.asset
    }

    /// The backend the controller plays through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Connect a callback invoked on every lifecycle change.
    pub fn on_state_changed<F>(&self, callback: F) -> ConnectionId
    where
        F: Fn(&ResourceState) + Send + Sync + 'static,
    {
        self.state_changed.connect(callback)
    }

    /// Disconnect a state changed callback.
    pub fn disconnect_state_changed(&self, id: ConnectionId) -> bool {
        self.state_changed.disconnect(id)
    }

    fn settle_preparation(&mut self) {
        // Failure is already logged and handled inside.
        let _ = self.wait_until_ready();
    }

    /// Release and forget the resource. Returns `false` if there was none.
    fn release_resource(&mut self) -> bool {
        let Some(resource) = self.resource.take() else {
            return false;
        };
        let released = resource.lock().release();
        self.detached_state = ResourceState::Released;
        if released {
            self.state_changed.emit(ResourceState::Released);
        }
        true
    }

    fn spawn_preparation(&self, resource: SharedResource<B::Voice>) -> Preparation {
        let (tx, rx) = bounded(1);
        let prepare = move || {
            let outcome = resource.lock().voice.prepare();
            match &outcome {
                Ok(()) => tracing::trace!(target: targets::CONTROLLER, "resource re-prepared"),
                Err(err) => tracing::warn!(target: targets::CONTROLLER, "re-preparation failed: {}", err),
            }
            let _ = tx.send(outcome);
        };

        // If the worker cannot start, the sender is dropped with the closure
        // and waiting reports a fault, so the next play rebuilds the resource.
        if let Err(err) = std::thread::Builder::new()
            .name("countdown-cue-prepare".into())
            .spawn(prepare)
        {
            tracing::warn!(
                target: targets::CONTROLLER,
                "could not spawn re-preparation worker: {}",
                err
            );
        }
        Preparation::new(rx)
    }
}

impl<B: AudioBackend> Drop for SoundController<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
