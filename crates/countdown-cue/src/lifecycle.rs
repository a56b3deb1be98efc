//! Lifecycle of the playback resource.

use std::fmt;

use crate::backend::Voice;
use crate::error::{Result, SoundError};

/// Where the playback resource is in its life.
///
/// ```text
/// Uninitialized ──► Ready ◄──► Playing
///        │            │           │
///        └────────────┴─────┬─────┘
///                           ▼
///                       Released
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// No resource has been constructed yet.
    Uninitialized,
    /// The asset is decoded and the resource can start at once.
    Ready,
    /// The resource is producing sound.
    Playing,
    /// The resource's output and decoder have been freed. Terminal.
    Released,
}

impl ResourceState {
    /// Whether the resource may move from `self` to `next`.
    ///
    /// `Playing → Playing` is allowed: starting again restarts from the top.
    pub fn can_transition_to(self, next: ResourceState) -> bool {
        use ResourceState::*;
        matches!(
            (self, next),
            (Uninitialized, Ready)
                | (Ready, Playing)
                | (Playing, Playing)
                | (Playing, Ready)
                | (Uninitialized | Ready | Playing, Released)
        )
    }

    /// True for every state except `Released`.
    pub fn is_live(self) -> bool {
        self != ResourceState::Released
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Released => "released",
        };
        f.write_str(name)
    }
}

/// A backend voice paired with its lifecycle state.
pub(crate) struct PlaybackResource<V> {
    pub(crate) voice: V,
    state: ResourceState,
}

impl<V: Voice> PlaybackResource<V> {
    pub(crate) fn new(voice: V) -> Self {
        Self {
            voice,
            state: ResourceState::Uninitialized,
        }
    }

    pub(crate) fn state(&self) -> ResourceState {
        self.state
    }

    /// Check that `next` is reachable without moving.
    pub(crate) fn check(&self, next: ResourceState) -> Result<()> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(SoundError::InvalidTransition {
                from: self.state,
                to: next,
            })
        }
    }

    /// Move to `next`, returning the previous state.
    pub(crate) fn transition(&mut self, next: ResourceState) -> Result<ResourceState> {
        self.check(next)?;
        Ok(std::mem::replace(&mut self.state, next))
    }

    /// Free the voice and enter `Released`. Returns `false` if already released.
    pub(crate) fn release(&mut self) -> bool {
        if !self.state.is_live() {
            return false;
        }
        self.voice.release();
        self.state = ResourceState::Released;
        true
    }
}
