//! Controller settings.

use serde::{Deserialize, Serialize};

/// Volume applied when nothing else has been requested.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Clamp a requested volume into `[0.0, 1.0]`.
///
/// Returns `None` for NaN, which has no meaningful loudness.
pub fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}

/// Settings a host hands to the sound controller at construction.
///
/// Deserializes from the host's camelCase JSON; missing fields take their
/// defaults:
///
/// ```
/// use countdown_cue::SoundConfig;
///
/// let config: SoundConfig = serde_json::from_str(r#"{ "initialVolume": 0.4 }"#).unwrap();
/// assert_eq!(config.initial_volume, 0.4);
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SoundConfig {
    /// Starting volume; clamped to `[0.0, 1.0]` when applied.
    pub initial_volume: f32,
    /// When false, play requests are accepted but produce no sound.
    pub enabled: bool,
    /// Build the playback resource at construction instead of on first play.
    pub preload: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_VOLUME,
            enabled: true,
            preload: false,
        }
    }
}

impl SoundConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    /// The starting volume after clamping. NaN falls back to the default.
    pub fn clamped_volume(&self) -> f32 {
        clamp_volume(self.initial_volume).unwrap_or(DEFAULT_VOLUME)
    }
}
