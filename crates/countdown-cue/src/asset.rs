//! The embedded countdown asset and the cues that can be played from it.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;

/// Stable name of the embedded countdown sound.
pub const COUNTDOWN_ASSET_NAME: &str = "countdown_321";

static COUNTDOWN_321: &[u8] = include_bytes!("../assets/countdown_321.wav");

/// Length of the [`Cue::SingleBeep`] section.
pub const SINGLE_BEEP_LENGTH: Duration = Duration::from_millis(800);

/// Where the last, long beep of the countdown begins.
pub const FINAL_BEEP_OFFSET: Duration = Duration::from_millis(1900);

/// Encoded audio bound to a playback resource.
///
/// Cloning is cheap; the bytes are reference counted.
#[derive(Clone, PartialEq, Eq)]
pub struct SoundAsset {
    name: String,
    bytes: Bytes,
}

impl SoundAsset {
    /// The countdown sound compiled into the crate.
    pub fn countdown() -> Self {
        Self {
            name: COUNTDOWN_ASSET_NAME.to_string(),
            bytes: Bytes::from_static(COUNTDOWN_321),
        }
    }

    /// Wrap arbitrary encoded audio (WAV, MP3, OGG Vorbis or FLAC).
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Default for SoundAsset {
    fn default() -> Self {
        Self::countdown()
    }
}

impl fmt::Debug for SoundAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundAsset")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A section of the asset to play.
///
/// Every cue starts from its own offset; starting a cue replaces whatever the
/// resource was playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cue {
    /// The whole asset from position zero.
    #[default]
    Full,
    /// One beep: position zero for [`SINGLE_BEEP_LENGTH`].
    SingleBeep,
    /// The last beep: from [`FINAL_BEEP_OFFSET`] to the end.
    FinalBeep,
}

impl Cue {
    /// Start position within the asset.
    pub fn offset(self) -> Duration {
        match self {
            Self::Full | Self::SingleBeep => Duration::ZERO,
            Self::FinalBeep => FINAL_BEEP_OFFSET,
        }
    }

    /// How long the cue plays, or `None` to play to the end.
    pub fn length(self) -> Option<Duration> {
        match self {
            Self::SingleBeep => Some(SINGLE_BEEP_LENGTH),
            Self::Full | Self::FinalBeep => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_asset_is_embedded_wav() {
        let asset = SoundAsset::countdown();
        assert_eq!(asset.name(), "countdown_321");
        assert!(!asset.is_empty());
        assert_eq!(&asset.bytes()[..4], b"RIFF");
        assert_eq!(&asset.bytes()[8..12], b"WAVE");
    }

    #[test]
    fn test_from_bytes_keeps_name() {
        let asset = SoundAsset::from_bytes("missing", Vec::new());
        assert_eq!(asset.name(), "missing");
        assert!(asset.is_empty());
    }

    #[test]
    fn test_debug_omits_payload() {
        let rendered = format!("{:?}", SoundAsset::from_bytes("beep", vec![1u8, 2, 3]));
        assert_eq!(rendered, "SoundAsset { name: \"beep\", len: 3 }");
    }

    #[test]
    fn test_cue_sections() {
        assert_eq!(Cue::default(), Cue::Full);
        assert_eq!(Cue::Full.offset(), Duration::ZERO);
        assert_eq!(Cue::Full.length(), None);
        assert_eq!(Cue::SingleBeep.offset(), Duration::ZERO);
        assert_eq!(Cue::SingleBeep.length(), Some(Duration::from_millis(800)));
        assert_eq!(Cue::FinalBeep.offset(), Duration::from_millis(1900));
        assert_eq!(Cue::FinalBeep.length(), None);
    }
}
