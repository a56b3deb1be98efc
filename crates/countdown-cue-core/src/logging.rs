//! Logging targets for Countdown Cue.
//!
//! Every `tracing` event emitted by the workspace carries one of these
//! targets so hosts can filter per subsystem, e.g.
//! `RUST_LOG=countdown_cue::backend=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Controller lifecycle and operations.
    pub const CONTROLLER: &str = "countdown_cue::controller";
    /// Output device, decoding and sinks.
    pub const BACKEND: &str = "countdown_cue::backend";
    /// Host-facing call surface.
    pub const BRIDGE: &str = "countdown_cue::bridge";
    /// Signal emission.
    pub const SIGNAL: &str = "countdown_cue_core::signal";
}

#[cfg(test)]
mod tests {
    use super::targets;

    #[test]
    fn test_targets_share_crate_prefix() {
        for target in [targets::CONTROLLER, targets::BACKEND, targets::BRIDGE] {
            assert!(target.starts_with("countdown_cue::"), "{target}");
        }
        assert!(targets::SIGNAL.starts_with("countdown_cue_core::"));
    }
}
