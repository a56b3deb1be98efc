//! Core pieces shared by the Countdown Cue crates.
//!
//! - [`Signal`]: a small callback list used to publish playback lifecycle
//!   changes to the host.
//! - [`logging`]: `tracing` target names used across the workspace.
//!
//! The library never installs a `tracing` subscriber. Hosts that want to see
//! the logs install one themselves:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("countdown_cue=debug")
//!     .init();
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionId, Signal};
