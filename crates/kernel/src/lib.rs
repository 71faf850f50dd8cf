//! Run Kernel: authoritative run state, lane control and per-tick stepping.
//!
//! # Invariants
//! - One `Run` owns its track, lanes and backend; there is no global state.
//! - Within a tick: player motion, lane easing, then the section stream.
//! - Per-tick delta is clamped, so a stalled host never jumps the track.
//! - A valid config never moves the player further per tick than one spawn
//!   can cover, so the track stays ahead at any accepted speed.

pub mod config;
pub mod lane;
pub mod run;

pub use config::{ConfigError, RunConfig};
pub use lane::{LaneConfig, LaneController};
pub use run::{MAX_EVENT_LOG, Run, RunEvent};

pub fn crate_info() -> &'static str {
    "laneway-kernel v0.1.0"
}
