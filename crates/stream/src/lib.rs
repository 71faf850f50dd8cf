//! Streaming: procedural platform sections ahead of the player, retirement
//! behind it, fade-out and teardown of retired sections and their scenery.
//!
//! # Invariants
//! - A spawned section is in exactly one of `active` or `fading` until destroyed.
//! - `active` never holds more than `lookahead_count + 3` sections.
//! - A section's scenery always shares its platform's opacity and dies with it.
//! - Renderer failures never desynchronize section bookkeeping.

mod budget;
mod config;
mod manager;
mod scenery;
mod section;

pub use budget::{FrameTimer, StreamStats};
pub use config::{SceneryConfig, StreamConfig};
pub use manager::{RetireReason, SectionEvent, SectionPhase, SectionStream};
pub use scenery::SceneryFactory;
pub use section::{FadingSection, Section};

pub fn crate_info() -> &'static str {
    "laneway-stream v0.1.0"
}
