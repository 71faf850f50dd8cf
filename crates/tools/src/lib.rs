//! Developer Tooling: run inspector, HUD telemetry and section listings.
//!
//! # Invariants
//! - Tools only read run state; they never mutate it.

mod inspector;

pub use inspector::{HudTelemetry, RunInspector, RunSummary, SectionInfo};

pub fn crate_info() -> &'static str {
    "laneway-tools v0.1.0"
}
