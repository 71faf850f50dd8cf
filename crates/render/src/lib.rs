//! Rendering Adapter: the visual-object collaborator the stream manager talks to.
//!
//! # Invariants
//! - The renderer never owns track state; it only materializes what it is asked to.
//! - Handles are never reused within one backend instance.
//!
//! # Workaround
//! Ships an in-memory `HeadlessBackend` and a `DebugTextRenderer` in place of a
//! GPU scene graph. The trait is stable; swap in a real backend without changing
//! consumers.

mod headless;
mod renderer;

pub use headless::{DebugTextRenderer, HeadlessBackend, VisualKind, VisualRecord};
pub use renderer::{RenderError, VisualBackend};

pub fn crate_info() -> &'static str {
    "laneway-render v0.1.0"
}
