use laneway_common::{SceneryDescriptor, SectionBounds, VisualHandle};

/// Errors a visual backend may report.
///
/// Callers in the stream manager log these and carry on; they never roll back
/// track bookkeeping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("visual {0:?} not found")]
    UnknownVisual(VisualHandle),
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

/// Renderer-agnostic visual object interface.
///
/// The stream manager only ever creates, fades and destroys visuals through
/// this trait. Implementations own the actual scene graph.
pub trait VisualBackend {
    /// Materialize the platform mesh for one section.
    fn create_platform_visual(&mut self, bounds: &SectionBounds)
        -> Result<VisualHandle, RenderError>;

    /// Materialize one decorative scenery object.
    fn create_scenery_visual(
        &mut self,
        descriptor: &SceneryDescriptor,
    ) -> Result<VisualHandle, RenderError>;

    /// Set the opacity of a visual, in `[0, 1]`.
    fn set_opacity(&mut self, handle: VisualHandle, opacity: f32) -> Result<(), RenderError>;

    /// Free a visual. The handle is invalid afterwards.
    fn destroy_visual(&mut self, handle: VisualHandle) -> Result<(), RenderError>;
}
