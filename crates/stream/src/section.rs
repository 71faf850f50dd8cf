use laneway_common::{SceneryDescriptor, SectionBounds, SectionId, VisualHandle};
use laneway_render::VisualBackend;

/// One fixed-length platform segment and the scenery it owns.
///
/// Only the stream manager creates, fades and destroys sections. `destroy`
/// consumes the section, so scenery never outlives its platform, and the type
/// is not `Clone`, so no copy of a live section can free its visuals.
///
/// ```compile_fail
/// fn assert_clone<T: Clone>() {}
/// assert_clone::<laneway_stream::Section>();
/// ```
///
/// ```compile_fail
/// use laneway_render::HeadlessBackend;
/// use laneway_stream::{SectionStream, StreamConfig};
///
/// let mut backend = HeadlessBackend::new();
/// let mut stream = SectionStream::new(StreamConfig::default(), [-3.0, 0.0, 3.0], 1);
/// stream.reset(&mut backend);
/// let first = stream.active().next().unwrap();
/// first.destroy(&mut backend);
/// ```
#[derive(Debug, PartialEq)]
pub struct Section {
    id: SectionId,
    bounds: SectionBounds,
    opacity: f32,
    platform: Option<VisualHandle>,
    scenery: Vec<SceneryDescriptor>,
    scenery_handles: Vec<VisualHandle>,
    spawned_at: f64,
}

impl Section {
    /// Create the platform and scenery visuals for a new section.
    ///
    /// Failed creations are logged and skipped; the section is tracked either way.
    pub(crate) fn materialize<B: VisualBackend + ?Sized>(
        bounds: SectionBounds,
        scenery: Vec<SceneryDescriptor>,
        spawned_at: f64,
        backend: &mut B,
    ) -> Self {
        let id = SectionId::new();

        let platform = match backend.create_platform_visual(&bounds) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(section = %id.short(), "platform visual not created: {e}");
                None
            }
        };

        let mut scenery_handles = Vec::with_capacity(scenery.len());
        for descriptor in &scenery {
            match backend.create_scenery_visual(descriptor) {
                Ok(handle) => scenery_handles.push(handle),
                Err(e) => {
                    tracing::warn!(section = %id.short(), "scenery visual not created: {e}");
                }
            }
        }

        Self {
            id,
            bounds,
            opacity: 1.0,
            platform,
            scenery,
            scenery_handles,
            spawned_at,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn bounds(&self) -> &SectionBounds {
        &self.bounds
    }

    pub fn z_start(&self) -> f32 {
        self.bounds.z_start
    }

    pub fn z_end(&self) -> f32 {
        self.bounds.z_end
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Platform visual, if the backend managed to create it.
    pub fn platform(&self) -> Option<VisualHandle> {
        self.platform
    }

    /// Scenery this section was generated with, including any whose visual
    /// failed to materialize.
    pub fn scenery(&self) -> &[SceneryDescriptor] {
        &self.scenery
    }

    pub fn scenery_handles(&self) -> &[VisualHandle] {
        &self.scenery_handles
    }

    /// Stream clock (seconds) at creation. Diagnostic only.
    pub fn spawned_at(&self) -> f64 {
        self.spawned_at
    }

    /// Every visual this section owns: platform first, then scenery in order.
    pub fn visuals(&self) -> impl Iterator<Item = VisualHandle> + '_ {
        self.platform
            .into_iter()
            .chain(self.scenery_handles.iter().copied())
    }

    /// Apply one opacity to the platform and all scenery.
    pub(crate) fn apply_opacity<B: VisualBackend + ?Sized>(
        &mut self,
        opacity: f32,
        backend: &mut B,
    ) {
        self.opacity = opacity.clamp(0.0, 1.0);
        for handle in self.visuals() {
            if let Err(e) = backend.set_opacity(handle, self.opacity) {
                tracing::warn!(section = %self.id.short(), "opacity update failed: {e}");
            }
        }
    }

    /// Destroy the platform and all scenery. Consumes the section.
    pub(crate) fn destroy<B: VisualBackend + ?Sized>(self, backend: &mut B) {
        for handle in self.visuals() {
            if let Err(e) = backend.destroy_visual(handle) {
                tracing::warn!(section = %self.id.short(), "visual not destroyed: {e}");
            }
        }
    }
}

/// A retired section counting down to destruction.
#[derive(Debug, PartialEq)]
pub struct FadingSection {
    pub(crate) section: Section,
    pub(crate) fade_level: f32,
}

impl FadingSection {
    pub(crate) fn new(section: Section) -> Self {
        Self {
            section,
            fade_level: 1.0,
        }
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Remaining fade level; may dip below zero on the tick it is destroyed.
    pub fn fade_level(&self) -> f32 {
        self.fade_level
    }
}
