use std::collections::BTreeMap;

use laneway_common::{SceneryDescriptor, SectionBounds, VisualHandle};

use crate::renderer::{RenderError, VisualBackend};

/// What a live visual represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualKind {
    Platform(SectionBounds),
    Scenery(SceneryDescriptor),
}

/// A visual held by the headless backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualRecord {
    pub kind: VisualKind,
    pub opacity: f32,
}

/// In-memory visual registry.
///
/// Stands in for a GPU scene graph in the CLI and in tests: it hands out
/// monotonically increasing handles, remembers each visual's opacity and
/// rejects requests against handles it does not know. Creation, opacity and
/// destroy failures can be injected to exercise the stream manager's
/// skip-and-log policy. A visual whose destroy fails stays live.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    visuals: BTreeMap<VisualHandle, VisualRecord>,
    next_handle: u64,
    created_total: u64,
    destroyed_total: u64,
    pending_failures: usize,
    pending_update_failures: usize,
    pending_destroy_failures: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` create requests fail.
    pub fn fail_next_creations(&mut self, count: usize) {
        self.pending_failures = count;
    }

    /// Make the next `count` opacity updates fail.
    pub fn fail_next_updates(&mut self, count: usize) {
        self.pending_update_failures = count;
    }

    /// Make the next `count` destroy requests fail, leaving those visuals live.
    pub fn fail_next_destroys(&mut self, count: usize) {
        self.pending_destroy_failures = count;
    }

    /// Number of visuals currently alive.
    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    /// Number of live platform visuals.
    pub fn platform_count(&self) -> usize {
        self.visuals
            .values()
            .filter(|v| matches!(v.kind, VisualKind::Platform(_)))
            .count()
    }

    /// Number of live scenery visuals.
    pub fn scenery_count(&self) -> usize {
        self.live_count() - self.platform_count()
    }

    pub fn created_total(&self) -> u64 {
        self.created_total
    }

    pub fn destroyed_total(&self) -> u64 {
        self.destroyed_total
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&VisualRecord> {
        self.visuals.get(&handle)
    }

    pub fn opacity(&self, handle: VisualHandle) -> Option<f32> {
        self.visuals.get(&handle).map(|v| v.opacity)
    }

    pub fn is_live(&self, handle: VisualHandle) -> bool {
        self.visuals.contains_key(&handle)
    }

    /// All live visuals in handle order.
    pub fn visuals(&self) -> &BTreeMap<VisualHandle, VisualRecord> {
        &self.visuals
    }

    fn insert(&mut self, kind: VisualKind) -> Result<VisualHandle, RenderError> {
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            return Err(RenderError::Rejected("injected creation failure".into()));
        }
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.created_total += 1;
        self.visuals.insert(
            handle,
            VisualRecord {
                kind,
                opacity: 1.0,
            },
        );
        Ok(handle)
    }
}

impl VisualBackend for HeadlessBackend {
    fn create_platform_visual(
        &mut self,
        bounds: &SectionBounds,
    ) -> Result<VisualHandle, RenderError> {
        self.insert(VisualKind::Platform(*bounds))
    }

    fn create_scenery_visual(
        &mut self,
        descriptor: &SceneryDescriptor,
    ) -> Result<VisualHandle, RenderError> {
        self.insert(VisualKind::Scenery(*descriptor))
    }

    fn set_opacity(&mut self, handle: VisualHandle, opacity: f32) -> Result<(), RenderError> {
        if self.pending_update_failures > 0 {
            self.pending_update_failures -= 1;
            return Err(RenderError::Rejected("injected opacity failure".into()));
        }
        let record = self
            .visuals
            .get_mut(&handle)
            .ok_or(RenderError::UnknownVisual(handle))?;
        record.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    fn destroy_visual(&mut self, handle: VisualHandle) -> Result<(), RenderError> {
        if self.pending_destroy_failures > 0 {
            self.pending_destroy_failures -= 1;
            return Err(RenderError::Rejected("injected destroy failure".into()));
        }
        self.visuals
            .remove(&handle)
            .ok_or(RenderError::UnknownVisual(handle))?;
        self.destroyed_total += 1;
        Ok(())
    }
}

/// Debug text renderer for the headless backend.
///
/// Produces a human-readable listing of live platforms, for CLI output and logs.
/// Scenery is summarized as a count unless `show_scenery` is set.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    pub show_scenery: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, backend: &HeadlessBackend) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Visuals (live={}, created={}, destroyed={}) ===\n",
            backend.live_count(),
            backend.created_total(),
            backend.destroyed_total()
        ));
        out.push_str(&format!(
            "Platforms: {}  Scenery: {}\n",
            backend.platform_count(),
            backend.scenery_count()
        ));

        for (handle, record) in backend.visuals() {
            match record.kind {
                VisualKind::Platform(b) => out.push_str(&format!(
                    "  [{:>5}] platform z=[{:.1}, {:.1}) opacity={:.2}\n",
                    handle.0, b.z_start, b.z_end, record.opacity
                )),
                VisualKind::Scenery(d) if self.show_scenery => out.push_str(&format!(
                    "  [{:>5}] scenery pos=({:.2}, {:.2}, {:.2}) scale={:.2} opacity={:.2}\n",
                    handle.0, d.position.x, d.position.y, d.position.z, d.scale, record.opacity
                )),
                VisualKind::Scenery(_) => {}
            }
        }

        out
    }
}
