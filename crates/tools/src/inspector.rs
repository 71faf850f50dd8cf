use laneway_common::SectionId;
use laneway_kernel::Run;
use laneway_render::VisualBackend;
use laneway_stream::{Section, SectionPhase};
use serde::Serialize;

/// Run inspector for developer tooling and the HUD.
///
/// Provides read-only queries against a run for debugging, profiling and
/// on-screen telemetry.
pub struct RunInspector;

impl RunInspector {
    /// The two numbers the HUD shows.
    pub fn hud<B: VisualBackend>(run: &Run<B>) -> HudTelemetry {
        HudTelemetry {
            distance: run.distance(),
            active_sections: run.stream().active_count(),
        }
    }

    /// Produce a summary of the run state.
    pub fn summary<B: VisualBackend>(run: &Run<B>) -> RunSummary {
        let stream = run.stream();
        let owned_visuals = stream
            .active()
            .map(|s| s.visuals().count())
            .chain(stream.fading().iter().map(|f| f.section().visuals().count()))
            .sum();
        RunSummary {
            tick: run.tick(),
            elapsed: run.elapsed(),
            distance: run.distance(),
            lane: run.lanes().current_lane(),
            lateral_position: run.lanes().lateral_position(),
            active_sections: stream.active_count(),
            fading_sections: stream.fading_count(),
            spawned_total: stream.spawned_total(),
            owned_visuals,
            pending_events: run.events().len(),
        }
    }

    /// Describe one live section.
    pub fn inspect_section<B: VisualBackend>(run: &Run<B>, id: SectionId) -> Option<SectionInfo> {
        let stream = run.stream();
        if let Some(section) = stream.active().find(|s| s.id() == id) {
            return Some(SectionInfo::from_section(section, SectionPhase::Active, 1.0));
        }
        stream
            .fading()
            .iter()
            .find(|f| f.section().id() == id)
            .map(|f| SectionInfo::from_section(f.section(), SectionPhase::Fading, f.fade_level()))
    }

    /// All live sections: active ones by ascending z, then fading ones.
    pub fn list_sections<B: VisualBackend>(run: &Run<B>) -> Vec<SectionInfo> {
        let stream = run.stream();
        stream
            .active()
            .map(|s| SectionInfo::from_section(s, SectionPhase::Active, 1.0))
            .chain(stream.fading().iter().map(|f| {
                SectionInfo::from_section(f.section(), SectionPhase::Fading, f.fade_level())
            }))
            .collect()
    }
}

/// Read-only HUD numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudTelemetry {
    pub distance: f32,
    pub active_sections: usize,
}

impl std::fmt::Display for HudTelemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Distance: {:.0}m  Sections: {}",
            self.distance, self.active_sections
        )
    }
}

/// Summary of run state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tick: u64,
    pub elapsed: f64,
    pub distance: f32,
    pub lane: usize,
    pub lateral_position: f32,
    pub active_sections: usize,
    pub fading_sections: usize,
    pub spawned_total: u64,
    pub owned_visuals: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Run: tick={} t={:.2}s distance={:.1} lane={} x={:.2} active={} fading={} spawned={} visuals={}",
            self.tick,
            self.elapsed,
            self.distance,
            self.lane,
            self.lateral_position,
            self.active_sections,
            self.fading_sections,
            self.spawned_total,
            self.owned_visuals,
        )
    }
}

/// Detailed info about a single section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionInfo {
    pub id: SectionId,
    pub fading: bool,
    pub z_start: f32,
    pub z_end: f32,
    pub opacity: f32,
    pub fade_level: f32,
    pub scenery: usize,
    pub spawned_at: f64,
}

impl SectionInfo {
    fn from_section(section: &Section, phase: SectionPhase, fade_level: f32) -> Self {
        Self {
            id: section.id(),
            fading: phase == SectionPhase::Fading,
            z_start: section.z_start(),
            z_end: section.z_end(),
            opacity: section.opacity(),
            fade_level,
            scenery: section.scenery().len(),
            spawned_at: section.spawned_at(),
        }
    }
}

impl std::fmt::Display for SectionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Section [{}] z=[{:.1}, {:.1}) {} opacity={:.2} scenery={}",
            self.id.short(),
            self.z_start,
            self.z_end,
            if self.fading { "fading" } else { "active" },
            self.opacity,
            self.scenery,
        )
    }
}
