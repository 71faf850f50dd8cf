use std::collections::VecDeque;
use std::time::Instant;

use laneway_common::{LANE_COUNT, SectionBounds, SectionId};
use laneway_render::VisualBackend;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::budget::{FrameTimer, StreamStats};
use crate::config::StreamConfig;
use crate::scenery::SceneryFactory;
use crate::section::{FadingSection, Section};

/// Why a section left the active window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireReason {
    /// Its end fell too far behind the player.
    Trailing,
    /// A spawn pushed the active count over the retention ceiling.
    Ceiling,
}

/// Where a live section is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPhase {
    Active,
    Fading,
}

/// A lifecycle transition, recorded in order of occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionEvent {
    Spawned { id: SectionId, z_start: f32 },
    Retired { id: SectionId, reason: RetireReason },
    Destroyed { id: SectionId },
}

/// Owns every live section and drives its lifecycle:
/// `spawned -> active -> fading -> destroyed`.
///
/// All visual side effects go through the [`VisualBackend`] passed to each
/// call. Backend failures are logged and never roll back bookkeeping, so
/// `active`/`fading` always reflect the intended track.
pub struct SectionStream {
    config: StreamConfig,
    lane_x: [f32; LANE_COUNT],
    factory: SceneryFactory,
    rng: StdRng,
    /// Sorted by ascending `z_start`.
    active: VecDeque<Section>,
    fading: Vec<FadingSection>,
    /// `z_end` of the most recently spawned section since the last reset.
    ///
    /// Spawns continue from here even if every active section has been
    /// retired, so the track stays contiguous with what is still fading and
    /// never jumps back behind the player. `start_offset` applies only while
    /// this is `None`, i.e. on a fresh stream or right after `reset`. With a
    /// non-empty `active` it equals the last active section's `z_end`.
    frontier: Option<f32>,
    clock: f64,
    spawned_total: u64,
    event_log: Vec<SectionEvent>,
    stats: StreamStats,
    timer: FrameTimer,
}

impl SectionStream {
    /// Create an empty stream. Call [`SectionStream::reset`] to seed the track.
    pub fn new(config: StreamConfig, lane_x: [f32; LANE_COUNT], seed: u64) -> Self {
        let factory = SceneryFactory::new(config.scenery.clone());
        Self {
            config,
            lane_x,
            factory,
            rng: StdRng::seed_from_u64(seed),
            active: VecDeque::new(),
            fading: Vec::new(),
            frontier: None,
            clock: 0.0,
            spawned_total: 0,
            event_log: Vec::new(),
            stats: StreamStats::default(),
            timer: FrameTimer::default(),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn lane_x(&self) -> [f32; LANE_COUNT] {
        self.lane_x
    }

    /// Active sections, oldest first.
    pub fn active(&self) -> impl ExactSizeIterator<Item = &Section> + '_ {
        self.active.iter()
    }

    pub fn fading(&self) -> &[FadingSection] {
        &self.fading
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn fading_count(&self) -> usize {
        self.fading.len()
    }

    /// End of the generated track, if any section is active.
    pub fn last_z_end(&self) -> Option<f32> {
        self.active.back().map(Section::z_end)
    }

    /// Lifecycle phase of a section, or `None` once destroyed.
    pub fn phase(&self, id: SectionId) -> Option<SectionPhase> {
        if self.active.iter().any(|s| s.id() == id) {
            Some(SectionPhase::Active)
        } else if self.fading.iter().any(|f| f.section.id() == id) {
            Some(SectionPhase::Fading)
        } else {
            None
        }
    }

    /// Fade level of a fading section.
    pub fn fade_level(&self, id: SectionId) -> Option<f32> {
        self.fading
            .iter()
            .find(|f| f.section.id() == id)
            .map(FadingSection::fade_level)
    }

    /// Sections spawned over the lifetime of this stream.
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Seconds of simulated time fed through `advance`.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Statistics from the last advance.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Wall-clock cost of recent advances.
    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Read-only access to the lifecycle event log.
    pub fn events(&self) -> &[SectionEvent] {
        &self.event_log
    }

    /// Drain and return the lifecycle event log.
    pub fn drain_events(&mut self) -> Vec<SectionEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Spawn one section right after the last one (or at the start offset after
    /// a reset), materialize it and append it to `active`.
    ///
    /// If the active count then exceeds the retention ceiling, the oldest active
    /// sections are moved to fading.
    pub fn spawn_next<B: VisualBackend + ?Sized>(&mut self, backend: &mut B) -> SectionId {
        let z_start = self.frontier.unwrap_or(self.config.start_offset);
        let bounds = SectionBounds::new(
            z_start,
            self.config.section_length,
            self.config.platform_width,
        );
        let scenery = self.factory.generate(
            &mut self.rng,
            bounds.center_z(),
            self.config.section_length,
            &self.lane_x,
        );
        let section = Section::materialize(bounds, scenery, self.clock, backend);
        let id = section.id();

        tracing::debug!(
            section = %id.short(),
            z_start,
            scenery = section.scenery_handles().len(),
            "spawned section"
        );
        self.frontier = Some(bounds.z_end);
        self.active.push_back(section);
        self.spawned_total += 1;
        self.event_log.push(SectionEvent::Spawned { id, z_start });

        while self.active.len() > self.config.retention_ceiling() {
            if let Some(oldest) = self.active.pop_front() {
                self.begin_fade(oldest, RetireReason::Ceiling);
            }
        }

        id
    }

    /// Per-tick driver. In order: spawn ahead if the lookahead margin is
    /// breached, fade retired sections (destroying those that reach zero),
    /// retire active sections that fell behind the player.
    pub fn advance<B: VisualBackend + ?Sized>(
        &mut self,
        player_z: f32,
        dt: f32,
        backend: &mut B,
    ) -> StreamStats {
        let _span = tracing::info_span!("stream_advance").entered();
        let started = Instant::now();
        let first_event = self.event_log.len();
        let dt = dt.max(0.0);
        self.clock += f64::from(dt);

        let needs_spawn = match self.last_z_end() {
            Some(end) => end - player_z < self.config.spawn_threshold(),
            None => true,
        };
        if needs_spawn {
            self.spawn_next(backend);
        }

        self.update_fades(dt, backend);

        let retire_threshold = self.config.retire_threshold();
        while self
            .active
            .front()
            .is_some_and(|oldest| player_z - oldest.z_end() > retire_threshold)
        {
            if let Some(oldest) = self.active.pop_front() {
                self.begin_fade(oldest, RetireReason::Trailing);
            }
        }

        let mut stats = StreamStats {
            active_sections: self.active.len(),
            fading_sections: self.fading.len(),
            ..StreamStats::default()
        };
        for event in &self.event_log[first_event..] {
            match event {
                SectionEvent::Spawned { .. } => stats.spawned_this_tick += 1,
                SectionEvent::Retired { .. } => stats.retired_this_tick += 1,
                SectionEvent::Destroyed { .. } => stats.destroyed_this_tick += 1,
            }
        }
        stats.advance_time = started.elapsed();
        self.timer.record(stats.advance_time);
        self.stats = stats;

        tracing::trace!(
            spawned = stats.spawned_this_tick,
            retired = stats.retired_this_tick,
            destroyed = stats.destroyed_this_tick,
            active = stats.active_sections,
            fading = stats.fading_sections,
            "stream advance complete"
        );

        stats
    }

    /// Destroy every section without fading and re-seed the initial window.
    pub fn reset<B: VisualBackend + ?Sized>(&mut self, backend: &mut B) {
        let _span = tracing::info_span!("stream_reset").entered();

        let fading = std::mem::take(&mut self.fading);
        let torn_down = self
            .active
            .drain(..)
            .chain(fading.into_iter().map(|f| f.section))
            .collect::<Vec<_>>();
        for section in torn_down {
            self.event_log
                .push(SectionEvent::Destroyed { id: section.id() });
            section.destroy(backend);
        }

        self.frontier = None;
        self.stats = StreamStats::default();
        self.timer.clear();

        while self.active.len() < self.config.initial_window() {
            self.spawn_next(backend);
        }

        tracing::debug!(active = self.active.len(), "stream reset");
    }

    fn begin_fade(&mut self, section: Section, reason: RetireReason) {
        tracing::debug!(section = %section.id().short(), ?reason, "retiring section");
        self.event_log.push(SectionEvent::Retired {
            id: section.id(),
            reason,
        });
        self.fading.push(FadingSection::new(section));
    }

    fn update_fades<B: VisualBackend + ?Sized>(&mut self, dt: f32, backend: &mut B) {
        let step = self.config.fade_rate * dt;
        for mut entry in std::mem::take(&mut self.fading) {
            entry.fade_level -= step;
            entry.section.apply_opacity(entry.fade_level.max(0.0), backend);

            if entry.fade_level <= 0.0 {
                let id = entry.section.id();
                tracing::debug!(section = %id.short(), "destroying faded section");
                entry.section.destroy(backend);
                self.event_log.push(SectionEvent::Destroyed { id });
            } else {
                self.fading.push(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laneway_render::HeadlessBackend;

    const LANES: [f32; LANE_COUNT] = [-3.0, 0.0, 3.0];

    fn seeded() -> (SectionStream, HeadlessBackend) {
        let mut backend = HeadlessBackend::new();
        let mut stream = SectionStream::new(StreamConfig::default(), LANES, 7);
        stream.reset(&mut backend);
        stream.drain_events();
        (stream, backend)
    }

    fn spawned(events: &[SectionEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SectionEvent::Spawned { .. }))
            .count()
    }

    fn assert_opacity_in_lockstep(stream: &SectionStream, backend: &HeadlessBackend) {
        for entry in stream.fading() {
            let section = entry.section();
            let expected = entry.fade_level().max(0.0);
            for handle in section.visuals() {
                let got = backend.opacity(handle).unwrap();
                assert!((got - expected).abs() < 1e-6, "{got} != {expected}");
            }
        }
    }

    #[test]
    fn reset_seeds_initial_window() {
        let (stream, backend) = seeded();
        let sections: Vec<&Section> = stream.active().collect();

        assert_eq!(sections.len(), 7);
        assert_eq!(stream.fading_count(), 0);
        assert_eq!(sections[0].z_start(), -28.0);
        assert_eq!(stream.last_z_end(), Some(168.0));
        for pair in sections.windows(2) {
            assert_eq!(pair[0].z_end(), pair[1].z_start());
        }
        for s in &sections {
            assert_eq!(s.z_end() - s.z_start(), 28.0);
            assert_eq!(s.opacity(), 1.0);
        }
        let owned: usize = sections.iter().map(|s| s.visuals().count()).sum();
        assert_eq!(backend.live_count(), owned);
    }

    #[test]
    fn scenery_stays_inside_its_section() {
        let (stream, _backend) = seeded();
        for s in stream.active() {
            assert!((8..=13).contains(&s.scenery().len()));
            for d in s.scenery() {
                assert!(s.bounds().contains_z(d.position.z));
            }
        }
    }

    #[test]
    fn breaching_margin_spawns_exactly_once() {
        let (mut stream, mut backend) = seeded();
        let end = stream.last_z_end().unwrap();

        stream.advance(end - 1.5 * 28.0 - 1.0, 0.016, &mut backend);
        assert_eq!(spawned(&stream.drain_events()), 0);

        let stats = stream.advance(end - 1.5 * 28.0 + 1.0, 0.016, &mut backend);
        assert_eq!(stats.spawned_this_tick, 1);
        assert_eq!(spawned(&stream.drain_events()), 1);
        assert_eq!(stream.last_z_end(), Some(end + 28.0));
    }

    #[test]
    fn trailing_sections_retire() {
        let (mut stream, mut backend) = seeded();
        let first = stream.active().next().unwrap().id();

        // First section ends at z=0; 33.6 is the retire distance.
        stream.advance(33.0, 0.0, &mut backend);
        assert_eq!(stream.phase(first), Some(SectionPhase::Active));

        let stats = stream.advance(34.0, 0.0, &mut backend);
        assert_eq!(stats.retired_this_tick, 1);
        assert_eq!(stream.phase(first), Some(SectionPhase::Fading));
        assert_eq!(stream.fade_level(first), Some(1.0));
        assert_eq!(stream.active_count(), 6);
        assert!(stream.drain_events().contains(&SectionEvent::Retired {
            id: first,
            reason: RetireReason::Trailing,
        }));
    }

    #[test]
    fn fade_out_destroys_after_four_seconds_of_ticks() {
        let (mut stream, mut backend) = seeded();
        let first = stream.active().next().unwrap();
        let (id, handles) = (first.id(), first.visuals().collect::<Vec<_>>());
        stream.advance(34.0, 0.0, &mut backend);
        assert_eq!(stream.phase(id), Some(SectionPhase::Fading));

        stream.advance(34.0, 1.0, &mut backend);
        let level = stream.fade_level(id).unwrap();
        assert!((level - 0.4).abs() < 1e-6);
        assert_opacity_in_lockstep(&stream, &backend);

        for _ in 0..3 {
            stream.advance(34.0, 1.0, &mut backend);
        }
        assert_eq!(stream.phase(id), None);
        assert!(!handles.is_empty());
        for handle in handles {
            assert!(!backend.is_live(handle));
        }
        assert!(stream.events().contains(&SectionEvent::Destroyed { id }));
    }

    #[test]
    fn failed_opacity_updates_do_not_stall_the_fade() {
        let (mut stream, mut backend) = seeded();
        let first = stream.active().next().unwrap();
        let (id, handles) = (first.id(), first.visuals().collect::<Vec<_>>());
        stream.advance(34.0, 0.0, &mut backend);

        backend.fail_next_updates(handles.len());
        stream.advance(34.0, 1.0, &mut backend);
        assert!((stream.fade_level(id).unwrap() - 0.4).abs() < 1e-6);
        for &handle in &handles {
            assert_eq!(backend.opacity(handle), Some(1.0));
        }

        stream.advance(34.0, 1.0, &mut backend);
        assert_eq!(stream.phase(id), None);
        for handle in handles {
            assert!(!backend.is_live(handle));
        }
    }

    #[test]
    fn failed_destroy_still_leaves_fading_and_emits_destroyed() {
        let (mut stream, mut backend) = seeded();
        let first = stream.active().next().unwrap();
        let (id, handles) = (first.id(), first.visuals().collect::<Vec<_>>());
        stream.advance(34.0, 0.0, &mut backend);
        stream.advance(34.0, 1.0, &mut backend);
        stream.drain_events();

        backend.fail_next_destroys(handles.len());
        let stats = stream.advance(34.0, 1.0, &mut backend);
        assert_eq!(stats.destroyed_this_tick, 1);
        assert_eq!(stream.phase(id), None);
        assert_eq!(stream.fading_count(), 0);
        assert_eq!(stream.drain_events(), vec![SectionEvent::Destroyed { id }]);

        // The backend refused, so those visuals leak; the stream no longer owns them.
        for &handle in &handles {
            assert!(backend.is_live(handle));
        }
        let owned: usize = stream.active().map(|s| s.visuals().count()).sum();
        assert_eq!(backend.live_count(), owned + handles.len());
    }

    #[test]
    fn spawn_next_enforces_retention_ceiling() {
        let (mut stream, mut backend) = seeded();
        stream.spawn_next(&mut backend);
        assert_eq!(stream.active_count(), 8);
        assert_eq!(stream.fading_count(), 0);

        let oldest = stream.active().next().unwrap().id();
        stream.spawn_next(&mut backend);
        assert_eq!(stream.active_count(), 8);
        assert_eq!(stream.phase(oldest), Some(SectionPhase::Fading));
        assert!(stream.events().contains(&SectionEvent::Retired {
            id: oldest,
            reason: RetireReason::Ceiling,
        }));

        for _ in 0..20 {
            stream.spawn_next(&mut backend);
            assert!(stream.active_count() <= 8);
        }
    }

    #[test]
    fn long_run_keeps_invariants() {
        let (mut stream, mut backend) = seeded();
        let dt = 1.0 / 60.0;
        let mut z = 0.0_f32;
        let mut last_levels: Vec<(SectionId, f32)> = Vec::new();

        for _ in 0..6000 {
            z += 14.0 * dt;
            stream.advance(z, dt, &mut backend);

            assert!(stream.active_count() <= stream.config().retention_ceiling());
            assert!(stream.last_z_end().unwrap() - z >= 28.0);
            assert_opacity_in_lockstep(&stream, &backend);

            // Fade levels never rise.
            for (id, prev) in &last_levels {
                if let Some(now) = stream.fade_level(*id) {
                    assert!(now <= *prev);
                }
            }
            last_levels = stream
                .fading()
                .iter()
                .map(|f| (f.section().id(), f.fade_level()))
                .collect();

            // Each section lives in exactly one collection.
            for s in stream.active() {
                assert!(
                    !stream
                        .fading()
                        .iter()
                        .any(|f| f.section().id() == s.id())
                );
            }
        }

        let owned: usize = stream
            .active()
            .map(|s| s.visuals().count())
            .chain(stream.fading().iter().map(|f| f.section().visuals().count()))
            .sum();
        assert_eq!(backend.live_count(), owned);
        assert!(stream.spawned_total() > 30);
    }

    #[test]
    fn reset_tears_down_everything_without_fading() {
        let (mut stream, mut backend) = seeded();
        stream.advance(100.0, 0.1, &mut backend);
        assert!(stream.fading_count() > 0);

        stream.reset(&mut backend);
        assert_eq!(stream.fading_count(), 0);
        assert_eq!(stream.active_count(), 7);
        assert_eq!(stream.active().next().unwrap().z_start(), -28.0);

        let owned: usize = stream.active().map(|s| s.visuals().count()).sum();
        assert_eq!(backend.live_count(), owned);
    }

    #[test]
    fn renderer_failures_do_not_desync_bookkeeping() {
        let (mut stream, mut backend) = seeded();
        backend.fail_next_creations(3);
        let id = stream.spawn_next(&mut backend);

        let section = stream.active().last().unwrap();
        assert_eq!(section.id(), id);
        assert!(section.platform().is_none());
        assert_eq!(
            section.scenery_handles().len(),
            section.scenery().len() - 2
        );

        stream.reset(&mut backend);
        assert_eq!(stream.active_count(), 7);
        let owned: usize = stream.active().map(|s| s.visuals().count()).sum();
        assert_eq!(backend.live_count(), owned);
    }

    #[test]
    fn empty_stream_spawns_at_start_offset() {
        let mut backend = HeadlessBackend::new();
        let mut stream = SectionStream::new(StreamConfig::default(), LANES, 1);
        stream.advance(0.0, 0.016, &mut backend);
        assert_eq!(stream.active_count(), 1);
        assert_eq!(stream.active().next().unwrap().z_start(), -28.0);
    }

    #[test]
    fn fully_retired_track_continues_from_frontier() {
        let (mut stream, mut backend) = seeded();
        stream.advance(10_000.0, 0.0, &mut backend);
        assert_eq!(stream.active_count(), 0);
        assert_eq!(stream.last_z_end(), None);

        stream.drain_events();
        stream.advance(10_000.0, 0.0, &mut backend);
        let z_start = stream.drain_events().into_iter().find_map(|e| match e {
            SectionEvent::Spawned { z_start, .. } => Some(z_start),
            _ => None,
        });
        assert_eq!(z_start, Some(196.0));

        stream.reset(&mut backend);
        assert_eq!(stream.active().next().unwrap().z_start(), -28.0);
    }

    #[test]
    fn same_seed_same_track() {
        let mut b1 = HeadlessBackend::new();
        let mut b2 = HeadlessBackend::new();
        let mut s1 = SectionStream::new(StreamConfig::default(), LANES, 99);
        let mut s2 = SectionStream::new(StreamConfig::default(), LANES, 99);
        s1.reset(&mut b1);
        s2.reset(&mut b2);
        let l1: Vec<_> = s1.active().map(|s| s.scenery().to_vec()).collect();
        let l2: Vec<_> = s2.active().map(|s| s.scenery().to_vec()).collect();
        assert_eq!(l1, l2);
    }
}
