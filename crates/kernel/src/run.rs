use glam::Vec3;
use laneway_input::Action;
use laneway_render::VisualBackend;
use laneway_stream::{SectionEvent, SectionStream, StreamStats};

use crate::config::{ConfigError, RunConfig};
use crate::lane::LaneController;

/// Height of the player cube's centre above the platform.
const PLAYER_HEIGHT: f32 = 0.5;

/// Most events the run keeps between drains. Older entries are dropped first.
pub const MAX_EVENT_LOG: usize = 4096;

/// An event record produced by the run.
///
/// Section lifecycle events are forwarded from the stream in the order they
/// happened, interleaved with the run's own events.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// One tick completed at the given forward position.
    Stepped { tick: u64, player_z: f32 },
    /// A lane was committed.
    LaneTargeted { lane: usize },
    /// The track and lanes were reset.
    Restarted,
    /// A section changed lifecycle phase.
    Section(SectionEvent),
}

/// The authoritative state of one endless run.
///
/// Owns the section stream, the lane controller and the visual backend. The
/// host feeds it decoded [`Action`]s and calls [`Run::step`] once per frame.
///
/// Every step appends at least one [`RunEvent::Stepped`]. Hosts are expected
/// to call [`Run::drain_events`] regularly; an undrained log is capped at
/// [`MAX_EVENT_LOG`] entries and loses its oldest events.
pub struct Run<B: VisualBackend> {
    config: RunConfig,
    stream: SectionStream,
    lanes: LaneController,
    backend: B,
    player_z: f32,
    tick: u64,
    elapsed: f64,
    event_log: Vec<RunEvent>,
}

impl<B: VisualBackend> Run<B> {
    /// Validate the config, then build the initial track against `backend`.
    pub fn new(config: RunConfig, mut backend: B) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut stream =
            SectionStream::new(config.stream.clone(), config.lanes.lane_x, config.seed);
        stream.reset(&mut backend);
        let lanes = LaneController::new(config.lanes.clone());

        let mut run = Self {
            player_z: config.player_start_z,
            config,
            stream,
            lanes,
            backend,
            tick: 0,
            elapsed: 0.0,
            event_log: Vec::new(),
        };
        run.collect_section_events();
        tracing::info!(
            seed = run.config.seed,
            sections = run.stream.active_count(),
            "run started"
        );
        Ok(run)
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn stream(&self) -> &SectionStream {
        &self.stream
    }

    pub fn lanes(&self) -> &LaneController {
        &self.lanes
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Ticks since the run started or was last restarted.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since the run started or was last restarted.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn player_z(&self) -> f32 {
        self.player_z
    }

    /// Forward distance covered since the start.
    pub fn distance(&self) -> f32 {
        self.player_z - self.config.player_start_z
    }

    /// Player cube centre, for camera framing.
    pub fn player_position(&self) -> Vec3 {
        Vec3::new(self.lanes.lateral_position(), PLAYER_HEIGHT, self.player_z)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[RunEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Apply one decoded input action.
    pub fn apply(&mut self, action: Action) {
        let lane = match action {
            Action::MoveLaneLeft => self.lanes.move_left(),
            Action::MoveLaneRight => self.lanes.move_right(),
            Action::SetLaneCenter => self.lanes.center(),
            Action::Restart => {
                self.restart();
                return;
            }
            Action::Noop => return,
        };
        tracing::debug!(lane, "lane targeted");
        self.event_log.push(RunEvent::LaneTargeted { lane });
    }

    /// Advance the run by `dt` seconds, clamped to `[0, max_tick_delta]`.
    pub fn step(&mut self, dt: f32) -> StreamStats {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_tick_delta)
        } else {
            0.0
        };

        self.player_z += self.config.forward_speed * dt;
        self.lanes.tick(dt);
        let stats = self.stream.advance(self.player_z, dt, &mut self.backend);

        self.tick += 1;
        self.elapsed += f64::from(dt);
        self.collect_section_events();
        self.event_log.push(RunEvent::Stepped {
            tick: self.tick,
            player_z: self.player_z,
        });
        self.trim_event_log();
        stats
    }

    /// Tear down the track immediately and start over from the beginning.
    pub fn restart(&mut self) {
        self.stream.reset(&mut self.backend);
        self.lanes.reset();
        self.player_z = self.config.player_start_z;
        self.tick = 0;
        self.elapsed = 0.0;
        self.collect_section_events();
        self.event_log.push(RunEvent::Restarted);
        tracing::info!(sections = self.stream.active_count(), "run restarted");
    }

    fn collect_section_events(&mut self) {
        self.event_log
            .extend(self.stream.drain_events().into_iter().map(RunEvent::Section));
    }

    fn trim_event_log(&mut self) {
        if self.event_log.len() > MAX_EVENT_LOG {
            let excess = self.event_log.len() - MAX_EVENT_LOG;
            self.event_log.drain(..excess);
            tracing::trace!(dropped = excess, "event log over capacity");
        }
    }
}
