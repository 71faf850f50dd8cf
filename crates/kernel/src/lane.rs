use laneway_common::LANE_COUNT;
use serde::{Deserialize, Serialize};

/// Lane geometry and easing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Fixed x coordinate of each lane, left to right.
    pub lane_x: [f32; LANE_COUNT],
    /// Fraction of the remaining lateral distance covered per tick.
    pub smoothing: f32,
    /// Lane occupied at start and after a restart.
    pub start_lane: usize,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            lane_x: [-3.0, 0.0, 3.0],
            smoothing: 0.16,
            start_lane: 1,
        }
    }
}

/// Tracks the committed lane and eases the lateral position toward it.
///
/// Lane changes commit immediately; only the position is animated. Easing is a
/// fixed per-tick fraction, so the glide speed depends on the tick rate. A
/// rate-independent version would use `1 - (1 - smoothing)^(dt * rate)`.
#[derive(Debug, Clone)]
pub struct LaneController {
    config: LaneConfig,
    current_lane: usize,
    lateral_position: f32,
}

impl LaneController {
    pub fn new(config: LaneConfig) -> Self {
        let current_lane = config.start_lane.min(LANE_COUNT - 1);
        let lateral_position = config.lane_x[current_lane];
        Self {
            config,
            current_lane,
            lateral_position,
        }
    }

    pub fn config(&self) -> &LaneConfig {
        &self.config
    }

    pub fn current_lane(&self) -> usize {
        self.current_lane
    }

    pub fn lateral_position(&self) -> f32 {
        self.lateral_position
    }

    /// x coordinate of the committed lane.
    pub fn target_x(&self) -> f32 {
        self.config.lane_x[self.current_lane]
    }

    /// Commit a lane, clamped to the valid range. Returns the committed lane.
    pub fn set_target_lane(&mut self, index: i64) -> usize {
        self.current_lane = index.clamp(0, LANE_COUNT as i64 - 1) as usize;
        self.current_lane
    }

    pub fn move_left(&mut self) -> usize {
        self.set_target_lane(self.current_lane as i64 - 1)
    }

    pub fn move_right(&mut self) -> usize {
        self.set_target_lane(self.current_lane as i64 + 1)
    }

    pub fn center(&mut self) -> usize {
        self.set_target_lane((LANE_COUNT / 2) as i64)
    }

    /// Ease the lateral position toward the committed lane.
    ///
    /// `_dt` is accepted for symmetry with the rest of the tick; the easing
    /// step is per call.
    pub fn tick(&mut self, _dt: f32) {
        let target = self.target_x();
        self.lateral_position += (target - self.lateral_position) * self.config.smoothing;
        if (target - self.lateral_position).abs() < 1e-4 {
            self.lateral_position = target;
        }
    }

    /// Snap back to the start lane.
    pub fn reset(&mut self) {
        self.current_lane = self.config.start_lane.min(LANE_COUNT - 1);
        self.lateral_position = self.target_x();
    }
}

impl Default for LaneController {
    fn default() -> Self {
        Self::new(LaneConfig::default())
    }
}
