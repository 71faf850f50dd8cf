use laneway_common::LANE_COUNT;
use laneway_stream::StreamConfig;
use serde::{Deserialize, Serialize};

use crate::lane::LaneConfig;

/// Errors from loading or validating a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("spawn_margin must exceed one section, got {0}")]
    SpawnMargin(f32),
    #[error(
        "forward_speed {speed} covers {per_tick} per tick, but one spawn per tick only keeps {limit} ahead"
    )]
    OutrunsTrack { speed: f32, per_tick: f32, limit: f32 },
    #[error("lookahead_count must be at least 1")]
    ZeroLookahead,
    #[error("lane x coordinates must be strictly ascending: {0:?}")]
    LanesNotAscending([f32; LANE_COUNT]),
    #[error("lane smoothing must be in (0, 1], got {0}")]
    Smoothing(f32),
    #[error("start lane {0} out of range")]
    StartLane(usize),
    #[error("scenery count range {min}..={max} is empty")]
    SceneryCount { min: usize, max: usize },
    #[error("scenery scale range {min}..{max} is invalid")]
    SceneryScale { min: f32, max: f32 },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seed for scenery placement.
    pub seed: u64,
    /// Forward speed in units per second.
    pub forward_speed: f32,
    /// Upper bound on a single tick's delta, in seconds.
    pub max_tick_delta: f32,
    pub player_start_z: f32,
    pub stream: StreamConfig,
    pub lanes: LaneConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            forward_speed: 14.0,
            max_tick_delta: 0.05,
            player_start_z: 0.0,
            stream: StreamConfig::default(),
            lanes: LaneConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, value: f32| {
            if value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::NotPositive { field, value })
            }
        };

        positive("stream.section_length", self.stream.section_length)?;
        positive("stream.platform_width", self.stream.platform_width)?;
        positive("stream.spawn_margin", self.stream.spawn_margin)?;
        positive("stream.retire_distance", self.stream.retire_distance)?;
        positive("stream.fade_rate", self.stream.fade_rate)?;
        positive("max_tick_delta", self.max_tick_delta)?;
        if self.forward_speed < 0.0 {
            return Err(ConfigError::Negative {
                field: "forward_speed",
                value: self.forward_speed,
            });
        }
        if self.stream.lookahead_count == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        if self.stream.spawn_margin <= 1.0 {
            return Err(ConfigError::SpawnMargin(self.stream.spawn_margin));
        }
        // The stream spawns at most one section per tick, so a tick may not
        // consume more than the slack the margin leaves beyond one section.
        let per_tick = self.forward_speed * self.max_tick_delta;
        let limit = self.stream.section_length * (self.stream.spawn_margin - 1.0);
        if per_tick >= limit {
            return Err(ConfigError::OutrunsTrack {
                speed: self.forward_speed,
                per_tick,
                limit,
            });
        }

        let scenery = &self.stream.scenery;
        if scenery.min_count > scenery.max_count {
            return Err(ConfigError::SceneryCount {
                min: scenery.min_count,
                max: scenery.max_count,
            });
        }
        if scenery.min_scale <= 0.0 || scenery.min_scale > scenery.max_scale {
            return Err(ConfigError::SceneryScale {
                min: scenery.min_scale,
                max: scenery.max_scale,
            });
        }
        if scenery.lateral_jitter < 0.0 {
            return Err(ConfigError::Negative {
                field: "stream.scenery.lateral_jitter",
                value: scenery.lateral_jitter,
            });
        }

        let lanes = &self.lanes;
        if lanes.lane_x.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::LanesNotAscending(lanes.lane_x));
        }
        if !(lanes.smoothing > 0.0 && lanes.smoothing <= 1.0) {
            return Err(ConfigError::Smoothing(lanes.smoothing));
        }
        if lanes.start_lane >= LANE_COUNT {
            return Err(ConfigError::StartLane(lanes.start_lane));
        }

        Ok(())
    }
}
