use serde::{Deserialize, Serialize};

/// Streaming configuration: section geometry, lookahead window and fade timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Length of every section along z.
    pub section_length: f32,
    /// Sections kept ahead of the player. The initial window is
    /// `lookahead_count + 2`, the retention ceiling `lookahead_count + 3`.
    pub lookahead_count: usize,
    /// `z_start` of the first section after a reset.
    pub start_offset: f32,
    /// Platform width along x.
    pub platform_width: f32,
    /// A new section is spawned once the track ahead is shorter than this many
    /// section lengths.
    pub spawn_margin: f32,
    /// A section is retired once its end is this many section lengths behind
    /// the player.
    pub retire_distance: f32,
    /// Fade level lost per second once a section is retired.
    pub fade_rate: f32,
    pub scenery: SceneryConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            section_length: 28.0,
            lookahead_count: 5,
            start_offset: -28.0,
            platform_width: 9.0,
            spawn_margin: 1.5,
            retire_distance: 1.2,
            fade_rate: 0.6,
            scenery: SceneryConfig::default(),
        }
    }
}

impl StreamConfig {
    /// Active sections beyond this count force the oldest into fading.
    pub fn retention_ceiling(&self) -> usize {
        self.lookahead_count + 3
    }

    /// Active section count re-seeded by a reset.
    pub fn initial_window(&self) -> usize {
        self.lookahead_count + 2
    }

    /// Distance ahead of the player below which a new section is spawned.
    pub fn spawn_threshold(&self) -> f32 {
        self.spawn_margin * self.section_length
    }

    /// Distance behind the player beyond which a section is retired.
    pub fn retire_threshold(&self) -> f32 {
        self.retire_distance * self.section_length
    }
}

/// Scenery placement policy for the factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    pub min_count: usize,
    /// Inclusive.
    pub max_count: usize,
    /// Maximum lateral offset from the chosen lane.
    pub lateral_jitter: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            min_count: 8,
            max_count: 13,
            lateral_jitter: 1.2,
            min_scale: 0.7,
            max_scale: 1.3,
        }
    }
}
