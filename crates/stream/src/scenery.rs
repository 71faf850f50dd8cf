use glam::Vec3;
use laneway_common::SceneryDescriptor;
use rand::Rng;

use crate::config::SceneryConfig;

/// Produces decorative scenery descriptors for a section.
///
/// Holds only its placement policy; every call is independent and draws all
/// randomness from the caller's RNG.
#[derive(Debug, Clone, Default)]
pub struct SceneryFactory {
    config: SceneryConfig,
}

impl SceneryFactory {
    pub fn new(config: SceneryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SceneryConfig {
        &self.config
    }

    /// Scatter objects over `[center_z - length/2, center_z + length/2)`,
    /// each snapped to a random lane and jittered sideways.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        center_z: f32,
        section_length: f32,
        lane_x: &[f32],
    ) -> Vec<SceneryDescriptor> {
        let cfg = &self.config;
        let count = if cfg.max_count > cfg.min_count {
            rng.gen_range(cfg.min_count..=cfg.max_count)
        } else {
            cfg.min_count
        };
        let z_start = center_z - section_length * 0.5;
        let z_end = z_start + section_length;

        (0..count)
            .map(|_| {
                let lane = if lane_x.is_empty() {
                    0.0
                } else {
                    lane_x[rng.gen_range(0..lane_x.len())]
                };
                let jitter = if cfg.lateral_jitter > 0.0 {
                    rng.gen_range(-cfg.lateral_jitter..=cfg.lateral_jitter)
                } else {
                    0.0
                };
                let offset = if section_length > 0.0 {
                    rng.gen_range(0.0..section_length)
                } else {
                    0.0
                };
                let mut z = z_start + offset;
                // Rounding can land exactly on the far edge.
                if z >= z_end {
                    z = z_start;
                }
                let scale = if cfg.max_scale > cfg.min_scale {
                    rng.gen_range(cfg.min_scale..cfg.max_scale)
                } else {
                    cfg.min_scale
                };
                SceneryDescriptor {
                    position: Vec3::new(lane + jitter, 0.0, z),
                    scale,
                }
            })
            .collect()
    }
}
