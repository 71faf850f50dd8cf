use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of lanes the player can occupy.
pub const LANE_COUNT: usize = 3;

/// Unique identifier for a track section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub Uuid);

impl SectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle to a visual object owned by the renderer collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Spatial extent of one platform section along the forward (z) axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub z_start: f32,
    pub z_end: f32,
    /// Platform width along x, centred on x = 0.
    pub width: f32,
}

impl SectionBounds {
    pub fn new(z_start: f32, length: f32, width: f32) -> Self {
        Self {
            z_start,
            z_end: z_start + length,
            width,
        }
    }

    pub fn length(&self) -> f32 {
        self.z_end - self.z_start
    }

    pub fn center_z(&self) -> f32 {
        self.z_start + self.length() * 0.5
    }

    /// Whether `z` lies in the half-open span `[z_start, z_end)`.
    pub fn contains_z(&self, z: f32) -> bool {
        z >= self.z_start && z < self.z_end
    }
}

/// A decorative object to be materialized alongside a section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneryDescriptor {
    pub position: Vec3,
    pub scale: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_id_uniqueness() {
        let a = SectionId::new();
        let b = SectionId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn bounds_length_and_center() {
        let b = SectionBounds::new(-28.0, 28.0, 9.0);
        assert_eq!(b.z_end, 0.0);
        assert_eq!(b.length(), 28.0);
        assert_eq!(b.center_z(), -14.0);
    }

    #[test]
    fn bounds_are_half_open() {
        let b = SectionBounds::new(0.0, 28.0, 9.0);
        assert!(b.contains_z(0.0));
        assert!(b.contains_z(27.9));
        assert!(!b.contains_z(28.0));
        assert!(!b.contains_z(-0.1));
    }
}
