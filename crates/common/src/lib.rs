//! Shared value types passed between the stream manager, the renderer
//! collaborator and the host.

mod types;

pub use types::{LANE_COUNT, SceneryDescriptor, SectionBounds, SectionId, VisualHandle};
