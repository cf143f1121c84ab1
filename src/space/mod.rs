pub mod geometry;
pub mod index;

pub use geometry::{PointSampler, RejectionSampler};
pub use index::SpatialIndex;
