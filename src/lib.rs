//! Tractshift - agent-based simulation of neighborhood change
//!
//! Mobile households with income-derived demands migrate across fixed
//! polygonal regions whose housing quality decays and whose rent tracks
//! neighborhood income composition.

pub mod agents;
pub mod core;
pub mod model;
pub mod space;

pub use model::{Model, ModelSnapshot, RegionSeed, StepMetrics};
