//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Simulation step counter (discrete time unit)
pub type Step = u64;

/// Unique identifier for regions (census tracts, districts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u32);

impl RegionId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for households
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub u32);

impl HouseholdId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}
