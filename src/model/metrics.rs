//! Aggregate per-step counters exposed to the reporting layer

use serde::{Deserialize, Serialize};

use crate::core::types::Step;

/// Read-only aggregates recomputed after every sweep. Counts are of the
/// current state; `total_*` fields are cumulative over the run.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct StepMetrics {
    pub step: Step,
    pub happy: u64,
    pub unhappy: u64,
    pub displaced: u64,
    pub total_moves: u64,
    pub total_displacement_attempts: u64,
    pub total_renovations: u64,
}

impl StepMetrics {
    pub fn population(&self) -> u64 {
        self.happy + self.unhappy
    }
}
