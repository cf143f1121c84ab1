//! Serializable snapshots for the external reporting layer
//!
//! Read-only views of model state; the model is never mutated through
//! these. Geometry is omitted -- the reporting layer holds the boundaries
//! it loaded, keyed by region id.

use serde::{Deserialize, Serialize};

use crate::core::types::{HouseholdId, RegionId, Step};
use crate::model::metrics::StepMetrics;
use crate::model::Model;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub id: RegionId,
    pub quality: f64,
    pub rent: f64,
    pub rent_regulated: bool,
    pub residents: usize,
    pub renovations: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    pub id: HouseholdId,
    pub income: f64,
    pub region: Option<RegionId>,
    pub happy: bool,
    pub moves: u32,
    pub displaced: bool,
    pub displacement_attempts: u32,
}

/// Full state snapshot plus the current aggregates
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub step: Step,
    pub metrics: StepMetrics,
    pub regions: Vec<RegionSnapshot>,
    pub households: Vec<HouseholdSnapshot>,
}

impl ModelSnapshot {
    pub fn capture(model: &Model) -> Self {
        let config = model.config();
        let index = model.index();

        let regions = index
            .region_ids()
            .iter()
            .filter_map(|&id| {
                let region = index.region(id)?;
                Some(RegionSnapshot {
                    id,
                    quality: region.quality(),
                    rent: index.rent_of(id, config).unwrap_or(0.0),
                    rent_regulated: region.rent_regulated,
                    residents: region.resident_count(),
                    renovations: region.renovations,
                })
            })
            .collect();

        let households = model
            .households()
            .iter()
            .map(|hh| HouseholdSnapshot {
                id: hh.id,
                income: hh.income,
                region: hh.region,
                happy: hh.happy,
                moves: hh.moves,
                displaced: hh.displaced,
                displacement_attempts: hh.displacement_attempts,
            })
            .collect();

        Self {
            step: model.step_count(),
            metrics: *model.metrics(),
            regions,
            households,
        }
    }

    pub fn to_json(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
