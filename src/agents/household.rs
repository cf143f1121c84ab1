//! Household - mobile agent with income-derived demands
//!
//! Each step a household checks its region against two thresholds derived
//! from its income: the quality it demands and the rent it can afford.
//! Unhappy households search for a region satisfying both; failure to find
//! one is displacement, a first-class outcome rather than an error.

use geo_types::Point;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{MigrationPolicy, ModelConfig};
use crate::core::error::{ModelError, Result};
use crate::core::types::{HouseholdId, RegionId};
use crate::space::geometry::PointSampler;
use crate::space::index::SpatialIndex;

#[derive(Clone, Debug)]
pub struct Household {
    pub id: HouseholdId,
    /// Income level in [0, 1], drawn once at creation
    pub income: f64,
    /// Current region, None only transiently inside relocation
    pub region: Option<RegionId>,
    /// Interior point inside the current region, resampled on every placement
    pub position: Point<f64>,
    pub happy: bool,
    /// Lifetime completed moves
    pub moves: u32,
    /// Set while no satisfying region exists (or the move cap is reached)
    pub displaced: bool,
    /// Failed migration searches over the household's lifetime
    pub displacement_attempts: u32,
}

impl Household {
    pub fn new(id: HouseholdId, income: f64) -> Self {
        Self {
            id,
            income,
            region: None,
            position: Point::new(0.0, 0.0),
            happy: false,
            moves: 0,
            displaced: false,
            displacement_attempts: 0,
        }
    }

    /// Minimum housing quality this household accepts (affine in income)
    pub fn quality_threshold(&self, config: &ModelConfig) -> f64 {
        config.quality_demand_base + config.quality_demand_slope * self.income
    }

    /// Maximum rent this household can pay (affine in income)
    pub fn affordable_rent(&self, config: &ModelConfig) -> f64 {
        config.rent_budget_base + config.rent_budget_slope * self.income
    }

    /// Does the current region satisfy both thresholds right now?
    pub fn content_in_place(&self, index: &SpatialIndex, config: &ModelConfig) -> Result<bool> {
        let region_id = self.region.ok_or(ModelError::NotPlaced(self.id))?;
        let quality = index.require_region(region_id)?.quality();
        let rent = index.rent_of(region_id, config)?;
        Ok(quality >= self.quality_threshold(config) && rent <= self.affordable_rent(config))
    }

    /// Evaluate happiness in place and migrate if unhappy.
    ///
    /// Index mutations from earlier-activated households are visible here;
    /// that ordering sensitivity is a documented property of sequential
    /// activation, not a defect.
    pub fn step(
        &mut self,
        index: &mut SpatialIndex,
        config: &ModelConfig,
        rng: &mut ChaCha8Rng,
        sampler: &mut dyn PointSampler,
    ) -> Result<()> {
        if self.content_in_place(index, config)? {
            self.happy = true;
            self.displaced = false;
            return Ok(());
        }
        self.happy = false;

        let quality_min = self.quality_threshold(config);
        let rent_max = self.affordable_rent(config);

        // Capped households stop searching for good; the attempt counter
        // keeps advancing so displacement pressure stays measurable.
        if let Some(cap) = config.max_moves {
            if self.moves >= cap {
                self.displaced = true;
                self.displacement_attempts += 1;
                return Ok(());
            }
        }

        match config.migration {
            MigrationPolicy::Random => {
                if let Some(destination) = index.random_region_id(rng) {
                    index.relocate(self, destination, sampler)?;
                    self.moves += 1;
                }
                Ok(())
            }
            MigrationPolicy::Filtered => {
                let candidates = index.regions_satisfying(config, |quality, rent| {
                    quality >= quality_min && rent <= rent_max
                });

                match candidates.choose(rng) {
                    Some(&destination) => {
                        index.relocate(self, destination, sampler)?;
                        self.moves += 1;
                        self.happy = true;
                        self.displaced = false;
                        tracing::debug!(
                            household = self.id.0,
                            to = destination.0,
                            moves = self.moves,
                            "migrated"
                        );
                    }
                    None => {
                        self.displaced = true;
                        self.displacement_attempts += 1;
                    }
                }
                Ok(())
            }
        }
    }
}
