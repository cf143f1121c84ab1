//! Model - orchestrates the spatial index, agents, and clock
//!
//! One `step()` activates every household (shuffled order), then every
//! region (registration order), then recomputes the aggregate counters and
//! the termination flag. Index mutations made by earlier-activated agents
//! are visible to later ones within the same step; sequential activation
//! makes this the documented semantics, not a race.

pub mod clock;
pub mod income;
pub mod metrics;
pub mod output;

pub use clock::SimulationClock;
pub use income::{BetaIncome, FixedIncome, IncomeSampler};
pub use metrics::StepMetrics;
pub use output::ModelSnapshot;

use geo_types::Polygon;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::agents::household::Household;
use crate::agents::region::Region;
use crate::core::config::ModelConfig;
use crate::core::error::Result;
use crate::core::types::{HouseholdId, RegionId, Step};
use crate::space::geometry::{derive_adjacency, PointSampler, RejectionSampler};
use crate::space::index::SpatialIndex;

/// Setup input for one region: identity, boundary, initial household count
pub struct RegionSeed {
    pub id: RegionId,
    pub boundary: Polygon<f64>,
    pub households: u32,
}

pub struct Model {
    config: ModelConfig,
    index: SpatialIndex,
    households: Vec<Household>,
    clock: SimulationClock,
    rng: ChaCha8Rng,
    sampler: Box<dyn PointSampler>,
    metrics: StepMetrics,
}

impl Model {
    /// Build a model with Beta-distributed incomes from the config
    pub fn new(config: ModelConfig, seeds: Vec<RegionSeed>) -> Result<Self> {
        let income = BetaIncome::from_config(&config)?;
        Self::with_income_sampler(config, seeds, Box::new(income))
    }

    /// Build a model with a caller-supplied income sampler
    pub fn with_income_sampler(
        config: ModelConfig,
        seeds: Vec<RegionSeed>,
        mut income: Box<dyn IncomeSampler>,
    ) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        // Separate stream for interior points so adding point draws never
        // perturbs activation order or tie-breaking
        let mut sampler: Box<dyn PointSampler> =
            Box::new(RejectionSampler::seeded(config.seed.wrapping_add(1)));

        let boundary_refs: Vec<(RegionId, &Polygon<f64>)> =
            seeds.iter().map(|s| (s.id, &s.boundary)).collect();
        let mut adjacency = derive_adjacency(&boundary_refs);

        let mut index = SpatialIndex::new();
        for seed in &seeds {
            let neighbors = adjacency.remove(&seed.id).unwrap_or_default();
            let rent_regulated = rng.gen_bool(config.regulated_fraction);
            index.add_region(Region::new(
                seed.id,
                seed.boundary.clone(),
                neighbors,
                rent_regulated,
                &config,
            ))?;
        }

        let total: u32 = seeds.iter().map(|s| s.households).sum();
        let mut households = Vec::with_capacity(total as usize);
        let mut next_id = 0u32;
        for seed in &seeds {
            for _ in 0..seed.households {
                let mut household =
                    Household::new(HouseholdId(next_id), income.sample(&mut rng));
                next_id += 1;
                index.place_household(&mut household, seed.id, sampler.as_mut())?;
                households.push(household);
            }
        }

        tracing::info!(
            regions = index.region_count(),
            households = households.len(),
            seed = config.seed,
            "model initialized"
        );

        let mut model = Self {
            config,
            index,
            households,
            clock: SimulationClock::new(),
            rng,
            sampler,
            metrics: StepMetrics::default(),
        };
        model.evaluate_initial_happiness();
        model.recount(0);
        Ok(model)
    }

    /// Happiness flags start from the same predicate the step loop uses,
    /// so step-0 metrics are meaningful
    fn evaluate_initial_happiness(&mut self) {
        for household in &mut self.households {
            household.happy = household
                .content_in_place(&self.index, &self.config)
                .unwrap_or(false);
        }
    }

    /// Advance the simulation one step
    pub fn step(&mut self) -> Result<&StepMetrics> {
        let step = self.clock.advance();

        // Household phase: shuffled activation, mutations visible within
        // the sweep
        let order = self
            .clock
            .activation_order(self.households.len(), &mut self.rng);
        for idx in order {
            self.households[idx].step(
                &mut self.index,
                &self.config,
                &mut self.rng,
                self.sampler.as_mut(),
            )?;
        }

        // Region phase: decay and renovation
        let total_renovations = self.index.step_regions(&self.config);

        self.recount(total_renovations);
        self.metrics.step = step;
        self.clock.evaluate_termination(self.metrics.unhappy);

        debug_assert_eq!(self.index.population(), self.households.len());

        tracing::debug!(
            step,
            happy = self.metrics.happy,
            unhappy = self.metrics.unhappy,
            displaced = self.metrics.displaced,
            "step complete"
        );

        Ok(&self.metrics)
    }

    fn recount(&mut self, total_renovations: u64) {
        let mut metrics = StepMetrics {
            step: self.clock.step(),
            total_renovations,
            ..StepMetrics::default()
        };
        for household in &self.households {
            if household.happy {
                metrics.happy += 1;
            } else {
                metrics.unhappy += 1;
            }
            if household.displaced {
                metrics.displaced += 1;
            }
            metrics.total_moves += u64::from(household.moves);
            metrics.total_displacement_attempts += u64::from(household.displacement_attempts);
        }
        self.metrics = metrics;
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn households(&self) -> &[Household] {
        &self.households
    }

    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    pub fn running(&self) -> bool {
        self.clock.running()
    }

    pub fn step_count(&self) -> Step {
        self.clock.step()
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::capture(self)
    }

    /// Membership bookkeeping cross-check: every household sits in exactly
    /// the resident set its reference points at, and the counts add up.
    pub fn verify_membership(&self) -> bool {
        let mut total_residents = 0;
        for &id in self.index.region_ids() {
            let Some(region) = self.index.region(id) else {
                return false;
            };
            total_residents += region.resident_count();
        }
        if total_residents != self.households.len() {
            return false;
        }
        if self.index.population() != self.households.len() {
            return false;
        }
        self.households.iter().all(|hh| match hh.region {
            Some(region_id) => self
                .index
                .region(region_id)
                .is_some_and(|r| r.residents().contains(&hh.id)),
            None => false,
        })
    }
}
