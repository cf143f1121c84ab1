//! Region - fixed geographic area with decaying housing stock
//!
//! A region's quality follows an exponential decay clock that renovation
//! resets. Rent-regulated regions decay more slowly and never self-renovate;
//! unregulated regions renovate as soon as quality crosses the threshold.

use ahash::AHashSet;
use geo_types::Polygon;

use crate::core::config::ModelConfig;
use crate::core::types::{HouseholdId, RegionId, Step};

pub struct Region {
    pub id: RegionId,
    /// Boundary geometry, opaque to the core (containment and adjacency only)
    pub boundary: Polygon<f64>,
    /// Precomputed adjacency, self excluded
    pub neighbors: Vec<RegionId>,
    /// Fixed at creation; regulated regions decay slower, rent discounted
    pub rent_regulated: bool,
    /// Renovations performed over the region's lifetime
    pub renovations: u32,

    /// base_decay, plus decay_differential when unregulated
    decay_constant: f64,
    /// Start of the current decay curve; renovation resets this
    base_quality: f64,
    steps_since_renovation: Step,

    /// Households currently resident here. Bookkept by the SpatialIndex.
    residents: AHashSet<HouseholdId>,
    /// Cached sum of resident incomes, kept so neighborhood income
    /// aggregation never needs the household arena
    income_sum: f64,
}

impl Region {
    pub fn new(
        id: RegionId,
        boundary: Polygon<f64>,
        neighbors: Vec<RegionId>,
        rent_regulated: bool,
        config: &ModelConfig,
    ) -> Self {
        let decay_constant = if rent_regulated {
            config.base_decay
        } else {
            config.base_decay + config.decay_differential
        };

        Self {
            id,
            boundary,
            neighbors,
            rent_regulated,
            renovations: 0,
            decay_constant,
            base_quality: config.initial_quality,
            steps_since_renovation: 0,
            residents: AHashSet::new(),
            income_sum: 0.0,
        }
    }

    /// Current housing quality: base * exp(-k * steps since renovation)
    pub fn quality(&self) -> f64 {
        self.base_quality * (-self.decay_constant * self.steps_since_renovation as f64).exp()
    }

    /// Advance the decay clock one step and renovate if the threshold is
    /// crossed. Regulated regions never self-renovate.
    pub fn step(&mut self, config: &ModelConfig) {
        self.steps_since_renovation += 1;

        if !self.rent_regulated && self.quality() <= config.renovation_threshold {
            self.base_quality = config.renovated_quality;
            self.steps_since_renovation = 0;
            self.renovations += 1;
            tracing::debug!(region = self.id.0, total = self.renovations, "renovation");
        }
    }

    pub fn resident_count(&self) -> usize {
        self.residents.len()
    }

    pub fn residents(&self) -> &AHashSet<HouseholdId> {
        &self.residents
    }

    /// Sum of incomes of current residents
    pub fn income_sum(&self) -> f64 {
        self.income_sum
    }

    pub fn decay_constant(&self) -> f64 {
        self.decay_constant
    }

    pub fn steps_since_renovation(&self) -> Step {
        self.steps_since_renovation
    }

    pub(crate) fn attach(&mut self, household: HouseholdId, income: f64) {
        if self.residents.insert(household) {
            self.income_sum += income;
        }
    }

    pub(crate) fn detach(&mut self, household: HouseholdId, income: f64) {
        if self.residents.remove(&household) {
            self.income_sum -= income;
        }
    }
}
