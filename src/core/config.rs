//! Model configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. The config is built once, passed
//! into `Model::new`, and threaded down by reference -- there is no global
//! mutable configuration.

use serde::{Deserialize, Serialize};

use crate::core::error::{ModelError, Result};

/// How an unhappy household picks a destination region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationPolicy {
    /// Search all regions meeting the household's quality and rent
    /// thresholds; uniform pick among them. No fit means displacement.
    Filtered,
    /// Jump to a uniformly random region regardless of fit. Happiness is
    /// re-evaluated at the destination on the next step.
    Random,
}

/// Configuration for the neighborhood-change model
///
/// Defaults are tuned so a mid-income household (income 0.5) demands
/// quality 60 and can afford rent 500 while a fully packed neighborhood
/// of mid-income residents prices at 500 -- i.e. the system starts near
/// the edge of affordability and decay pushes it over.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    // === HOUSING QUALITY ===
    /// Quality every region starts at (quality is a 0-100 scale)
    pub initial_quality: f64,

    /// Exponential decay constant shared by all regions
    ///
    /// quality(t) = base * exp(-k * steps_since_renovation). At 0.05 an
    /// unrenovated regulated region halves in roughly 14 steps.
    pub base_decay: f64,

    /// Extra decay applied to regions WITHOUT rent regulation
    ///
    /// Models faster disinvestment absent regulation: unregulated decay
    /// constant = base_decay + decay_differential.
    pub decay_differential: f64,

    /// Quality at or below which an unregulated region renovates
    ///
    /// Rent-regulated regions never self-renovate.
    pub renovation_threshold: f64,

    /// Quality a region resets to when renovation fires
    ///
    /// Deliberately below initial_quality: renovated stock is good, not new.
    pub renovated_quality: f64,

    // === RENT ===
    /// Rent per unit of average neighborhood income
    ///
    /// rent = base_rent_coefficient * mean income over residents of the
    /// region and its neighbors (self included). Incomes live in [0, 1],
    /// so rents live in [0, base_rent_coefficient].
    pub base_rent_coefficient: f64,

    /// Fractional rent discount in rent-regulated regions
    pub rent_discount: f64,

    /// Fraction of regions created with rent regulation
    pub regulated_fraction: f64,

    // === HOUSEHOLD THRESHOLDS (affine in income) ===
    /// Quality demanded by a zero-income household
    pub quality_demand_base: f64,

    /// Additional quality demanded per unit of income
    pub quality_demand_slope: f64,

    /// Rent a zero-income household can afford
    pub rent_budget_base: f64,

    /// Additional affordable rent per unit of income
    pub rent_budget_slope: f64,

    // === POPULATION ===
    /// Households created per region at setup
    pub households_per_region: u32,

    /// Alpha parameter of the Beta income distribution
    pub income_alpha: f64,

    /// Beta parameter of the Beta income distribution
    ///
    /// Beta(2, 4) skews income toward the low end, which is what makes
    /// displacement pressure interesting; Beta(2, 2) is symmetric.
    pub income_beta: f64,

    // === MIGRATION ===
    /// Destination selection policy for unhappy households
    pub migration: MigrationPolicy,

    /// Optional cap on lifetime moves per household
    ///
    /// Once a household has moved this many times it stops searching and
    /// is permanently displaced. None disables the cap.
    pub max_moves: Option<u32>,

    // === DETERMINISM ===
    /// Seed for the model RNG (activation order, tie-breaking, incomes)
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            initial_quality: 100.0,
            base_decay: 0.05,
            decay_differential: 0.10,
            renovation_threshold: 50.0,
            renovated_quality: 90.0,

            base_rent_coefficient: 1000.0,
            rent_discount: 0.3,
            regulated_fraction: 0.3,

            quality_demand_base: 20.0,
            quality_demand_slope: 80.0,
            rent_budget_base: 0.0,
            rent_budget_slope: 1000.0,

            households_per_region: 5,
            income_alpha: 2.0,
            income_beta: 4.0,

            migration: MigrationPolicy::Filtered,
            max_moves: None,

            seed: 12345,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys fall back to defaults
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: ModelConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.base_decay <= 0.0 {
            return Err(ModelError::Config("base_decay must be positive".into()));
        }
        if self.decay_differential < 0.0 {
            return Err(ModelError::Config(
                "decay_differential must be non-negative".into(),
            ));
        }

        // A renovation that lands at or below the threshold would fire
        // again on the very next step, forever.
        if self.renovated_quality <= self.renovation_threshold {
            return Err(ModelError::Config(format!(
                "renovated_quality ({}) must exceed renovation_threshold ({})",
                self.renovated_quality, self.renovation_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.rent_discount) {
            return Err(ModelError::Config(format!(
                "rent_discount ({}) must be in [0, 1]",
                self.rent_discount
            )));
        }
        if !(0.0..=1.0).contains(&self.regulated_fraction) {
            return Err(ModelError::Config(format!(
                "regulated_fraction ({}) must be in [0, 1]",
                self.regulated_fraction
            )));
        }

        if self.income_alpha <= 0.0 || self.income_beta <= 0.0 {
            return Err(ModelError::Config(
                "income_alpha and income_beta must be positive".into(),
            ));
        }

        Ok(())
    }
}
