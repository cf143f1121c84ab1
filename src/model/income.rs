//! Income distribution sampling
//!
//! Incomes are drawn once per household at setup, from a two-parameter
//! Beta distribution by default. The trait seam lets tests (or an external
//! population provider) supply fixed or empirical incomes instead.

use rand_chacha::ChaCha8Rng;
use rand_distr::{Beta, Distribution};

use crate::core::config::ModelConfig;
use crate::core::error::{ModelError, Result};

/// Draws income levels in [0, 1]
pub trait IncomeSampler {
    fn sample(&mut self, rng: &mut ChaCha8Rng) -> f64;
}

/// Beta(alpha, beta) incomes
pub struct BetaIncome {
    dist: Beta<f64>,
}

impl BetaIncome {
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        let dist = Beta::new(alpha, beta)
            .map_err(|e| ModelError::Config(format!("invalid Beta income parameters: {e}")))?;
        Ok(Self { dist })
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        Self::new(config.income_alpha, config.income_beta)
    }
}

impl IncomeSampler for BetaIncome {
    fn sample(&mut self, rng: &mut ChaCha8Rng) -> f64 {
        self.dist.sample(rng)
    }
}

/// Every household gets the same income; test worlds only
pub struct FixedIncome(pub f64);

impl IncomeSampler for FixedIncome {
    fn sample(&mut self, _rng: &mut ChaCha8Rng) -> f64 {
        self.0
    }
}
