//! SimulationClock - step counting, activation order, termination

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::core::types::Step;

/// Drives the discrete timeline: counts steps, shuffles household
/// activation order, and latches the termination flag once every
/// household is happy.
pub struct SimulationClock {
    step: Step,
    running: bool,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            step: 0,
            running: true,
        }
    }

    /// Advance to the next step and return its number (1-based)
    pub fn advance(&mut self) -> Step {
        self.step += 1;
        self.step
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Freshly shuffled activation order over `count` agents. A new
    /// shuffle every step, deterministic under a fixed seed.
    pub fn activation_order(&self, count: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
        let mut order: Vec<usize> = (0..count).collect();
        order.shuffle(rng);
        order
    }

    /// Latch the termination flag when no household is unhappy
    pub fn evaluate_termination(&mut self, unhappy: u64) {
        if unhappy == 0 {
            self.running = false;
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}
