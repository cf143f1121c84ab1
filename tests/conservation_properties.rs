//! Property tests for membership conservation
//!
//! Whatever the world shape, population, seed, or run length, no
//! household is ever lost or duplicated: region resident counts always
//! sum to the total population, and every household sits in exactly the
//! resident set its region reference points at.

use proptest::prelude::*;

use tractshift::core::config::{MigrationPolicy, ModelConfig};
use tractshift::model::Model;
use tractshift::space::geometry::grid_of_squares;
use tractshift::RegionSeed;

fn grid_seeds(width: u32, height: u32, households: u32) -> Vec<RegionSeed> {
    grid_of_squares(width, height)
        .into_iter()
        .map(|(id, boundary)| RegionSeed {
            id,
            boundary,
            households,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn population_conserved_under_filtered_migration(
        width in 1u32..5,
        height in 1u32..4,
        households in 0u32..8,
        seed in any::<u64>(),
        steps in 1usize..15,
    ) {
        let config = ModelConfig { seed, ..ModelConfig::default() };
        let total = (width * height * households) as u64;
        let mut model = Model::new(config, grid_seeds(width, height, households)).unwrap();

        prop_assert!(model.verify_membership());
        for _ in 0..steps {
            if !model.running() {
                break;
            }
            let metrics = *model.step().unwrap();
            prop_assert_eq!(metrics.population(), total);
            prop_assert!(model.verify_membership());
        }
    }

    #[test]
    fn population_conserved_under_random_migration(
        width in 1u32..4,
        height in 1u32..4,
        households in 1u32..6,
        seed in any::<u64>(),
        steps in 1usize..10,
    ) {
        let config = ModelConfig {
            seed,
            migration: MigrationPolicy::Random,
            ..ModelConfig::default()
        };
        let total = (width * height * households) as u64;
        let mut model = Model::new(config, grid_seeds(width, height, households)).unwrap();

        for _ in 0..steps {
            if !model.running() {
                break;
            }
            let metrics = *model.step().unwrap();
            prop_assert_eq!(metrics.population(), total);
            prop_assert!(model.verify_membership());
        }
    }

    #[test]
    fn counters_never_regress(
        seed in any::<u64>(),
        steps in 1usize..12,
    ) {
        let config = ModelConfig { seed, ..ModelConfig::default() };
        let mut model = Model::new(config, grid_seeds(3, 3, 4)).unwrap();

        let mut last_moves = 0;
        let mut last_attempts = 0;
        let mut last_renovations = 0;
        for _ in 0..steps {
            if !model.running() {
                break;
            }
            let metrics = *model.step().unwrap();
            prop_assert!(metrics.total_moves >= last_moves);
            prop_assert!(metrics.total_displacement_attempts >= last_attempts);
            prop_assert!(metrics.total_renovations >= last_renovations);
            last_moves = metrics.total_moves;
            last_attempts = metrics.total_displacement_attempts;
            last_renovations = metrics.total_renovations;
        }
    }
}
