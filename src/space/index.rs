//! SpatialIndex - authoritative household/region membership bookkeeping
//!
//! The index is the sole owner of the placement relation: a household's
//! current-region id and the matching region resident set only ever change
//! together, through the operations here. Region state lives in the index's
//! arena; households live in the model and are handed in by reference.
//!
//! Iteration and random picks go through a stable insertion-order list so
//! runs are deterministic under a fixed seed (hash map order is not).

use ahash::{AHashMap, AHashSet};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::agents::household::Household;
use crate::agents::region::Region;
use crate::core::config::ModelConfig;
use crate::core::error::{ModelError, Result};
use crate::core::types::{HouseholdId, RegionId};
use crate::space::geometry::PointSampler;

#[derive(Default)]
pub struct SpatialIndex {
    regions: AHashMap<RegionId, Region>,
    /// Registration order, for deterministic iteration
    order: Vec<RegionId>,
    /// Households currently placed anywhere
    population: usize,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region. The id must not already be registered.
    pub fn add_region(&mut self, region: Region) -> Result<()> {
        if self.regions.contains_key(&region.id) {
            return Err(ModelError::DuplicateId(region.id));
        }
        self.order.push(region.id);
        self.regions.insert(region.id, region);
        Ok(())
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(&id)
    }

    pub fn require_region(&self, id: RegionId) -> Result<&Region> {
        self.regions.get(&id).ok_or(ModelError::UnknownRegion(id))
    }

    /// Region ids in registration order
    pub fn region_ids(&self) -> &[RegionId] {
        &self.order
    }

    pub fn region_count(&self) -> usize {
        self.order.len()
    }

    /// Households currently placed across all regions
    pub fn population(&self) -> usize {
        self.population
    }

    /// Assign a household to a region: set its current-region reference,
    /// add it to the resident set, and sample it a fresh interior point.
    pub fn place_household(
        &mut self,
        household: &mut Household,
        region_id: RegionId,
        sampler: &mut dyn PointSampler,
    ) -> Result<()> {
        let region = self
            .regions
            .get_mut(&region_id)
            .ok_or(ModelError::UnknownRegion(region_id))?;

        household.region = Some(region_id);
        household.position = sampler.sample_point(&region.boundary);
        region.attach(household.id, household.income);
        self.population += 1;
        Ok(())
    }

    /// Detach a household from its current region and clear its reference.
    pub fn remove_household(&mut self, household: &mut Household) -> Result<()> {
        let region_id = household
            .region
            .take()
            .ok_or(ModelError::NotPlaced(household.id))?;

        let region = self
            .regions
            .get_mut(&region_id)
            .ok_or(ModelError::UnknownRegion(region_id))?;
        region.detach(household.id, household.income);
        self.population -= 1;
        Ok(())
    }

    /// Move a household to a new region. The destination is validated
    /// before removal, so a failed relocate leaves the household placed
    /// where it was -- no observable neither-region state.
    pub fn relocate(
        &mut self,
        household: &mut Household,
        new_region_id: RegionId,
        sampler: &mut dyn PointSampler,
    ) -> Result<()> {
        self.require_region(new_region_id)?;
        self.remove_household(household)?;
        self.place_household(household, new_region_id, sampler)
    }

    /// Regions whose (quality, rent) pass the predicate, in registration
    /// order. Rent is computed lazily per region.
    pub fn regions_satisfying<P>(&self, config: &ModelConfig, predicate: P) -> Vec<RegionId>
    where
        P: Fn(f64, f64) -> bool,
    {
        self.order
            .iter()
            .copied()
            .filter(|id| match self.regions.get(id) {
                Some(region) => {
                    let rent = self.rent_of_region(region, config);
                    predicate(region.quality(), rent)
                }
                None => false,
            })
            .collect()
    }

    /// Precomputed adjacency set, self excluded
    pub fn neighbors_of(&self, id: RegionId) -> Result<&[RegionId]> {
        self.require_region(id).map(|r| r.neighbors.as_slice())
    }

    /// Live resident set of a region
    pub fn residents_of(&self, id: RegionId) -> Result<&AHashSet<HouseholdId>> {
        self.require_region(id).map(|r| r.residents())
    }

    /// Uniform random pick over registered region ids
    pub fn random_region_id(&self, rng: &mut ChaCha8Rng) -> Option<RegionId> {
        self.order.choose(rng).copied()
    }

    /// Mean income over residents of the region and every adjacent region,
    /// self included. An empty aggregation set yields 0.0.
    pub fn average_neighborhood_income(&self, id: RegionId) -> Result<f64> {
        let region = self.require_region(id)?;
        Ok(self.neighborhood_income(region))
    }

    /// Income mean over the region plus its neighbors (self included)
    fn neighborhood_income(&self, region: &Region) -> f64 {
        let mut income_sum = region.income_sum();
        let mut count = region.resident_count();
        for &neighbor_id in &region.neighbors {
            if let Some(neighbor) = self.regions.get(&neighbor_id) {
                income_sum += neighbor.income_sum();
                count += neighbor.resident_count();
            }
        }

        if count == 0 {
            0.0
        } else {
            income_sum / count as f64
        }
    }

    /// Rent asked in a region right now. Recomputed on every read from
    /// live neighborhood income; never cached, so migration and decay
    /// feedback are always reflected.
    pub fn rent_of(&self, id: RegionId, config: &ModelConfig) -> Result<f64> {
        let region = self.require_region(id)?;
        Ok(self.rent_of_region(region, config))
    }

    fn rent_of_region(&self, region: &Region, config: &ModelConfig) -> f64 {
        let mut rent = config.base_rent_coefficient * self.neighborhood_income(region);
        if region.rent_regulated {
            rent *= 1.0 - config.rent_discount;
        }
        rent
    }

    /// Advance every region's decay/renovation machine, in registration
    /// order. Returns cumulative renovations across all regions.
    pub fn step_regions(&mut self, config: &ModelConfig) -> u64 {
        let mut total_renovations = 0;
        for idx in 0..self.order.len() {
            let id = self.order[idx];
            if let Some(region) = self.regions.get_mut(&id) {
                region.step(config);
                total_renovations += u64::from(region.renovations);
            }
        }
        total_renovations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::HouseholdId;
    use crate::space::geometry::{derive_adjacency, grid_of_squares, RejectionSampler};
    use geo_types::Polygon;

    fn build_index(width: u32, height: u32, config: &ModelConfig) -> SpatialIndex {
        let grid = grid_of_squares(width, height);
        let refs: Vec<(RegionId, &Polygon<f64>)> =
            grid.iter().map(|(id, p)| (*id, p)).collect();
        let mut adjacency = derive_adjacency(&refs);

        let mut index = SpatialIndex::new();
        for (id, boundary) in grid {
            let neighbors = adjacency.remove(&id).unwrap_or_default();
            index
                .add_region(Region::new(id, boundary, neighbors, false, config))
                .unwrap();
        }
        index
    }

    fn household(id: u32, income: f64) -> Household {
        Household::new(HouseholdId(id), income)
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let config = ModelConfig::default();
        let mut index = build_index(2, 1, &config);
        let dup = Region::new(
            RegionId(0),
            crate::space::geometry::square(0.0, 0.0, 1.0),
            vec![],
            false,
            &config,
        );
        assert!(matches!(
            index.add_region(dup),
            Err(ModelError::DuplicateId(RegionId(0)))
        ));
    }

    #[test]
    fn test_place_into_unknown_region_fails() {
        let config = ModelConfig::default();
        let mut index = build_index(2, 1, &config);
        let mut sampler = RejectionSampler::seeded(1);
        let mut hh = household(0, 0.5);
        let result = index.place_household(&mut hh, RegionId(99), &mut sampler);
        assert!(matches!(result, Err(ModelError::UnknownRegion(RegionId(99)))));
        assert!(hh.region.is_none());
    }

    #[test]
    fn test_place_updates_membership_and_position() {
        let config = ModelConfig::default();
        let mut index = build_index(2, 1, &config);
        let mut sampler = RejectionSampler::seeded(1);
        let mut hh = household(3, 0.5);

        index
            .place_household(&mut hh, RegionId(1), &mut sampler)
            .unwrap();
        assert_eq!(hh.region, Some(RegionId(1)));
        assert!(index.residents_of(RegionId(1)).unwrap().contains(&HouseholdId(3)));
        assert_eq!(index.population(), 1);

        // Sampled point lands inside the destination square
        use geo::Contains;
        let region = index.region(RegionId(1)).unwrap();
        assert!(region.boundary.contains(&hh.position));
    }

    #[test]
    fn test_remove_unplaced_household_fails() {
        let config = ModelConfig::default();
        let mut index = build_index(1, 1, &config);
        let mut hh = household(0, 0.5);
        assert!(matches!(
            index.remove_household(&mut hh),
            Err(ModelError::NotPlaced(HouseholdId(0)))
        ));
    }

    #[test]
    fn test_relocate_moves_membership_atomically() {
        let config = ModelConfig::default();
        let mut index = build_index(2, 1, &config);
        let mut sampler = RejectionSampler::seeded(1);
        let mut hh = household(0, 0.4);

        index
            .place_household(&mut hh, RegionId(0), &mut sampler)
            .unwrap();
        index.relocate(&mut hh, RegionId(1), &mut sampler).unwrap();

        assert_eq!(hh.region, Some(RegionId(1)));
        assert_eq!(index.region(RegionId(0)).unwrap().resident_count(), 0);
        assert_eq!(index.region(RegionId(1)).unwrap().resident_count(), 1);
        assert_eq!(index.population(), 1);
    }

    #[test]
    fn test_relocate_to_unknown_region_leaves_household_placed() {
        let config = ModelConfig::default();
        let mut index = build_index(2, 1, &config);
        let mut sampler = RejectionSampler::seeded(1);
        let mut hh = household(0, 0.4);

        index
            .place_household(&mut hh, RegionId(0), &mut sampler)
            .unwrap();
        let result = index.relocate(&mut hh, RegionId(42), &mut sampler);
        assert!(result.is_err());
        assert_eq!(hh.region, Some(RegionId(0)));
        assert_eq!(index.region(RegionId(0)).unwrap().resident_count(), 1);
    }

    #[test]
    fn test_rent_is_zero_with_no_residents_anywhere() {
        let config = ModelConfig::default();
        let index = build_index(3, 3, &config);
        for &id in index.region_ids() {
            assert_eq!(index.rent_of(id, &config).unwrap(), 0.0);
            assert_eq!(index.average_neighborhood_income(id).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_rent_aggregates_over_self_and_neighbors() {
        let config = ModelConfig {
            base_rent_coefficient: 1000.0,
            ..ModelConfig::default()
        };
        // 2x1 grid: the two squares are mutual neighbors
        let mut index = build_index(2, 1, &config);
        let mut sampler = RejectionSampler::seeded(1);

        let mut a = household(0, 0.2);
        let mut b = household(1, 0.6);
        index.place_household(&mut a, RegionId(0), &mut sampler).unwrap();
        index.place_household(&mut b, RegionId(1), &mut sampler).unwrap();

        // Both regions see the same neighborhood: mean income 0.4
        assert!((index.rent_of(RegionId(0), &config).unwrap() - 400.0).abs() < 1e-9);
        assert!((index.rent_of(RegionId(1), &config).unwrap() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_regulated_rent_is_discounted() {
        let config = ModelConfig {
            base_rent_coefficient: 1000.0,
            rent_discount: 0.3,
            ..ModelConfig::default()
        };
        let mut index = SpatialIndex::new();
        index
            .add_region(Region::new(
                RegionId(0),
                crate::space::geometry::square(0.0, 0.0, 1.0),
                vec![],
                true,
                &config,
            ))
            .unwrap();

        let mut sampler = RejectionSampler::seeded(1);
        let mut hh = household(0, 0.5);
        index.place_household(&mut hh, RegionId(0), &mut sampler).unwrap();

        // 1000 * 0.5 * (1 - 0.3)
        assert!((index.rent_of(RegionId(0), &config).unwrap() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_region_id_deterministic_per_seed() {
        use rand::SeedableRng;
        let config = ModelConfig::default();
        let index = build_index(4, 4, &config);

        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(
                index.random_region_id(&mut rng_a),
                index.random_region_id(&mut rng_b)
            );
        }
    }

    #[test]
    fn test_regions_satisfying_filters_on_quality_and_rent() {
        let config = ModelConfig::default();
        let mut index = build_index(2, 1, &config);

        // Decay one region below quality 60 but not past the renovation
        // threshold (4 steps at k = 0.15 gives ~54.88)
        for _ in 0..4 {
            index.region_mut(RegionId(0)).unwrap().step(&config);
        }

        let fits = index.regions_satisfying(&config, |quality, rent| {
            quality >= 60.0 && rent <= 400.0
        });
        assert_eq!(fits, vec![RegionId(1)]);
    }
}
