//! Geometry collaborator: point sampling and adjacency derivation
//!
//! The simulation core treats region boundaries as opaque; the only
//! geometric capabilities it uses are "give me a uniform interior point"
//! and "which regions touch which". Both live here, behind a trait seam
//! for the sampler so a real geographic provider can be substituted.

use geo::{BoundingRect, Centroid, Contains, Intersects};
use geo_types::{LineString, Point, Polygon};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ahash::AHashMap;

use crate::core::types::RegionId;

/// Uniform-in-polygon point sampling
pub trait PointSampler {
    fn sample_point(&mut self, boundary: &Polygon<f64>) -> Point<f64>;
}

/// Rejection sampler: draw from the bounding rect until the point lands
/// inside the polygon
pub struct RejectionSampler {
    rng: ChaCha8Rng,
}

/// Bound on rejection attempts for degenerate (near-zero-area) polygons
const MAX_REJECTION_ATTEMPTS: u32 = 1000;

impl RejectionSampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PointSampler for RejectionSampler {
    fn sample_point(&mut self, boundary: &Polygon<f64>) -> Point<f64> {
        let Some(rect) = boundary.bounding_rect() else {
            return Point::new(0.0, 0.0);
        };

        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let candidate = Point::new(
                self.rng.gen_range(rect.min().x..=rect.max().x),
                self.rng.gen_range(rect.min().y..=rect.max().y),
            );
            if boundary.contains(&candidate) {
                return candidate;
            }
        }

        // Sliver polygons can defeat rejection sampling
        boundary
            .centroid()
            .unwrap_or_else(|| Point::new(rect.min().x, rect.min().y))
    }
}

/// Derive the neighbor-adjacency relation from region boundaries.
///
/// Two regions are adjacent when their polygons intersect, which includes
/// shared edges and shared corners. Self is never in its own neighbor set.
pub fn derive_adjacency(
    regions: &[(RegionId, &Polygon<f64>)],
) -> AHashMap<RegionId, Vec<RegionId>> {
    let mut adjacency: AHashMap<RegionId, Vec<RegionId>> = regions
        .iter()
        .map(|(id, _)| (*id, Vec::new()))
        .collect();

    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            let (id_a, poly_a) = &regions[i];
            let (id_b, poly_b) = &regions[j];
            if poly_a.intersects(*poly_b) {
                let (id_a, id_b) = (*id_a, *id_b);
                adjacency.entry(id_a).or_default().push(id_b);
                adjacency.entry(id_b).or_default().push(id_a);
            }
        }
    }

    adjacency
}

/// Axis-aligned square polygon with its lower-left corner at (x, y)
pub fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x, y),
            (x + size, y),
            (x + size, y + size),
            (x, y + size),
            (x, y),
        ]),
        vec![],
    )
}

/// Synthetic world: a width x height grid of unit squares, ids row-major
pub fn grid_of_squares(width: u32, height: u32) -> Vec<(RegionId, Polygon<f64>)> {
    let mut regions = Vec::with_capacity((width * height) as usize);
    for row in 0..height {
        for col in 0..width {
            let id = RegionId(row * width + col);
            regions.push((id, square(col as f64, row as f64, 1.0)));
        }
    }
    regions
}
