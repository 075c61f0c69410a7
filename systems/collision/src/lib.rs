#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that answers disc-versus-terrain questions against a raster.
//!
//! Terrain is an arbitrary raster without a distance field, so every
//! predicate densely samples a polar grid of angles and radii around the disc
//! center and tests each sample's pixel. Sampling density bounds the error to
//! a fraction of the radius; callers must not depend on the exact density.

use std::f64::consts::TAU;

use worms_core::{Position, TerrainGrid};

/// Fraction of the radius probed around the center or beyond the rim.
const PROBE_BAND_FRACTION: f64 = 0.1;

/// Angular and radial resolution of a sampling sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SamplingPattern {
    angular_steps: u32,
    radial_steps: u32,
}

/// One-degree sweep with 100 radial substeps, used for the containment checks.
const CONTAINMENT_PATTERN: SamplingPattern = SamplingPattern {
    angular_steps: 360,
    radial_steps: 100,
};

/// Two-degree sweep with 10 radial substeps, used for the adjacency check.
const ADJACENCY_PATTERN: SamplingPattern = SamplingPattern {
    angular_steps: 180,
    radial_steps: 10,
};

/// Read-only collision queries backed by a borrowed terrain raster.
#[derive(Clone, Copy, Debug)]
pub struct CollisionOracle<'grid> {
    terrain: &'grid TerrainGrid,
}

impl<'grid> CollisionOracle<'grid> {
    /// Creates an oracle that samples the provided terrain.
    #[must_use]
    pub const fn new(terrain: &'grid TerrainGrid) -> Self {
        Self { terrain }
    }

    /// Terrain backing the oracle.
    #[must_use]
    pub const fn terrain(&self) -> &'grid TerrainGrid {
        self.terrain
    }

    /// Reports whether every sample within `0.1·radius` of the center is passable.
    ///
    /// Samples outside the world count as impassable.
    #[must_use]
    pub fn is_fully_passable(&self, center: Position, radius: f64) -> bool {
        let band = PROBE_BAND_FRACTION * radius;
        !samples(center, 0.0, band, CONTAINMENT_PATTERN)
            .any(|sample| !self.is_passable_sample(sample))
    }

    /// Reports whether every sample within `0.1·radius` of the center is impassable.
    ///
    /// Mixed terrain makes both this and [`Self::is_fully_passable`] false.
    #[must_use]
    pub fn is_fully_impassable(&self, center: Position, radius: f64) -> bool {
        let band = PROBE_BAND_FRACTION * radius;
        !samples(center, 0.0, band, CONTAINMENT_PATTERN)
            .any(|sample| self.is_passable_sample(sample))
    }

    /// Reports whether a disc resting at `center` touches impassable terrain.
    ///
    /// The center must sit on passable terrain; the annulus
    /// `[radius, 1.1·radius]` around it must then contain at least one
    /// impassable sample.
    #[must_use]
    pub fn is_adjacent_to_impassable_terrain(&self, center: Position, radius: f64) -> bool {
        if !self.terrain.is_passable_position(center) {
            return false;
        }

        let band = PROBE_BAND_FRACTION * radius;
        samples(center, radius, band, ADJACENCY_PATTERN)
            .any(|sample| !self.is_passable_sample(sample))
    }

    fn is_passable_sample(&self, sample: Option<Position>) -> bool {
        sample.is_some_and(|position| self.terrain.is_passable_position(position))
    }
}

/// Cartesian samples on the annulus `[inner, inner + band]` around `center`.
///
/// A sample whose coordinates overflow to a non-finite value yields `None`.
fn samples(
    center: Position,
    inner: f64,
    band: f64,
    pattern: SamplingPattern,
) -> impl Iterator<Item = Option<Position>> {
    let angle_step = TAU / f64::from(pattern.angular_steps);
    let radial_step = band / f64::from(pattern.radial_steps);

    (0..pattern.angular_steps).flat_map(move |angle_index| {
        let (sin, cos) = (f64::from(angle_index) * angle_step).sin_cos();
        (0..=pattern.radial_steps).map(move |radial_index| {
            let distance = inner + f64::from(radial_index) * radial_step;
            Position::new(center.x() + distance * cos, center.y() + distance * sin).ok()
        })
    })
}
