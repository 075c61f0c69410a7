//! Rejection sampling of spawn sites next to impassable terrain.

use log::{debug, trace};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use worms_core::{Position, TerrainGrid};
use worms_system_collision::CollisionOracle;

/// Factor applied to the radius to keep candidates away from the world edge.
const EDGE_MARGIN_FACTOR: f64 = 1.01;

/// Draws uniform candidates until one is adjacent to impassable terrain.
///
/// Returns `None` when the disc cannot fit inside the world at all or when
/// `max_attempts` candidates were rejected.
pub(crate) fn find_site(
    terrain: &TerrainGrid,
    radius: f64,
    rng: &mut ChaCha8Rng,
    max_attempts: u32,
) -> Option<Position> {
    let margin = EDGE_MARGIN_FACTOR * radius;
    let span_x = terrain.width() - 2.0 * margin;
    let span_y = terrain.height() - 2.0 * margin;
    if !(span_x >= 0.0 && span_y >= 0.0) {
        debug!("radius {radius} cannot fit inside the world");
        return None;
    }

    let oracle = CollisionOracle::new(terrain);
    for attempt in 0..max_attempts {
        let x = rng.gen::<f64>() * span_x + margin;
        let y = rng.gen::<f64>() * span_y + margin;
        let Ok(candidate) = Position::new(x, y) else {
            continue;
        };

        if oracle.is_adjacent_to_impassable_terrain(candidate, radius) {
            trace!("placement accepted after {} attempts", attempt + 1);
            return Some(candidate);
        }
    }

    debug!("placement gave up after {max_attempts} attempts");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn floor_world() -> TerrainGrid {
        let raster = (0..20)
            .map(|row| vec![row >= 5; 20])
            .collect::<Vec<_>>();
        TerrainGrid::new(20.0, 20.0, raster).expect("valid grid")
    }

    #[test]
    fn sites_touch_terrain_and_respect_the_margin() {
        let terrain = floor_world();
        let oracle = CollisionOracle::new(&terrain);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..5 {
            let site = find_site(&terrain, 1.0, &mut rng, 100_000).expect("site");
            assert!(oracle.is_adjacent_to_impassable_terrain(site, 1.0));
            assert!(terrain.fits_in_world(site, 1.0));
        }
    }

    #[test]
    fn same_seed_yields_same_site() {
        let terrain = floor_world();
        let first = find_site(&terrain, 1.0, &mut ChaCha8Rng::seed_from_u64(3), 100_000);
        let second = find_site(&terrain, 1.0, &mut ChaCha8Rng::seed_from_u64(3), 100_000);
        assert_eq!(first, second);
    }

    #[test]
    fn oversized_discs_are_rejected_without_sampling() {
        let terrain = floor_world();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(find_site(&terrain, 15.0, &mut rng, 100_000), None);
    }

    #[test]
    fn zero_attempts_never_place() {
        let terrain = floor_world();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(find_site(&terrain, 1.0, &mut rng, 0), None);
    }
}
