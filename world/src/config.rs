//! Tunables that shape a world's physics and placement.

use worms_core::{InvalidArgument, WormsError, GRAVITATIONAL_CONSTANT};
use worms_system_kinematics::DEFAULT_MAX_LANDING_STEPS;

/// Seed used when no placement seed is configured.
pub const DEFAULT_PLACEMENT_SEED: u64 = 0x5eed_f00d_a711_e5e5;

/// Rejection-sampling attempts allowed before placement gives up.
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: u32 = 100_000;

/// Configuration consumed by [`crate::World::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Downward acceleration applied to jumps and projectiles.
    pub gravity: f64,
    /// Seed of the random source that places new worms.
    pub placement_seed: u64,
    /// Placement attempts before [`worms_core::InvalidState::NoPlacementSite`].
    pub max_placement_attempts: u32,
    /// Samples a landing search evaluates before giving up.
    pub max_landing_steps: u32,
}

impl WorldConfig {
    /// Returns a copy with the provided placement seed.
    #[must_use]
    pub const fn with_seed(mut self, placement_seed: u64) -> Self {
        self.placement_seed = placement_seed;
        self
    }

    /// Returns a copy with the provided gravity.
    #[must_use]
    pub const fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), WormsError> {
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(InvalidArgument::InvalidGravity.into());
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITATIONAL_CONSTANT,
            placement_seed: DEFAULT_PLACEMENT_SEED,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
            max_landing_steps: DEFAULT_MAX_LANDING_STEPS,
        }
    }
}
