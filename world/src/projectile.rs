//! Projectiles launched by worm weapons.

use worms_core::{Direction, Position, ProjectileProfile, WeaponKind, WormsError};
use worms_system_kinematics::{Ballistic, BallisticBody, LandingRule};

/// Projectile loaded into a weapon and aimed along the firing worm's facing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    origin: Position,
    direction: Direction,
    profile: ProjectileProfile,
}

impl Projectile {
    pub(crate) const fn new(
        origin: Position,
        direction: Direction,
        profile: ProjectileProfile,
    ) -> Self {
        Self {
            origin,
            direction,
            profile,
        }
    }

    /// Launch position.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Launch direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Weapon that loaded the projectile.
    #[must_use]
    pub const fn weapon(&self) -> WeaponKind {
        self.profile.weapon
    }

    /// Mass, force, cost and damage of the projectile.
    #[must_use]
    pub const fn profile(&self) -> &ProjectileProfile {
        &self.profile
    }
}

impl Ballistic for Projectile {
    fn ballistic_body(&self, _gravity: f64) -> Result<BallisticBody, WormsError> {
        BallisticBody::new(
            self.origin,
            self.direction,
            self.profile.mass,
            self.profile.force,
        )
    }

    fn body_radius(&self) -> f64 {
        self.profile.radius()
    }

    fn landing_rule(&self) -> LandingRule {
        LandingRule::Adjacent
    }
}
