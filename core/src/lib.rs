#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Worms artillery engine.
//!
//! This crate defines the value types and the message surface that connect
//! adapters, the authoritative world, and the pure systems. Adapters submit
//! [`Command`] values describing desired actions, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. The collision, kinematics, and economy systems
//! operate purely on the types defined here.

mod error;
mod terrain;

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

pub use error::{ArithmeticError, ErrorKind, InvalidArgument, InvalidState, WormsError};
pub use terrain::{PixelCoord, TerrainGrid};

/// Downward acceleration applied to every ballistic body.
pub const GRAVITATIONAL_CONSTANT: f64 = 9.08665;

/// Density used to derive a worm's mass from its radius.
pub const WORM_DENSITY: f64 = 1062.0;

/// Density used to derive a projectile's radius from its mass.
pub const PROJECTILE_DENSITY: f64 = 7800.0;

/// Time window over which a launch force acts on a body.
pub const IMPULSE_DURATION: f64 = 0.5;

/// Smallest radius a worm may have.
pub const MINIMUM_WORM_RADIUS: f64 = 0.25;

/// Jump force contributed by every remaining action point.
pub const JUMP_FORCE_PER_ACTION_POINT: f64 = 5.0;

/// Upper bound of the bazooka propulsion yield.
pub const MAX_PROPULSION: u32 = 100;

/// Angles whose magnitude exceeds this many full turns are reduced with a
/// remainder before the wrapping loop runs.
const WRAP_LOOP_LIMIT: f64 = 1.0e6;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Creates a worm and adds it to the world.
    SpawnWorm {
        /// Name assigned to the new worm.
        name: String,
        /// Radius of the new worm.
        radius: f64,
        /// Initial facing of the new worm in radians.
        direction: f64,
        /// Fixed spawn site; when absent the world picks a random site next
        /// to impassable terrain.
        #[serde(default)]
        position: Option<Position>,
    },
    /// Detaches and terminates a worm.
    RemoveWorm {
        /// Worm to remove.
        worm: WormId,
    },
    /// Moves a worm the given number of radius-sized steps along its facing.
    MoveWorm {
        /// Worm to move.
        worm: WormId,
        /// Number of unit steps.
        steps: u32,
    },
    /// Rotates a worm by the given angle.
    TurnWorm {
        /// Worm to turn.
        worm: WormId,
        /// Signed rotation in radians.
        angle: f64,
    },
    /// Launches a worm along its ballistic trajectory.
    JumpWorm {
        /// Worm to launch.
        worm: WormId,
        /// Time increment used by the landing search.
        time_step: f64,
    },
    /// Cycles a worm to the next weapon in its inventory.
    SelectNextWeapon {
        /// Worm whose weapon changes.
        worm: WormId,
    },
    /// Fires the worm's current weapon.
    FireWeapon {
        /// Worm that fires.
        worm: WormId,
        /// Bazooka yield in `0..=100`; ignored by the rifle.
        propulsion: u32,
        /// Time increment used by the landing search.
        time_step: f64,
    },
    /// Gives a worm a new name.
    RenameWorm {
        /// Worm to rename.
        worm: WormId,
        /// Replacement name.
        name: String,
    },
    /// Changes a worm's radius, recomputing its mass-derived budgets.
    ResizeWorm {
        /// Worm to resize.
        worm: WormId,
        /// Replacement radius.
        radius: f64,
    },
    /// Terminates the world and every worm inside it.
    TerminateWorld,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Confirms that a worm joined the world.
    WormSpawned {
        /// Identifier allocated to the worm.
        worm: WormId,
        /// Landing-capable site chosen for the worm.
        position: Position,
    },
    /// Confirms that a worm left the world and was terminated.
    WormRemoved {
        /// Identifier of the removed worm.
        worm: WormId,
    },
    /// Confirms that a worm moved.
    WormMoved {
        /// Worm that moved.
        worm: WormId,
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
        /// Action points charged for the whole batch of steps.
        cost: u32,
    },
    /// Confirms that a worm turned.
    WormTurned {
        /// Worm that turned.
        worm: WormId,
        /// Normalized facing after the turn.
        direction: Direction,
        /// Action points charged for the turn.
        cost: u32,
    },
    /// Confirms that a worm jumped and landed.
    WormJumped {
        /// Worm that jumped.
        worm: WormId,
        /// Launch position.
        from: Position,
        /// Landing position.
        to: Position,
        /// Elapsed flight time.
        duration: f64,
    },
    /// Confirms that a worm selected another weapon.
    WeaponSelected {
        /// Worm that changed weapons.
        worm: WormId,
        /// Weapon now in hand.
        weapon: WeaponKind,
    },
    /// Reports where a fired projectile came to rest.
    ProjectileLanded {
        /// Worm that fired.
        worm: WormId,
        /// Weapon that launched the projectile.
        weapon: WeaponKind,
        /// Resting position of the projectile.
        position: Position,
        /// Elapsed flight time.
        duration: f64,
    },
    /// Reports that a fired projectile flew out of the world.
    ProjectileLeftWorld {
        /// Worm that fired.
        worm: WormId,
        /// Weapon that launched the projectile.
        weapon: WeaponKind,
        /// Last sampled position of the projectile.
        position: Position,
        /// Elapsed flight time.
        duration: f64,
    },
    /// Confirms that a worm was renamed.
    WormRenamed {
        /// Worm that was renamed.
        worm: WormId,
        /// Name now in effect.
        name: String,
    },
    /// Confirms that a worm's radius changed.
    WormResized {
        /// Worm that was resized.
        worm: WormId,
        /// Radius now in effect.
        radius: f64,
        /// Maximum action points derived from the new mass.
        max_action_points: u32,
    },
    /// Confirms that the world was terminated.
    WorldTerminated {
        /// Worms terminated by the cascade, in identifier order.
        worms: Vec<WormId>,
    },
    /// Reports that a command was refused without touching any state.
    CommandRejected {
        /// Reason the command failed.
        reason: WormsError,
    },
}

/// Unique identifier assigned to a worm by the world that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WormId(u32);

impl WormId {
    /// Creates a new worm identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a world when it is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(u64);

impl WorldId {
    /// Creates a new world identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Point in continuous world space with finite components.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a position, rejecting NaN and infinite components.
    pub fn new(x: f64, y: f64) -> Result<Self, WormsError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(InvalidArgument::NonFiniteCoordinate.into());
        }
        Ok(Self { x, y })
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical component; grows upward, against gravity.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Position displaced by `distance` along `direction`.
    pub fn along(self, direction: Direction, distance: f64) -> Result<Self, WormsError> {
        let (dx, dy) = direction.unit_vector();
        Self::new(self.x + dx * distance, self.y + dy * distance)
    }
}

#[derive(Deserialize)]
struct RawPosition {
    x: f64,
    y: f64,
}

impl TryFrom<RawPosition> for Position {
    type Error = WormsError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::new(raw.x, raw.y)
    }
}

/// Facing of a body, normalized into `[0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Direction(f64);

impl Direction {
    /// Facing along the positive x axis.
    pub const RIGHT: Self = Self(0.0);

    /// Creates a normalized direction, rejecting NaN and infinite angles.
    pub fn new(radians: f64) -> Result<Self, WormsError> {
        if !radians.is_finite() {
            return Err(InvalidArgument::NonFiniteDirection.into());
        }
        Ok(Self(normalize_angle(radians)))
    }

    /// Angle in radians within `[0, 2π)`.
    #[must_use]
    pub const fn radians(self) -> f64 {
        self.0
    }

    /// Direction rotated by `angle` radians and renormalized.
    pub fn turned_by(self, angle: f64) -> Result<Self, WormsError> {
        if !angle.is_finite() {
            return Err(InvalidArgument::NonFiniteAngle.into());
        }
        Self::new(self.0 + angle)
    }

    /// Reports whether the direction lies on the upper half of the circle.
    #[must_use]
    pub fn is_upward(self) -> bool {
        self.0 <= PI
    }

    /// Unit vector `(cos θ, sin θ)`.
    #[must_use]
    pub fn unit_vector(self) -> (f64, f64) {
        (self.0.cos(), self.0.sin())
    }
}

impl TryFrom<f64> for Direction {
    type Error = WormsError;

    fn try_from(radians: f64) -> Result<Self, Self::Error> {
        Self::new(radians)
    }
}

impl From<Direction> for f64 {
    fn from(direction: Direction) -> Self {
        direction.0
    }
}

/// Wraps a finite angle into `[0, 2π)` by repeatedly adding or subtracting `2π`.
#[must_use]
pub fn normalize_angle(radians: f64) -> f64 {
    let mut angle = if radians.abs() > TAU * WRAP_LOOP_LIMIT {
        radians.rem_euclid(TAU)
    } else {
        radians
    };

    loop {
        if angle < 0.0 {
            angle += TAU;
        } else if angle >= TAU {
            angle -= TAU;
        } else {
            return angle;
        }
    }
}

/// Weapons a worm can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Light weapon with a fixed launch force.
    Rifle,
    /// Heavy weapon whose launch force scales with propulsion.
    Bazooka,
}

impl WeaponKind {
    /// Inventory issued to every new worm, in selection order.
    pub const STARTING_INVENTORY: [WeaponKind; 2] = [WeaponKind::Rifle, WeaponKind::Bazooka];

    /// Mass of the projectile launched by the weapon.
    #[must_use]
    pub const fn projectile_mass(self) -> f64 {
        match self {
            Self::Rifle => 0.010,
            Self::Bazooka => 0.300,
        }
    }

    /// Action points charged for firing the weapon.
    #[must_use]
    pub const fn action_point_cost(self) -> u32 {
        match self {
            Self::Rifle => 10,
            Self::Bazooka => 50,
        }
    }

    /// Hit points a projectile from this weapon removes on impact.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::Rifle => 20,
            Self::Bazooka => 80,
        }
    }

    /// Launch force for the provided propulsion yield.
    ///
    /// The rifle ignores propulsion. The bazooka yields `2.5 + 7.5·(p/100)`
    /// and rejects values above [`MAX_PROPULSION`].
    pub fn force(self, propulsion: u32) -> Result<f64, WormsError> {
        match self {
            Self::Rifle => Ok(1.5),
            Self::Bazooka => {
                if propulsion > MAX_PROPULSION {
                    return Err(InvalidArgument::InvalidPropulsion.into());
                }
                Ok(2.5 + 7.5 * (f64::from(propulsion) / 100.0))
            }
        }
    }

    /// Complete flight profile for a projectile fired with `propulsion`.
    pub fn projectile_profile(self, propulsion: u32) -> Result<ProjectileProfile, WormsError> {
        Ok(ProjectileProfile {
            weapon: self,
            mass: self.projectile_mass(),
            force: self.force(propulsion)?,
            action_point_cost: self.action_point_cost(),
            damage: self.damage(),
        })
    }
}

/// Fixed characteristics of a projectile launched by a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileProfile {
    /// Weapon that produced the projectile.
    pub weapon: WeaponKind,
    /// Mass of the projectile.
    pub mass: f64,
    /// Launch force applied over [`IMPULSE_DURATION`].
    pub force: f64,
    /// Action points charged to the firing worm.
    pub action_point_cost: u32,
    /// Hit points removed from a struck worm.
    pub damage: u32,
}

impl ProjectileProfile {
    /// Radius of a sphere of [`PROJECTILE_DENSITY`] with the profile's mass.
    #[must_use]
    pub fn radius(&self) -> f64 {
        (3.0 * self.mass / (4.0 * PI * PROJECTILE_DENSITY)).cbrt()
    }
}
