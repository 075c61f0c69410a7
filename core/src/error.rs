//! Error taxonomy shared by every crate in the workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by any engine operation.
///
/// Every variant is surfaced synchronously to the immediate caller and is
/// produced before any state is mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum WormsError {
    /// The caller supplied a value the operation can never accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    /// The arguments are acceptable but the entity cannot act right now.
    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidState),
    /// A step count, cost or time value could not be evaluated.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl WormsError {
    /// Coarse classification used by callers that only care about the taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Arithmetic(_) => ErrorKind::Arithmetic,
        }
    }
}

/// Coarse classification of a [`WormsError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Bad input that will never succeed.
    InvalidArgument,
    /// Input is fine but the action is not allowed right now.
    InvalidState,
    /// Numeric input could not be evaluated; retry with sanitized values.
    Arithmetic,
}

/// Reasons an argument is rejected outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum InvalidArgument {
    /// A coordinate was NaN or infinite.
    #[error("coordinate is not a finite number")]
    NonFiniteCoordinate,
    /// A direction was NaN or infinite.
    #[error("direction is not a finite number")]
    NonFiniteDirection,
    /// A turning angle was NaN or infinite.
    #[error("turn angle is not a finite number")]
    NonFiniteAngle,
    /// A radius was NaN or infinite.
    #[error("radius is not a finite number")]
    NonFiniteRadius,
    /// A radius fell below the minimum permitted for the entity.
    #[error("radius is below the minimum radius")]
    RadiusBelowMinimum,
    /// A worm name failed validation.
    #[error("name is not a valid worm name")]
    InvalidName,
    /// A body mass was not a positive finite number.
    #[error("mass must be a positive finite number")]
    InvalidMass,
    /// A launch force was NaN or infinite.
    #[error("force is not a finite number")]
    NonFiniteForce,
    /// A world width or height was not strictly between zero and the numeric bound.
    #[error("world dimension is out of range")]
    InvalidDimension,
    /// The terrain raster contained no rows or no columns.
    #[error("terrain raster is empty")]
    EmptyTerrain,
    /// The terrain raster rows had differing lengths.
    #[error("terrain raster rows have differing lengths")]
    RaggedTerrain,
    /// The gravitational constant was not a positive finite number.
    #[error("gravity must be a positive finite number")]
    InvalidGravity,
    /// Bazooka propulsion was outside `0..=100`.
    #[error("propulsion is outside the permitted range")]
    InvalidPropulsion,
    /// The worm already belongs to a world.
    #[error("worm already belongs to a world")]
    WormAlreadyInWorld,
    /// The worm has been terminated and cannot join a world.
    #[error("worm is terminated")]
    WormTerminated,
    /// The world has been terminated and no longer accepts worms.
    #[error("world is terminated")]
    WorldTerminated,
    /// The disc of a worm does not fit inside the world.
    #[error("worm does not fit inside the world")]
    OutsideWorld,
    /// No worm with the provided identifier lives in the world.
    #[error("worm is not a member of this world")]
    UnknownWorm,
}

/// Reasons an otherwise valid action is refused in the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum InvalidState {
    /// The worm faces downward or has no action points left.
    #[error("worm cannot jump")]
    CannotJump,
    /// The worm cannot afford the requested movement.
    #[error("worm cannot move")]
    CannotMove,
    /// The worm cannot afford the requested turn.
    #[error("worm cannot turn")]
    CannotTurn,
    /// The worm cannot afford to fire its current weapon.
    #[error("worm cannot fire its weapon")]
    CannotFire,
    /// The flight left the world before touching terrain.
    #[error("no landing site along the trajectory")]
    NoLandingSite,
    /// Rejection sampling never found a site adjacent to terrain.
    #[error("no placement site adjacent to impassable terrain")]
    NoPlacementSite,
    /// The worm is not attached to any world.
    #[error("worm is not in a world")]
    NotInWorld,
    /// The worm carries no weapons.
    #[error("worm carries no weapons")]
    NoWeapon,
    /// The entity has been terminated.
    #[error("entity is terminated")]
    Terminated,
}

/// Reasons a numeric input could not be evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ArithmeticError {
    /// A search time step was not strictly positive and finite.
    #[error("time step must be a positive finite number")]
    InvalidTimeStep,
    /// A time value was NaN or infinite.
    #[error("time is not a finite number")]
    NonFiniteTime,
    /// A cost could not be represented as an action-point count.
    #[error("cost exceeds the representable range")]
    CostOverflow,
}
