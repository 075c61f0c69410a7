#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that prices worm actions and tracks point budgets.
//!
//! Every worm derives both its action-point and hit-point maxima from its
//! mass. Movement is priced by direction, turning by angle, and the world
//! consults a [`PointBudget`] before committing any action.

use std::f64::consts::{PI, TAU};

use worms_core::{ArithmeticError, Direction, InvalidArgument, WormsError};

/// Action points charged for a full rotation.
pub const FULL_TURN_COST: f64 = 60.0;

/// Multiplier applied to the vertical component of a movement step.
pub const VERTICAL_MOVE_WEIGHT: f64 = 4.0;

/// Mass of a sphere with the given radius and density: `ρ·(4/3)·π·r³`.
#[must_use]
pub fn mass_from_radius(radius: f64, density: f64) -> f64 {
    density * (4.0 / 3.0) * PI * radius.powi(3)
}

/// Point budget derived from a mass, rounded to the nearest whole point.
///
/// Masses beyond the `u32` range saturate at `u32::MAX`.
#[must_use]
pub fn points_from_mass(mass: f64) -> u32 {
    let rounded = mass.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Cost of moving `steps` unit steps along `direction`:
/// `ceil(n·(|cos θ| + 4·|sin θ|))`.
pub fn movement_cost(steps: u32, direction: Direction) -> Result<u32, WormsError> {
    let (cos, sin) = direction.unit_vector();
    let per_step = cos.abs() + VERTICAL_MOVE_WEIGHT * sin.abs();
    whole_points(f64::from(steps) * per_step)
}

/// Cost of turning by `angle` radians: `ceil(|60·Δ / 2π|)`.
pub fn turn_cost(angle: f64) -> Result<u32, WormsError> {
    if !angle.is_finite() {
        return Err(InvalidArgument::NonFiniteAngle.into());
    }
    whole_points((FULL_TURN_COST * angle / TAU).abs())
}

/// Rounds a non-negative raw cost up to whole action points.
fn whole_points(raw: f64) -> Result<u32, WormsError> {
    let rounded = raw.ceil();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(u32::MAX) {
        return Err(ArithmeticError::CostOverflow.into());
    }
    Ok(rounded as u32)
}

/// Current and maximum value of a depletable resource.
///
/// The current value always lies in `[0, maximum]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointBudget {
    current: u32,
    maximum: u32,
}

impl PointBudget {
    /// Creates a budget filled to its maximum.
    #[must_use]
    pub const fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Creates a full budget sized from a mass.
    #[must_use]
    pub fn for_mass(mass: f64) -> Self {
        Self::full(points_from_mass(mass))
    }

    /// Points currently available.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Upper bound of the budget.
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Reports whether no points remain.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Sets the current points, saturating into `[0, maximum]`.
    pub fn set_current(&mut self, points: i64) {
        let clamped = points.clamp(0, i64::from(self.maximum));
        self.current = u32::try_from(clamped).unwrap_or(self.maximum);
    }

    /// Replaces the maximum, lowering the current points if they now exceed it.
    pub fn set_maximum(&mut self, maximum: u32) {
        self.maximum = maximum;
        self.current = self.current.min(maximum);
    }

    /// Refills the budget to its maximum.
    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    /// Removes `cost` points, stopping at zero.
    pub fn spend(&mut self, cost: u32) {
        self.current = self.current.saturating_sub(cost);
    }

    /// Empties the budget.
    pub fn deplete(&mut self) {
        self.current = 0;
    }

    /// Movement affordability: the budget must strictly exceed the cost.
    #[must_use]
    pub const fn can_afford_move(&self, cost: u32) -> bool {
        self.current > cost
    }

    /// Turn and fire affordability: the budget must cover the cost.
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }
}
