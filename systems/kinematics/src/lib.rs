#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Closed-form ballistic motion shared by worms and projectiles.
//!
//! A [`BallisticBody`] captures the launch state of any circular entity. The
//! [`Trajectory`] evaluates its position at an elapsed time under gravity and
//! the [`LandingSearch`] steps forward along it until the collision oracle
//! accepts a landing site or the body leaves the world.

use log::{trace, warn};
use worms_core::{
    ArithmeticError, Direction, InvalidArgument, InvalidState, Position, WormsError,
    IMPULSE_DURATION,
};
use worms_system_collision::CollisionOracle;

/// Default cap on the number of samples a landing search may evaluate.
pub const DEFAULT_MAX_LANDING_STEPS: u32 = 250_000;

/// Capability shared by every entity that can be launched.
pub trait Ballistic {
    /// Launch state of the entity at its current position under `gravity`.
    fn ballistic_body(&self, gravity: f64) -> Result<BallisticBody, WormsError>;

    /// Radius used for landing and world-bounds checks.
    fn body_radius(&self) -> f64;

    /// Criterion that decides when the entity has landed.
    fn landing_rule(&self) -> LandingRule;
}

/// Launch state of a circular body: where it starts, where it faces, how
/// heavy it is and how hard it is pushed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallisticBody {
    origin: Position,
    direction: Direction,
    mass: f64,
    force: f64,
}

impl BallisticBody {
    /// Creates a body, rejecting non-positive masses and non-finite forces.
    pub fn new(
        origin: Position,
        direction: Direction,
        mass: f64,
        force: f64,
    ) -> Result<Self, WormsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(InvalidArgument::InvalidMass.into());
        }
        if !force.is_finite() {
            return Err(InvalidArgument::NonFiniteForce.into());
        }

        Ok(Self {
            origin,
            direction,
            mass,
            force,
        })
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

    /// Mass of the body.
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Force applied over the impulse duration.
    #[must_use]
    pub const fn force(&self) -> f64 {
        self.force
    }

    /// Speed at launch: `(F / m) · IMPULSE_DURATION`.
    #[must_use]
    pub fn initial_speed(&self) -> f64 {
        self.force / self.mass * IMPULSE_DURATION
    }

    /// Horizontal launch velocity `v·cos θ`.
    #[must_use]
    pub fn horizontal_velocity(&self) -> f64 {
        self.initial_speed() * self.direction.radians().cos()
    }

    /// Vertical launch velocity `v·sin θ`.
    #[must_use]
    pub fn vertical_velocity(&self) -> f64 {
        self.initial_speed() * self.direction.radians().sin()
    }
}

/// Projectile motion of a body under constant gravity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trajectory {
    body: BallisticBody,
    gravity: f64,
}

impl Trajectory {
    /// Creates a trajectory, rejecting gravity that is not positive and finite.
    pub fn new(body: BallisticBody, gravity: f64) -> Result<Self, WormsError> {
        if !(gravity.is_finite() && gravity > 0.0) {
            return Err(InvalidArgument::InvalidGravity.into());
        }
        Ok(Self { body, gravity })
    }

    /// Body following the trajectory.
    #[must_use]
    pub const fn body(&self) -> &BallisticBody {
        &self.body
    }

    /// Gravitational acceleration applied to the body.
    #[must_use]
    pub const fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Position after `t` time units:
    /// `x0 + vx·t`, `y0 + vy·t − ½·g·t²`.
    pub fn position_at(&self, t: f64) -> Result<Position, WormsError> {
        if !t.is_finite() {
            return Err(ArithmeticError::NonFiniteTime.into());
        }

        let origin = self.body.origin();
        Position::new(
            origin.x() + self.body.horizontal_velocity() * t,
            origin.y() + self.body.vertical_velocity() * t - 0.5 * self.gravity * t * t,
        )
    }

    /// Horizontal distance covered before returning to launch height,
    /// `v²·sin(2θ) / g`.
    #[must_use]
    pub fn range(&self) -> f64 {
        let speed = self.body.initial_speed();
        speed * speed * (2.0 * self.body.direction().radians()).sin() / self.gravity
    }
}

/// Criterion that decides whether a sampled point is a landing site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandingRule {
    /// Any passable point adjacent to impassable terrain.
    Adjacent,
    /// An adjacent point at least one radius away from the launch point.
    AdjacentAwayFromLaunch,
}

impl LandingRule {
    fn accepts(
        self,
        oracle: &CollisionOracle<'_>,
        launch: Position,
        candidate: Position,
        radius: f64,
    ) -> bool {
        match self {
            Self::Adjacent => oracle.is_adjacent_to_impassable_terrain(candidate, radius),
            Self::AdjacentAwayFromLaunch => {
                candidate.distance_to(launch) >= radius
                    && oracle.is_adjacent_to_impassable_terrain(candidate, radius)
            }
        }
    }
}

/// How a flight ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightOutcome {
    /// The landing rule accepted the final sample.
    Landed,
    /// The body no longer fit inside the world at the final sample.
    LeftWorld,
}

/// Result of a landing search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flight {
    /// Elapsed time of the final sample.
    pub time: f64,
    /// Position of the final sample.
    pub position: Position,
    /// Reason the search stopped.
    pub outcome: FlightOutcome,
}

/// Forward linear search for the first landing time along a trajectory.
///
/// The result depends on the time step: coarser steps overshoot farther
/// past the true landing boundary and may tunnel through thin terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandingSearch {
    time_step: f64,
    max_steps: u32,
}

impl LandingSearch {
    /// Creates a search with the provided step, which must be positive and finite.
    pub fn new(time_step: f64) -> Result<Self, WormsError> {
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(ArithmeticError::InvalidTimeStep.into());
        }
        Ok(Self {
            time_step,
            max_steps: DEFAULT_MAX_LANDING_STEPS,
        })
    }

    /// Replaces the cap on evaluated samples.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Time increment between samples.
    #[must_use]
    pub const fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Cap on evaluated samples.
    #[must_use]
    pub const fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Steps along the trajectory until `rule` accepts a sample or the disc of
    /// `radius` leaves the world.
    ///
    /// Exhausting the step cap fails with [`InvalidState::NoLandingSite`].
    pub fn run(
        &self,
        trajectory: &Trajectory,
        radius: f64,
        rule: LandingRule,
        oracle: &CollisionOracle<'_>,
    ) -> Result<Flight, WormsError> {
        let launch = trajectory.body().origin();
        let terrain = oracle.terrain();

        for step in 0..=self.max_steps {
            let time = f64::from(step) * self.time_step;
            let position = trajectory.position_at(time)?;

            if rule.accepts(oracle, launch, position, radius) {
                trace!("landing accepted after {step} steps at t={time}");
                return Ok(Flight {
                    time,
                    position,
                    outcome: FlightOutcome::Landed,
                });
            }

            if !terrain.fits_in_world(position, radius) {
                trace!("flight left the world after {step} steps at t={time}");
                return Ok(Flight {
                    time,
                    position,
                    outcome: FlightOutcome::LeftWorld,
                });
            }
        }

        warn!(
            "landing search exhausted {} steps of {} without resolving",
            self.max_steps, self.time_step
        );
        Err(InvalidState::NoLandingSite.into())
    }

    /// Runs the search for any [`Ballistic`] entity.
    pub fn run_for<B: Ballistic>(
        &self,
        entity: &B,
        gravity: f64,
        oracle: &CollisionOracle<'_>,
    ) -> Result<Flight, WormsError> {
        let trajectory = Trajectory::new(entity.ballistic_body(gravity)?, gravity)?;
        self.run(
            &trajectory,
            entity.body_radius(),
            entity.landing_rule(),
            oracle,
        )
    }
}
