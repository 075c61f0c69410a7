//! Worm state, validation and the actions a worm performs on itself.

use worms_core::{
    Direction, InvalidArgument, InvalidState, Position, WeaponKind, WorldId, WormId, WormsError,
    JUMP_FORCE_PER_ACTION_POINT, MINIMUM_WORM_RADIUS, WORM_DENSITY,
};
use worms_system_economy::{
    mass_from_radius, movement_cost, points_from_mass, turn_cost, PointBudget,
};
use worms_system_kinematics::{Ballistic, BallisticBody, LandingRule, Trajectory};

use crate::projectile::Projectile;

/// Characters permitted after the first letter besides letters and digits.
const NAME_SYMBOLS: [char; 3] = ['\'', '"', ' '];

/// Reports whether `name` is acceptable for a worm.
///
/// A name holds at least two characters, starts with an uppercase letter and
/// continues with letters, digits, quotes or spaces.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut characters = name.chars();
    let Some(first) = characters.next() else {
        return false;
    };
    if !first.is_uppercase() || name.chars().count() < 2 {
        return false;
    }

    characters.all(|character| character.is_alphanumeric() || NAME_SYMBOLS.contains(&character))
}

/// Reports whether `radius` is finite and no smaller than the worm minimum.
#[must_use]
pub fn is_valid_radius(radius: f64) -> bool {
    radius.is_finite() && radius >= MINIMUM_WORM_RADIUS
}

/// Result of a committed movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Movement {
    /// Position before the first step.
    pub from: Position,
    /// Position after the last step.
    pub to: Position,
    /// Action points charged for the batch.
    pub cost: u32,
}

/// World and identifier a worm is registered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Membership {
    pub(crate) world: WorldId,
    pub(crate) worm: WormId,
}

/// Circular, named combatant with mass-derived point budgets.
#[derive(Clone, Debug, PartialEq)]
pub struct Worm {
    name: String,
    position: Position,
    direction: Direction,
    radius: f64,
    action_points: PointBudget,
    hit_points: PointBudget,
    weapons: Vec<WeaponKind>,
    selected: usize,
    membership: Option<Membership>,
    terminated: bool,
}

impl Worm {
    /// Creates a worm with full budgets and the starting weapon inventory.
    ///
    /// Every argument is validated before the worm exists.
    pub fn new(
        x: f64,
        y: f64,
        direction: f64,
        radius: f64,
        name: &str,
    ) -> Result<Self, WormsError> {
        let position = Position::new(x, y)?;
        let direction = Direction::new(direction)?;
        validate_radius(radius)?;
        if !is_valid_name(name) {
            return Err(InvalidArgument::InvalidName.into());
        }

        let mass = mass_from_radius(radius, WORM_DENSITY);
        Ok(Self {
            name: name.to_owned(),
            position,
            direction,
            radius,
            action_points: PointBudget::for_mass(mass),
            hit_points: PointBudget::for_mass(mass),
            weapons: WeaponKind::STARTING_INVENTORY.to_vec(),
            selected: 0,
            membership: None,
            terminated: false,
        })
    }

    /// Name of the worm.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the name after validating it.
    pub fn rename(&mut self, name: &str) -> Result<(), WormsError> {
        if !is_valid_name(name) {
            return Err(InvalidArgument::InvalidName.into());
        }
        self.name = name.to_owned();
        Ok(())
    }

    /// Copy of the current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current facing.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Radius of the worm's disc.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Smallest radius any worm may have.
    #[must_use]
    pub const fn minimum_radius() -> f64 {
        MINIMUM_WORM_RADIUS
    }

    /// Changes the radius, recomputing mass and shrinking budgets that no
    /// longer fit.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), WormsError> {
        validate_radius(radius)?;

        self.radius = radius;
        let maximum = points_from_mass(self.mass());
        self.action_points.set_maximum(maximum);
        self.hit_points.set_maximum(maximum);
        Ok(())
    }

    /// Mass derived from the radius and worm density.
    #[must_use]
    pub fn mass(&self) -> f64 {
        mass_from_radius(self.radius, WORM_DENSITY)
    }

    /// Action points currently available.
    #[must_use]
    pub const fn action_points(&self) -> u32 {
        self.action_points.current()
    }

    /// Upper bound on action points.
    #[must_use]
    pub const fn max_action_points(&self) -> u32 {
        self.action_points.maximum()
    }

    /// Sets the current action points, saturating into `[0, max]`.
    pub fn set_action_points(&mut self, points: i64) {
        self.action_points.set_current(points);
    }

    /// Hit points currently remaining.
    #[must_use]
    pub const fn hit_points(&self) -> u32 {
        self.hit_points.current()
    }

    /// Upper bound on hit points.
    #[must_use]
    pub const fn max_hit_points(&self) -> u32 {
        self.hit_points.maximum()
    }

    /// Sets the current hit points, saturating into `[0, max]`.
    pub fn set_hit_points(&mut self, points: i64) {
        self.hit_points.set_current(points);
    }

    /// Weapons carried, in selection order.
    #[must_use]
    pub fn weapons(&self) -> &[WeaponKind] {
        &self.weapons
    }

    /// Weapon currently in hand, if the worm carries any.
    #[must_use]
    pub fn current_weapon(&self) -> Option<WeaponKind> {
        self.weapons.get(self.selected).copied()
    }

    /// Cycles to the next weapon, wrapping after the last one.
    pub fn select_next_weapon(&mut self) -> Result<WeaponKind, WormsError> {
        self.ensure_active()?;
        if self.weapons.is_empty() {
            return Err(InvalidState::NoWeapon.into());
        }

        self.selected = (self.selected + 1) % self.weapons.len();
        self.current_weapon()
            .ok_or_else(|| InvalidState::NoWeapon.into())
    }

    /// World the worm belongs to, if any.
    #[must_use]
    pub fn world(&self) -> Option<WorldId> {
        self.membership.map(|membership| membership.world)
    }

    /// Identifier assigned by the owning world, if any.
    #[must_use]
    pub fn id(&self) -> Option<WormId> {
        self.membership.map(|membership| membership.worm)
    }

    /// Reports whether the worm has been terminated.
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Detaches the worm, drops its weapons and marks it terminated.
    ///
    /// Terminating twice has no further effect.
    pub fn terminate(&mut self) {
        self.membership = None;
        self.weapons.clear();
        self.selected = 0;
        self.terminated = true;
    }

    /// Reports whether the worm can afford `steps` steps along its facing.
    #[must_use]
    pub fn can_move(&self, steps: u32) -> bool {
        if self.terminated || steps == 0 {
            return false;
        }
        movement_cost(steps, self.direction)
            .map_or(false, |cost| self.action_points.can_afford_move(cost))
    }

    /// Moves `steps` radius-sized steps along the facing, charging the cost once.
    pub fn move_steps(&mut self, steps: u32) -> Result<Movement, WormsError> {
        self.ensure_active()?;
        let cost = movement_cost(steps, self.direction)?;
        if steps == 0 || !self.action_points.can_afford_move(cost) {
            return Err(InvalidState::CannotMove.into());
        }

        let from = self.position;
        let mut to = from;
        for _ in 0..steps {
            to = to.along(self.direction, self.radius)?;
        }

        self.position = to;
        self.action_points.spend(cost);
        Ok(Movement { from, to, cost })
    }

    /// Reports whether the worm can afford to turn by `angle`.
    #[must_use]
    pub fn can_turn(&self, angle: f64) -> bool {
        !self.terminated
            && turn_cost(angle).map_or(false, |cost| self.action_points.can_afford(cost))
    }

    /// Rotates the facing by `angle` and returns the points charged.
    pub fn turn(&mut self, angle: f64) -> Result<u32, WormsError> {
        self.ensure_active()?;
        let cost = turn_cost(angle)?;
        if !self.action_points.can_afford(cost) {
            return Err(InvalidState::CannotTurn.into());
        }

        self.direction = self.direction.turned_by(angle)?;
        self.action_points.spend(cost);
        Ok(cost)
    }

    /// Reports whether the worm faces upward and has action points left.
    #[must_use]
    pub fn can_jump(&self) -> bool {
        !self.terminated && self.direction.is_upward() && !self.action_points.is_empty()
    }

    /// Force pushing the worm off the ground: `5·AP + m·g`.
    #[must_use]
    pub fn jump_force(&self, gravity: f64) -> f64 {
        JUMP_FORCE_PER_ACTION_POINT * f64::from(self.action_points.current())
            + self.mass() * gravity
    }

    /// Position the worm would occupy `t` time units into a jump.
    pub fn jump_step(&self, t: f64, gravity: f64) -> Result<Position, WormsError> {
        self.ensure_can_jump()?;
        Trajectory::new(self.ballistic_body(gravity)?, gravity)?.position_at(t)
    }

    /// Flat-ground estimate of the jump distance.
    pub fn jump_distance(&self, gravity: f64) -> Result<f64, WormsError> {
        self.ensure_can_jump()?;
        Ok(Trajectory::new(self.ballistic_body(gravity)?, gravity)?.range())
    }

    /// Reports whether the current weapon can be fired right now.
    #[must_use]
    pub fn can_fire(&self) -> bool {
        !self.terminated
            && self
                .current_weapon()
                .is_some_and(|weapon| self.action_points.can_afford(weapon.action_point_cost()))
    }

    /// Projectile the current weapon would launch with `propulsion`.
    pub fn load_projectile(&self, propulsion: u32) -> Result<Projectile, WormsError> {
        self.ensure_active()?;
        let weapon = self.current_weapon().ok_or(InvalidState::NoWeapon)?;
        let profile = weapon.projectile_profile(propulsion)?;
        if !self.action_points.can_afford(profile.action_point_cost) {
            return Err(InvalidState::CannotFire.into());
        }
        Ok(Projectile::new(self.position, self.direction, profile))
    }

    pub(crate) fn ensure_can_jump(&self) -> Result<(), WormsError> {
        self.ensure_active()?;
        if !self.can_jump() {
            return Err(InvalidState::CannotJump.into());
        }
        Ok(())
    }

    pub(crate) fn land_at(&mut self, position: Position) {
        self.position = position;
        self.action_points.deplete();
    }

    pub(crate) fn charge(&mut self, cost: u32) {
        self.action_points.spend(cost);
    }

    pub(crate) fn place_at(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn join(&mut self, world: WorldId, worm: WormId) {
        self.membership = Some(Membership { world, worm });
    }

    fn ensure_active(&self) -> Result<(), WormsError> {
        if self.terminated {
            return Err(InvalidState::Terminated.into());
        }
        Ok(())
    }
}

impl Ballistic for Worm {
    fn ballistic_body(&self, gravity: f64) -> Result<BallisticBody, WormsError> {
        BallisticBody::new(
            self.position,
            self.direction,
            self.mass(),
            self.jump_force(gravity),
        )
    }

    fn body_radius(&self) -> f64 {
        self.radius
    }

    fn landing_rule(&self) -> LandingRule {
        LandingRule::AdjacentAwayFromLaunch
    }
}

fn validate_radius(radius: f64) -> Result<(), WormsError> {
    if !radius.is_finite() {
        return Err(InvalidArgument::NonFiniteRadius.into());
    }
    if radius < MINIMUM_WORM_RADIUS {
        return Err(InvalidArgument::RadiusBelowMinimum.into());
    }
    Ok(())
}
