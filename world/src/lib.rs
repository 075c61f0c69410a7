#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Worms artillery engine.
//!
//! The world owns its terrain and every worm registered in it. Adapters
//! either call the direct methods on [`World`] or submit [`Command`] values
//! through [`apply`] and observe the resulting [`Event`] values.

mod config;
mod placement;
mod projectile;
mod worm;

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use worms_core::{
    Command, Event, InvalidArgument, InvalidState, Position, TerrainGrid, WeaponKind, WorldId,
    WormId, WormsError,
};
use worms_system_collision::CollisionOracle;
use worms_system_kinematics::{Flight, FlightOutcome, LandingSearch};

pub use config::{WorldConfig, DEFAULT_MAX_PLACEMENT_ATTEMPTS, DEFAULT_PLACEMENT_SEED};
pub use projectile::Projectile;
pub use worm::{is_valid_name, is_valid_radius, Movement, Worm};

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(0);

/// Landed jump committed by [`World::jump`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jump {
    /// Position before take-off.
    pub from: Position,
    /// Resting position after landing.
    pub to: Position,
    /// Elapsed flight time.
    pub duration: f64,
}

/// Shot resolved by [`World::fire`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Projectile that was launched.
    pub projectile: Projectile,
    /// Where and how the projectile's flight ended.
    pub flight: Flight,
}

/// Rectangular world holding a terrain raster and its member worms.
#[derive(Debug)]
pub struct World {
    id: WorldId,
    terrain: TerrainGrid,
    config: WorldConfig,
    worms: BTreeMap<WormId, Worm>,
    next_worm_id: u32,
    rng: ChaCha8Rng,
    terminated: bool,
}

impl World {
    /// Creates an empty world over the provided terrain.
    pub fn new(terrain: TerrainGrid, config: WorldConfig) -> Result<Self, WormsError> {
        config.validate()?;

        let id = WorldId::new(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed));
        debug!(
            "world {} created: {}x{} over {}x{} pixels",
            id.get(),
            terrain.width(),
            terrain.height(),
            terrain.columns(),
            terrain.rows()
        );

        Ok(Self {
            id,
            terrain,
            config,
            worms: BTreeMap::new(),
            next_worm_id: 0,
            rng: ChaCha8Rng::seed_from_u64(config.placement_seed),
            terminated: false,
        })
    }

    /// Adds a worm at a random site adjacent to impassable terrain.
    pub fn add_worm(&mut self, mut worm: Worm) -> Result<WormId, WormsError> {
        self.ensure_can_admit(&worm)?;

        let site = placement::find_site(
            &self.terrain,
            worm.radius(),
            &mut self.rng,
            self.config.max_placement_attempts,
        )
        .ok_or(InvalidState::NoPlacementSite)?;

        worm.place_at(site);
        Ok(self.register(worm))
    }

    /// Adds a worm at its current position, which must keep its disc inside
    /// the world.
    pub fn insert_worm(&mut self, worm: Worm) -> Result<WormId, WormsError> {
        self.ensure_can_admit(&worm)?;
        if !self.terrain.fits_in_world(worm.position(), worm.radius()) {
            return Err(InvalidArgument::OutsideWorld.into());
        }

        Ok(self.register(worm))
    }

    /// Detaches a worm and returns it terminated.
    pub fn remove_worm(&mut self, worm: WormId) -> Result<Worm, WormsError> {
        let mut removed = self
            .worms
            .remove(&worm)
            .ok_or(InvalidArgument::UnknownWorm)?;
        removed.terminate();
        debug!("worm {} removed from world {}", worm.get(), self.id.get());
        Ok(removed)
    }

    /// Terminates every member worm and then the world itself.
    ///
    /// Returns the identifiers of the worms terminated by this call. A second
    /// call terminates nothing.
    pub fn terminate(&mut self) -> Vec<WormId> {
        let members = std::mem::take(&mut self.worms);
        let terminated: Vec<WormId> = members
            .into_iter()
            .map(|(id, mut worm)| {
                worm.terminate();
                id
            })
            .collect();

        if !self.terminated {
            debug!(
                "world {} terminated with {} worms",
                self.id.get(),
                terminated.len()
            );
        }
        self.terminated = true;
        terminated
    }

    /// Moves a worm `steps` steps along its facing.
    pub fn move_worm(&mut self, worm: WormId, steps: u32) -> Result<Movement, WormsError> {
        let movement = self.worm_mut(worm)?.move_steps(steps)?;
        debug!(
            "worm {} moved {steps} steps for {} points",
            worm.get(),
            movement.cost
        );
        Ok(movement)
    }

    /// Turns a worm by `angle` radians, returning the points charged.
    pub fn turn_worm(&mut self, worm: WormId, angle: f64) -> Result<u32, WormsError> {
        self.worm_mut(worm)?.turn(angle)
    }

    /// Time at which a jump's landing search stops, whether it lands or
    /// leaves the world.
    pub fn jump_time(&self, worm: WormId, time_step: f64) -> Result<f64, WormsError> {
        Ok(self.jump_flight(worm, time_step)?.time)
    }

    /// Position of a worm `t` time units into its jump.
    pub fn jump_step(&self, worm: WormId, t: f64) -> Result<Position, WormsError> {
        self.worm(worm)?.jump_step(t, self.config.gravity)
    }

    /// Launches a worm and commits its landing site.
    ///
    /// Action points drop to zero after the landing. A flight that leaves the
    /// world fails with [`InvalidState::NoLandingSite`] and changes nothing.
    pub fn jump(&mut self, worm: WormId, time_step: f64) -> Result<Jump, WormsError> {
        let flight = self.jump_flight(worm, time_step)?;
        if flight.outcome != FlightOutcome::Landed {
            return Err(InvalidState::NoLandingSite.into());
        }

        let jumper = self.worm_mut(worm)?;
        let from = jumper.position();
        jumper.land_at(flight.position);
        debug!(
            "worm {} jumped from ({}, {}) to ({}, {}) in {}",
            worm.get(),
            from.x(),
            from.y(),
            flight.position.x(),
            flight.position.y(),
            flight.time
        );

        Ok(Jump {
            from,
            to: flight.position,
            duration: flight.time,
        })
    }

    /// Fires the worm's current weapon and charges its cost.
    ///
    /// The projectile starts at the worm's center. The cost is charged
    /// whether the projectile lands or leaves the world.
    pub fn fire(
        &mut self,
        worm: WormId,
        propulsion: u32,
        time_step: f64,
    ) -> Result<Shot, WormsError> {
        let search = self.landing_search(time_step)?;
        let projectile = self.worm(worm)?.load_projectile(propulsion)?;
        let oracle = CollisionOracle::new(&self.terrain);
        let flight = search.run_for(&projectile, self.config.gravity, &oracle)?;

        self.worm_mut(worm)?
            .charge(projectile.profile().action_point_cost);
        debug!(
            "worm {} fired {:?}: {:?} after {}",
            worm.get(),
            projectile.weapon(),
            flight.outcome,
            flight.time
        );

        Ok(Shot { projectile, flight })
    }

    /// Cycles a worm to its next weapon.
    pub fn select_next_weapon(&mut self, worm: WormId) -> Result<WeaponKind, WormsError> {
        self.worm_mut(worm)?.select_next_weapon()
    }

    /// Renames a worm.
    pub fn rename_worm(&mut self, worm: WormId, name: &str) -> Result<(), WormsError> {
        self.worm_mut(worm)?.rename(name)
    }

    /// Changes a worm's radius and returns its new maximum action points.
    pub fn resize_worm(&mut self, worm: WormId, radius: f64) -> Result<u32, WormsError> {
        let resized = self.worm_mut(worm)?;
        resized.set_radius(radius)?;
        Ok(resized.max_action_points())
    }

    fn ensure_can_admit(&self, worm: &Worm) -> Result<(), WormsError> {
        if self.terminated {
            return Err(InvalidArgument::WorldTerminated.into());
        }
        if worm.is_terminated() {
            return Err(InvalidArgument::WormTerminated.into());
        }
        if worm.world().is_some() {
            return Err(InvalidArgument::WormAlreadyInWorld.into());
        }
        Ok(())
    }

    fn register(&mut self, mut worm: Worm) -> WormId {
        let id = WormId::new(self.next_worm_id);
        self.next_worm_id = self.next_worm_id.wrapping_add(1);

        worm.join(self.id, id);
        let position = worm.position();
        debug!(
            "worm {} '{}' joined world {} at ({}, {})",
            id.get(),
            worm.name(),
            self.id.get(),
            position.x(),
            position.y()
        );
        let _ = self.worms.insert(id, worm);
        id
    }

    fn worm(&self, worm: WormId) -> Result<&Worm, WormsError> {
        self.worms
            .get(&worm)
            .ok_or_else(|| InvalidArgument::UnknownWorm.into())
    }

    fn worm_mut(&mut self, worm: WormId) -> Result<&mut Worm, WormsError> {
        self.worms
            .get_mut(&worm)
            .ok_or_else(|| InvalidArgument::UnknownWorm.into())
    }

    fn landing_search(&self, time_step: f64) -> Result<LandingSearch, WormsError> {
        Ok(LandingSearch::new(time_step)?.with_max_steps(self.config.max_landing_steps))
    }

    fn jump_flight(&self, worm: WormId, time_step: f64) -> Result<Flight, WormsError> {
        let search = self.landing_search(time_step)?;
        let jumper = self.worm(worm)?;
        jumper.ensure_can_jump()?;

        let oracle = CollisionOracle::new(&self.terrain);
        search.run_for(jumper, self.config.gravity, &oracle)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// A rejected command leaves the world untouched and yields a single
/// [`Event::CommandRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let label = command_label(&command);
    let mut produced = Vec::new();

    match execute(world, command, &mut produced) {
        Ok(()) => out_events.append(&mut produced),
        Err(reason) => {
            warn!("{label} rejected: {reason}");
            out_events.push(Event::CommandRejected { reason });
        }
    }
}

fn execute(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WormsError> {
    match command {
        Command::SpawnWorm {
            name,
            radius,
            direction,
            position,
        } => {
            let id = match position {
                Some(site) => {
                    let worm = Worm::new(site.x(), site.y(), direction, radius, &name)?;
                    world.insert_worm(worm)?
                }
                None => world.add_worm(Worm::new(0.0, 0.0, direction, radius, &name)?)?,
            };
            let position = world.worm(id)?.position();
            out_events.push(Event::WormSpawned { worm: id, position });
        }
        Command::RemoveWorm { worm } => {
            let _ = world.remove_worm(worm)?;
            out_events.push(Event::WormRemoved { worm });
        }
        Command::MoveWorm { worm, steps } => {
            let movement = world.move_worm(worm, steps)?;
            out_events.push(Event::WormMoved {
                worm,
                from: movement.from,
                to: movement.to,
                cost: movement.cost,
            });
        }
        Command::TurnWorm { worm, angle } => {
            let cost = world.turn_worm(worm, angle)?;
            let direction = world.worm(worm)?.direction();
            out_events.push(Event::WormTurned {
                worm,
                direction,
                cost,
            });
        }
        Command::JumpWorm { worm, time_step } => {
            let jump = world.jump(worm, time_step)?;
            out_events.push(Event::WormJumped {
                worm,
                from: jump.from,
                to: jump.to,
                duration: jump.duration,
            });
        }
        Command::SelectNextWeapon { worm } => {
            let weapon = world.select_next_weapon(worm)?;
            out_events.push(Event::WeaponSelected { worm, weapon });
        }
        Command::FireWeapon {
            worm,
            propulsion,
            time_step,
        } => {
            let shot = world.fire(worm, propulsion, time_step)?;
            let weapon = shot.projectile.weapon();
            let position = shot.flight.position;
            let duration = shot.flight.time;
            out_events.push(match shot.flight.outcome {
                FlightOutcome::Landed => Event::ProjectileLanded {
                    worm,
                    weapon,
                    position,
                    duration,
                },
                FlightOutcome::LeftWorld => Event::ProjectileLeftWorld {
                    worm,
                    weapon,
                    position,
                    duration,
                },
            });
        }
        Command::RenameWorm { worm, name } => {
            world.rename_worm(worm, &name)?;
            out_events.push(Event::WormRenamed { worm, name });
        }
        Command::ResizeWorm { worm, radius } => {
            let max_action_points = world.resize_worm(worm, radius)?;
            out_events.push(Event::WormResized {
                worm,
                radius,
                max_action_points,
            });
        }
        Command::TerminateWorld => {
            let worms = world.terminate();
            out_events.push(Event::WorldTerminated { worms });
        }
    }

    Ok(())
}

fn command_label(command: &Command) -> &'static str {
    match command {
        Command::SpawnWorm { .. } => "spawn_worm",
        Command::RemoveWorm { .. } => "remove_worm",
        Command::MoveWorm { .. } => "move_worm",
        Command::TurnWorm { .. } => "turn_worm",
        Command::JumpWorm { .. } => "jump_worm",
        Command::SelectNextWeapon { .. } => "select_next_weapon",
        Command::FireWeapon { .. } => "fire_weapon",
        Command::RenameWorm { .. } => "rename_worm",
        Command::ResizeWorm { .. } => "resize_worm",
        Command::TerminateWorld => "terminate_world",
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{World, WorldConfig, Worm};
    use worms_core::{TerrainGrid, WorldId, WormId};

    /// Identifier allocated to the world at creation.
    #[must_use]
    pub fn id(world: &World) -> WorldId {
        world.id
    }

    /// Retrieves a member worm by identifier.
    #[must_use]
    pub fn worm(world: &World, worm: WormId) -> Option<&Worm> {
        world.worms.get(&worm)
    }

    /// Iterates over member worms in identifier order.
    pub fn worms(world: &World) -> impl Iterator<Item = (WormId, &Worm)> {
        world.worms.iter().map(|(id, worm)| (*id, worm))
    }

    /// Identifiers of every member worm in ascending order.
    #[must_use]
    pub fn worm_ids(world: &World) -> Vec<WormId> {
        world.worms.keys().copied().collect()
    }

    /// Reports whether the worm is a member of the world.
    #[must_use]
    pub fn contains(world: &World, worm: WormId) -> bool {
        world.worms.contains_key(&worm)
    }

    /// Provides read-only access to the terrain raster.
    #[must_use]
    pub fn terrain(world: &World) -> &TerrainGrid {
        &world.terrain
    }

    /// Downward acceleration applied inside the world.
    #[must_use]
    pub fn gravity(world: &World) -> f64 {
        world.config.gravity
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Reports whether the world has been terminated.
    #[must_use]
    pub fn is_terminated(world: &World) -> bool {
        world.terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    fn floor_world() -> World {
        let raster = (0..20)
            .map(|row| vec![row >= 5; 40])
            .collect::<Vec<_>>();
        let terrain = TerrainGrid::new(40.0, 20.0, raster).expect("valid grid");
        World::new(terrain, WorldConfig::default()).expect("valid world")
    }

    fn resting_worm() -> Worm {
        Worm::new(10.0, 6.05, FRAC_PI_4, 1.0, "Alpha").expect("valid worm")
    }

    #[test]
    fn worlds_receive_distinct_identifiers() {
        let first = floor_world();
        let second = floor_world();
        assert_ne!(query::id(&first), query::id(&second));
    }

    #[test]
    fn rejects_invalid_gravity() {
        let terrain = TerrainGrid::new(1.0, 1.0, vec![vec![true]]).expect("valid grid");
        let error = World::new(terrain, WorldConfig::default().with_gravity(-1.0)).unwrap_err();
        assert_eq!(error, InvalidArgument::InvalidGravity.into());
    }

    #[test]
    fn membership_is_recorded_on_both_sides() {
        let mut world = floor_world();
        let id = world.insert_worm(resting_worm()).expect("insert");

        let member = query::worm(&world, id).expect("member");
        assert_eq!(member.world(), Some(query::id(&world)));
        assert_eq!(member.id(), Some(id));
        assert!(query::contains(&world, id));
    }

    #[test]
    fn cloned_members_cannot_join_another_world() {
        let mut world = floor_world();
        let id = world.insert_worm(resting_worm()).expect("insert");
        let copy = query::worm(&world, id).expect("member").clone();

        let mut other = floor_world();
        assert_eq!(
            other.insert_worm(copy).unwrap_err(),
            InvalidArgument::WormAlreadyInWorld.into()
        );
    }

    #[test]
    fn rejected_jump_leaves_state_untouched() {
        let mut world = floor_world();
        let worm = Worm::new(10.0, 6.05, 1.5 * std::f64::consts::PI, 1.0, "Alpha")
            .expect("valid worm");
        let id = world.insert_worm(worm).expect("insert");
        let before = query::worm(&world, id).expect("member").clone();

        assert_eq!(
            world.jump(id, 0.01).unwrap_err(),
            InvalidState::CannotJump.into()
        );
        assert_eq!(query::worm(&world, id), Some(&before));
    }

    #[test]
    fn landing_search_cap_comes_from_config() {
        let raster = (0..20)
            .map(|row| vec![row >= 5; 40])
            .collect::<Vec<_>>();
        let terrain = TerrainGrid::new(40.0, 20.0, raster).expect("valid grid");
        let config = WorldConfig {
            max_landing_steps: 3,
            ..WorldConfig::default()
        };
        let mut world = World::new(terrain, config).expect("valid world");
        let id = world.insert_worm(resting_worm()).expect("insert");

        assert_eq!(
            world.jump(id, 0.01).unwrap_err(),
            InvalidState::NoLandingSite.into()
        );
        assert_eq!(
            query::worm(&world, id).expect("member").action_points(),
            4_448
        );
    }
}
