use worms_core::{Command, Event, InvalidArgument, InvalidState, Position, TerrainGrid};
use worms_system_collision::CollisionOracle;
use worms_world::{self as world, query, World, WorldConfig, Worm};

fn floor_world(seed: u64) -> World {
    let raster = (0..20)
        .map(|row| vec![row >= 5; 40])
        .collect::<Vec<_>>();
    let terrain = TerrainGrid::new(40.0, 20.0, raster).expect("valid grid");
    World::new(terrain, WorldConfig::default().with_seed(seed)).expect("valid world")
}

fn spawn(name: &str) -> Command {
    Command::SpawnWorm {
        name: name.to_owned(),
        radius: 1.0,
        direction: 0.5,
        position: None,
    }
}

#[test]
fn spawned_worms_rest_against_terrain() {
    let mut world = floor_world(11);
    let mut events = Vec::new();

    for name in ["Alpha", "Bravo", "Charlie"] {
        world::apply(&mut world, spawn(name), &mut events);
    }

    assert_eq!(events.len(), 3);
    let oracle = CollisionOracle::new(query::terrain(&world));
    for event in &events {
        let Event::WormSpawned { worm, position } = event else {
            panic!("unexpected event: {event:?}");
        };
        assert!(oracle.is_adjacent_to_impassable_terrain(*position, 1.0));
        assert!(query::terrain(&world).fits_in_world(*position, 1.0));
        assert_eq!(
            query::worm(&world, *worm).expect("member").position(),
            *position
        );
    }
    assert_eq!(query::worm_ids(&world).len(), 3);
}

#[test]
fn spawn_with_invalid_name_is_rejected() {
    let mut world = floor_world(1);
    let mut events = Vec::new();

    world::apply(&mut world, spawn("x"), &mut events);

    assert_eq!(
        events,
        vec![Event::CommandRejected {
            reason: InvalidArgument::InvalidName.into(),
        }]
    );
    assert!(query::worm_ids(&world).is_empty());
}

#[test]
fn oversized_worm_has_no_placement_site() {
    let mut world = floor_world(1);
    let giant = Worm::new(0.0, 0.0, 0.0, 12.0, "Giant").expect("valid worm");

    assert_eq!(
        world.add_worm(giant).unwrap_err(),
        InvalidState::NoPlacementSite.into()
    );
}

#[test]
fn inserted_worm_must_fit_inside_the_world() {
    let mut world = floor_world(1);
    let edge = Worm::new(0.5, 10.0, 0.0, 1.0, "Edge").expect("valid worm");

    assert_eq!(
        world.insert_worm(edge).unwrap_err(),
        InvalidArgument::OutsideWorld.into()
    );
}

#[test]
fn removing_a_worm_terminates_it() {
    let mut world = floor_world(2);
    let worm = Worm::new(10.0, 6.05, 0.0, 1.0, "Alpha").expect("valid worm");
    let id = world.insert_worm(worm).expect("insert");

    let removed = world.remove_worm(id).expect("remove");

    assert!(removed.is_terminated());
    assert!(removed.weapons().is_empty());
    assert_eq!(removed.world(), None);
    assert!(!query::contains(&world, id));
    assert_eq!(
        world.remove_worm(id).unwrap_err(),
        InvalidArgument::UnknownWorm.into()
    );
}

#[test]
fn terminated_worms_cannot_rejoin() {
    let mut world = floor_world(2);
    let worm = Worm::new(10.0, 6.05, 0.0, 1.0, "Alpha").expect("valid worm");
    let id = world.insert_worm(worm).expect("insert");
    let removed = world.remove_worm(id).expect("remove");

    assert_eq!(
        world.insert_worm(removed).unwrap_err(),
        InvalidArgument::WormTerminated.into()
    );
}

#[test]
fn terminating_the_world_cascades_to_members() {
    let mut world = floor_world(3);
    let mut events = Vec::new();
    world::apply(&mut world, spawn("Alpha"), &mut events);
    world::apply(&mut world, spawn("Bravo"), &mut events);
    let ids = query::worm_ids(&world);

    events.clear();
    world::apply(&mut world, Command::TerminateWorld, &mut events);

    assert_eq!(events, vec![Event::WorldTerminated { worms: ids.clone() }]);
    assert!(query::is_terminated(&world));
    assert!(query::worm_ids(&world).is_empty());

    events.clear();
    world::apply(&mut world, Command::TerminateWorld, &mut events);
    assert_eq!(events, vec![Event::WorldTerminated { worms: Vec::new() }]);

    events.clear();
    world::apply(&mut world, spawn("Charlie"), &mut events);
    assert_eq!(
        events,
        vec![Event::CommandRejected {
            reason: InvalidArgument::WorldTerminated.into(),
        }]
    );

    events.clear();
    world::apply(
        &mut world,
        Command::MoveWorm {
            worm: ids[0],
            steps: 1,
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::CommandRejected {
            reason: InvalidArgument::UnknownWorm.into(),
        }]
    );
}

#[test]
fn identifiers_are_never_reused() {
    let mut world = floor_world(4);
    let first = world
        .insert_worm(Worm::new(10.0, 6.05, 0.0, 1.0, "Alpha").expect("valid worm"))
        .expect("insert");
    let _ = world.remove_worm(first).expect("remove");
    let second = world
        .insert_worm(Worm::new(10.0, 6.05, 0.0, 1.0, "Alpha").expect("valid worm"))
        .expect("insert");

    assert!(second > first);
}

#[test]
fn spawn_at_a_fixed_site_keeps_the_position() {
    let mut world = floor_world(5);
    let site = Position::new(12.0, 6.05).expect("finite position");
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::SpawnWorm {
            name: "Fixed".to_owned(),
            radius: 1.0,
            direction: 0.0,
            position: Some(site),
        },
        &mut events,
    );

    let [Event::WormSpawned { worm, position }] = events.as_slice() else {
        panic!("unexpected events: {events:?}");
    };
    assert_eq!(*position, site);
    assert_eq!(query::worm(&world, *worm).expect("member").name(), "Fixed");
}
