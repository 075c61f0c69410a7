use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use worms_core::{
    ArithmeticError, Command, Event, InvalidArgument, InvalidState, TerrainGrid, WeaponKind,
    WormId,
};
use worms_world::{self as world, query, World, WorldConfig, Worm};

/// 40×20 world over a 40×20 raster whose bottom five rows are solid.
fn floor_world() -> World {
    let raster = (0..20)
        .map(|row| vec![row >= 5; 40])
        .collect::<Vec<_>>();
    let terrain = TerrainGrid::new(40.0, 20.0, raster).expect("valid grid");
    World::new(terrain, WorldConfig::default()).expect("valid world")
}

/// Unit worm resting on the floor and facing up and to the right.
fn resting_worm(world: &mut World) -> WormId {
    let worm = Worm::new(10.0, 6.05, FRAC_PI_4, 1.0, "Alpha").expect("valid worm");
    world.insert_worm(worm).expect("insert")
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

#[test]
fn jump_lands_further_along_the_floor() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);

    let events = apply(
        &mut world,
        Command::JumpWorm {
            worm: id,
            time_step: 0.01,
        },
    );

    let [Event::WormJumped {
        worm,
        from,
        to,
        duration,
    }] = events.as_slice()
    else {
        panic!("unexpected events: {events:?}");
    };
    assert_eq!(*worm, id);
    assert!((from.x() - 10.0).abs() < 1e-12);
    assert!(to.x() > 15.0 && to.x() < 16.0, "x {}", to.x());
    assert!((6.0..=6.1).contains(&to.y()), "y {}", to.y());
    assert!((1.0..=1.2).contains(duration));

    let jumper = query::worm(&world, id).expect("member");
    assert_eq!(jumper.position(), *to);
    assert_eq!(jumper.action_points(), 0);
}

#[test]
fn jump_time_matches_the_committed_jump() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);

    let predicted = world.jump_time(id, 0.01).expect("jump time");
    let landing = world.jump_step(id, predicted).expect("jump step");
    let jump = world.jump(id, 0.01).expect("jump");

    assert!((jump.duration - predicted).abs() < f64::EPSILON);
    assert_eq!(jump.to, landing);
}

#[test]
fn exhausted_worm_cannot_jump_again() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);
    let _ = world.jump(id, 0.01).expect("first jump");

    assert_eq!(
        world.jump(id, 0.01).unwrap_err(),
        InvalidState::CannotJump.into()
    );
    assert_eq!(
        world.jump_step(id, 0.1).unwrap_err(),
        InvalidState::CannotJump.into()
    );
}

#[test]
fn jump_rejects_degenerate_time_steps() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);

    let events = apply(
        &mut world,
        Command::JumpWorm {
            worm: id,
            time_step: 0.0,
        },
    );

    assert_eq!(
        events,
        vec![Event::CommandRejected {
            reason: ArithmeticError::InvalidTimeStep.into(),
        }]
    );
}

#[test]
fn move_and_turn_report_costs() {
    let mut world = floor_world();
    let worm = Worm::new(10.0, 10.0, 0.0, 1.0, "Mover").expect("valid worm");
    let id = world.insert_worm(worm).expect("insert");

    let moved = apply(&mut world, Command::MoveWorm { worm: id, steps: 3 });
    let turned = apply(
        &mut world,
        Command::TurnWorm {
            worm: id,
            angle: FRAC_PI_2,
        },
    );

    let [Event::WormMoved { to, cost, .. }] = moved.as_slice() else {
        panic!("unexpected events: {moved:?}");
    };
    assert!((to.x() - 13.0).abs() < 1e-12);
    assert!((to.y() - 10.0).abs() < 1e-12);
    assert_eq!(*cost, 3);

    let [Event::WormTurned {
        direction, cost, ..
    }] = turned.as_slice()
    else {
        panic!("unexpected events: {turned:?}");
    };
    assert!((direction.radians() - FRAC_PI_2).abs() < 1e-12);
    assert_eq!(*cost, 15);

    let member = query::worm(&world, id).expect("member");
    assert_eq!(member.action_points(), 4_448 - 3 - 15);
}

#[test]
fn rifle_round_leaves_the_world_but_still_costs() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);

    let events = apply(
        &mut world,
        Command::FireWeapon {
            worm: id,
            propulsion: 0,
            time_step: 0.01,
        },
    );

    assert!(matches!(
        events.as_slice(),
        [Event::ProjectileLeftWorld {
            weapon: WeaponKind::Rifle,
            ..
        }]
    ));
    assert_eq!(
        query::worm(&world, id).expect("member").action_points(),
        4_438
    );
}

#[test]
fn bazooka_shell_lands_on_the_floor() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);

    let selected = apply(&mut world, Command::SelectNextWeapon { worm: id });
    assert_eq!(
        selected,
        vec![Event::WeaponSelected {
            worm: id,
            weapon: WeaponKind::Bazooka,
        }]
    );

    let events = apply(
        &mut world,
        Command::FireWeapon {
            worm: id,
            propulsion: 50,
            time_step: 0.001,
        },
    );

    let [Event::ProjectileLanded {
        weapon, position, ..
    }] = events.as_slice()
    else {
        panic!("unexpected events: {events:?}");
    };
    assert_eq!(*weapon, WeaponKind::Bazooka);
    assert!(position.x() > 22.0 && position.x() < 24.0, "x {}", position.x());
    assert!(position.y() > 5.0 && position.y() < 5.05, "y {}", position.y());
    assert_eq!(
        query::worm(&world, id).expect("member").action_points(),
        4_398
    );
}

#[test]
fn bazooka_rejects_excess_propulsion() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);
    let _ = world.select_next_weapon(id).expect("select");

    assert_eq!(
        world.fire(id, 101, 0.01).unwrap_err(),
        InvalidArgument::InvalidPropulsion.into()
    );
    assert_eq!(
        query::worm(&world, id).expect("member").action_points(),
        4_448
    );
}

#[test]
fn firing_without_points_is_rejected() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);
    let _ = world.jump(id, 0.01).expect("jump");

    assert_eq!(
        world.fire(id, 0, 0.01).unwrap_err(),
        InvalidState::CannotFire.into()
    );
}

#[test]
fn rename_and_resize_validate_first() {
    let mut world = floor_world();
    let id = resting_worm(&mut world);

    let rejected = apply(
        &mut world,
        Command::RenameWorm {
            worm: id,
            name: "lowercase".to_owned(),
        },
    );
    assert_eq!(
        rejected,
        vec![Event::CommandRejected {
            reason: InvalidArgument::InvalidName.into(),
        }]
    );

    let resized = apply(
        &mut world,
        Command::ResizeWorm {
            worm: id,
            radius: 0.5,
        },
    );
    assert_eq!(
        resized,
        vec![Event::WormResized {
            worm: id,
            radius: 0.5,
            max_action_points: 556,
        }]
    );

    let member = query::worm(&world, id).expect("member");
    assert_eq!(member.name(), "Alpha");
    assert_eq!(member.action_points(), 556);
}

#[test]
fn downward_facing_worm_fails_to_jump() {
    let mut world = floor_world();
    let worm = Worm::new(10.0, 6.05, 1.5 * PI, 1.0, "Alpha").expect("valid worm");
    let id = world.insert_worm(worm).expect("insert");

    let events = apply(
        &mut world,
        Command::JumpWorm {
            worm: id,
            time_step: 0.01,
        },
    );

    assert_eq!(
        events,
        vec![Event::CommandRejected {
            reason: InvalidState::CannotJump.into(),
        }]
    );
}
