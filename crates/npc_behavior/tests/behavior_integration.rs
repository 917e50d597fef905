//! Behavior integration tests
//!
//! Full app (SimulationPlugin, headless nav/animation, rapier colliders),
//! driven tick by tick with `run_fixed_tick`.
//!
//! Covers:
//! - out of range / obstructed targets are ignored
//! - chase → attack → re-attack → chase again
//! - loss of sight mid-attack
//! - wander timeout and idle cycle
//! - doors opened on the way
//! - dangling targets detach the controller

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups, Group};
use npc_behavior::interaction::DoorState;
use npc_behavior::physics::{LAYER_ENVIRONMENT, LAYER_INTERACTABLES};
use npc_behavior::*;

/// Helper: full behavior app over a 100x100 walkable square
fn create_behavior_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app.insert_resource(NavigableArea::new(vec![NavRegion::square(50.0)]));
    app
}

fn spawn_target(app: &mut App, position: Vec3) -> Entity {
    app.world_mut().spawn(Transform::from_translation(position)).id()
}

fn spawn_agent(app: &mut App, target: Entity, nav_agent: NavAgent) -> Entity {
    let bundle = BehaviorAgentBundle::new(BehaviorConfig::default(), Some(target), Transform::default())
        .expect("valid agent")
        .with_nav_agent(nav_agent);
    app.world_mut().spawn(bundle).id()
}

fn spawn_wall(app: &mut App, transform: Transform, half_extents: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            transform,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            CollisionGroups::new(LAYER_ENVIRONMENT, Group::ALL),
        ))
        .id()
}

fn state(app: &App, agent: Entity) -> BehaviorState {
    app.world()
        .get::<BehaviorController>(agent)
        .expect("controller attached")
        .state
}

fn move_to(app: &mut App, entity: Entity, position: Vec3) {
    app.world_mut()
        .get_mut::<Transform>(entity)
        .expect("entity has Transform")
        .translation = position;
}

/// Run ticks, collecting every transition written meanwhile
fn run_collecting(app: &mut App, ticks: usize) -> Vec<BehaviorTransition> {
    let mut cursor = app
        .world()
        .resource::<Events<BehaviorTransition>>()
        .get_cursor_current();
    let mut collected = Vec::new();

    for _ in 0..ticks {
        run_fixed_tick(app);
        let events = app.world().resource::<Events<BehaviorTransition>>();
        collected.extend(cursor.read(events).copied());
    }

    collected
}

/// Tick until `predicate` holds, returning the tick count (None on timeout)
fn run_until(app: &mut App, max_ticks: usize, mut predicate: impl FnMut(&App) -> bool) -> Option<usize> {
    for tick in 1..=max_ticks {
        run_fixed_tick(app);
        if predicate(app) {
            return Some(tick);
        }
    }
    None
}

#[test]
fn test_target_out_of_range_is_ignored() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(40.0, 0.0, 0.0));
    let agent = spawn_agent(&mut app, target, NavAgent::default());

    let transitions = run_collecting(&mut app, 60);

    assert!(!state(&app, agent).is_target_aware());
    assert!(transitions
        .iter()
        .all(|t| t.cause != TransitionCause::TargetSpotted));
}

#[test]
fn test_obstructed_target_is_not_chased() {
    let mut app = create_behavior_app(42);
    spawn_wall(&mut app, Transform::from_xyz(0.0, 1.5, 3.0), Vec3::new(4.0, 1.5, 0.5));
    let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, 5.0));
    let agent = spawn_agent(&mut app, target, NavAgent::default());

    run_fixed_ticks(&mut app, 30);

    assert!(!state(&app, agent).is_target_aware());
}

#[test]
fn test_chase_then_attack() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(5.0, 0.0, 0.0));
    let agent = spawn_agent(&mut app, target, NavAgent::default());

    let transitions = run_collecting(&mut app, 1);
    assert_eq!(state(&app, agent), BehaviorState::Chasing);
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].entity, agent);
    assert_eq!(transitions[0].cause, TransitionCause::TargetSpotted);

    // 5m at 3.5 m/s, plus a tick for the path
    let ticks = run_until(&mut app, 150, |app| state(app, agent) == BehaviorState::Attacking);
    assert!(ticks.is_some(), "agent never reached attack range");

    let world = app.world();
    let nav_agent = world.get::<NavAgent>(agent).unwrap();
    assert!(nav_agent.stopped);
    let animator = world.get::<Animator>(agent).unwrap();
    assert_eq!(animator.current_clip(), "Attack");
    assert_eq!(animator.blend(), 2.0);

    let position = world.get::<Transform>(agent).unwrap().translation;
    assert!(Vec2::new(position.x - 5.0, position.z).length() <= 0.15);
}

#[test]
fn test_chase_does_not_restart_path_for_static_target() {
    let mut app = create_behavior_app(7);
    let target = spawn_target(&mut app, Vec3::new(8.0, 0.0, 0.0));
    let agent = spawn_agent(&mut app, target, NavAgent::default());

    run_fixed_ticks(&mut app, 40);

    assert_eq!(state(&app, agent), BehaviorState::Chasing);
    // One wander destination at start, one chase path
    assert_eq!(app.world().get::<NavAgent>(agent).unwrap().path_requests, 2);
}

#[test]
fn test_chase_follows_moving_target() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, 5.0));
    let agent = spawn_agent(&mut app, target, NavAgent::default());

    // 0.02 m per tick = 1.2 m/s, slower than the agent's 3.5 m/s
    let mut target_z = 5.0;
    for _ in 0..120 {
        target_z += 0.02;
        move_to(&mut app, target, Vec3::new(0.0, 0.0, target_z));
        run_fixed_tick(&mut app);
    }

    let world = app.world();
    let position = world.get::<Transform>(agent).unwrap().translation;
    let gap = Vec2::new(position.x, position.z - target_z).length();
    assert!(gap < 1.0, "agent fell behind: pos {:?}, target z {}", position, target_z);
    assert!(state(&app, agent).is_target_aware());

    let forward = world.get::<Transform>(agent).unwrap().rotation * Vec3::NEG_Z;
    assert!(forward.z > 0.5, "agent should face the chase, forward = {:?}", forward);
}

#[test]
fn test_attack_repeats_then_chase_resumes() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(3.0, 0.0, 0.0));
    let agent = spawn_agent(&mut app, target, NavAgent::default());

    run_until(&mut app, 150, |app| state(app, agent) == BehaviorState::Attacking)
        .expect("attack started");

    // Swing is 0.8s (48 ticks); target stays put, agent swings again
    let transitions = run_collecting(&mut app, 60);
    assert_eq!(state(&app, agent), BehaviorState::Attacking);
    assert_eq!(app.world().get::<Animator>(agent).unwrap().attacks_started, 2);
    assert!(transitions.iter().any(|t| {
        t.from == BehaviorState::Attacking
            && t.to == BehaviorState::Attacking
            && t.cause == TransitionCause::InStopRange
    }));

    // Target steps away (still visible): swing finishes, chase resumes
    move_to(&mut app, target, Vec3::new(6.0, 0.0, 0.0));
    let transitions = run_collecting(&mut app, 60);
    assert!(transitions.iter().any(|t| {
        t.from == BehaviorState::Attacking
            && t.to == BehaviorState::Chasing
            && t.cause == TransitionCause::AttackFinished
    }));
    assert!(!app.world().get::<NavAgent>(agent).unwrap().stopped);
}

#[test]
fn test_loss_of_sight_mid_attack() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(2.0, 0.0, 0.0));
    // Long swing: still mid-attack when the target leaves
    let bundle = BehaviorAgentBundle::new(BehaviorConfig::default(), Some(target), Transform::default())
        .expect("valid agent")
        .with_animator(Animator::with_attack_length(5.0));
    let agent = app.world_mut().spawn(bundle).id();

    run_until(&mut app, 150, |app| state(app, agent) == BehaviorState::Attacking)
        .expect("attack started");
    run_fixed_ticks(&mut app, 60);
    assert_eq!(state(&app, agent), BehaviorState::Attacking);
    assert!(app.world().get::<Animator>(agent).unwrap().normalized_time() < 1.0);

    move_to(&mut app, target, Vec3::new(45.0, 0.0, 0.0));
    let transitions = run_collecting(&mut app, 1);

    assert_eq!(state(&app, agent), BehaviorState::Wandering);
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].from, BehaviorState::Attacking);
    assert_eq!(transitions[0].cause, TransitionCause::LostSight);

    let world = app.world();
    let controller = world.get::<BehaviorController>(agent).unwrap();
    assert_eq!(controller.timers.wander_countdown, 0.0);
    assert!(!world.get::<NavAgent>(agent).unwrap().stopped);
    assert_eq!(world.get::<Animator>(agent).unwrap().current_clip(), "Locomotion");
}

#[test]
fn test_wander_timeout_then_idle_cycle() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(45.0, 0.0, 45.0));
    // Never moves, never counts as arrived
    let frozen = NavAgent {
        speed: 0.0,
        stopping_distance: 0.0,
        ..Default::default()
    };
    let agent = spawn_agent(&mut app, target, frozen);

    // wander_timer = 5s → 300 ticks at 60Hz
    run_fixed_ticks(&mut app, 290);
    assert_eq!(state(&app, agent), BehaviorState::Wandering);

    let transitions = run_collecting(&mut app, 20);
    assert_eq!(state(&app, agent), BehaviorState::Idle);
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].cause, TransitionCause::WanderTimeout);

    // idle_time_at_destination = 3s → 180 ticks
    let transitions = run_collecting(&mut app, 190);
    assert_eq!(state(&app, agent), BehaviorState::Wandering);
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].cause, TransitionCause::IdleElapsed);
    assert_eq!(app.world().get::<NavAgent>(agent).unwrap().path_requests, 2);
}

#[test]
fn test_wander_arrival_goes_idle() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(45.0, 0.0, 45.0));
    let agent = spawn_agent(&mut app, target, NavAgent::with_speed(20.0));

    // Wander radius 10 at 20 m/s: arrival long before the 5s timeout
    let transitions = run_collecting(&mut app, 120);

    assert!(transitions.iter().any(|t| {
        t.from == BehaviorState::Wandering
            && t.to == BehaviorState::Idle
            && t.cause == TransitionCause::Arrived
    }));
}

#[test]
fn test_agent_opens_nearby_door() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(45.0, 0.0, 45.0));
    let near_door = app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 1.0, 1.5),
            Collider::cuboid(1.0, 1.0, 0.1),
            CollisionGroups::new(LAYER_INTERACTABLES, Group::ALL),
            Door::default(),
        ))
        .id();
    let far_door = app
        .world_mut()
        .spawn((
            Transform::from_xyz(0.0, 1.0, 30.0),
            Collider::cuboid(1.0, 1.0, 0.1),
            CollisionGroups::new(LAYER_INTERACTABLES, Group::ALL),
            Door::default(),
        ))
        .id();
    // Interactable without the door contract: skipped, no panic
    app.world_mut().spawn((
        Transform::from_xyz(1.0, 0.0, 0.0),
        CollisionGroups::new(LAYER_INTERACTABLES, Group::ALL),
    ));
    spawn_agent(&mut app, target, NavAgent::with_speed(0.0));

    run_fixed_tick(&mut app);

    let world = app.world();
    assert!(matches!(
        world.get::<Door>(near_door).unwrap().state,
        DoorState::Opening { .. }
    ));
    assert_eq!(world.get::<Door>(far_door).unwrap().state, DoorState::Closed);

    // Fully open after the swing
    run_fixed_ticks(&mut app, 70);
    assert!(world_door_open(&app, near_door));
}

fn world_door_open(app: &App, door: Entity) -> bool {
    app.world().get::<Door>(door).unwrap().is_open()
}

#[test]
fn test_missing_target_detaches_controller() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::new(3.0, 0.0, 0.0));
    let agent = spawn_agent(&mut app, target, NavAgent::default());

    run_fixed_ticks(&mut app, 5);
    app.world_mut().despawn(target);
    run_fixed_tick(&mut app);

    assert!(app.world().get::<BehaviorController>(agent).is_none());
    // Further ticks are harmless
    run_fixed_ticks(&mut app, 5);
}

#[test]
fn test_bundle_requires_target() {
    let result = BehaviorAgentBundle::new(BehaviorConfig::default(), None, Transform::default());
    assert!(matches!(result, Err(BehaviorError::MissingTarget)));
}

#[test]
fn test_bundle_rejects_invalid_config() {
    let mut app = create_behavior_app(42);
    let target = spawn_target(&mut app, Vec3::ZERO);

    let config = BehaviorConfig {
        stop_threshold: -1.0,
        ..Default::default()
    };
    let result = BehaviorAgentBundle::new(config, Some(target), Transform::default());
    assert!(matches!(result, Err(BehaviorError::InvalidConfig { .. })));
}
