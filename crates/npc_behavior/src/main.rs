//! Headless NPC behavior demo
//!
//! One agent, one scripted target walking around a wall and through a door.
//! Usage: `npc_behavior [config.toml]`

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups, Group};

use npc_behavior::physics::{LAYER_ENVIRONMENT, LAYER_INTERACTABLES};
use npc_behavior::*;

const SEED: u64 = 42;
const TICKS: usize = 1800;

/// Target waypoints, one leg every `LEG_TICKS`
const TARGET_PATH: [Vec3; 4] = [
    Vec3::new(30.0, 0.0, 30.0),
    Vec3::new(6.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 8.0),
    Vec3::new(-20.0, 0.0, -20.0),
];
const LEG_TICKS: usize = TICKS / TARGET_PATH.len();

/// Marker for the scripted target
#[derive(Component)]
struct ScriptedTarget;

fn load_config() -> BehaviorResult<BehaviorConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            log_info(&format!("Loading behavior config from {}", path));
            BehaviorConfig::load(path)
        }
        None => Ok(BehaviorConfig::default()),
    }
}

fn spawn_scene(world: &mut World, config: BehaviorConfig) -> BehaviorResult<Entity> {
    world.insert_resource(NavigableArea::new(vec![NavRegion::square(40.0)]));

    let target = world
        .spawn((ScriptedTarget, Transform::from_translation(TARGET_PATH[0])))
        .id();

    // Wall west of the agent
    world.spawn((
        Transform::from_xyz(-4.0, 1.5, 0.0),
        Collider::cuboid(0.5, 1.5, 4.0),
        CollisionGroups::new(LAYER_ENVIRONMENT, Group::ALL),
    ));

    // Door north of the agent
    world.spawn((
        Transform::from_xyz(0.0, 1.0, 4.0),
        Collider::cuboid(1.0, 1.0, 0.1),
        CollisionGroups::new(LAYER_INTERACTABLES, Group::ALL),
        Door::default(),
    ));

    let agent = world
        .spawn(BehaviorAgentBundle::new(config, Some(target), Transform::default())?)
        .id();

    Ok(agent)
}

fn move_target(world: &mut World, tick: usize) {
    let leg = (tick / LEG_TICKS).min(TARGET_PATH.len() - 1);
    let mut targets = world.query_filtered::<&mut Transform, With<ScriptedTarget>>();
    for mut transform in targets.iter_mut(world) {
        transform.translation = TARGET_PATH[leg];
    }
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            log_error(&format!("Invalid behavior config: {}", err));
            std::process::exit(1);
        }
    };

    log(&format!("Starting NPC behavior simulation (seed: {})", SEED));

    let mut app = create_headless_app(SEED);
    app.add_plugins(SimulationPlugin);

    let agent = match spawn_scene(app.world_mut(), config) {
        Ok(agent) => agent,
        Err(err) => {
            log_error(&format!("Failed to spawn agent: {}", err));
            std::process::exit(1);
        }
    };

    let mut cursor = app
        .world()
        .resource::<Events<BehaviorTransition>>()
        .get_cursor();

    for tick in 0..TICKS {
        move_target(app.world_mut(), tick);
        run_fixed_tick(&mut app);

        let events = app.world().resource::<Events<BehaviorTransition>>();
        for transition in cursor.read(events) {
            log_info(&format!(
                "Tick {}: {} → {} ({:?})",
                tick,
                transition.from.as_str(),
                transition.to.as_str(),
                transition.cause
            ));
        }

        // Nothing else swaps the event buffers when FixedUpdate is driven by hand
        app.world_mut()
            .resource_mut::<Events<BehaviorTransition>>()
            .update();

        if tick % 300 == 0 {
            if let Some(controller) = app.world().get::<BehaviorController>(agent) {
                log(&format!("Tick {}: agent {:?} is {}", tick, agent, controller.state.as_str()));
            }
        }
    }

    log("Simulation complete!");
}
