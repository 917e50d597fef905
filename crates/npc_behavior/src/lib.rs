//! NPC behavior controller
//!
//! Headless Bevy ECS layer driving NPC agents through four behaviors:
//! wandering, idling, chasing and attacking, based on line of sight to a
//! target. Navigation, animation and obstruction queries are collaborator
//! traits; the crate ships headless implementations of each so scenes run
//! without an engine attached.

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod animation;
pub mod error;
pub mod interaction;
pub mod logger;
pub mod movement;
pub mod physics;

pub use ai::{
    BehaviorAgentBundle, BehaviorConfig, BehaviorController, BehaviorPlugin, BehaviorState,
    BehaviorTarget, BehaviorTransition, TransitionCause,
};
pub use animation::{AnimationSink, Animator};
pub use error::{BehaviorError, BehaviorResult};
pub use interaction::{Door, Openable};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use movement::{NavAgent, NavRegion, NavigableArea, NavigableSurface, NavigationService};
pub use physics::ObstructionTest;

/// Simulation tick rate (Hz)
pub const TICK_RATE_HZ: f64 = 60.0;

/// Main simulation plugin: fixed 60Hz step, seeded RNG, behavior systems
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            .add_plugins(BehaviorPlugin);
    }
}

/// Seeded RNG resource (wander sampling)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal headless Bevy app with a seeded RNG
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ));

    app
}

/// Run exactly one fixed tick, independent of wall-clock time.
///
/// Advances `Time<Fixed>` by one timestep and runs `FixedUpdate` directly.
pub fn run_fixed_tick(app: &mut App) {
    let world = app.world_mut();
    let timestep: Duration = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(timestep);
    world.run_schedule(FixedUpdate);
}

pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        run_fixed_tick(app);
    }
}

/// Snapshot of every `T` in the world, ordered by entity index
/// (Debug-formatted, good enough for determinism comparisons)
pub fn world_snapshot<T>(world: &mut World) -> Vec<u8>
where
    T: Component + std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
