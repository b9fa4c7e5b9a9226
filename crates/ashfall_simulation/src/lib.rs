//! ASHFALL Combat Core
//!
//! ECS-симуляция melee-боя на Bevy 0.16 (strategic layer)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (game state, FSM врагов, боевые правила)
//! - Engine = tactical layer (рендер, анимации, физика, pathfinding,
//!   input, камера, звук)
//!
//! Граница — события и компоненты-снимки (см. `engine` модуль): внутрь
//! приходят animation cues, overlap'ы и input; наружу уходят запросы на
//! клипы, звуки и движение.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod engine;
pub mod logger;
pub mod player;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, FACING_ALIGNMENT_THRESHOLD};
pub use combat::{CombatPlugin, CombatantDied, DamageDealt, DamageOutcome};
pub use components::*;
pub use engine::{
    AnimationCue, CameraPose, CueKind, DetectionEvent, MontageClip, PlayMontage, PlayerAction,
    PlayerActionKind, PlaySound, SoundCue, WeaponContacts,
};
pub use player::PlayerPlugin;

pub use logger::init_logger;

/// Частота simulation tick'а
pub const TICK_HZ: f64 = 60.0;

/// Фазы одного FixedUpdate тика
///
/// Signals: события границы мутируют флаги.
/// Decide: действия игрока и FSM врагов.
/// Resolve: hit check замахов.
/// Move: движение и довороты.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Signals,
    Decide,
    Resolve,
    Move,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .configure_sets(
                FixedUpdate,
                (SimSet::Signals, SimSet::Decide, SimSet::Resolve, SimSet::Move).chain(),
            )
            .add_plugins((CombatPlugin, AIPlugin, PlayerPlugin));

        // Seed по умолчанию, если хост не вставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
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

/// Создаёт minimal Bevy App для headless симуляции
///
/// ManualDuration: каждый `app.update()` продвигает время ровно на один
/// tick — тесты и реплеи детерминированы по числу вызовов.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            Duration::from_secs_f64(1.0 / TICK_HZ),
        ))
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
