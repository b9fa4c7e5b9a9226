//! Headless симуляция ASHFALL
//!
//! Запускает Bevy App без рендера: игрок стоит, враг агрится и бьет.
//! Smoke-проверка тикового цикла и детерминизма.

use bevy::prelude::*;

use ashfall_simulation::{
    create_headless_app, AnimationSet, AttackSwing, Combatant, Enemy, EnemyConfig, EnemyState,
    Health, InputDirection, NavigationAgent, NearbyEnemies, Player, PlayerConfig, PlayerState,
    RotationFollow, StumbleMemory, Target, WeaponContacts,
};

fn main() {
    let seed = 42;
    println!("Starting ASHFALL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    let player = app
        .world_mut()
        .spawn((
            Player,
            PlayerState::default(),
            PlayerConfig::default(),
            Transform::from_translation(Vec3::ZERO),
            Health::new(100.0),
            Combatant::new(25.0),
            AttackSwing::default(),
            StumbleMemory::default(),
            AnimationSet::default(),
            RotationFollow::default(),
            Target::default(),
            NavigationAgent::default(),
            NearbyEnemies::default(),
            InputDirection::default(),
            WeaponContacts::default(),
        ))
        .id();

    app.world_mut().spawn((
        Enemy,
        EnemyState::default(),
        EnemyConfig::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, -700.0)),
        Health::new(100.0),
        Combatant::new(10.0),
        AttackSwing::default(),
        StumbleMemory::default(),
        AnimationSet::default(),
        RotationFollow::default(),
        Target(Some(player)),
        NavigationAgent::default(),
        WeaponContacts::default(),
    ));

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            let mut states = app.world_mut().query::<&EnemyState>();
            let state = states.iter(app.world()).next().copied();
            println!("Tick {}: {} entities, enemy state {:?}", tick, entity_count, state);
        }
    }

    println!("Simulation complete!");
}
