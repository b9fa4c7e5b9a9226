//! Combat module: общий melee-протокол игрока и врага
//!
//! ECS ответственность:
//! - Game state: Health, боевые флаги, hit-dedup множество замаха
//! - Combat rules: применение урона, stumble, смерть
//! - Events: DamageDealt, CombatantDied + исходящие запросы engine-слою
//!
//! Engine ответственность:
//! - Анимации (тайминги окна урона — animation cues)
//! - Коллизии оружия (WeaponContacts — снимок overlap'ов)
//! - Звук, camera shake, физика движения

use bevy::prelude::*;

pub mod cues;
pub mod damage;
pub mod rotation;
pub mod swing;

// Re-export основных типов
pub use cues::{process_airborne_events, process_animation_cues};
pub use damage::{
    pick_stumble_index, resolve_damage, CombatantDied, DamageContext, DamageDealt, DamageOutcome,
};
pub use rotation::{face_direction, rotate_toward_target, wrap_angle, yaw_from_direction};
pub use swing::{pick_attack_index, weapon_hit_check};

use crate::engine::{
    ActorDisabled, AirborneChanged, AnimationCue, CameraShakeRequest, MovementImpulse, PlayMontage,
    PlaySound,
};
use crate::SimSet;

/// Combat Plugin
///
/// Порядок внутри тика:
/// 1. Signals: animation cues + airborne мутируют флаги
/// 2. Resolve: weapon_hit_check (после решений игрока и FSM)
/// 3. Move: плавный доворот к цели
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Входящие события границы
        app.add_event::<AnimationCue>().add_event::<AirborneChanged>();

        // Исходящие запросы engine-слою
        app.add_event::<PlayMontage>()
            .add_event::<PlaySound>()
            .add_event::<MovementImpulse>()
            .add_event::<CameraShakeRequest>()
            .add_event::<ActorDisabled>();

        // Боевые события
        app.add_event::<DamageDealt>().add_event::<CombatantDied>();

        app.add_systems(
            FixedUpdate,
            (process_animation_cues, process_airborne_events)
                .chain()
                .in_set(SimSet::Signals),
        );
        app.add_systems(FixedUpdate, weapon_hit_check.in_set(SimSet::Resolve));
        app.add_systems(FixedUpdate, rotate_toward_target.in_set(SimSet::Move));
    }
}
