//! Враг: marker, FSM-состояние, дизайнерские tunables

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker component для врага
///
/// Системы FSM используют `With<Enemy>` filter; player-системы — `Without<Enemy>`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Состояния FSM врага
///
/// Ровно одно активно. Dead — терминальное/поглощающее: единственный
/// инвариант, который [`EnemyState::set`] защищает централизованно.
/// Остальные переходы — side effects пер-state логики.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    /// Вне боя
    #[default]
    Idle,
    /// Бой, держимся близко к цели
    ChaseClose,
    /// Бой, дистанция не важна (entry-переход оставлен продукту, см. DESIGN.md)
    ChaseFar,
    /// В процессе замаха
    Attack,
    /// Stumble от полученного урона
    Stumble,
    /// Эмоут во время боя (зарезервировано)
    Taunt,
    /// Мертв
    Dead,
}

impl EnemyState {
    /// Смена состояния; Dead перезаписать нельзя
    pub fn set(&mut self, next: EnemyState) {
        if *self != EnemyState::Dead {
            *self = next;
        }
    }

    pub fn is_dead(&self) -> bool {
        *self == EnemyState::Dead
    }
}

/// Дизайнерские tunables врага (immutable input, не derived state)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct EnemyConfig {
    /// Дистанция начала ближнего преследования
    pub chase_close_distance: f32,
    /// Дистанция дальнего трекинга
    pub chase_far_distance: f32,
    /// Дистанция, с которой разрешена атака
    pub attack_distance: f32,
    /// Скорость attack-lunge движения (units/sec)
    pub move_speed: f32,
    /// Скорость отползания во время stumble (units/sec)
    pub stumble_backpedal_speed: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            chase_close_distance: 850.0,
            chase_far_distance: 1200.0,
            attack_distance: 300.0,
            move_speed: 500.0,
            stumble_backpedal_speed: 10.0,
        }
    }
}
