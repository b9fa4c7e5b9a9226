//! Игрок: marker, боевое состояние, tunables, detection-множество, input

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker component для player-controlled entity
///
/// Акторы БЕЗ этого компонента управляются AI-системами.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Боевое состояние игрока, не входящее в общую базу
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerState {
    /// Roll активен: i-frames, input-lockout, повышенная скорость
    pub rolling: bool,
    /// Направление roll'а, зафиксированное на старте
    pub roll_rotation: Quat,
    /// Индекс следующего удара комбо (циклический)
    pub attack_index: usize,
}

/// Дизайнерские tunables игрока (immutable input, не derived state)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct PlayerConfig {
    /// Максимальная дистанция удержания захвата цели
    pub target_lock_distance: f32,
    /// Скорость вне боя
    pub passive_move_speed: f32,
    /// Скорость в режиме боя
    pub combat_move_speed: f32,
    /// Скорость во время roll'а
    pub rolling_speed: f32,
    /// Скорость отползания во время stumble
    pub stumble_backpedal_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            target_lock_distance: 1500.0,
            passive_move_speed: 450.0,
            combat_move_speed: 250.0,
            rolling_speed: 600.0,
            stumble_backpedal_speed: 10.0,
        }
    }
}

/// Враги внутри detection-радиуса игрока
///
/// Мутируется detection-событиями engine-слоя; ссылки слабые, протухшие
/// entity вычищаются перед использованием.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct NearbyEnemies {
    pub enemies: Vec<Entity>,
}

/// Непрерывные оси движения (engine-слой пишет каждый frame)
///
/// Обрабатываются симуляцией: залочены во время атаки/roll'а/stumble,
/// но всегда запоминаются для вычисления направления roll'а.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct InputDirection {
    pub forward: f32,
    pub right: f32,
}

impl InputDirection {
    pub fn is_zero(&self) -> bool {
        self.forward == 0.0 && self.right == 0.0
    }
}
