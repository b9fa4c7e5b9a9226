//! Навигационный мост: NavigationAgent (high-level intent для engine-слоя)
//!
//! Архитектура:
//! - Симуляция пишет command / max_speed / orient_to_movement
//! - Engine-слой (NavigationAgent + character controller) читает intent,
//!   ведет актора по пути и пишет обратно following_path

use bevy::prelude::*;

/// Команда навигации для актора
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum NavCommand {
    /// Стоять на месте (не трогать текущий target)
    #[default]
    Idle,
    /// Следовать за entity (engine обновляет путь каждый frame)
    FollowEntity { target: Entity },
    /// Остановиться немедленно (сбросить путь и velocity)
    Stop,
}

/// Мост к навигационному сервису engine-слоя
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavigationAgent {
    pub command: NavCommand,
    /// Engine-слой пишет: идем ли сейчас по пути
    pub following_path: bool,
    /// Максимальная скорость движения (engine применяет к контроллеру)
    pub max_speed: f32,
    /// Разворачивать ли актора по направлению движения
    /// (выключается в режиме боя — facing контролирует захват цели)
    pub orient_to_movement: bool,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self {
            command: NavCommand::Idle,
            following_path: false,
            max_speed: 450.0,
            orient_to_movement: true,
        }
    }
}

impl NavigationAgent {
    pub fn follow(&mut self, target: Entity) {
        self.command = NavCommand::FollowEntity { target };
    }

    pub fn stop(&mut self) {
        self.command = NavCommand::Stop;
        self.following_path = false;
    }
}
