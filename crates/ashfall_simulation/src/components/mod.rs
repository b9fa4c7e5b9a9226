//! ECS Components для боевых entity
//!
//! Организация по доменам:
//! - actor: общая боевая база (Health, Combatant, AttackSwing, RotationFollow)
//! - movement: навигационный мост к engine-слою (NavigationAgent)
//! - enemy: враг (Enemy, EnemyState FSM, EnemyConfig)
//! - player: игрок (Player, PlayerState, PlayerConfig, NearbyEnemies, InputDirection)

pub mod actor;
pub mod enemy;
pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use enemy::*;
pub use movement::*;
pub use player::*;
