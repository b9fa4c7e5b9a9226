//! Граница с hosting engine
//!
//! Симуляция не владеет рендером, анимацией, физикой, pathfinding'ом,
//! input mapping'ом и аудио. Всё это — внешние collaborator'ы:
//! - events.rs: входящие сигналы (animation cues, overlap callbacks,
//!   input actions, airborne, camera pose)
//! - commands.rs: исходящие запросы (montage playback, one-shot звуки,
//!   movement input, camera shake, отключение актора)
//!
//! Навигационный intent идет не событиями, а через компонент
//! [`crate::components::NavigationAgent`] (engine читает command,
//! пишет following_path).

pub mod commands;
pub mod events;

pub use commands::*;
pub use events::*;
