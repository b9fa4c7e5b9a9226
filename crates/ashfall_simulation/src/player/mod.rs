//! Player module: контроллер игрока
//!
//! Input и камера живут в engine-слое; сюда приходят размапленные
//! PlayerAction'ы, оси InputDirection и CameraPose. Здесь — гейты
//! действий, захват цели, режим боя и запросы движения.

use bevy::prelude::*;

pub mod actions;
pub mod detection;
pub mod targeting;

pub use actions::{
    combat_mode_tick, handle_player_actions, player_motion_tick, set_in_combat,
};
pub use detection::update_nearby_enemies;
pub use targeting::select_cycle_target;

use crate::engine::{CameraPose, DetectionEvent, PlayerAction};
use crate::SimSet;

/// Player Plugin
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerAction>().add_event::<DetectionEvent>();
        app.init_resource::<CameraPose>();

        app.add_systems(FixedUpdate, update_nearby_enemies.in_set(SimSet::Signals));
        app.add_systems(
            FixedUpdate,
            (handle_player_actions, combat_mode_tick)
                .chain()
                .in_set(SimSet::Decide),
        );
        app.add_systems(FixedUpdate, player_motion_tick.in_set(SimSet::Move));
    }
}
