//! AI module: конечный автомат врага
//!
//! Решения (переходы состояний, запуск атак) — в фазе Decide, движение
//! по состоянию — в фазе Move. Навигация исполняется engine-слоем по
//! NavigationAgent.

use bevy::prelude::*;

pub mod fsm;

pub use fsm::{enemy_state_machine, enemy_state_motion, FACING_ALIGNMENT_THRESHOLD};

use crate::SimSet;

/// AI Plugin
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, enemy_state_machine.in_set(SimSet::Decide));
        app.add_systems(FixedUpdate, enemy_state_motion.in_set(SimSet::Move));
    }
}
