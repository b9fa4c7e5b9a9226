//! Detection-сфера игрока: membership близких врагов
//!
//! Сами overlap'ы считает engine-слой и шлет DetectionEvent'ы; здесь
//! только ведение множества и вычистка протухших entity (despawn или
//! смерть не обязаны приходить отдельным exit-событием).

use bevy::prelude::*;

use crate::components::{Combatant, Enemy, Health, NearbyEnemies};
use crate::engine::DetectionEvent;

/// Система: синхронизация NearbyEnemies с detection-событиями
pub fn update_nearby_enemies(
    mut events: EventReader<DetectionEvent>,
    mut observers: Query<&mut NearbyEnemies>,
    enemies: Query<(&Health, &Combatant), With<Enemy>>,
) {
    for event in events.read() {
        let Ok(mut nearby) = observers.get_mut(event.observer) else {
            continue;
        };

        if event.entered {
            // Только живые враги; повторный begin overlap — no-op
            let is_live_enemy = enemies
                .get(event.other)
                .is_ok_and(|(health, combatant)| health.is_alive() && !combatant.dead);
            if is_live_enemy && !nearby.enemies.contains(&event.other) {
                nearby.enemies.push(event.other);
            }
        } else {
            nearby.enemies.retain(|&entity| entity != event.other);
        }
    }

    // Вычистка: despawned и умершие выпадают из множества без события
    for mut nearby in observers.iter_mut() {
        let has_stale = nearby.enemies.iter().any(|&entity| {
            !enemies
                .get(entity)
                .is_ok_and(|(health, combatant)| health.is_alive() && !combatant.dead)
        });
        if has_stale {
            nearby.enemies.retain(|&entity| {
                enemies
                    .get(entity)
                    .is_ok_and(|(health, combatant)| health.is_alive() && !combatant.dead)
            });
        }
    }
}
