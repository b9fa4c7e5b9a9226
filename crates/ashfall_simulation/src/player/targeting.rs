//! Выбор и переключение цели захвата
//!
//! Логика камеро-относительная: "слева/справа" определяется yaw'ом
//! направления от камеры к кандидату, не от персонажа. Чистая функция —
//! система только собирает позиции и применяет результат.

use bevy::prelude::*;

use crate::combat::rotation::{wrap_angle, yaw_from_direction};

/// Выбрать следующую цель захвата
///
/// Без текущей цели — ближайший к игроку кандидат. С текущей —
/// ближайший по углу кандидат на запрошенной стороне экрана: clockwise
/// забирает правую сторону (при yaw = atan2(-x, -z) это отрицательная
/// дельта от камеры). Если на этой стороне никого нет, возвращается
/// None: цель не меняется.
pub fn select_cycle_target(
    camera_position: Vec3,
    current: Option<(Entity, Vec3)>,
    candidates: &[(Entity, Vec3)],
    self_position: Vec3,
    clockwise: bool,
) -> Option<Entity> {
    let Some((current_entity, current_position)) = current else {
        // Свободный выбор: ближайший враг
        return candidates
            .iter()
            .min_by(|(_, a), (_, b)| {
                let da = self_position.distance_squared(*a);
                let db = self_position.distance_squared(*b);
                da.total_cmp(&db)
            })
            .map(|(entity, _)| *entity);
    };

    let current_yaw = yaw_from_direction(current_position - camera_position);

    let mut best: Option<(Entity, f32)> = None;
    for (entity, position) in candidates {
        if *entity == current_entity {
            continue;
        }

        let delta = wrap_angle(yaw_from_direction(*position - camera_position) - current_yaw);
        let on_requested_side = if clockwise { delta < 0.0 } else { delta > 0.0 };
        if !on_requested_side {
            continue;
        }

        let magnitude = delta.abs();
        if best.is_none_or(|(_, current_best)| magnitude < current_best) {
            best = Some((*entity, magnitude));
        }
    }

    best.map(|(entity, _)| entity)
}
