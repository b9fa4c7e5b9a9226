//! Доворот к цели: мгновенный (атака/stumble) и плавный (tick)

use bevy::prelude::*;

use crate::components::{Combatant, PlayerState, RotationFollow, Target};

/// Yaw направления в горизонтальной плоскости
///
/// Конвенция bevy: forward = -Z, yaw вокруг +Y.
pub fn yaw_from_direction(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z)
}

/// Нормализация угла в (-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

/// Мгновенный разворот по горизонтальной проекции направления
///
/// Вертикальная составляющая отбрасывается; нулевое направление — no-op.
pub fn face_direction(transform: &mut Transform, direction: Vec3) {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() > f32::EPSILON {
        transform.rotation = Quat::from_rotation_y(yaw_from_direction(flat));
    }
}

/// Система: плавный доворот к захваченной цели
///
/// Активна когда rotation-follow включен, цель захвачена и валидна,
/// актор не в атаке, не в воздухе и (для игрока) не в roll'е.
/// Записывает угловую скорость тика для animation feedback.
pub fn rotate_toward_target(
    mut set: ParamSet<(
        Query<(
            Entity,
            &Combatant,
            &Target,
            &RotationFollow,
            Option<&PlayerState>,
        )>,
        Query<&Transform>,
        Query<(&mut Transform, &mut RotationFollow)>,
    )>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    // Фаза 1: кто доворачивается и к кому
    let mut pending: Vec<(Entity, Entity)> = Vec::new();
    for (entity, combatant, target, follow, player_state) in set.p0().iter() {
        if !follow.enabled || !combatant.target_locked || combatant.attacking || combatant.airborne
        {
            continue;
        }
        if player_state.is_some_and(|p| p.rolling) {
            continue;
        }
        if let Some(target_entity) = target.0 {
            pending.push((entity, target_entity));
        }
    }

    // Фаза 2: позиции целей (невалидная цель деградирует в no-op)
    let mut resolved: Vec<(Entity, Vec3)> = Vec::new();
    {
        let positions = set.p1();
        for (entity, target_entity) in pending {
            if let Ok(target_transform) = positions.get(target_entity) {
                resolved.push((entity, target_transform.translation));
            }
        }
    }

    // Фаза 3: интерполяция + запись угловой скорости
    let mut writers = set.p2();
    for (entity, target_position) in resolved {
        let Ok((mut transform, mut follow)) = writers.get_mut(entity) else {
            continue;
        };

        let to_target = target_position - transform.translation;
        let flat = Vec3::new(to_target.x, 0.0, to_target.z);
        if flat.length_squared() <= f32::EPSILON {
            continue;
        }

        let current_yaw = yaw_from_direction(transform.rotation * Vec3::NEG_Z);
        let desired = Quat::from_rotation_y(yaw_from_direction(flat));
        let t = (follow.smoothing * delta).min(1.0);
        let smoothed = transform.rotation.slerp(desired, t);

        let new_yaw = yaw_from_direction(smoothed * Vec3::NEG_Z);
        follow.last_speed = wrap_angle(new_yaw - current_yaw);
        transform.rotation = smoothed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_yaw_from_direction_cardinal() {
        // forward (-Z) → yaw 0
        assert!(yaw_from_direction(Vec3::NEG_Z).abs() < 1e-6);
        // +Z → разворот на PI
        assert!((yaw_from_direction(Vec3::Z).abs() - PI).abs() < 1e-6);
        // Quat::from_rotation_y(yaw) восстанавливает направление
        let dir = Vec3::new(1.0, 0.0, -1.0).normalize();
        let yaw = yaw_from_direction(dir);
        let rebuilt = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
        assert!((rebuilt - dir).length() < 1e-5);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(PI + FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        assert!((wrap_angle(-PI - FRAC_PI_2) - FRAC_PI_2).abs() < 1e-6);
        assert!((wrap_angle(0.3) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_face_direction_ignores_vertical() {
        let mut transform = Transform::default();
        face_direction(&mut transform, Vec3::new(0.0, 5.0, -1.0));
        let forward = transform.rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);

        // Нулевая горизонталь — no-op
        let before = transform.rotation;
        face_direction(&mut transform, Vec3::Y);
        assert_eq!(transform.rotation, before);
    }
}
