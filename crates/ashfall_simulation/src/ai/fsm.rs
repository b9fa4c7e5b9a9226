//! FSM врага: Idle → ChaseClose → Attack → Stumble → Dead (+ ChaseFar, Taunt)
//!
//! Один тик — одна проверка активного состояния. Переходы — side effects
//! пер-state логики; централизованно защищен только поглощающий Dead
//! (см. [`EnemyState::set`]).

use std::collections::HashMap;

use bevy::prelude::*;
use rand::Rng;

use crate::combat::rotation::face_direction;
use crate::combat::swing::pick_attack_index;
use crate::components::{
    begin_swing, AnimationSet, AttackSwing, Combatant, Enemy, EnemyConfig, EnemyState,
    NavigationAgent, Target,
};
use crate::engine::{MontageClip, MovementImpulse, PlayMontage, PlaySound, SoundCue};
use crate::DeterministicRng;

/// Dot product forward-вектора и направления к цели, разрешающий атаку
pub const FACING_ALIGNMENT_THRESHOLD: f32 = 0.95;

/// Проходит ли facing-гейт атаки
pub fn facing_aligned(forward: Vec3, to_target: Vec3) -> bool {
    forward.dot(to_target.normalize_or_zero()) > FACING_ALIGNMENT_THRESHOLD
}

/// Система: тик конечного автомата врага
///
/// Фаза 1 собирает позиции целей (split borrow через ParamSet),
/// фаза 2 прогоняет пер-state логику.
#[allow(clippy::type_complexity)]
pub fn enemy_state_machine(
    mut set: ParamSet<(
        Query<(Entity, &Target), With<Enemy>>,
        Query<&Transform>,
        Query<
            (
                Entity,
                &mut EnemyState,
                &mut Combatant,
                &mut AttackSwing,
                &mut Transform,
                &mut NavigationAgent,
                &Target,
                &EnemyConfig,
                &AnimationSet,
            ),
            With<Enemy>,
        >,
    )>,
    mut rng: ResMut<DeterministicRng>,
    mut montages: EventWriter<PlayMontage>,
    mut sounds: EventWriter<PlaySound>,
) {
    // Фаза 1: позиции целей (невалидная цель = None, деградация в no-op)
    let pairs: Vec<(Entity, Option<Entity>)> = set
        .p0()
        .iter()
        .map(|(entity, target)| (entity, target.0))
        .collect();

    let mut target_positions: HashMap<Entity, Vec3> = HashMap::new();
    {
        let transforms = set.p1();
        for (entity, target) in &pairs {
            if let Some(target_entity) = target {
                if let Ok(transform) = transforms.get(*target_entity) {
                    target_positions.insert(*entity, transform.translation);
                }
            }
        }
    }

    // Фаза 2: пер-state логика
    for (
        entity,
        mut state,
        mut combatant,
        mut swing,
        mut transform,
        mut nav,
        target,
        config,
        animations,
    ) in set.p2().iter_mut()
    {
        let target_position = target_positions.get(&entity).copied();
        let distance_to_target =
            target_position.map(|p| transform.translation.distance(p));

        match *state {
            EnemyState::Idle => {
                if let Some(distance) = distance_to_target {
                    if distance < config.chase_close_distance {
                        combatant.target_locked = true;
                        state.set(EnemyState::ChaseClose);
                        crate::logger::log(&format!("AI: {:?} Idle → ChaseClose", entity));
                    }
                }
            }

            EnemyState::ChaseClose => {
                let in_attack_range = distance_to_target
                    .is_some_and(|d| d < config.attack_distance);

                if in_attack_range {
                    let position = target_position.unwrap_or(transform.translation);
                    let to_target = position - transform.translation;
                    let forward = transform.rotation * Vec3::NEG_Z;

                    if facing_aligned(forward, to_target)
                        && !combatant.attacking
                        && !combatant.stumbling
                    {
                        start_enemy_attack(
                            entity,
                            &mut state,
                            &mut combatant,
                            &mut swing,
                            &mut transform,
                            &mut nav,
                            target_position,
                            animations,
                            false,
                            &mut rng.rng,
                            &mut montages,
                            &mut sounds,
                        );
                    }
                } else if let Some(target_entity) = target.0 {
                    if !nav.following_path {
                        nav.follow(target_entity);
                    }
                }
            }

            EnemyState::ChaseFar => {
                if distance_to_target.is_some_and(|d| d < config.chase_close_distance) {
                    state.set(EnemyState::ChaseClose);
                }
            }

            // Hit check замаха — общая система weapon_hit_check;
            // lunge-движение — enemy_state_motion
            EnemyState::Attack => {}

            EnemyState::Stumble => {
                // Флаг снимает animation cue StumbleEnd
                if !combatant.stumbling {
                    state.set(EnemyState::ChaseClose);
                }
            }

            // Зарезервировано
            EnemyState::Taunt => {}

            // Терминальное: тик — no-op
            EnemyState::Dead => {}
        }
    }
}

/// Запуск атаки врага
///
/// Останавливает путь, опционально доворачивает к цели, выбирает
/// случайный клип и открывает замах; звуковой выкрик — функция четности
/// индекса клипа, не отдельный бросок.
#[allow(clippy::too_many_arguments)]
fn start_enemy_attack(
    entity: Entity,
    state: &mut EnemyState,
    combatant: &mut Combatant,
    swing: &mut AttackSwing,
    transform: &mut Transform,
    nav: &mut NavigationAgent,
    target_position: Option<Vec3>,
    animations: &AnimationSet,
    rotate: bool,
    rng: &mut impl Rng,
    montages: &mut EventWriter<PlayMontage>,
    sounds: &mut EventWriter<PlaySound>,
) {
    begin_swing(combatant, swing);
    combatant.moving_forward = false;
    combatant.moving_backwards = false;
    state.set(EnemyState::Attack);
    nav.stop();

    if rotate {
        if let Some(position) = target_position {
            face_direction(transform, position - transform.translation);
        }
    }

    let index = pick_attack_index(rng, animations.attack_clips);
    montages.write(PlayMontage {
        entity,
        clip: MontageClip::Attack(index),
    });
    sounds.write(PlaySound {
        entity,
        cue: SoundCue::Attack(index % 2),
    });
}

/// Система: движение, диктуемое активным состоянием
///
/// Attack: lunge вперед, пока анимация держит moving-forward.
/// Stumble: отползание назад через движковый movement input.
pub fn enemy_state_motion(
    mut enemies: Query<
        (Entity, &EnemyState, &Combatant, &EnemyConfig, &mut Transform),
        With<Enemy>,
    >,
    mut impulses: EventWriter<MovementImpulse>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, state, combatant, config, mut transform) in enemies.iter_mut() {
        match *state {
            EnemyState::Attack if combatant.moving_forward => {
                let forward = transform.rotation * Vec3::NEG_Z;
                transform.translation += forward * config.move_speed * delta;
            }
            EnemyState::Stumble if combatant.stumbling && combatant.moving_backwards => {
                let backward = -(transform.rotation * Vec3::NEG_Z);
                impulses.write(MovementImpulse {
                    entity,
                    direction: backward,
                    scale: config.stumble_backpedal_speed * delta,
                });
            }
            _ => {}
        }
    }
}
