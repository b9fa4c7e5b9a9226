//! Дискретные действия игрока: атака, roll, захват цели, режим боя
//!
//! Input binding service живет в engine-слое и шлет уже размапленные
//! PlayerAction'ы; здесь — гейты, мутации флагов и исходящие запросы
//! на клипы/звуки. Непрерывное движение — player_motion_tick.

use bevy::prelude::*;

use crate::combat::rotation::face_direction;
use crate::components::{
    begin_swing, AnimationSet, AttackSwing, Combatant, Health, InputDirection, NavigationAgent,
    NearbyEnemies, Player, PlayerConfig, PlayerState, Target,
};
use crate::engine::{
    CameraPose, MontageClip, MovementImpulse, PlayMontage, PlayerAction, PlayerActionKind,
    PlaySound, SoundCue,
};
use crate::player::targeting::select_cycle_target;

/// Вход/выход режима боя: скорость, ориентация, захват
///
/// Вне боя персонаж доворачивается по движению (engine-слой читает
/// orient_to_movement); в бою facing держит rotate_toward_target.
pub fn set_in_combat(
    in_combat: bool,
    combatant: &mut Combatant,
    nav: &mut NavigationAgent,
    config: &PlayerConfig,
    target: &mut Target,
) {
    combatant.target_locked = in_combat;
    nav.orient_to_movement = !in_combat;
    nav.max_speed = if in_combat {
        config.combat_move_speed
    } else {
        config.passive_move_speed
    };
    if !in_combat {
        target.0 = None;
    }
}

/// Система: обработка дискретных действий игрока
#[allow(clippy::type_complexity)]
pub fn handle_player_actions(
    mut actions: EventReader<PlayerAction>,
    mut set: ParamSet<(
        Query<
            (
                &mut Combatant,
                &mut PlayerState,
                &mut AttackSwing,
                &mut Transform,
                &mut Target,
                &mut NavigationAgent,
                &PlayerConfig,
                &NearbyEnemies,
                &InputDirection,
                &AnimationSet,
            ),
            With<Player>,
        >,
        Query<&Transform>,
    )>,
    camera: Res<CameraPose>,
    mut montages: EventWriter<PlayMontage>,
    mut sounds: EventWriter<PlaySound>,
) {
    for action in actions.read() {
        match action.kind {
            PlayerActionKind::Attack => {
                let mut players = set.p0();
                let Ok((mut combatant, mut player, mut swing, .., animations)) =
                    players.get_mut(action.entity)
                else {
                    continue;
                };

                // Комбо-гейт: повторный удар только после NextAttackReady
                let can_attack = (!combatant.attacking || combatant.next_attack_ready)
                    && !player.rolling
                    && !combatant.stumbling
                    && !combatant.airborne;
                if !can_attack {
                    continue;
                }

                begin_swing(&mut combatant, &mut swing);

                if player.attack_index >= animations.attack_clips {
                    player.attack_index = 0;
                }
                let index = player.attack_index;
                player.attack_index = index + 1;

                montages.write(PlayMontage {
                    entity: action.entity,
                    clip: MontageClip::Attack(index),
                });
                // Выкрик чередуется по уже продвинутому индексу серии
                sounds.write(PlaySound {
                    entity: action.entity,
                    cue: SoundCue::Attack(player.attack_index % 2),
                });
            }

            PlayerActionKind::Roll => {
                let mut players = set.p0();
                let Ok((mut combatant, mut player, _, mut transform, .., input, _)) =
                    players.get_mut(action.entity)
                else {
                    continue;
                };

                if player.rolling || combatant.stumbling {
                    continue;
                }

                // Roll отменяет серию атак
                combatant.end_attack();
                player.attack_index = 0;

                // Направление: камеро-относительные оси, без input — текущий facing
                let direction = if input.is_zero() {
                    transform.rotation * Vec3::NEG_Z
                } else {
                    camera.forward() * input.forward + camera.right() * input.right
                };
                face_direction(&mut transform, direction);
                player.roll_rotation = transform.rotation;

                // i-frames с первого тика; скорость переключит RollStart cue
                player.rolling = true;
                montages.write(PlayMontage {
                    entity: action.entity,
                    clip: MontageClip::Roll,
                });
            }

            PlayerActionKind::CycleTarget { clockwise } => {
                let (current_target, candidate_entities, self_position) = {
                    let players = set.p0();
                    let Ok((_, _, _, transform, target, _, _, nearby, _, _)) =
                        players.get(action.entity)
                    else {
                        continue;
                    };
                    (target.0, nearby.enemies.clone(), transform.translation)
                };

                // Позиции кандидатов — отдельной фазой (split borrow)
                let mut current: Option<(Entity, Vec3)> = None;
                let mut candidates: Vec<(Entity, Vec3)> = Vec::new();
                {
                    let transforms = set.p1();
                    if let Some(entity) = current_target {
                        if let Ok(tf) = transforms.get(entity) {
                            current = Some((entity, tf.translation));
                        }
                    }
                    for &enemy in &candidate_entities {
                        if let Ok(tf) = transforms.get(enemy) {
                            candidates.push((enemy, tf.translation));
                        }
                    }
                }

                let selected = select_cycle_target(
                    camera.position,
                    current,
                    &candidates,
                    self_position,
                    clockwise,
                );
                if let Some(selected) = selected {
                    let mut players = set.p0();
                    let Ok((mut combatant, _, _, _, mut target, mut nav, config, ..)) =
                        players.get_mut(action.entity)
                    else {
                        continue;
                    };
                    target.0 = Some(selected);
                    // Захват первой цели сам включает режим боя
                    if !combatant.target_locked {
                        set_in_combat(true, &mut combatant, &mut nav, config, &mut target);
                    }
                }
            }

            PlayerActionKind::ToggleCombatMode => {
                let (entering, needs_target, candidate_entities, self_position) = {
                    let players = set.p0();
                    let Ok((combatant, _, _, transform, target, _, _, nearby, _, _)) =
                        players.get(action.entity)
                    else {
                        continue;
                    };
                    (
                        !combatant.target_locked,
                        !combatant.target_locked && target.0.is_none(),
                        nearby.enemies.clone(),
                        transform.translation,
                    )
                };

                // При входе без цели подбираем ближайшего врага
                let acquired = if needs_target {
                    let mut candidates: Vec<(Entity, Vec3)> = Vec::new();
                    {
                        let transforms = set.p1();
                        for &enemy in &candidate_entities {
                            if let Ok(tf) = transforms.get(enemy) {
                                candidates.push((enemy, tf.translation));
                            }
                        }
                    }
                    select_cycle_target(camera.position, None, &candidates, self_position, true)
                } else {
                    None
                };

                let mut players = set.p0();
                let Ok((mut combatant, _, _, _, mut target, mut nav, config, ..)) =
                    players.get_mut(action.entity)
                else {
                    continue;
                };
                set_in_combat(entering, &mut combatant, &mut nav, config, &mut target);
                if needs_target {
                    target.0 = acquired;
                }
            }
        }
    }
}

/// Система: авто-выход из режима боя
///
/// Захват рвется, когда цель despawn'илась, умерла или ушла дальше
/// target_lock_distance.
#[allow(clippy::type_complexity)]
pub fn combat_mode_tick(
    mut set: ParamSet<(
        Query<(Entity, &Combatant, &Target, &Transform, &PlayerConfig), With<Player>>,
        Query<(&Transform, &Health, &Combatant)>,
        Query<(&mut Combatant, &mut Target, &mut NavigationAgent, &PlayerConfig), With<Player>>,
    )>,
) {
    // Фаза 1: захваченные игроки
    let locked: Vec<(Entity, Option<Entity>, Vec3, f32)> = set
        .p0()
        .iter()
        .filter(|(_, combatant, ..)| combatant.target_locked)
        .map(|(entity, _, target, transform, config)| {
            (entity, target.0, transform.translation, config.target_lock_distance)
        })
        .collect();

    // Фаза 2: валидность и дистанция цели
    let mut disengage: Vec<Entity> = Vec::new();
    {
        let targets = set.p1();
        for (player, target, position, lock_distance) in &locked {
            let holds = target.is_some_and(|entity| {
                targets.get(entity).is_ok_and(|(tf, health, combatant)| {
                    health.is_alive()
                        && !combatant.dead
                        && tf.translation.distance(*position) <= *lock_distance
                })
            });
            if !holds {
                disengage.push(*player);
            }
        }
    }

    // Фаза 3: разрыв захвата
    let mut players = set.p2();
    for entity in disengage {
        if let Ok((mut combatant, mut target, mut nav, config)) = players.get_mut(entity) {
            set_in_combat(false, &mut combatant, &mut nav, config, &mut target);
            crate::logger::log(&format!("Player {:?} lost target lock", entity));
        }
    }
}

/// Система: непрерывное движение игрока
///
/// Движение — запросами MovementImpulse: физику, коллизии со стенами и
/// гравитацию исполняет engine-слой.
#[allow(clippy::type_complexity)]
pub fn player_motion_tick(
    players: Query<
        (
            Entity,
            &Combatant,
            &PlayerState,
            &PlayerConfig,
            &NavigationAgent,
            &InputDirection,
            &Transform,
        ),
        With<Player>,
    >,
    camera: Res<CameraPose>,
    time: Res<Time<Fixed>>,
    mut impulses: EventWriter<MovementImpulse>,
) {
    let delta = time.delta_secs();

    for (entity, combatant, player, config, nav, input, transform) in players.iter() {
        if player.rolling {
            // Направление зафиксировано на старте roll'а
            let direction = player.roll_rotation * Vec3::NEG_Z;
            impulses.write(MovementImpulse {
                entity,
                direction,
                scale: config.rolling_speed * delta,
            });
            continue;
        }

        if combatant.stumbling {
            if combatant.moving_backwards {
                let backward = -(transform.rotation * Vec3::NEG_Z);
                impulses.write(MovementImpulse {
                    entity,
                    direction: backward,
                    scale: config.stumble_backpedal_speed * delta,
                });
            }
            continue;
        }

        // Обычное движение залочено атакой; оси камеро-относительны
        if combatant.attacking || input.is_zero() {
            continue;
        }
        let direction =
            (camera.forward() * input.forward + camera.right() * input.right).normalize_or_zero();
        if direction == Vec3::ZERO {
            continue;
        }
        impulses.write(MovementImpulse {
            entity,
            direction,
            scale: nav.max_speed * delta,
        });
    }
}
