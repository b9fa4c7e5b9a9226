//! Hit check замаха: общая система игрока и врага
//!
//! Пока окно урона открыто, каждый тик сверяем снимок overlap'ов оружия
//! с hit-dedup множеством замаха. Порядок атакующих внутри тика не
//! важен: дедупликация по множеству, не по таймингу overlap'а.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::damage::{
    resolve_damage, CombatantDied, DamageContext, DamageDealt, DamageOutcome,
};
use crate::components::{
    AnimationSet, AttackSwing, Combatant, EnemyState, Health, NavigationAgent, Player, PlayerState,
    StumbleMemory,
};
use crate::engine::{
    ActorDisabled, CameraShakeRequest, MontageClip, PlayMontage, PlaySound, SoundCue,
    WeaponContacts,
};
use crate::DeterministicRng;

struct PendingStrike {
    attacker: Entity,
    attacker_position: Vec3,
    attacker_is_player: bool,
    damage: f32,
    candidates: Vec<Entity>,
}

/// Система: проверка попаданий оружия во время окна урона
///
/// Фазы (split borrows через ParamSet):
/// 1. собрать атакующих с открытым окном и их кандидатов (минус self,
///    минус уже попавшие в этом замахе)
/// 2. применить урон к целям, собрать успешные попадания
/// 3. дописать попадания в hit-dedup множества замахов
#[allow(clippy::type_complexity)]
pub fn weapon_hit_check(
    mut set: ParamSet<(
        Query<(
            Entity,
            &Combatant,
            &AttackSwing,
            &WeaponContacts,
            &Transform,
            Option<&Player>,
        )>,
        Query<(
            &mut Health,
            &mut Combatant,
            &mut Transform,
            &mut StumbleMemory,
            &AnimationSet,
            Option<&PlayerState>,
            Option<&mut EnemyState>,
            Option<&mut NavigationAgent>,
        )>,
        Query<&mut AttackSwing>,
    )>,
    mut rng: ResMut<DeterministicRng>,
    mut montages: EventWriter<PlayMontage>,
    mut sounds: EventWriter<PlaySound>,
    mut shakes: EventWriter<CameraShakeRequest>,
    mut disabled: EventWriter<ActorDisabled>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut died_events: EventWriter<CombatantDied>,
) {
    // Фаза 1: атакующие с открытым окном урона
    let mut strikes: Vec<PendingStrike> = Vec::new();
    for (entity, combatant, swing, contacts, transform, player) in set.p0().iter() {
        if !combatant.attacking || !combatant.attack_damaging {
            continue;
        }

        let candidates: Vec<Entity> = contacts
            .overlapping
            .iter()
            .copied()
            .filter(|&other| other != entity && !swing.has_hit(other))
            .collect();

        if candidates.is_empty() {
            continue;
        }

        strikes.push(PendingStrike {
            attacker: entity,
            attacker_position: transform.translation,
            attacker_is_player: player.is_some(),
            damage: combatant.damage,
            candidates,
        });
    }

    // Фаза 2: применение урона
    let mut landed: Vec<(Entity, Entity)> = Vec::new();
    {
        let mut targets = set.p1();
        for strike in &strikes {
            let ctx = DamageContext {
                instigator: strike.attacker,
                instigator_position: strike.attacker_position,
                amount: strike.damage,
            };

            for &target in &strike.candidates {
                // Despawned/не-комбатант — молча пропускаем
                let Ok((
                    mut health,
                    mut combatant,
                    mut transform,
                    mut memory,
                    animations,
                    player_state,
                    enemy_state,
                    nav,
                )) = targets.get_mut(target)
                else {
                    continue;
                };

                let is_player_target = player_state.is_some();
                let is_enemy_target = enemy_state.is_some();
                let rolling = player_state.is_some_and(|p| p.rolling);

                let outcome = resolve_damage(
                    target,
                    &ctx,
                    &mut health,
                    &mut combatant,
                    &mut transform,
                    &mut memory,
                    animations,
                    rolling,
                    enemy_state.map(|s| s.into_inner()),
                    nav.map(|n| n.into_inner()),
                    &mut rng.rng,
                );

                match outcome {
                    DamageOutcome::Ignored => {}
                    DamageOutcome::Absorbed { amount } => {
                        landed.push((strike.attacker, target));
                        damage_dealt.write(DamageDealt {
                            attacker: strike.attacker,
                            target,
                            amount,
                            target_died: false,
                        });
                    }
                    DamageOutcome::Staggered {
                        amount,
                        stumble_index,
                        died,
                    } => {
                        landed.push((strike.attacker, target));

                        montages.write(PlayMontage {
                            entity: target,
                            clip: MontageClip::Stumble(stumble_index),
                        });
                        if is_player_target {
                            sounds.write(PlaySound {
                                entity: target,
                                cue: SoundCue::Hurt,
                            });
                        }

                        if died {
                            montages.write(PlayMontage {
                                entity: target,
                                clip: MontageClip::Death,
                            });
                            if is_enemy_target {
                                disabled.write(ActorDisabled { entity: target });
                            }
                            died_events.write(CombatantDied {
                                entity: target,
                                killer: Some(strike.attacker),
                            });
                            crate::logger::log_info(&format!(
                                "Combatant {:?} killed by {:?}",
                                target, strike.attacker
                            ));
                        }

                        damage_dealt.write(DamageDealt {
                            attacker: strike.attacker,
                            target,
                            amount,
                            target_died: died,
                        });
                    }
                }

                if outcome.applied_amount() > 0.0 && strike.attacker_is_player {
                    shakes.write(CameraShakeRequest {
                        entity: strike.attacker,
                    });
                }
            }
        }
    }

    // Фаза 3: дедупликация — одно успешное попадание по цели за замах
    let mut swings = set.p2();
    for (attacker, target) in landed {
        if let Ok(mut swing) = swings.get_mut(attacker) {
            swing.record_hit(target);
        }
    }
}

/// Выбор клипа атаки врага: равномерно случайный по набору
pub fn pick_attack_index(rng: &mut impl Rng, clip_count: usize) -> usize {
    if clip_count <= 1 {
        return 0;
    }
    rng.gen_range(0..clip_count)
}
