//! Обработка animation cues: анимация дергает симуляцию
//!
//! Клипы живут в engine-слое и в нужных кадрах шлют edge-triggered
//! события (окно урона, lunge, конец stumble, конец roll'а, доигранная
//! смерть). Здесь они конвертируются в мутации боевых флагов.

use bevy::prelude::*;

use crate::combat::rotation::face_direction;
use crate::components::{
    Combatant, Enemy, EnemyState, NavigationAgent, PlayerConfig, PlayerState, Target,
};
use crate::engine::{AirborneChanged, AnimationCue, CueKind, MontageClip};

/// Система: применение animation cues к боевым флагам
#[allow(clippy::type_complexity)]
pub fn process_animation_cues(
    mut commands: Commands,
    mut cues: EventReader<AnimationCue>,
    mut set: ParamSet<(
        Query<(
            &mut Combatant,
            &mut Transform,
            &Target,
            Option<&mut EnemyState>,
            Option<&mut PlayerState>,
            Option<&mut NavigationAgent>,
            Option<&PlayerConfig>,
            Option<&Enemy>,
        )>,
        Query<&Transform>,
    )>,
) {
    for cue in cues.read() {
        if cue.kind == CueKind::AttackLunge {
            // Доворот к цели + шаг вперед; позицию цели читаем отдельной фазой
            let target_entity = {
                let actors = set.p0();
                actors
                    .get(cue.entity)
                    .ok()
                    .and_then(|(_, _, target, ..)| target.0)
            };
            let target_position = {
                let transforms = set.p1();
                target_entity.and_then(|t| transforms.get(t).ok().map(|tf| tf.translation))
            };

            let mut actors = set.p0();
            if let Ok((combatant, mut transform, ..)) = actors.get_mut(cue.entity) {
                if let Some(position) = target_position {
                    let to_target = position - transform.translation;
                    face_direction(&mut transform, to_target);
                }
                let step = transform.rotation * Vec3::NEG_Z * combatant.lunge_distance;
                transform.translation += step;
            }
            continue;
        }

        let mut actors = set.p0();
        let Ok((
            mut combatant,
            _transform,
            _target,
            enemy_state,
            player_state,
            nav,
            player_config,
            enemy,
        )) = actors.get_mut(cue.entity)
        else {
            continue;
        };

        match cue.kind {
            CueKind::DamageWindow(active) => combatant.attack_damaging = active,
            CueKind::MovingForward(active) => combatant.moving_forward = active,
            CueKind::MovingBackwards(active) => combatant.moving_backwards = active,
            CueKind::NextAttackReady => combatant.next_attack_ready = true,

            CueKind::AttackEnd => {
                combatant.end_attack();
                if let Some(mut state) = enemy_state {
                    state.set(EnemyState::ChaseClose);
                }
                if let Some(mut player) = player_state {
                    // Комбо обнуляется с концом серии
                    player.attack_index = 0;
                }
            }

            CueKind::StumbleEnd => combatant.stumbling = false,

            CueKind::RollStart => {
                if let Some(mut player) = player_state {
                    player.rolling = true;
                }
                combatant.end_attack();
                if let (Some(mut agent), Some(config)) = (nav, player_config) {
                    agent.max_speed = config.rolling_speed;
                }
            }

            CueKind::RollEnd => {
                if let Some(mut player) = player_state {
                    player.rolling = false;
                }
                if let (Some(mut agent), Some(config)) = (nav, player_config) {
                    agent.max_speed = if combatant.target_locked {
                        config.combat_move_speed
                    } else {
                        config.passive_move_speed
                    };
                }
            }

            CueKind::ClipFinished(MontageClip::Death) => {
                // Враг уничтожается после доигранной смерти; труп игрока остается
                if enemy.is_some() {
                    if let Ok(mut entity_commands) = commands.get_entity(cue.entity) {
                        entity_commands.despawn();
                    }
                }
            }

            // Конец прочих клипов и lunge (обработан выше) не интересны
            CueKind::ClipFinished(_) | CueKind::AttackLunge => {}
        }
    }
}

/// Система: синхронизация airborne-флага от engine-слоя
pub fn process_airborne_events(
    mut events: EventReader<AirborneChanged>,
    mut combatants: Query<&mut Combatant>,
) {
    for event in events.read() {
        if let Ok(mut combatant) = combatants.get_mut(event.entity) {
            combatant.airborne = event.airborne;
        }
    }
}
