//! Применение урона: прерывание, stumble, смерть
//!
//! Таксономия отказов — только "invalid precondition → no-op / сигнал":
//! - self-damage, уже мертв, roll i-frames → Ignored (0 эффекта)
//! - не-interruptable → Absorbed (урон регистрируется, stagger'а нет,
//!   наружу возвращается ПОЛНАЯ величина — намеренное отличие от нуля)
//! - иначе → Staggered (прерывание, stumble, вычитание здоровья,
//!   переход в смерть при 0)
//!
//! Паник в боевых путях нет; все исходы — значения.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::rotation::face_direction;
use crate::components::{
    AnimationSet, Combatant, EnemyState, Health, NavigationAgent, StumbleMemory,
};

/// Событие: урон нанесен (UI, звуки, эффекты)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: f32,
    pub target_died: bool,
}

/// Событие: комбатант умер (health == 0)
#[derive(Event, Debug, Clone)]
pub struct CombatantDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Контекст входящего удара
#[derive(Debug, Clone, Copy)]
pub struct DamageContext {
    pub instigator: Entity,
    pub instigator_position: Vec3,
    pub amount: f32,
}

/// Исход применения урона
///
/// `applied_amount()` — то, что увидит hit-check: > 0 значит "попадание
/// состоялось" и цель попадает в hit-dedup множество замаха.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Прекондиция не прошла: ноль эффекта
    Ignored,
    /// Урон зарегистрирован, но stagger'а нет (не-interruptable цель)
    Absorbed { amount: f32 },
    /// Полноценное попадание: stumble (+ смерть при исчерпании здоровья)
    Staggered {
        amount: f32,
        stumble_index: usize,
        died: bool,
    },
}

impl DamageOutcome {
    pub fn applied_amount(&self) -> f32 {
        match self {
            DamageOutcome::Ignored => 0.0,
            DamageOutcome::Absorbed { amount } => *amount,
            DamageOutcome::Staggered { amount, .. } => *amount,
        }
    }
}

/// Выбор stumble-клипа: равномерно случайный, но не равный предыдущему
///
/// С единственным клипом выбор вырождается в 0 (re-roll цикл оригинала
/// здесь бы не завершился).
pub fn pick_stumble_index(rng: &mut impl Rng, clip_count: usize, last_index: usize) -> usize {
    if clip_count <= 1 {
        return 0;
    }
    loop {
        let index = rng.gen_range(0..clip_count);
        if index != last_index {
            return index;
        }
    }
}

/// Применить удар к цели (общий контракт игрока и врага)
///
/// Мутирует компоненты цели; side effects наружу (montage, звук,
/// despawn) делает вызывающая система по возвращенному исходу.
#[allow(clippy::too_many_arguments)]
pub fn resolve_damage(
    target: Entity,
    ctx: &DamageContext,
    health: &mut Health,
    combatant: &mut Combatant,
    transform: &mut Transform,
    memory: &mut StumbleMemory,
    animations: &AnimationSet,
    rolling: bool,
    mut enemy_state: Option<&mut EnemyState>,
    nav: Option<&mut NavigationAgent>,
    rng: &mut impl Rng,
) -> DamageOutcome {
    if ctx.instigator == target {
        return DamageOutcome::Ignored;
    }
    if rolling {
        // i-frames: roll полностью игнорирует удар
        return DamageOutcome::Ignored;
    }
    if !health.is_alive() || combatant.dead {
        return DamageOutcome::Ignored;
    }
    if !combatant.interruptable {
        return DamageOutcome::Absorbed { amount: ctx.amount };
    }

    combatant.enter_stumble();
    if let Some(agent) = nav {
        agent.stop();
    }

    let stumble_index = pick_stumble_index(rng, animations.stumble_clips, memory.last_index);
    memory.last_index = stumble_index;

    // Разворот лицом к источнику урона (горизонтальная плоскость)
    face_direction(transform, ctx.instigator_position - transform.translation);

    health.take_damage(ctx.amount);
    let died = !health.is_alive();
    if died {
        combatant.dead = true;
    }

    if let Some(state) = enemy_state.as_deref_mut() {
        state.set(EnemyState::Stumble);
        if died {
            state.set(EnemyState::Dead);
        }
    }

    DamageOutcome::Staggered {
        amount: ctx.amount,
        stumble_index,
        died,
    }
}
