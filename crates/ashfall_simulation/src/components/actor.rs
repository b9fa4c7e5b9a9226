//! Общая боевая база: Health, Combatant, AttackSwing, StumbleMemory, RotationFollow
//!
//! Игрок и враг не наследуются друг от друга — оба собираются из этих
//! компонентов, а вариантная логика живет в marker-компонентах
//! (`Player`/`Enemy`) и их системах.

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }
}

/// Боевые флаги и урон актора (общая часть игрока и врага)
///
/// Флаги мутируются двумя источниками: тиковыми системами симуляции и
/// animation-cue событиями от engine-слоя (damage window, конец stumble
/// и т.д.). Всё читается на следующем тике — локов не нужно.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Combatant {
    /// Урон одного удара
    pub damage: f32,
    /// Может ли входящий урон прервать текущее действие (stumble)
    pub interruptable: bool,
    /// Терминальный флаг: после установки меняется только despawn'ом
    pub dead: bool,
    /// В воздухе (engine-слой сигналит через AirborneChanged)
    pub airborne: bool,

    pub attacking: bool,
    /// Окно урона открыто (анимация сигналит DamageWindow)
    pub attack_damaging: bool,
    /// Анимация разрешила следующий удар комбо
    pub next_attack_ready: bool,
    pub moving_forward: bool,
    pub moving_backwards: bool,
    pub stumbling: bool,
    /// Режим боя: facing контролируется захватом цели, не движением
    pub target_locked: bool,

    /// Шаг вперед при attack-lunge (вызывается анимацией)
    pub lunge_distance: f32,
}

impl Default for Combatant {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Combatant {
    pub fn new(damage: f32) -> Self {
        Self {
            damage,
            interruptable: true,
            dead: false,
            airborne: false,
            attacking: false,
            attack_damaging: false,
            next_attack_ready: false,
            moving_forward: false,
            moving_backwards: false,
            stumbling: false,
            target_locked: false,
            lunge_distance: 70.0,
        }
    }

    /// Конец замаха: сбрасывает attacking и разрешение следующего удара
    pub fn end_attack(&mut self) {
        self.attacking = false;
        self.next_attack_ready = false;
    }

    /// Вход в stumble: прерывает атаку и сбрасывает движковые флаги
    pub fn enter_stumble(&mut self) {
        self.end_attack();
        self.moving_forward = false;
        self.moving_backwards = false;
        self.stumbling = true;
    }
}

/// Hit-dedup множество текущего замаха
///
/// Очищается ровно один раз — на старте замаха. Пока окно урона открыто,
/// overlap-проверки могут приходить каждый тик; множество гарантирует
/// не больше одного успешного попадания по цели за замах.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct AttackSwing {
    pub hit_entities: Vec<Entity>,
}

impl AttackSwing {
    pub fn has_hit(&self, entity: Entity) -> bool {
        self.hit_entities.contains(&entity)
    }

    pub fn record_hit(&mut self, entity: Entity) {
        if !self.hit_entities.contains(&entity) {
            self.hit_entities.push(entity);
        }
    }

    pub fn clear(&mut self) {
        self.hit_entities.clear();
    }
}

/// Старт замаха (общий контракт игрока и врага)
///
/// Precondition-проверки (не атакуем/не stumbling) — ответственность
/// вызывающего.
pub fn begin_swing(combatant: &mut Combatant, swing: &mut AttackSwing) {
    combatant.attacking = true;
    combatant.next_attack_ready = false;
    combatant.attack_damaging = false;
    swing.clear();
}

/// Память о последнем stumble-клипе (исключает повтор подряд)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct StumbleMemory {
    pub last_index: usize,
}

/// Сколько клипов доступно аниматору (данные дизайнера)
///
/// Сами клипы живут в engine-слое; симуляция выбирает только индекс.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AnimationSet {
    pub attack_clips: usize,
    pub stumble_clips: usize,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self {
            attack_clips: 3,
            stumble_clips: 2,
        }
    }
}

/// Плавный доворот к цели + последняя угловая скорость (для анимации)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct RotationFollow {
    pub enabled: bool,
    /// Коэффициент интерполяции (умножается на delta time)
    pub smoothing: f32,
    /// Угловая скорость последнего тика, рад (аниматор читает для lean'а)
    pub last_speed: f32,
}

impl Default for RotationFollow {
    fn default() -> Self {
        Self {
            enabled: true,
            smoothing: 5.0,
            last_speed: 0.0,
        }
    }
}

/// Слабая ссылка на цель
///
/// Entity может despawn'иться в любой момент — валидность обязана
/// проверяться query-lookup'ом перед каждым использованием.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Target(pub Option<Entity>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100.0);
        assert_eq!(health.current, 100.0);

        health.take_damage(30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        health.take_damage(100.0); // Clamp к нулю
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_begin_swing_resets_dedup_and_flags() {
        let mut combatant = Combatant::new(25.0);
        let mut swing = AttackSwing::default();
        swing.record_hit(Entity::PLACEHOLDER);
        combatant.next_attack_ready = true;
        combatant.attack_damaging = true;

        begin_swing(&mut combatant, &mut swing);

        assert!(combatant.attacking);
        assert!(!combatant.next_attack_ready);
        assert!(!combatant.attack_damaging);
        assert!(swing.hit_entities.is_empty());
    }

    #[test]
    fn test_swing_dedup() {
        let mut swing = AttackSwing::default();
        let e = Entity::PLACEHOLDER;

        assert!(!swing.has_hit(e));
        swing.record_hit(e);
        swing.record_hit(e); // Дубликат — no-op
        assert!(swing.has_hit(e));
        assert_eq!(swing.hit_entities.len(), 1);
    }

    #[test]
    fn test_enter_stumble_cancels_attack() {
        let mut combatant = Combatant::new(10.0);
        combatant.attacking = true;
        combatant.next_attack_ready = true;
        combatant.moving_forward = true;

        combatant.enter_stumble();

        assert!(!combatant.attacking);
        assert!(!combatant.next_attack_ready);
        assert!(!combatant.moving_forward);
        assert!(combatant.stumbling);
    }
}
