//! Входящие события от engine-слоя
//!
//! Анимация, коллизии и input живут снаружи; сюда приходят только
//! edge-triggered сигналы, мутирующие флаги симуляции. Читаются на
//! ближайшем FixedUpdate тике.

use bevy::prelude::*;

use crate::engine::commands::MontageClip;

/// Animation cue: notify-сигнал из проигрываемого клипа
///
/// Аналог anim-called callback'ов: клип в нужном кадре дергает
/// симуляцию (окно урона открылось, stumble закончился и т.д.).
#[derive(Event, Debug, Clone)]
pub struct AnimationCue {
    pub entity: Entity,
    pub kind: CueKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueKind {
    /// Окно урона замаха открыто/закрыто
    DamageWindow(bool),
    /// Клип двигает актора вперед (attack-lunge фаза)
    MovingForward(bool),
    /// Клип двигает актора назад (stumble-фаза)
    MovingBackwards(bool),
    /// Рывок к цели: доворот + шаг вперед
    AttackLunge,
    /// Комбо: следующий удар потенциально разрешен
    NextAttackReady,
    /// Замах закончился
    AttackEnd,
    /// Stumble закончился
    StumbleEnd,
    /// Roll начался (скорость переключается на rolling)
    RollStart,
    /// Roll закончился (скорость возвращается по режиму боя)
    RollEnd,
    /// Клип доигран до конца (death → destruction)
    ClipFinished(MontageClip),
}

/// Overlap callback detection-сферы игрока
///
/// Ownership не передается — только membership в NearbyEnemies.
#[derive(Event, Debug, Clone)]
pub struct DetectionEvent {
    /// У кого detection-сфера
    pub observer: Entity,
    /// Кто вошел/вышел
    pub other: Entity,
    /// true = begin overlap, false = end overlap
    pub entered: bool,
}

/// Актор оторвался от земли / приземлился
#[derive(Event, Debug, Clone)]
pub struct AirborneChanged {
    pub entity: Entity,
    pub airborne: bool,
}

/// Дискретное действие игрока (input binding service уже размапил кнопки)
#[derive(Event, Debug, Clone)]
pub struct PlayerAction {
    pub entity: Entity,
    pub kind: PlayerActionKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerActionKind {
    Attack,
    Roll,
    CycleTarget { clockwise: bool },
    ToggleCombatMode,
}

/// Снимок overlap'ов оружейного объема (engine пишет каждый тик)
///
/// Симуляция читает его только пока окно урона открыто; сам collision
/// detection — снаружи.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct WeaponContacts {
    pub overlapping: Vec<Entity>,
}

/// Позиция и yaw камеры (engine пишет; cycling цели и roll камеро-относительны)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
}

impl CameraPose {
    /// Горизонтальный forward камеры
    pub fn forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::NEG_Z
    }

    /// Горизонтальный right камеры
    pub fn right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::X
    }
}
