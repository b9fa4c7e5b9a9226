//! Исходящие запросы к engine-слою (fire-and-forget)

use bevy::prelude::*;

/// Ссылка на клип по смыслу; конкретные asset'ы резолвит engine-слой
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MontageClip {
    /// Удар из набора атак (индекс выбирает симуляция)
    Attack(usize),
    /// Реакция на попадание (индекс без повтора подряд)
    Stumble(usize),
    /// Кувырок игрока
    Roll,
    /// Терминальная анимация смерти
    Death,
}

/// Запрос: проиграть клип на акторе
#[derive(Event, Debug, Clone)]
pub struct PlayMontage {
    pub entity: Entity,
    pub clip: MontageClip,
}

/// One-shot звук; pitch/volume рандомизирует аудио-сервис
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Боевой выкрик; индекс — функция четности выбранного клипа атаки
    Attack(usize),
    Hurt,
}

/// Запрос: проиграть one-shot звук
#[derive(Event, Debug, Clone)]
pub struct PlaySound {
    pub entity: Entity,
    pub cue: SoundCue,
}

/// Запрос: add-movement-input вектор (roll, stumble-отползание, локомоция)
///
/// Контроллер engine-слоя интегрирует вектор в физику сам.
#[derive(Event, Debug, Clone)]
pub struct MovementImpulse {
    pub entity: Entity,
    pub direction: Vec3,
    pub scale: f32,
}

/// Запрос: легкая тряска камеры (удар игрока попал)
#[derive(Event, Debug, Clone)]
pub struct CameraShakeRequest {
    pub entity: Entity,
}

/// Запрос: выключить tick/collision актора (смерть)
#[derive(Event, Debug, Clone)]
pub struct ActorDisabled {
    pub entity: Entity,
}
