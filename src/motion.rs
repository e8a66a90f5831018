use std::time::Duration;

use futures_timer::Delay;

use crate::tokens::MOTION_DURATIONS;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MotionLevel {
    Full,
    Reduced,
    None,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransitionPreset {
    None,
    Fade,
    FadeUp,
    FadeDown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MotionTransition {
    pub preset: TransitionPreset,
    pub duration_ms: u16,
    pub delay_ms: u16,
    pub offset_px: i16,
    pub start_opacity_pct: u8,
    pub easing: Easing,
}

impl Default for MotionTransition {
    fn default() -> Self {
        Self {
            preset: TransitionPreset::Fade,
            duration_ms: MOTION_DURATIONS.fade_ms,
            delay_ms: 0,
            offset_px: 8,
            start_opacity_pct: 0,
            easing: Easing::EaseOut,
        }
    }
}

impl MotionTransition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset(mut self, preset: TransitionPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn duration_ms(mut self, duration_ms: u16) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn delay_ms(mut self, delay_ms: u16) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn offset_px(mut self, offset_px: i16) -> Self {
        self.offset_px = offset_px;
        self
    }

    pub fn start_opacity_pct(mut self, start_opacity_pct: u8) -> Self {
        self.start_opacity_pct = start_opacity_pct.min(100);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MotionConfig {
    pub level: MotionLevel,
    pub enter: MotionTransition,
    pub exit: MotionTransition,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            level: MotionLevel::Full,
            enter: MotionTransition::default(),
            exit: MotionTransition::new()
                .preset(TransitionPreset::Fade)
                .easing(Easing::EaseIn),
        }
    }
}

impl MotionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: MotionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn enter(mut self, enter: MotionTransition) -> Self {
        self.enter = enter;
        self
    }

    pub fn exit(mut self, exit: MotionTransition) -> Self {
        self.exit = exit;
        self
    }

    /// Scales a nominal duration by the motion level. `None` collapses to 1 ms
    /// so completion callbacks still run on a later frame.
    pub fn scaled(&self, duration_ms: u16) -> Duration {
        let ms = match self.level {
            MotionLevel::Full => u64::from(duration_ms),
            MotionLevel::Reduced => u64::from(duration_ms / 2),
            MotionLevel::None => 0,
        };
        Duration::from_millis(ms.max(1))
    }
}

/// Resolves after `duration`, independent of the executor driving it.
pub async fn settle_after(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    Delay::new(duration).await;
}
