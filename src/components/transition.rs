use std::time::Duration;

use gpui::{Animation, AnimationElement, AnimationExt, ElementId, Styled, px};

use crate::motion::{Easing, MotionConfig, MotionLevel, MotionTransition, TransitionPreset};

use super::utils::offset_with_progress;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransitionStage {
    Enter,
    Exit,
}

pub trait TransitionExt: Sized + AnimationExt + Styled + 'static {
    fn with_transition(
        self,
        id: impl Into<ElementId>,
        motion: MotionConfig,
        stage: TransitionStage,
    ) -> AnimationElement<Self> {
        if motion.level == MotionLevel::None {
            let settled = match stage {
                TransitionStage::Enter => 1.0,
                TransitionStage::Exit => 0.0,
            };
            let profile = match stage {
                TransitionStage::Enter => motion.enter,
                TransitionStage::Exit => motion.exit,
            };
            return self.with_animation(
                id,
                Animation::new(Duration::from_millis(1)),
                move |this, _| apply_preset(this, profile, settled),
            );
        }

        let profile = match stage {
            TransitionStage::Enter => motion.enter,
            TransitionStage::Exit => motion.exit,
        };

        self.with_transition_profile(id, profile, stage, motion.scaled(profile.duration_ms))
    }

    fn with_enter_transition(
        self,
        id: impl Into<ElementId>,
        motion: MotionConfig,
    ) -> AnimationElement<Self> {
        self.with_transition(id, motion, TransitionStage::Enter)
    }

    fn with_exit_transition(
        self,
        id: impl Into<ElementId>,
        motion: MotionConfig,
    ) -> AnimationElement<Self> {
        self.with_transition(id, motion, TransitionStage::Exit)
    }

    fn with_transition_profile(
        self,
        id: impl Into<ElementId>,
        profile: MotionTransition,
        stage: TransitionStage,
        duration: Duration,
    ) -> AnimationElement<Self> {
        let easing = easing_fn(profile.easing);
        let animation = Animation::new(duration).with_easing(easing);

        if profile.delay_ms > 0 {
            let idle = Animation::new(Duration::from_millis(profile.delay_ms as u64));
            return self.with_animations(id, vec![idle, animation], move |this, ix, delta| {
                if ix == 0 {
                    apply_preset(this, profile, stage_progress(stage, 0.0))
                } else {
                    apply_preset(this, profile, stage_progress(stage, delta))
                }
            });
        }

        self.with_animation(id, animation, move |this, delta| {
            apply_preset(this, profile, stage_progress(stage, delta))
        })
    }
}

impl<E> TransitionExt for E where E: Sized + AnimationExt + Styled + 'static {}

fn stage_progress(stage: TransitionStage, delta: f32) -> f32 {
    match stage {
        TransitionStage::Enter => delta,
        TransitionStage::Exit => 1.0 - delta,
    }
}

pub(crate) fn easing_fn(easing: Easing) -> impl Fn(f32) -> f32 {
    move |delta| match easing {
        Easing::Linear => gpui::linear(delta),
        Easing::EaseIn => gpui::quadratic(delta),
        Easing::EaseOut => gpui::ease_out_quint()(delta),
        Easing::EaseInOut => gpui::ease_in_out(delta),
    }
}

fn apply_preset<E: Styled>(element: E, profile: MotionTransition, progress: f32) -> E {
    let progress = progress.clamp(0.0, 1.0);
    let start_opacity = (profile.start_opacity_pct as f32 / 100.0).clamp(0.0, 1.0);
    let opacity = start_opacity + (1.0 - start_opacity) * progress;

    match profile.preset {
        TransitionPreset::None => element,
        TransitionPreset::Fade => element.opacity(opacity),
        TransitionPreset::FadeUp => element
            .opacity(opacity)
            .mt(px(offset_with_progress(profile.offset_px, progress))),
        TransitionPreset::FadeDown => element
            .opacity(opacity)
            .mt(px(-offset_with_progress(profile.offset_px, progress))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_runs_progress_backwards() {
        assert_eq!(stage_progress(TransitionStage::Enter, 0.25), 0.25);
        assert_eq!(stage_progress(TransitionStage::Exit, 0.25), 0.75);
    }
}
