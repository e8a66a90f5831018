use std::{rc::Rc, time::Duration};

use gpui::{
    Animation, AnimationExt, AnyElement, Component, FocusHandle, InteractiveElement, IntoElement,
    ParentElement, RenderOnce, SharedString, StatefulInteractiveElement, Styled, Window, canvas,
    div, px,
};

use crate::contracts::{MotionAware, SizeConfigurable, WithId};
use crate::id::ComponentId;
use crate::motion::{
    Easing, MotionConfig, MotionLevel, MotionTransition, TransitionPreset, settle_after,
};
use crate::style::{Radius, Size, TextAlign};
use crate::tokens::MOTION_DURATIONS;

use super::annotated_text_state::{
    DecoratedText, DecorationChange, DecorationConfig, DecorationVisuals, EditBuffer, LabelTone,
    VisibilityChange, char_len, floating_label_offset,
};
use super::control;
use super::transition::{TransitionExt, TransitionStage};
use super::utils::{apply_radius, quantized_stroke_px, resolve_hsla};

type ChangeHandler = Rc<dyn Fn(SharedString, &mut Window, &mut gpui::App)>;
type FocusChangeHandler = Rc<dyn Fn(bool, &mut Window, &mut gpui::App)>;

const CARET_BLINK_CYCLE_MS: u64 = 1_360;
const LABEL_CHAR_WIDTH_PX: f32 = 6.5;
const VALUE_SLOT: &str = "value";
const CARET_SLOT: &str = "caret-index";
const LABEL_APPEAR_SLOT: &str = "label-appear";
const COUNTER_APPEAR_SLOT: &str = "counter-appear";
const COUNTER_DISAPPEAR_SLOT: &str = "counter-disappear";
const COUNTER_LEAVING_SLOT: &str = "counter-leaving";
const COUNTER_TEXT_SLOT: &str = "counter-text";
const HANDLE_FOCUS_SLOT: &str = "handle-focused";
const BOX_WIDTH_SLOT: &str = "box-width";

struct EditTarget {
    id: ComponentId,
    decoration: DecorationConfig,
    value_controlled: bool,
    on_change: Option<ChangeHandler>,
    counter_fade: Duration,
}

/// Multi-line text field with a floating label, a character counter and a
/// bottom border that highlights on focus.
pub struct AnnotatedTextarea {
    id: ComponentId,
    value: Option<SharedString>,
    value_controlled: bool,
    default_value: SharedString,
    decoration: DecorationConfig,
    min_rows: usize,
    disabled: bool,
    size: Size,
    radius: Radius,
    theme: crate::theme::LocalTheme,
    style: gpui::StyleRefinement,
    motion: MotionConfig,
    focus_handle: Option<FocusHandle>,
    on_change: Option<ChangeHandler>,
    on_focus_change: Option<FocusChangeHandler>,
}

impl AnnotatedTextarea {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            id: ComponentId::auto("annotated-textarea"),
            value: None,
            value_controlled: false,
            default_value: SharedString::default(),
            decoration: DecorationConfig::default(),
            min_rows: 3,
            disabled: false,
            size: Size::Md,
            radius: Radius::Sm,
            theme: crate::theme::LocalTheme::default(),
            style: gpui::StyleRefinement::default(),
            motion: MotionConfig::default(),
            focus_handle: None,
            on_change: None,
            on_focus_change: None,
        }
    }

    pub fn value(mut self, value: impl Into<SharedString>) -> Self {
        self.value = Some(value.into());
        self.value_controlled = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<SharedString>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn decoration(mut self, decoration: DecorationConfig) -> Self {
        self.decoration = decoration;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        let placeholder = placeholder.into();
        self.decoration.placeholder = (!placeholder.is_empty()).then(|| placeholder.to_string());
        self
    }

    pub fn floating_placeholder(mut self, enabled: bool) -> Self {
        self.decoration.floating_placeholder_enabled = enabled;
        self
    }

    pub fn show_counter(mut self, show: bool) -> Self {
        self.decoration.show_counter = show;
        self
    }

    /// Maximum character count; `0` removes the limit.
    pub fn counter_limit(mut self, limit: usize) -> Self {
        self.decoration.counter_limit = limit;
        self
    }

    pub fn bottom_border(mut self, enabled: bool) -> Self {
        self.decoration.bottom_border_enabled = enabled;
        self
    }

    pub fn border_widths(mut self, resting: f32, focused: f32) -> Self {
        self.decoration.bottom_border_width = resting.max(0.0);
        self.decoration.bottom_border_highlight_width = focused.max(0.0);
        self
    }

    pub fn padding(mut self, horizontal: f32, vertical: f32) -> Self {
        self.decoration.padding = (horizontal.max(0.0), vertical.max(0.0));
        self
    }

    pub fn floating_label_margin(mut self, margin: f32) -> Self {
        self.decoration.floating_label_bottom_margin = margin.max(0.0);
        self
    }

    pub fn alignment(mut self, alignment: TextAlign) -> Self {
        self.decoration.alignment = alignment;
        self
    }

    pub fn min_rows(mut self, rows: usize) -> Self {
        self.min_rows = rows.max(1);
        self
    }

    pub fn disabled(mut self, value: bool) -> Self {
        self.disabled = value;
        self
    }

    pub fn focus_handle(mut self, focus_handle: FocusHandle) -> Self {
        self.focus_handle = Some(focus_handle);
        self
    }

    pub fn on_change(
        mut self,
        handler: impl Fn(SharedString, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.on_change = Some(Rc::new(handler));
        self
    }

    pub fn on_focus_change(
        mut self,
        handler: impl Fn(bool, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.on_focus_change = Some(Rc::new(handler));
        self
    }

    /// Empties the uncontrolled value kept for `id`.
    pub fn clear(id: &str) {
        control::set_text_state(id, VALUE_SLOT, String::new());
        control::set_text_state(id, CARET_SLOT, "0".to_string());
    }

    fn resolved_value(&self) -> String {
        let controlled = self
            .value_controlled
            .then(|| self.value.clone().unwrap_or_default().to_string());
        control::text_state(
            &self.id,
            VALUE_SLOT,
            controlled,
            self.default_value.to_string(),
        )
    }

    fn caret_for(id: &str, value: &str) -> usize {
        let len = char_len(value);
        control::text_state(id, CARET_SLOT, None, len.to_string())
            .parse::<usize>()
            .map(|caret| caret.min(len))
            .unwrap_or(len)
    }

    /// Bumps the appear or disappear generation of every decoration whose
    /// visibility flipped so its transition plays once.
    pub(super) fn record_change(
        id: &str,
        config: &DecorationConfig,
        previous: &str,
        next: &str,
    ) -> DecorationChange {
        let mut decorated = DecoratedText::new(config.clone()).with_text(previous);
        let leaving_counter = decorated.visuals().counter_text.clone();
        let change = decorated.set_text(next);

        if change.floating_label == VisibilityChange::Appear {
            let generation = control::index_state(id, LABEL_APPEAR_SLOT, 0);
            control::set_index_state(id, LABEL_APPEAR_SLOT, generation + 1);
        }
        match change.counter {
            VisibilityChange::Appear => {
                let generation = control::index_state(id, COUNTER_APPEAR_SLOT, 0);
                control::set_index_state(id, COUNTER_APPEAR_SLOT, generation + 1);
                control::set_bool_state(id, COUNTER_LEAVING_SLOT, false);
            }
            VisibilityChange::Disappear => {
                let generation = control::index_state(id, COUNTER_DISAPPEAR_SLOT, 0);
                control::set_index_state(id, COUNTER_DISAPPEAR_SLOT, generation + 1);
                control::set_bool_state(id, COUNTER_LEAVING_SLOT, true);
                control::set_text_state(
                    id,
                    COUNTER_TEXT_SLOT,
                    leaving_counter.unwrap_or_default(),
                );
            }
            VisibilityChange::Unchanged => {}
        }
        change
    }

    /// Unmounts the fading counter once the exit tagged `generation` is over.
    /// Returns false when a newer appear or disappear superseded it.
    pub(super) fn finish_counter_exit(id: &str, generation: usize) -> bool {
        let current = control::index_state(id, COUNTER_DISAPPEAR_SLOT, 0);
        let leaving = control::bool_state(id, COUNTER_LEAVING_SLOT, None, false);
        if current != generation || !leaving {
            return false;
        }
        control::set_bool_state(id, COUNTER_LEAVING_SLOT, false);
        true
    }

    fn schedule_counter_exit(id: &str, fade: Duration, window: &mut Window, cx: &mut gpui::App) {
        let generation = control::index_state(id, COUNTER_DISAPPEAR_SLOT, 0);
        let id = id.to_string();
        let window_handle = window.window_handle();
        cx.spawn(async move |cx| {
            settle_after(fade).await;
            let _ = window_handle.update(cx, |_, window, _| {
                if Self::finish_counter_exit(&id, generation) {
                    window.refresh();
                }
            });
        })
        .detach();
    }

    /// Mirrors focus moves made through the focus handle (keyboard
    /// navigation, programmatic focus) into the tracked focus state. Returns
    /// the new focus when it differs from what was last reported.
    pub(super) fn sync_handle_focus(id: &str, handle_focused: bool) -> Option<bool> {
        let was_focused = control::bool_state(id, HANDLE_FOCUS_SLOT, None, false);
        control::set_bool_state(id, HANDLE_FOCUS_SLOT, handle_focused);
        if was_focused == handle_focused {
            return None;
        }
        let tracked = control::focused_state(id, None, false);
        control::set_focused_state(id, handle_focused);
        (tracked != handle_focused).then_some(handle_focused)
    }

    fn commit_edit(
        target: &EditTarget,
        previous: &str,
        buffer: EditBuffer,
        window: &mut Window,
        cx: &mut gpui::App,
    ) {
        control::set_text_state(&target.id, CARET_SLOT, buffer.caret.to_string());
        if buffer.value != previous {
            let change =
                Self::record_change(&target.id, &target.decoration, previous, &buffer.value);
            if change.counter == VisibilityChange::Disappear {
                Self::schedule_counter_exit(&target.id, target.counter_fade, window, cx);
            }
            if !target.value_controlled {
                control::set_text_state(&target.id, VALUE_SLOT, buffer.value.clone());
            }
            if let Some(handler) = target.on_change.as_ref() {
                (handler)(buffer.value.into(), window, cx);
            }
        }
        window.refresh();
    }

    fn line_height_px(&self) -> f32 {
        match self.size {
            Size::Xs => 16.0,
            Size::Sm => 18.0,
            Size::Md => 20.0,
            Size::Lg => 24.0,
            Size::Xl => 28.0,
        }
    }

    fn apply_text_size<T: Styled>(&self, node: T) -> T {
        match self.size {
            Size::Xs => node.text_xs(),
            Size::Sm => node.text_sm(),
            Size::Md => node.text_base(),
            Size::Lg => node.text_lg(),
            Size::Xl => node.text_xl(),
        }
    }

    fn apply_alignment<T: Styled>(&self, node: T) -> T {
        match self.decoration.alignment {
            TextAlign::Left => node.text_left(),
            TextAlign::Center => node.text_center(),
            TextAlign::Right => node.text_right(),
        }
    }

    fn render_floating_label(&self, visuals: &DecorationVisuals) -> Option<AnyElement> {
        if !visuals.floating_label_visible {
            return None;
        }
        let label = self.decoration.placeholder.clone()?;
        let tokens = &self.theme.components.annotated_textarea;
        let color = match visuals.floating_label_tone {
            LabelTone::Focused => resolve_hsla(&self.theme, &tokens.tint),
            LabelTone::Resting => resolve_hsla(&self.theme, &tokens.floating_label),
        };

        let (padding_x, padding_y) = self.decoration.padding;
        let box_width = control::number_state(&self.id, BOX_WIDTH_SLOT).unwrap_or(0.0);
        let label_width = char_len(&label) as f32 * LABEL_CHAR_WIDTH_PX;
        let left = padding_x
            + floating_label_offset(
                self.decoration.alignment,
                (box_width - padding_x * 2.0).max(0.0),
                label_width,
            );

        let generation = control::index_state(&self.id, LABEL_APPEAR_SLOT, 0);
        let profile = MotionTransition::new()
            .preset(TransitionPreset::FadeUp)
            .duration_ms(MOTION_DURATIONS.label_ms)
            .offset_px(4)
            .easing(Easing::EaseOut);
        let duration = self.motion.scaled(profile.duration_ms);

        let node = div()
            .absolute()
            .top(px(padding_y))
            .left(px(left))
            .h(px(self.decoration.floating_label_line_height))
            .text_xs()
            .text_color(color)
            .child(label);

        let node = if self.motion.level == MotionLevel::None {
            node.with_enter_transition(self.id.slot(&format!("label-{generation}")), self.motion)
        } else {
            node.with_transition_profile(
                self.id.slot(&format!("label-{generation}")),
                profile,
                TransitionStage::Enter,
                duration,
            )
        };
        Some(node.into_any_element())
    }

    fn render_counter(&self, visuals: &DecorationVisuals) -> Option<AnyElement> {
        let tokens = &self.theme.components.annotated_textarea;
        let duration = self.motion.scaled(MOTION_DURATIONS.fade_ms);
        let counter = |text: String| {
            div()
                .w_full()
                .flex()
                .justify_end()
                .pr(px(self.decoration.padding.0))
                .text_xs()
                .text_color(resolve_hsla(&self.theme, &tokens.counter))
                .child(text)
        };

        if visuals.counter_visible {
            let text = visuals.counter_text.clone()?;
            let generation = control::index_state(&self.id, COUNTER_APPEAR_SLOT, 0);
            return Some(
                counter(text)
                    .with_animation(
                        self.id.slot(&format!("counter-{generation}")),
                        Animation::new(duration).with_easing(gpui::ease_in_out),
                        |this, delta| this.opacity(delta),
                    )
                    .into_any_element(),
            );
        }

        if !self.decoration.show_counter
            || !control::bool_state(&self.id, COUNTER_LEAVING_SLOT, None, false)
        {
            return None;
        }
        let text = control::text_state(&self.id, COUNTER_TEXT_SLOT, None, String::new());
        let generation = control::index_state(&self.id, COUNTER_DISAPPEAR_SLOT, 0);
        let profile = MotionTransition::new()
            .preset(TransitionPreset::Fade)
            .duration_ms(MOTION_DURATIONS.fade_ms)
            .easing(Easing::EaseInOut);
        Some(
            counter(text)
                .with_transition_profile(
                    self.id.slot(&format!("counter-exit-{generation}")),
                    profile,
                    TransitionStage::Exit,
                    duration,
                )
                .into_any_element(),
        )
    }

    fn render_lines(&self, value: &str, caret: usize, focused: bool) -> AnyElement {
        let tokens = &self.theme.components.annotated_textarea;
        let line_height = self.line_height_px();
        let tint = resolve_hsla(&self.theme, &tokens.tint);

        let mut content = div().w_full().flex().flex_col();
        if value.is_empty() {
            let mut row = div().w_full().h(px(line_height)).flex().items_center();
            if focused && !self.disabled {
                row = row.child(self.render_caret(line_height, tint));
            }
            if let Some(placeholder) = self.decoration.placeholder.clone() {
                row = row.child(
                    div()
                        .text_color(resolve_hsla(&self.theme, &tokens.placeholder))
                        .child(placeholder),
                );
            }
            return content.child(row).into_any_element();
        }

        let mut line_start = 0usize;
        for line in value.split('\n') {
            let line_len = char_len(line);
            let caret_here =
                focused && !self.disabled && caret >= line_start && caret <= line_start + line_len;
            let row = div().w_full().min_h(px(line_height));
            let row = if caret_here {
                let column = caret - line_start;
                let left = line.chars().take(column).collect::<String>();
                let right = line.chars().skip(column).collect::<String>();
                let row = match self.decoration.alignment {
                    TextAlign::Left => row.flex().justify_start(),
                    TextAlign::Center => row.flex().justify_center(),
                    TextAlign::Right => row.flex().justify_end(),
                };
                row.items_center()
                    .child(left)
                    .child(self.render_caret(line_height, tint))
                    .child(right)
            } else if line.is_empty() {
                row.child(" ")
            } else {
                self.apply_alignment(row).child(line.to_string())
            };
            content = content.child(row);
            line_start += line_len + 1;
        }
        content.into_any_element()
    }

    fn render_caret(&self, line_height: f32, color: gpui::Hsla) -> AnyElement {
        div()
            .flex_none()
            .w(px(1.5))
            .h(px(line_height * 0.8))
            .bg(color)
            .with_animation(
                self.id.slot("caret-blink"),
                Animation::new(Duration::from_millis(CARET_BLINK_CYCLE_MS))
                    .repeat()
                    .with_easing(gpui::linear),
                |this, delta| this.opacity(if (delta * 2.0).fract() < 0.5 { 1.0 } else { 0.0 }),
            )
            .into_any_element()
    }

    fn render_field(&self, window: &Window) -> AnyElement {
        let tokens = self.theme.components.annotated_textarea.clone();
        let value = self.resolved_value();
        let caret = Self::caret_for(&self.id, &value);
        let tracked_focus = control::focused_state(&self.id, None, false);
        let focused = tracked_focus
            || self
                .focus_handle
                .as_ref()
                .is_some_and(|handle| handle.is_focused(window));
        let visuals = DecorationVisuals::derive(&self.decoration, &value, focused);

        let (padding_x, padding_y) = self.decoration.padding;
        let line_height = self.line_height_px();
        let rows = value.split('\n').count().max(self.min_rows);
        let box_height = rows as f32 * line_height + visuals.text_inset_top + padding_y * 2.0;

        let mut field = div()
            .id(self.id.slot("field"))
            .focusable()
            .relative()
            .w_full()
            .min_h(px(box_height))
            .px(px(visuals.text_inset_x))
            .pt(px(padding_y + visuals.text_inset_top))
            .pb(px(padding_y))
            .bg(resolve_hsla(&self.theme, &tokens.bg))
            .text_color(resolve_hsla(&self.theme, &tokens.fg));
        field = apply_radius(field, self.radius);
        field = self.apply_text_size(field);

        field = field.child({
            let id_for_metrics = self.id.clone();
            canvas(
                move |bounds, _, _cx| {
                    control::set_number_state(
                        &id_for_metrics,
                        BOX_WIDTH_SLOT,
                        Some(f32::from(bounds.size.width)),
                    );
                },
                |_, _, _, _| {},
            )
            .absolute()
            .size_full()
        });

        field = field
            .children(self.render_floating_label(&visuals))
            .child(self.render_lines(&value, caret, focused));

        if let Some(border) = visuals.border {
            let color = if border.focused {
                resolve_hsla(&self.theme, &tokens.tint)
            } else {
                resolve_hsla(&self.theme, &tokens.border)
            };
            field = field.child(
                div()
                    .absolute()
                    .left_0()
                    .bottom_0()
                    .w_full()
                    .h(quantized_stroke_px(window, border.width))
                    .bg(color),
            );
        }

        if self.disabled {
            field = field.cursor_default().opacity(0.55);
        } else {
            field = field.cursor_text();

            let id_for_focus = self.id.clone();
            let handle_for_focus = self.focus_handle.clone();
            let focus_handler = self.on_focus_change.clone();
            let caret_end = char_len(&value);
            field = field.on_mouse_down(gpui::MouseButton::Left, move |_, window, cx| {
                if let Some(handle) = handle_for_focus.as_ref() {
                    window.focus(handle);
                }
                if !control::focused_state(&id_for_focus, None, false) {
                    control::set_focused_state(&id_for_focus, true);
                    control::set_text_state(&id_for_focus, CARET_SLOT, caret_end.to_string());
                    log::trace!("annotated textarea {id_for_focus} focused");
                    if let Some(handler) = focus_handler.as_ref() {
                        (handler)(true, window, cx);
                    }
                }
                window.refresh();
            });

            let id_for_blur = self.id.clone();
            let blur_handler = self.on_focus_change.clone();
            field = field.on_mouse_down_out(move |_, window, cx| {
                if control::focused_state(&id_for_blur, None, false) {
                    control::set_focused_state(&id_for_blur, false);
                    log::trace!("annotated textarea {id_for_blur} blurred");
                    if let Some(handler) = blur_handler.as_ref() {
                        (handler)(false, window, cx);
                    }
                    window.refresh();
                }
            });

            if let Some(handle) = self.focus_handle.as_ref() {
                field = field.track_focus(handle);
            }

            let target = EditTarget {
                id: self.id.clone(),
                decoration: self.decoration.clone(),
                value_controlled: self.value_controlled,
                on_change: self.on_change.clone(),
                counter_fade: self.motion.scaled(MOTION_DURATIONS.fade_ms),
            };
            let current = value.clone();
            field = field.on_key_down(move |event, window, cx| {
                let limit = target.decoration.counter_limit;
                let mut buffer = EditBuffer::new(current.clone(), caret);
                let modifiers =
                    event.keystroke.modifiers.control || event.keystroke.modifiers.platform;

                if modifiers && event.keystroke.key == "v" {
                    let Some(pasted) = cx.read_from_clipboard().and_then(|item| item.text())
                    else {
                        return;
                    };
                    if !buffer.insert(&pasted, limit) {
                        return;
                    }
                } else if modifiers || event.keystroke.modifiers.function {
                    return;
                } else {
                    buffer.apply_key(
                        &event.keystroke.key,
                        event.keystroke.key_char.as_deref(),
                        limit,
                    );
                }

                Self::commit_edit(&target, &current, buffer, window, cx);
            });
        }

        gpui::Refineable::refine(gpui::Styled::style(&mut field), &self.style);
        field.into_any_element()
    }
}

impl WithId for AnnotatedTextarea {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn id_mut(&mut self) -> &mut ComponentId {
        &mut self.id
    }
}

impl SizeConfigurable for AnnotatedTextarea {
    fn size(mut self, value: Size) -> Self {
        self.size = value;
        self
    }

    fn radius(mut self, value: Radius) -> Self {
        self.radius = value;
        self
    }
}

impl MotionAware for AnnotatedTextarea {
    fn motion(mut self, value: MotionConfig) -> Self {
        self.motion = value;
        self
    }
}

impl RenderOnce for AnnotatedTextarea {
    fn render(mut self, window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        self.theme.sync_from_provider(cx);
        if let Some(handle) = self.focus_handle.as_ref()
            && let Some(focused) = Self::sync_handle_focus(&self.id, handle.is_focused(window))
        {
            log::trace!("annotated textarea {} focus moved to {focused}", self.id);
            if let Some(handler) = self.on_focus_change.clone() {
                window.defer(cx, move |window, cx| (handler)(focused, window, cx));
            }
        }
        let value = self.resolved_value();
        let focused = control::focused_state(&self.id, None, false);
        let visuals = DecorationVisuals::derive(&self.decoration, &value, focused);

        div()
            .id(self.id.clone())
            .w_full()
            .flex()
            .flex_col()
            .gap(px(2.0))
            .child(self.render_field(window))
            .children(self.render_counter(&visuals))
    }
}

impl IntoElement for AnnotatedTextarea {
    type Element = Component<Self>;

    fn into_element(self) -> Self::Element {
        Component::new(self)
    }
}

impl crate::contracts::ComponentThemeOverridable for AnnotatedTextarea {
    fn local_theme_mut(&mut self) -> &mut crate::theme::LocalTheme {
        &mut self.theme
    }
}

crate::impl_disableable!(AnnotatedTextarea);

impl gpui::Styled for AnnotatedTextarea {
    fn style(&mut self) -> &mut gpui::StyleRefinement {
        &mut self.style
    }
}
