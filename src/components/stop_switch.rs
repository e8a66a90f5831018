use std::rc::Rc;
use std::time::Duration;

use gpui::{
    Animation, AnimationExt, Component, FocusHandle, InteractiveElement, IntoElement,
    MouseButton, ParentElement, RenderOnce, StatefulInteractiveElement, Styled, Window, div,
    px,
};

use crate::contracts::{MotionAware, SizeConfigurable, WithId};
use crate::error::ConfigResult;
use crate::id::ComponentId;
use crate::motion::{Easing, MotionConfig};
use crate::style::{Radius, Size, SwipeDirection};
use crate::theme::ColorValue;

use super::control;
use super::stop_switch_state::{
    StopSwitchConfig, StopSwitchMachine, StopTrack, StopTransition, drive_transition,
};
use super::transition::{TransitionExt, easing_fn};
use super::utils::{radius_px, resolve_hsla, resolve_override};

type PositionChangeHandler = Rc<dyn Fn(usize, &mut Window, &mut gpui::App)>;

const DRAG_ORIGIN_SLOT: &str = "drag-origin";

/// Multi-position switch: a thumb resting on one of several stops, moved one
/// stop at a time by horizontal swipes or the arrow keys.
pub struct StopSwitch {
    id: ComponentId,
    config: StopSwitchConfig,
    default_index: usize,
    disabled: bool,
    theme: crate::theme::LocalTheme,
    style: gpui::StyleRefinement,
    motion: MotionConfig,
    focus_handle: Option<FocusHandle>,
    on_position_changed: Option<PositionChangeHandler>,
}

impl StopSwitch {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            id: ComponentId::auto("stop-switch"),
            config: StopSwitchConfig::default(),
            default_index: 0,
            disabled: false,
            theme: crate::theme::LocalTheme::default(),
            style: gpui::StyleRefinement::default(),
            motion: MotionConfig::default(),
            focus_handle: None,
            on_position_changed: None,
        }
    }

    pub fn config(mut self, config: StopSwitchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stops(mut self, stop_count: usize) -> Self {
        if let Err(error) = self.config.set_stop_count(stop_count) {
            log::warn!("stop switch {}: {error}", self.id);
        }
        self
    }

    pub fn bounds(mut self, width: f32, height: f32) -> Self {
        if let Err(error) = self.config.set_bounds(width, height) {
            log::warn!("stop switch {}: {error}", self.id);
        }
        self
    }

    pub fn try_stop_colors(mut self, colors: Vec<ColorValue>) -> ConfigResult<Self> {
        self.config.set_stop_colors(Some(colors))?;
        Ok(self)
    }

    /// Mismatched palettes are logged and the previous colors stay.
    pub fn stop_colors(mut self, colors: Vec<ColorValue>) -> Self {
        if let Err(error) = self.config.set_stop_colors(Some(colors)) {
            log::warn!("stop switch {}: {error}", self.id);
        }
        self
    }

    pub fn default_index(mut self, index: usize) -> Self {
        self.default_index = index;
        self
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.config.corner_radius = radius.max(0.0);
        self
    }

    pub fn thumb_color(mut self, color: ColorValue) -> Self {
        self.config.thumb_color = Some(color);
        self
    }

    pub fn lane_color(mut self, color: ColorValue) -> Self {
        self.config.lane_color = Some(color);
        self
    }

    pub fn ripple_color(mut self, color: ColorValue) -> Self {
        self.config.ripple_color = Some(color);
        self
    }

    pub fn background_color(mut self, color: ColorValue) -> Self {
        self.config.background_color = Some(color);
        self
    }

    pub fn travel_duration_ms(mut self, duration_ms: u16) -> Self {
        self.config.travel_duration_ms = duration_ms;
        self
    }

    pub fn ripple_duration_ms(mut self, duration_ms: u16) -> Self {
        self.config.ripple_duration_ms = duration_ms;
        self
    }

    pub fn swipe_threshold(mut self, threshold_px: f32) -> Self {
        self.config.swipe_threshold_px = threshold_px.max(1.0);
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

    pub fn on_position_changed(
        mut self,
        handler: impl Fn(usize, &mut Window, &mut gpui::App) + 'static,
    ) -> Self {
        self.on_position_changed = Some(Rc::new(handler));
        self
    }

    /// Committed stop of the switch rendered under `id`, if it has rendered.
    pub fn current_index(id: &str) -> Option<usize> {
        control::stop_machine(id).map(|machine| machine.current_index())
    }

    /// Forgets the runtime state kept for `id`; the next render starts over.
    pub fn reset(id: &str) {
        control::clear_component(id);
    }

    fn bounds_for(size: Size) -> (f32, f32) {
        match size {
            Size::Xs => (72.0, 24.0),
            Size::Sm => (96.0, 32.0),
            Size::Md => (120.0, 40.0),
            Size::Lg => (144.0, 48.0),
            Size::Xl => (168.0, 56.0),
        }
    }

    fn sync_machine(&self) -> Option<StopSwitchMachine> {
        let stop_count = self.config.stop_count();
        let default_index = self.default_index;
        control::with_stop_machine(
            &self.id,
            || StopSwitchMachine::with_initial_index(stop_count, default_index),
            |machine| {
                if machine.stop_count() != stop_count {
                    log::debug!("stop count changed to {stop_count}, resetting machine");
                    *machine = StopSwitchMachine::with_initial_index(stop_count, default_index);
                }
                machine.clone()
            },
        )
    }

    fn begin_swipe(
        id: &ComponentId,
        direction: SwipeDirection,
        travel: Duration,
        handler: Option<PositionChangeHandler>,
        window: &mut Window,
        cx: &mut gpui::App,
    ) {
        let Some(transition) = control::update_stop_machine(id, |machine| machine.swipe(direction))
            .flatten()
        else {
            return;
        };
        window.refresh();

        let id = id.clone();
        let window_handle = window.window_handle();
        cx.spawn(async move |cx| {
            let committed = drive_transition(&id, transition, travel).await;
            let _ = window_handle.update(cx, |_, window, cx| {
                if let Some(index) = committed
                    && let Some(handler) = handler.as_ref()
                {
                    (handler)(index, window, cx);
                }
                window.refresh();
            });
        })
        .detach();
    }

    fn render_thumb(
        &self,
        track: &StopTrack,
        machine: &StopSwitchMachine,
        travel: Duration,
    ) -> gpui::AnyElement {
        let tokens = &self.theme.components.stop_switch;
        let diameter = px(track.thumb_diameter);
        let thumb = div()
            .absolute()
            .top(px(track.thumb_top))
            .w(diameter)
            .h(diameter)
            .rounded_full()
            .shadow_md()
            .bg(resolve_override(
                &self.theme,
                self.config.thumb_color.as_ref(),
                &tokens.thumb,
            ));

        match machine.pending() {
            Some(StopTransition {
                from,
                to,
                generation,
            }) => {
                let track = track.clone();
                thumb
                    .left(px(track.position(from)))
                    .with_animation(
                        self.id.slot(&format!("travel-{generation}")),
                        Animation::new(travel).with_easing(easing_fn(Easing::EaseInOut)),
                        move |this, delta| this.left(px(track.thumb_left_between(from, to, delta))),
                    )
                    .into_any_element()
            }
            None => thumb
                .left(px(track.position(machine.current_index())))
                .into_any_element(),
        }
    }

    fn render_ripple(
        &self,
        track: &StopTrack,
        machine: &StopSwitchMachine,
        accent: gpui::Hsla,
    ) -> Option<gpui::AnyElement> {
        let generation = machine.completed_generation();
        if generation == 0 || machine.is_busy() {
            return None;
        }

        let diameter = track.thumb_diameter;
        let center_x = track.position(machine.current_index()) + diameter / 2.0;
        let center_y = track.thumb_top + diameter / 2.0;
        let scale = self.config.ripple_scale.max(1.0);
        let duration = self.motion.scaled(self.config.ripple_duration_ms);

        let ripple = div()
            .absolute()
            .rounded_full()
            .bg(accent)
            .with_animation(
                self.id.slot(&format!("ripple-{generation}")),
                Animation::new(duration).with_easing(easing_fn(Easing::Linear)),
                move |this, delta| {
                    let size = diameter * (1.0 + (scale - 1.0) * delta);
                    this.left(px(center_x - size / 2.0))
                        .top(px(center_y - size / 2.0))
                        .w(px(size))
                        .h(px(size))
                        .opacity(0.5 * (1.0 - delta))
                },
            );
        Some(ripple.into_any_element())
    }
}

impl WithId for StopSwitch {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn id_mut(&mut self) -> &mut ComponentId {
        &mut self.id
    }
}

impl SizeConfigurable for StopSwitch {
    fn size(self, value: Size) -> Self {
        let (width, height) = Self::bounds_for(value);
        self.bounds(width, height)
    }

    fn radius(mut self, value: Radius) -> Self {
        self.config.corner_radius = f32::from(radius_px(value));
        self
    }
}

impl MotionAware for StopSwitch {
    fn motion(mut self, value: MotionConfig) -> Self {
        self.motion = value;
        self
    }
}

impl RenderOnce for StopSwitch {
    fn render(mut self, _window: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        self.theme.sync_from_provider(cx);
        let machine = self
            .sync_machine()
            .unwrap_or_else(|| StopSwitchMachine::with_initial_index(self.config.stop_count(), 0));
        let track = self.config.track().clone();
        let tokens = self.theme.components.stop_switch.clone();
        let palette = self.config.palette(&tokens.stop_accents);
        let travel = self.motion.scaled(self.config.travel_duration_ms);

        let ripple_index = machine.current_index();
        let accent = match self.config.ripple_color.as_ref() {
            Some(color) => resolve_hsla(&self.theme, color),
            None => palette
                .accent(ripple_index)
                .map(|color| resolve_hsla(&self.theme, color))
                .unwrap_or_else(gpui::black),
        };

        let lane = div()
            .absolute()
            .left(px(track.lane.left))
            .top(px(track.lane.top))
            .w(px(track.lane.width))
            .h(px(track.lane.height))
            .rounded(px(track.lane.radius))
            .bg(resolve_override(
                &self.theme,
                self.config.lane_color.as_ref(),
                &tokens.lane,
            ));

        let mut root = div()
            .id(self.id.clone())
            .relative()
            .w(px(track.width))
            .h(px(track.height))
            .rounded(px(self.config.corner_radius))
            .bg(resolve_override(
                &self.theme,
                self.config.background_color.as_ref(),
                &tokens.track_bg,
            ))
            .child(lane)
            .children(self.render_ripple(&track, &machine, accent))
            .child(self.render_thumb(&track, &machine, travel));

        gpui::Refineable::refine(gpui::Styled::style(&mut root), &self.style);

        if self.disabled {
            root = root.cursor_default().opacity(0.55);
        } else {
            let threshold = self.config.swipe_threshold_px;

            let id_for_down = self.id.clone();
            let focus_for_down = self.focus_handle.clone();
            root = root
                .focusable()
                .cursor_pointer()
                .on_mouse_down(MouseButton::Left, move |event, window, cx| {
                    control::set_number_state(
                        &id_for_down,
                        DRAG_ORIGIN_SLOT,
                        Some(f32::from(event.position.x)),
                    );
                    if let Some(handle) = focus_for_down.as_ref() {
                        window.focus(handle);
                    }
                });

            let release = {
                let id = self.id.clone();
                let handler = self.on_position_changed.clone();
                move |x: f32, window: &mut Window, cx: &mut gpui::App| {
                    let Some(origin) = control::number_state(&id, DRAG_ORIGIN_SLOT) else {
                        return;
                    };
                    control::set_number_state(&id, DRAG_ORIGIN_SLOT, None);
                    if let Some(direction) = SwipeDirection::from_delta(x - origin, threshold) {
                        Self::begin_swipe(&id, direction, travel, handler.clone(), window, cx);
                    }
                }
            };
            let release = Rc::new(release);
            let release_inside = release.clone();
            root = root
                .on_mouse_up(MouseButton::Left, move |event, window, cx| {
                    (release_inside)(f32::from(event.position.x), window, cx);
                })
                .on_mouse_up_out(MouseButton::Left, move |event, window, cx| {
                    (release)(f32::from(event.position.x), window, cx);
                });

            let id_for_keys = self.id.clone();
            let handler_for_keys = self.on_position_changed.clone();
            root = root.on_key_down(move |event, window, cx| {
                if let Some(direction) = SwipeDirection::from_key(&event.keystroke.key) {
                    Self::begin_swipe(
                        &id_for_keys,
                        direction,
                        travel,
                        handler_for_keys.clone(),
                        window,
                        cx,
                    );
                }
            });

            if let Some(handle) = self.focus_handle.as_ref() {
                root = root.track_focus(handle);
            }
        }

        root.with_enter_transition(self.id.slot("enter"), self.motion)
    }
}

impl IntoElement for StopSwitch {
    type Element = Component<Self>;

    fn into_element(self) -> Self::Element {
        Component::new(self)
    }
}

impl crate::contracts::ComponentThemeOverridable for StopSwitch {
    fn local_theme_mut(&mut self) -> &mut crate::theme::LocalTheme {
        &mut self.theme
    }
}

crate::impl_disableable!(StopSwitch);

impl gpui::Styled for StopSwitch {
    fn style(&mut self) -> &mut gpui::StyleRefinement {
        &mut self.style
    }
}
