use gpui::IntoElement;

use crate::theme::{ColorValue, ComponentPatch};
use crate::tokens::PaletteKey;

fn into_any(element: impl IntoElement) -> gpui::AnyElement {
    element.into_any_element()
}

fn assert_render_once<T: gpui::RenderOnce>() {}

#[test]
fn components_are_render_once() {
    assert_render_once::<crate::components::StopSwitch>();
    assert_render_once::<crate::components::AnnotatedTextarea>();
}

#[test]
fn prelude_smoke_builds_components() {
    use crate::prelude::*;

    let _ = into_any(
        StopSwitch::new()
            .with_id("mode")
            .stops(4)
            .bounds(160.0, 40.0)
            .default_index(1)
            .size(Size::Lg)
            .radius(Radius::Pill)
            .motion(MotionConfig::new().level(MotionLevel::Reduced))
            .on_position_changed(|_, _, _| {}),
    );
    let _ = into_any(
        AnnotatedTextarea::new()
            .with_id("notes")
            .placeholder("Notes")
            .floating_placeholder(true)
            .show_counter(true)
            .counter_limit(140)
            .alignment(TextAlign::Center)
            .on_change(|_, _, _| {}),
    );
}

#[test]
fn stop_colors_builder_validates_against_stop_count() {
    use crate::prelude::*;

    let accents = vec![ColorValue::White, ColorValue::Black];
    assert_eq!(
        StopSwitch::new().try_stop_colors(accents.clone()).err(),
        Some(ConfigError::StopColorMismatch {
            stops: 3,
            colors: 2
        })
    );
    assert!(StopSwitch::new().stops(2).try_stop_colors(accents).is_ok());
}

#[test]
fn theme_overrides_reach_components() {
    use crate::prelude::*;

    let _ = into_any(StopSwitch::new().theme(|mut patch: ComponentPatch| {
        patch.stop_switch.stop_accents = Some(vec![
            ColorValue::palette(PaletteKey::Teal, 6),
            ColorValue::palette(PaletteKey::Orange, 6),
        ]);
        patch
    }));
    let _ = into_any(AnnotatedTextarea::new().theme(|mut patch: ComponentPatch| {
        patch.annotated_textarea.tint = Some(ColorValue::custom("#ff0066"));
        patch
    }));
}

#[test]
fn provider_accepts_theme_patches() {
    let patch = crate::theme::ThemePatch {
        primary_color: Some(PaletteKey::Green),
        ..Default::default()
    };
    let _provider = crate::DialProvider::new().patch_theme(&patch);
}
