use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::tokens::{ColorScale, PaletteCatalog, PaletteKey};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorScheme {
    Light,
    Dark,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ColorValue {
    Palette { key: PaletteKey, shade: u8 },
    White,
    Black,
    Custom(String),
}

impl ColorValue {
    pub const fn palette(key: PaletteKey, shade: u8) -> Self {
        Self::Palette { key, shade }
    }

    pub fn custom(value: impl Into<String>) -> Self {
        Self::Custom(value.into())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StopSwitchTokens {
    pub track_bg: ColorValue,
    pub lane: ColorValue,
    pub thumb: ColorValue,
    /// Accent per stop; reused cyclically when a switch has more stops.
    pub stop_accents: Vec<ColorValue>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnnotatedTextareaTokens {
    pub bg: ColorValue,
    pub fg: ColorValue,
    pub placeholder: ColorValue,
    pub floating_label: ColorValue,
    pub counter: ColorValue,
    pub border: ColorValue,
    pub tint: ColorValue,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentTokens {
    pub stop_switch: StopSwitchTokens,
    pub annotated_textarea: AnnotatedTextareaTokens,
}

impl ComponentTokens {
    pub fn defaults(primary: PaletteKey) -> Self {
        Self::defaults_for(primary, ColorScheme::Light)
    }

    pub fn defaults_for(primary: PaletteKey, scheme: ColorScheme) -> Self {
        let stop_accents = vec![
            ColorValue::palette(PaletteKey::Yellow, 5),
            ColorValue::palette(PaletteKey::Blue, 6),
            ColorValue::palette(PaletteKey::Red, 6),
        ];
        match scheme {
            ColorScheme::Light => Self {
                stop_switch: StopSwitchTokens {
                    track_bg: ColorValue::custom("#BFBFBF40"),
                    lane: ColorValue::palette(PaletteKey::Green, 5),
                    thumb: ColorValue::palette(PaletteKey::Red, 6),
                    stop_accents,
                },
                annotated_textarea: AnnotatedTextareaTokens {
                    bg: ColorValue::White,
                    fg: ColorValue::palette(PaletteKey::Dark, 9),
                    placeholder: ColorValue::palette(PaletteKey::Gray, 5),
                    floating_label: ColorValue::palette(PaletteKey::Gray, 5),
                    counter: ColorValue::palette(PaletteKey::Gray, 5),
                    border: ColorValue::palette(PaletteKey::Gray, 4),
                    tint: ColorValue::palette(primary, 6),
                },
            },
            ColorScheme::Dark => Self {
                stop_switch: StopSwitchTokens {
                    track_bg: ColorValue::custom("#FFFFFF1A"),
                    lane: ColorValue::palette(PaletteKey::Green, 8),
                    thumb: ColorValue::palette(PaletteKey::Red, 5),
                    stop_accents,
                },
                annotated_textarea: AnnotatedTextareaTokens {
                    bg: ColorValue::palette(PaletteKey::Dark, 7),
                    fg: ColorValue::palette(PaletteKey::Gray, 0),
                    placeholder: ColorValue::palette(PaletteKey::Dark, 2),
                    floating_label: ColorValue::palette(PaletteKey::Dark, 2),
                    counter: ColorValue::palette(PaletteKey::Dark, 2),
                    border: ColorValue::palette(PaletteKey::Dark, 4),
                    tint: ColorValue::palette(primary, 4),
                },
            },
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Theme {
    pub white: &'static str,
    pub black: &'static str,
    pub primary_color: PaletteKey,
    pub color_scheme: ColorScheme,
    pub palette: BTreeMap<PaletteKey, ColorScale>,
    pub components: ComponentTokens,
}

impl Default for Theme {
    fn default() -> Self {
        let primary = PaletteKey::Blue;
        Self {
            white: "#fff",
            black: "#000",
            primary_color: primary,
            color_scheme: ColorScheme::Light,
            palette: PaletteCatalog::store(),
            components: ComponentTokens::defaults_for(primary, ColorScheme::Light),
        }
    }
}

impl Theme {
    pub fn with_primary_color(mut self, primary: PaletteKey) -> Self {
        self.primary_color = primary;
        self.components = ComponentTokens::defaults_for(primary, self.color_scheme);
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self.components = ComponentTokens::defaults_for(self.primary_color, scheme);
        self
    }

    pub fn with_palette_override(mut self, key: PaletteKey, scale: ColorScale) -> Self {
        self.palette.insert(key, scale);
        self
    }

    pub fn resolve_color(&self, token: &ColorValue) -> String {
        match token {
            ColorValue::Palette { key, shade } => self
                .palette
                .get(key)
                .and_then(|scale| scale.get(*shade as usize))
                .unwrap_or(&self.black)
                .to_string(),
            ColorValue::White => self.white.to_string(),
            ColorValue::Black => self.black.to_string(),
            ColorValue::Custom(value) => value.clone(),
        }
    }

    pub fn resolve_hsla(&self, token: &ColorValue) -> gpui::Hsla {
        let raw = self.resolve_color(token);
        gpui::Rgba::try_from(raw.as_str())
            .map(Into::into)
            .unwrap_or_else(|_| gpui::black())
    }

    pub fn merged(&self, patch: &ThemePatch) -> Self {
        let mut next = self.clone();
        if let Some(primary) = patch.primary_color {
            next = next.with_primary_color(primary);
        }
        if let Some(color_scheme) = patch.color_scheme {
            next = next.with_color_scheme(color_scheme);
        }
        for (key, value) in &patch.palette_overrides {
            next.palette.insert(*key, *value);
        }
        next.components = patch.components.apply(next.components);
        next
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StopSwitchPatch {
    pub track_bg: Option<ColorValue>,
    pub lane: Option<ColorValue>,
    pub thumb: Option<ColorValue>,
    pub stop_accents: Option<Vec<ColorValue>>,
}

impl StopSwitchPatch {
    fn apply(&self, mut current: StopSwitchTokens) -> StopSwitchTokens {
        if let Some(value) = &self.track_bg {
            current.track_bg = value.clone();
        }
        if let Some(value) = &self.lane {
            current.lane = value.clone();
        }
        if let Some(value) = &self.thumb {
            current.thumb = value.clone();
        }
        if let Some(value) = &self.stop_accents
            && !value.is_empty()
        {
            current.stop_accents = value.clone();
        }
        current
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AnnotatedTextareaPatch {
    pub bg: Option<ColorValue>,
    pub fg: Option<ColorValue>,
    pub placeholder: Option<ColorValue>,
    pub floating_label: Option<ColorValue>,
    pub counter: Option<ColorValue>,
    pub border: Option<ColorValue>,
    pub tint: Option<ColorValue>,
}

impl AnnotatedTextareaPatch {
    fn apply(&self, mut current: AnnotatedTextareaTokens) -> AnnotatedTextareaTokens {
        if let Some(value) = &self.bg {
            current.bg = value.clone();
        }
        if let Some(value) = &self.fg {
            current.fg = value.clone();
        }
        if let Some(value) = &self.placeholder {
            current.placeholder = value.clone();
        }
        if let Some(value) = &self.floating_label {
            current.floating_label = value.clone();
        }
        if let Some(value) = &self.counter {
            current.counter = value.clone();
        }
        if let Some(value) = &self.border {
            current.border = value.clone();
        }
        if let Some(value) = &self.tint {
            current.tint = value.clone();
        }
        current
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ComponentPatch {
    pub stop_switch: StopSwitchPatch,
    pub annotated_textarea: AnnotatedTextareaPatch,
}

impl ComponentPatch {
    fn apply(&self, current: ComponentTokens) -> ComponentTokens {
        ComponentTokens {
            stop_switch: self.stop_switch.apply(current.stop_switch),
            annotated_textarea: self.annotated_textarea.apply(current.annotated_textarea),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ThemePatch {
    pub primary_color: Option<PaletteKey>,
    pub color_scheme: Option<ColorScheme>,
    pub palette_overrides: BTreeMap<PaletteKey, ColorScale>,
    pub components: ComponentPatch,
}

#[derive(Clone, Default)]
pub struct LocalTheme {
    resolved: Option<Arc<Theme>>,
    component_patch: Option<ComponentPatch>,
}

impl LocalTheme {
    pub fn set_component_patch(&mut self, patch: Option<ComponentPatch>) {
        self.component_patch = patch;
        self.resolved = None;
    }

    pub fn update_component_patch(&mut self, configure: impl FnOnce(ComponentPatch) -> ComponentPatch) {
        let current = self.component_patch.take().unwrap_or_default();
        self.set_component_patch(Some(configure(current)));
    }

    pub fn sync_from_provider(&mut self, cx: &gpui::App) {
        let base = crate::provider::DialProvider::theme_arc_or_default(cx);
        self.resolve_against(base);
    }

    fn resolve_against(&mut self, base: Arc<Theme>) {
        if let Some(component_patch) = &self.component_patch {
            let mut merged = base.as_ref().clone();
            merged.components = component_patch.apply(merged.components);
            self.resolved = Some(Arc::new(merged));
        } else {
            self.resolved = Some(base);
        }
    }

    fn fallback_theme() -> &'static Theme {
        static FALLBACK: OnceLock<Theme> = OnceLock::new();
        FALLBACK.get_or_init(Theme::default)
    }
}

impl std::ops::Deref for LocalTheme {
    type Target = Theme;

    fn deref(&self) -> &Self::Target {
        if let Some(resolved) = self.resolved.as_deref() {
            resolved
        } else {
            Self::fallback_theme()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::COLOR_STOPS;

    #[test]
    fn default_theme_uses_blue_as_primary_color() {
        let theme = Theme::default();
        assert_eq!(theme.primary_color, PaletteKey::Blue);
        assert_eq!(
            theme.resolve_color(&theme.components.annotated_textarea.tint),
            theme.palette[&PaletteKey::Blue][6]
        );
    }

    #[test]
    fn default_palette_is_complete() {
        let theme = Theme::default();
        assert_eq!(theme.palette.len(), crate::tokens::PALETTE_KEYS.len());
        assert_eq!(theme.palette[&PaletteKey::Blue].len(), COLOR_STOPS);
    }

    #[test]
    fn default_stop_accents_cover_three_stops() {
        let theme = Theme::default();
        assert_eq!(theme.components.stop_switch.stop_accents.len(), 3);
    }

    #[test]
    fn component_patch_overrides_only_target_fields() {
        let base = Theme::default();
        let patch = ThemePatch {
            components: ComponentPatch {
                annotated_textarea: AnnotatedTextareaPatch {
                    tint: Some(ColorValue::palette(PaletteKey::Orange, 8)),
                    ..AnnotatedTextareaPatch::default()
                },
                ..ComponentPatch::default()
            },
            ..ThemePatch::default()
        };
        let next = base.merged(&patch);
        assert_eq!(
            next.resolve_color(&next.components.annotated_textarea.tint),
            base.palette[&PaletteKey::Orange][8]
        );
        assert_eq!(
            next.components.annotated_textarea.border,
            base.components.annotated_textarea.border
        );
        assert_eq!(next.components.stop_switch, base.components.stop_switch);
    }

    #[test]
    fn empty_accent_patch_keeps_theme_accents() {
        let patch = StopSwitchPatch {
            stop_accents: Some(Vec::new()),
            ..StopSwitchPatch::default()
        };
        let tokens = ComponentTokens::defaults(PaletteKey::Blue).stop_switch;
        assert_eq!(patch.apply(tokens.clone()).stop_accents, tokens.stop_accents);
    }

    #[test]
    fn color_scheme_switch_recomputes_component_tokens() {
        let light = Theme::default().with_color_scheme(ColorScheme::Light);
        let dark = Theme::default().with_color_scheme(ColorScheme::Dark);
        assert_ne!(
            light.components.annotated_textarea.bg,
            dark.components.annotated_textarea.bg
        );
        assert_ne!(
            light.components.stop_switch.track_bg,
            dark.components.stop_switch.track_bg
        );
    }

    #[test]
    fn local_theme_applies_component_patch_over_base() {
        let mut local = LocalTheme::default();
        local.update_component_patch(|mut patch| {
            patch.stop_switch.thumb = Some(ColorValue::Black);
            patch
        });
        local.resolve_against(Arc::new(Theme::default()));
        assert_eq!(local.components.stop_switch.thumb, ColorValue::Black);
        assert_eq!(
            local.components.stop_switch.lane,
            Theme::default().components.stop_switch.lane
        );
    }
}
