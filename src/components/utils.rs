use gpui::{Hsla, Pixels, Styled, Window, px};

use crate::style::Radius;
use crate::theme::{ColorValue, Theme};
use crate::tokens::RADIUS_PX;

pub fn resolve_hsla(theme: &Theme, token: &ColorValue) -> Hsla {
    theme.resolve_hsla(token)
}

/// Explicit override when set, theme token otherwise.
pub fn resolve_override(theme: &Theme, value: Option<&ColorValue>, token: &ColorValue) -> Hsla {
    theme.resolve_hsla(value.unwrap_or(token))
}

pub fn radius_px(radius: Radius) -> Pixels {
    match radius {
        Radius::Xs => px(RADIUS_PX.xs),
        Radius::Sm => px(RADIUS_PX.sm),
        Radius::Md => px(RADIUS_PX.md),
        Radius::Lg => px(RADIUS_PX.lg),
        Radius::Xl => px(RADIUS_PX.xl),
        Radius::Pill => px(9999.0),
    }
}

pub fn apply_radius<T: Styled>(div: T, radius: Radius) -> T {
    div.rounded(radius_px(radius))
}

pub fn offset_with_progress(offset_px: i16, progress: f32) -> f32 {
    let full = offset_px as f32;
    full * (1.0 - progress)
}

fn scale_factor(window: &Window) -> f32 {
    window.scale_factor().max(f32::EPSILON)
}

pub fn snap_px(window: &Window, logical_px: f32) -> Pixels {
    if !logical_px.is_finite() {
        return px(0.0);
    }
    let scale = scale_factor(window);
    px((logical_px * scale).round() / scale)
}

pub fn hairline_px(window: &Window) -> Pixels {
    px(1.0 / scale_factor(window))
}

pub fn quantized_stroke_px(window: &Window, logical_px: f32) -> Pixels {
    if !logical_px.is_finite() || logical_px <= 0.0 {
        return px(0.0);
    }
    let snapped = snap_px(window, logical_px);
    if f32::from(snapped) > 0.0 {
        snapped
    } else {
        hairline_px(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_shrinks_to_zero_at_full_progress() {
        assert_eq!(offset_with_progress(8, 0.0), 8.0);
        assert_eq!(offset_with_progress(8, 0.5), 4.0);
        assert_eq!(offset_with_progress(8, 1.0), 0.0);
    }

    #[test]
    fn override_color_wins_over_token() {
        let theme = Theme::default();
        let token = ColorValue::White;
        assert_eq!(
            resolve_override(&theme, Some(&ColorValue::Black), &token),
            theme.resolve_hsla(&ColorValue::Black)
        );
        assert_eq!(
            resolve_override(&theme, None, &token),
            theme.resolve_hsla(&token)
        );
    }
}
