#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Size {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Radius {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    Pill,
}

/// Horizontal alignment of field text; the floating label follows it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Classifies a horizontal drag; shorter drags are taps, not swipes.
    pub fn from_delta(dx: f32, threshold: f32) -> Option<Self> {
        if !dx.is_finite() || dx.abs() < threshold.max(1.0) {
            return None;
        }
        Some(if dx < 0.0 { Self::Left } else { Self::Right })
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}
