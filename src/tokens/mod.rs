use std::collections::BTreeMap;

pub const COLOR_STOPS: usize = 10;
pub type ColorScale = [&'static str; COLOR_STOPS];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PaletteKey {
    Dark,
    Gray,
    Red,
    Blue,
    Teal,
    Green,
    Yellow,
    Orange,
}

impl PaletteKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Teal => "teal",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
        }
    }
}

pub const PALETTE_KEYS: [PaletteKey; 8] = [
    PaletteKey::Dark,
    PaletteKey::Gray,
    PaletteKey::Red,
    PaletteKey::Blue,
    PaletteKey::Teal,
    PaletteKey::Green,
    PaletteKey::Yellow,
    PaletteKey::Orange,
];

pub struct PaletteCatalog;

impl PaletteCatalog {
    pub const fn scale(key: PaletteKey) -> ColorScale {
        match key {
            PaletteKey::Dark => [
                "#C9C9C9", "#b8b8b8", "#828282", "#696969", "#424242", "#3b3b3b", "#2e2e2e",
                "#242424", "#1f1f1f", "#141414",
            ],
            PaletteKey::Gray => [
                "#f8f9fa", "#f1f3f5", "#e9ecef", "#dee2e6", "#ced4da", "#adb5bd", "#868e96",
                "#495057", "#343a40", "#212529",
            ],
            PaletteKey::Red => [
                "#fff5f5", "#ffe3e3", "#ffc9c9", "#ffa8a8", "#ff8787", "#ff6b6b", "#fa5252",
                "#f03e3e", "#e03131", "#c92a2a",
            ],
            PaletteKey::Blue => [
                "#e7f5ff", "#d0ebff", "#a5d8ff", "#74c0fc", "#4dabf7", "#339af0", "#228be6",
                "#1c7ed6", "#1971c2", "#1864ab",
            ],
            PaletteKey::Teal => [
                "#e6fcf5", "#c3fae8", "#96f2d7", "#63e6be", "#38d9a9", "#20c997", "#12b886",
                "#0ca678", "#099268", "#087f5b",
            ],
            PaletteKey::Green => [
                "#ebfbee", "#d3f9d8", "#b2f2bb", "#8ce99a", "#69db7c", "#51cf66", "#40c057",
                "#37b24d", "#2f9e44", "#2b8a3e",
            ],
            PaletteKey::Yellow => [
                "#fff9db", "#fff3bf", "#ffec99", "#ffe066", "#ffd43b", "#fcc419", "#fab005",
                "#f59f00", "#f08c00", "#e67700",
            ],
            PaletteKey::Orange => [
                "#fff4e6", "#ffe8cc", "#ffd8a8", "#ffc078", "#ffa94d", "#ff922b", "#fd7e14",
                "#f76707", "#e8590c", "#d9480f",
            ],
        }
    }

    pub fn store() -> BTreeMap<PaletteKey, ColorScale> {
        PALETTE_KEYS
            .into_iter()
            .map(|key| (key, Self::scale(key)))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelScale {
    pub xs: f32,
    pub sm: f32,
    pub md: f32,
    pub lg: f32,
    pub xl: f32,
}

pub const RADIUS_PX: PixelScale = PixelScale {
    xs: 2.0,
    sm: 4.0,
    md: 8.0,
    lg: 16.0,
    xl: 32.0,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DurationScale {
    pub label_ms: u16,
    pub fade_ms: u16,
    pub travel_ms: u16,
    pub ripple_ms: u16,
}

pub const MOTION_DURATIONS: DurationScale = DurationScale {
    label_ms: 450,
    fade_ms: 400,
    travel_ms: 400,
    ripple_ms: 750,
};
