pub use crate::components::{
    AnnotatedTextarea, DecorationConfig, StopSwitch, StopSwitchConfig, TransitionExt,
};
pub use crate::contracts::{
    ComponentThemeOverridable, Disableable, MotionAware, Radiusable, Sizeable, WithId,
};
pub use crate::error::{ConfigError, ConfigResult};
pub use crate::motion::{MotionConfig, MotionLevel};
pub use crate::provider::DialProvider;
pub use crate::style::{Radius, Size, SwipeDirection, TextAlign};
pub use crate::theme::{ColorScheme, ColorValue, Theme, ThemePatch};
