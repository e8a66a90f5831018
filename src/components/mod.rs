mod annotated_text_state;
mod annotated_textarea;
pub(crate) mod control;
mod stop_switch;
mod stop_switch_state;
mod transition;
mod utils;

#[cfg(test)]
mod test_state_logic;

pub use annotated_text_state::{
    BorderStyle, DecoratedText, DecorationChange, DecorationConfig, DecorationVisuals,
    EditBuffer, EditDecision, LabelTone, VisibilityChange, apply_insert, floating_label_offset,
    format_counter,
};
pub use annotated_textarea::AnnotatedTextarea;
pub use stop_switch::StopSwitch;
pub use stop_switch_state::{
    DEFAULT_STOP_COUNT, LaneRect, StopPalette, StopSwitchConfig, StopSwitchMachine, StopTrack,
    StopTransition, drive_transition,
};
pub use transition::{TransitionExt, TransitionStage};
