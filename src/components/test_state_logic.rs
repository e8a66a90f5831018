use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::Duration;

use futures::executor::block_on;

use super::{
    AnnotatedTextarea, StopSwitch, StopSwitchMachine, annotated_text_state, control,
    drive_transition,
};
use crate::style::SwipeDirection;

static STATE_TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

struct StateTestGuard {
    _lock: MutexGuard<'static, ()>,
}

fn guard() -> StateTestGuard {
    let lock = match STATE_TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    control::clear_all();
    StateTestGuard { _lock: lock }
}

impl Drop for StateTestGuard {
    fn drop(&mut self) {
        control::clear_all();
    }
}

const TRAVEL: Duration = Duration::from_millis(5);

fn seed_machine(id: &str, stops: usize, index: usize) {
    control::with_stop_machine(
        id,
        || StopSwitchMachine::with_initial_index(stops, index),
        |_| (),
    );
}

#[test]
fn keyed_machine_commits_after_travel() {
    let _guard = guard();
    seed_machine("switch-a", 3, 0);

    let transition = control::update_stop_machine("switch-a", |machine| {
        machine.swipe(SwipeDirection::Right)
    })
    .flatten()
    .expect("transition starts");
    assert_eq!(StopSwitch::current_index("switch-a"), Some(0));

    let committed = block_on(drive_transition("switch-a", transition, TRAVEL));
    assert_eq!(committed, Some(1));
    assert_eq!(StopSwitch::current_index("switch-a"), Some(1));
    assert!(
        control::stop_machine("switch-a").is_some_and(|machine| !machine.is_busy())
    );
}

#[test]
fn swipe_while_travelling_is_dropped() {
    let _guard = guard();
    seed_machine("switch-b", 3, 1);

    let transition = control::update_stop_machine("switch-b", |machine| machine.swipe_right())
        .flatten()
        .expect("transition starts");

    let (committed, concurrent) = block_on(async {
        futures::join!(drive_transition("switch-b", transition, TRAVEL), async {
            control::update_stop_machine("switch-b", |machine| machine.swipe_left()).flatten()
        })
    });

    assert_eq!(concurrent, None);
    assert_eq!(committed, Some(2));
    assert_eq!(StopSwitch::current_index("switch-b"), Some(2));
}

#[test]
fn completion_is_reported_once_per_transition() {
    let _guard = guard();
    seed_machine("switch-c", 2, 0);

    let transition = control::update_stop_machine("switch-c", |machine| machine.swipe_right())
        .flatten()
        .expect("transition starts");

    let mut notified = Vec::new();
    for _ in 0..2 {
        if let Some(index) = block_on(drive_transition("switch-c", transition, TRAVEL)) {
            notified.push(index);
        }
    }
    assert_eq!(notified, vec![1]);
}

#[test]
fn edge_swipe_leaves_machine_idle() {
    let _guard = guard();
    seed_machine("switch-d", 3, 2);

    let transition =
        control::update_stop_machine("switch-d", |machine| machine.swipe_right()).flatten();
    assert_eq!(transition, None);
    assert!(
        control::stop_machine("switch-d").is_some_and(|machine| !machine.is_busy()
            && machine.generation() == 0)
    );
}

#[test]
fn reset_discards_pending_transition() {
    let _guard = guard();
    seed_machine("switch-e", 3, 0);
    let transition = control::update_stop_machine("switch-e", |machine| machine.swipe_right())
        .flatten()
        .expect("transition starts");

    StopSwitch::reset("switch-e");
    assert_eq!(StopSwitch::current_index("switch-e"), None);
    assert_eq!(block_on(drive_transition("switch-e", transition, TRAVEL)), None);
    assert_eq!(StopSwitch::current_index("switch-e"), None);
}

#[test]
fn update_never_creates_machines() {
    let _guard = guard();
    let touched = control::update_stop_machine("missing", |machine| machine.current_index());
    assert_eq!(touched, None);
    assert!(control::stop_machine("missing").is_none());
}

#[test]
fn each_switch_id_keeps_its_own_position() {
    let _guard = guard();
    seed_machine("left", 3, 0);
    seed_machine("right", 3, 2);

    let transition = control::update_stop_machine("left", |machine| machine.swipe_right())
        .flatten()
        .expect("transition starts");
    block_on(drive_transition("left", transition, TRAVEL));

    assert_eq!(StopSwitch::current_index("left"), Some(1));
    assert_eq!(StopSwitch::current_index("right"), Some(2));
}

#[test]
fn clearing_component_removes_slots_and_machine() {
    let _guard = guard();
    seed_machine("switch-f", 3, 0);
    control::set_number_state("switch-f", "drag-origin", Some(12.0));
    control::set_text_state("other", "value", "keep".into());

    control::clear_component("switch-f");

    assert!(control::stop_machine("switch-f").is_none());
    assert_eq!(control::number_state("switch-f", "drag-origin"), None);
    assert_eq!(
        control::text_state("other", "value", None, String::new()),
        "keep"
    );
}

#[test]
fn textarea_clear_empties_uncontrolled_value() {
    let _guard = guard();
    control::set_text_state("notes", "value", "draft".into());
    control::set_text_state("notes", "caret-index", "5".into());

    AnnotatedTextarea::clear("notes");

    assert_eq!(control::text_state("notes", "value", None, "x".into()), "");
    assert_eq!(
        control::text_state("notes", "caret-index", None, String::new()),
        "0"
    );
}

#[test]
fn controlled_text_overrides_stored_value() {
    let _guard = guard();
    control::set_text_state("notes", "value", "stored".into());
    assert_eq!(
        control::text_state("notes", "value", Some("controlled".into()), String::new()),
        "controlled"
    );
}

#[test]
fn edit_buffer_respects_counter_limit_through_typing() {
    let mut buffer = annotated_text_state::EditBuffer::new("abcd", 4);
    assert!(buffer.apply_key("e", Some("e"), 5));
    assert!(!buffer.apply_key("f", Some("f"), 5));
    assert_eq!(buffer.value, "abcde");
    assert!(buffer.apply_key("backspace", None, 5));
    assert_eq!(buffer.value, "abcd");
}

fn counted() -> annotated_text_state::DecorationConfig {
    annotated_text_state::DecorationConfig {
        show_counter: true,
        counter_limit: 10,
        ..annotated_text_state::DecorationConfig::default()
    }
}

#[test]
fn counter_generations_track_appear_and_disappear() {
    let _guard = guard();
    let config = counted();

    AnnotatedTextarea::record_change("notes", &config, "", "a");
    assert_eq!(control::index_state("notes", "counter-appear", 0), 1);
    assert_eq!(control::index_state("notes", "counter-disappear", 0), 0);

    AnnotatedTextarea::record_change("notes", &config, "a", "");
    assert_eq!(control::index_state("notes", "counter-disappear", 0), 1);
    assert!(control::bool_state("notes", "counter-leaving", None, false));
    assert_eq!(
        control::text_state("notes", "counter-text", None, String::new()),
        "1 / 10"
    );

    AnnotatedTextarea::record_change("notes", &config, "", "b");
    assert_eq!(control::index_state("notes", "counter-appear", 0), 2);
    assert!(!control::bool_state("notes", "counter-leaving", None, true));

    AnnotatedTextarea::record_change("notes", &config, "b", "bc");
    assert_eq!(control::index_state("notes", "counter-appear", 0), 2);
    assert_eq!(control::index_state("notes", "counter-disappear", 0), 1);
}

#[test]
fn counter_exit_unmounts_only_for_current_generation() {
    let _guard = guard();
    let config = counted();

    AnnotatedTextarea::record_change("notes", &config, "a", "");
    AnnotatedTextarea::record_change("notes", &config, "", "a");
    AnnotatedTextarea::record_change("notes", &config, "a", "");
    assert_eq!(control::index_state("notes", "counter-disappear", 0), 2);

    assert!(!AnnotatedTextarea::finish_counter_exit("notes", 1));
    assert!(control::bool_state("notes", "counter-leaving", None, false));
    assert!(AnnotatedTextarea::finish_counter_exit("notes", 2));
    assert!(!control::bool_state("notes", "counter-leaving", None, true));
    assert!(!AnnotatedTextarea::finish_counter_exit("notes", 2));
}

#[test]
fn label_appear_generation_bumps_once_per_appearance() {
    let _guard = guard();
    let config = annotated_text_state::DecorationConfig {
        placeholder: Some("Notes".into()),
        floating_placeholder_enabled: true,
        ..annotated_text_state::DecorationConfig::default()
    };

    AnnotatedTextarea::record_change("notes", &config, "", "a");
    AnnotatedTextarea::record_change("notes", &config, "a", "ab");
    assert_eq!(control::index_state("notes", "label-appear", 0), 1);
    AnnotatedTextarea::record_change("notes", &config, "ab", "");
    AnnotatedTextarea::record_change("notes", &config, "", "x");
    assert_eq!(control::index_state("notes", "label-appear", 0), 2);
}

#[test]
fn focus_handle_moves_are_mirrored_into_tracked_focus() {
    let _guard = guard();

    assert_eq!(AnnotatedTextarea::sync_handle_focus("notes", true), Some(true));
    assert!(control::focused_state("notes", None, false));
    assert_eq!(AnnotatedTextarea::sync_handle_focus("notes", true), None);

    assert_eq!(AnnotatedTextarea::sync_handle_focus("notes", false), Some(false));
    assert!(!control::focused_state("notes", None, true));
    assert_eq!(AnnotatedTextarea::sync_handle_focus("notes", false), None);
}

#[test]
fn focus_already_reported_by_click_is_not_reported_again() {
    let _guard = guard();
    control::set_focused_state("notes", true);
    assert_eq!(AnnotatedTextarea::sync_handle_focus("notes", true), None);
    assert_eq!(AnnotatedTextarea::sync_handle_focus("notes", false), Some(false));

    control::set_focused_state("other", false);
    control::set_bool_state("other", "handle-focused", true);
    assert_eq!(AnnotatedTextarea::sync_handle_focus("other", false), None);
}
