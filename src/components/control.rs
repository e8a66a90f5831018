use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex},
};

use super::stop_switch_state::StopSwitchMachine;

static BOOL_STATE: LazyLock<Mutex<HashMap<String, bool>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static TEXT_STATE: LazyLock<Mutex<HashMap<String, String>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static NUMBER_STATE: LazyLock<Mutex<HashMap<String, f32>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static INDEX_STATE: LazyLock<Mutex<HashMap<String, usize>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static STOP_MACHINES: LazyLock<Mutex<HashMap<String, StopSwitchMachine>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
pub const FOCUSED_SLOT: &str = "focused";

fn key(id: &str, slot: &str) -> String {
    format!("{id}::{slot}")
}

pub fn bool_state(id: &str, slot: &str, controlled: Option<bool>, default: bool) -> bool {
    if let Some(value) = controlled {
        return value;
    }

    let composed = key(id, slot);
    if let Ok(mut state) = BOOL_STATE.lock() {
        return *state.entry(composed).or_insert(default);
    }
    default
}

pub fn set_bool_state(id: &str, slot: &str, value: bool) {
    let composed = key(id, slot);
    if let Ok(mut state) = BOOL_STATE.lock() {
        state.insert(composed, value);
    }
}

pub fn focused_state(id: &str, controlled: Option<bool>, default: bool) -> bool {
    bool_state(id, FOCUSED_SLOT, controlled, default)
}

pub fn set_focused_state(id: &str, value: bool) {
    set_bool_state(id, FOCUSED_SLOT, value);
}

pub fn text_state(id: &str, slot: &str, controlled: Option<String>, default: String) -> String {
    if let Some(value) = controlled {
        return value;
    }

    let composed = key(id, slot);
    if let Ok(mut state) = TEXT_STATE.lock() {
        return state.entry(composed).or_insert(default).clone();
    }
    default
}

pub fn set_text_state(id: &str, slot: &str, value: String) {
    let composed = key(id, slot);
    if let Ok(mut state) = TEXT_STATE.lock() {
        state.insert(composed, value);
    }
}

pub fn number_state(id: &str, slot: &str) -> Option<f32> {
    NUMBER_STATE
        .lock()
        .ok()
        .and_then(|state| state.get(&key(id, slot)).copied())
}

pub fn set_number_state(id: &str, slot: &str, value: Option<f32>) {
    let composed = key(id, slot);
    if let Ok(mut state) = NUMBER_STATE.lock() {
        match value {
            Some(value) => state.insert(composed, value),
            None => state.remove(&composed),
        };
    }
}

pub fn index_state(id: &str, slot: &str, default: usize) -> usize {
    let composed = key(id, slot);
    if let Ok(mut state) = INDEX_STATE.lock() {
        return *state.entry(composed).or_insert(default);
    }
    default
}

pub fn set_index_state(id: &str, slot: &str, value: usize) {
    let composed = key(id, slot);
    if let Ok(mut state) = INDEX_STATE.lock() {
        state.insert(composed, value);
    }
}

/// Runs `update` against the switch machine stored under `id`, creating it
/// with `init` on first use. Returns `None` only if the store is poisoned.
pub fn with_stop_machine<R>(
    id: &str,
    init: impl FnOnce() -> StopSwitchMachine,
    update: impl FnOnce(&mut StopSwitchMachine) -> R,
) -> Option<R> {
    let mut state = STOP_MACHINES.lock().ok()?;
    let machine = state.entry(id.to_string()).or_insert_with(init);
    Some(update(machine))
}

/// Like [`with_stop_machine`] but never creates a machine.
pub fn update_stop_machine<R>(
    id: &str,
    update: impl FnOnce(&mut StopSwitchMachine) -> R,
) -> Option<R> {
    let mut state = STOP_MACHINES.lock().ok()?;
    state.get_mut(id).map(update)
}

pub fn stop_machine(id: &str) -> Option<StopSwitchMachine> {
    STOP_MACHINES
        .lock()
        .ok()
        .and_then(|state| state.get(id).cloned())
}

pub fn remove_stop_machine(id: &str) {
    if let Ok(mut state) = STOP_MACHINES.lock() {
        state.remove(id);
    }
}

pub fn clear_component(id: &str) {
    let prefix = format!("{id}::");
    if let Ok(mut state) = BOOL_STATE.lock() {
        state.retain(|key, _| !key.starts_with(&prefix));
    }
    if let Ok(mut state) = TEXT_STATE.lock() {
        state.retain(|key, _| !key.starts_with(&prefix));
    }
    if let Ok(mut state) = NUMBER_STATE.lock() {
        state.retain(|key, _| !key.starts_with(&prefix));
    }
    if let Ok(mut state) = INDEX_STATE.lock() {
        state.retain(|key, _| !key.starts_with(&prefix));
    }
    remove_stop_machine(id);
}

#[cfg(test)]
pub(crate) fn clear_all() {
    if let Ok(mut state) = BOOL_STATE.lock() {
        state.clear();
    }
    if let Ok(mut state) = TEXT_STATE.lock() {
        state.clear();
    }
    if let Ok(mut state) = NUMBER_STATE.lock() {
        state.clear();
    }
    if let Ok(mut state) = INDEX_STATE.lock() {
        state.clear();
    }
    if let Ok(mut state) = STOP_MACHINES.lock() {
        state.clear();
    }
}
