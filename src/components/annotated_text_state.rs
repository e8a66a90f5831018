use crate::style::TextAlign;

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Counter label text: `"<n> / <limit>"` with a limit, `"<n>"` without.
pub fn format_counter(len: usize, limit: usize) -> String {
    if limit > 0 {
        format!("{len} / {limit}")
    } else {
        len.to_string()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EditDecision {
    Accept(String),
    Truncate(String),
    Reject,
}

impl EditDecision {
    pub fn inserted(&self) -> Option<&str> {
        match self {
            Self::Accept(text) | Self::Truncate(text) => Some(text),
            Self::Reject => None,
        }
    }
}

/// Decides how much of `insert` fits when it replaces `replaced_len` chars of
/// a `current_len` char text under `limit` (0 = unlimited). Multi-char
/// inserts are cut down to the remaining room; a single char that does not
/// fit is rejected.
pub fn apply_insert(current_len: usize, replaced_len: usize, insert: &str, limit: usize) -> EditDecision {
    if limit == 0 {
        return EditDecision::Accept(insert.to_string());
    }
    let kept = current_len.saturating_sub(replaced_len);
    let available = limit.saturating_sub(kept);
    let insert_len = char_len(insert);

    if insert_len <= available {
        EditDecision::Accept(insert.to_string())
    } else if available > 0 && insert_len > 1 {
        EditDecision::Truncate(truncate_chars(insert, available))
    } else {
        log::trace!("insert of {insert_len} chars rejected, {kept}/{limit} used");
        EditDecision::Reject
    }
}

/// Horizontal offset of the floating label inside the text rect.
pub fn floating_label_offset(alignment: TextAlign, text_width: f32, label_width: f32) -> f32 {
    match alignment {
        TextAlign::Left => 0.0,
        TextAlign::Center => (text_width - label_width) / 2.0,
        TextAlign::Right => text_width - label_width,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecorationConfig {
    pub placeholder: Option<String>,
    pub floating_placeholder_enabled: bool,
    pub show_counter: bool,
    pub counter_limit: usize,
    pub bottom_border_enabled: bool,
    pub bottom_border_width: f32,
    pub bottom_border_highlight_width: f32,
    pub padding: (f32, f32),
    pub floating_label_bottom_margin: f32,
    pub floating_label_line_height: f32,
    pub alignment: TextAlign,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            placeholder: None,
            floating_placeholder_enabled: false,
            show_counter: false,
            counter_limit: 0,
            bottom_border_enabled: true,
            bottom_border_width: 1.0,
            bottom_border_highlight_width: 1.75,
            padding: (2.0, 5.0),
            floating_label_bottom_margin: 2.0,
            floating_label_line_height: 12.0,
            alignment: TextAlign::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LabelTone {
    Resting,
    Focused,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderStyle {
    pub width: f32,
    pub focused: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecorationVisuals {
    pub placeholder_visible: bool,
    pub floating_label_visible: bool,
    pub floating_label_tone: LabelTone,
    pub counter_text: Option<String>,
    pub counter_visible: bool,
    pub border: Option<BorderStyle>,
    pub text_inset_top: f32,
    pub text_inset_x: f32,
}

impl DecorationVisuals {
    pub fn derive(config: &DecorationConfig, text: &str, focused: bool) -> Self {
        let has_text = !text.is_empty();
        let floating_label_visible = config.floating_placeholder_enabled
            && has_text
            && config.placeholder.as_deref().is_some_and(|p| !p.is_empty());

        let border = config.bottom_border_enabled.then(|| BorderStyle {
            width: if focused {
                config.bottom_border_highlight_width
            } else {
                config.bottom_border_width
            },
            focused,
        });

        let text_inset_top = if config.floating_placeholder_enabled && has_text {
            config.floating_label_line_height + config.floating_label_bottom_margin
        } else {
            0.0
        };

        Self {
            placeholder_visible: !has_text,
            floating_label_visible,
            floating_label_tone: if focused {
                LabelTone::Focused
            } else {
                LabelTone::Resting
            },
            counter_text: config
                .show_counter
                .then(|| format_counter(char_len(text), config.counter_limit)),
            counter_visible: config.show_counter && has_text,
            border,
            text_inset_top,
            text_inset_x: config.padding.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VisibilityChange {
    Appear,
    Disappear,
    Unchanged,
}

impl VisibilityChange {
    fn between(before: bool, after: bool) -> Self {
        match (before, after) {
            (false, true) => Self::Appear,
            (true, false) => Self::Disappear,
            _ => Self::Unchanged,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecorationChange {
    pub placeholder: VisibilityChange,
    pub floating_label: VisibilityChange,
    pub counter: VisibilityChange,
    pub border_changed: bool,
}

impl DecorationChange {
    fn between(before: &DecorationVisuals, after: &DecorationVisuals) -> Self {
        Self {
            placeholder: VisibilityChange::between(
                before.placeholder_visible,
                after.placeholder_visible,
            ),
            floating_label: VisibilityChange::between(
                before.floating_label_visible,
                after.floating_label_visible,
            ),
            counter: VisibilityChange::between(before.counter_visible, after.counter_visible),
            border_changed: before.border != after.border,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.placeholder == VisibilityChange::Unchanged
            && self.floating_label == VisibilityChange::Unchanged
            && self.counter == VisibilityChange::Unchanged
            && !self.border_changed
    }
}

/// Text, focus and decoration settings of an annotated field, with the
/// derived visuals kept current by every setter.
#[derive(Clone, Debug, PartialEq)]
pub struct DecoratedText {
    config: DecorationConfig,
    text: String,
    focused: bool,
    visuals: DecorationVisuals,
}

impl Default for DecoratedText {
    fn default() -> Self {
        Self::new(DecorationConfig::default())
    }
}

impl DecoratedText {
    pub fn new(config: DecorationConfig) -> Self {
        let visuals = DecorationVisuals::derive(&config, "", false);
        Self {
            config,
            text: String::new(),
            focused: false,
            visuals,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.set_focused(focused);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn config(&self) -> &DecorationConfig {
        &self.config
    }

    pub fn visuals(&self) -> &DecorationVisuals {
        &self.visuals
    }

    fn refresh(&mut self) -> DecorationChange {
        let next = DecorationVisuals::derive(&self.config, &self.text, self.focused);
        let change = DecorationChange::between(&self.visuals, &next);
        if !change.is_unchanged() {
            log::debug!(
                "decorations changed: floating label {:?}, counter {:?}",
                change.floating_label,
                change.counter
            );
        }
        self.visuals = next;
        change
    }

    /// Text-changed event.
    pub fn set_text(&mut self, text: impl Into<String>) -> DecorationChange {
        self.text = text.into();
        self.refresh()
    }

    /// Focus-changed event.
    pub fn set_focused(&mut self, focused: bool) -> DecorationChange {
        self.focused = focused;
        self.refresh()
    }

    pub fn clear(&mut self) -> DecorationChange {
        self.set_text(String::new())
    }

    /// Inserts at char index `at`, replacing `replace_len` chars, under the
    /// counter limit. The text is untouched when the insert is rejected.
    pub fn insert(&mut self, at: usize, replace_len: usize, insert: &str) -> EditDecision {
        let len = char_len(&self.text);
        let at = at.min(len);
        let replace_len = replace_len.min(len - at);
        let decision = apply_insert(len, replace_len, insert, self.config.counter_limit);
        if let Some(inserted) = decision.inserted() {
            let start = byte_index_at_char(&self.text, at);
            let end = byte_index_at_char(&self.text, at + replace_len);
            self.text.replace_range(start..end, inserted);
            self.refresh();
        }
        decision
    }

    pub fn update_config(&mut self, configure: impl FnOnce(&mut DecorationConfig)) -> DecorationChange {
        configure(&mut self.config);
        self.refresh()
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) -> DecorationChange {
        self.update_config(|config| config.placeholder = placeholder)
    }

    pub fn set_show_counter(&mut self, show: bool) -> DecorationChange {
        self.update_config(|config| config.show_counter = show)
    }

    pub fn set_counter_limit(&mut self, limit: usize) -> DecorationChange {
        self.update_config(|config| config.counter_limit = limit)
    }

    pub fn set_floating_placeholder_enabled(&mut self, enabled: bool) -> DecorationChange {
        self.update_config(|config| config.floating_placeholder_enabled = enabled)
    }

    pub fn set_bottom_border_enabled(&mut self, enabled: bool) -> DecorationChange {
        self.update_config(|config| config.bottom_border_enabled = enabled)
    }
}

pub fn byte_index_at_char(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(value.len())
}

/// Editable value with a char-indexed caret.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EditBuffer {
    pub value: String,
    pub caret: usize,
}

impl EditBuffer {
    pub fn new(value: impl Into<String>, caret: usize) -> Self {
        let value = value.into();
        let caret = caret.min(char_len(&value));
        Self { value, caret }
    }

    pub fn len(&self) -> usize {
        char_len(&self.value)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Inserts at the caret under `limit`; returns whether anything changed.
    pub fn insert(&mut self, text: &str, limit: usize) -> bool {
        if text.is_empty() {
            return false;
        }
        let decision = apply_insert(self.len(), 0, text, limit);
        let Some(inserted) = decision.inserted() else {
            return false;
        };
        let at = byte_index_at_char(&self.value, self.caret);
        self.value.insert_str(at, inserted);
        self.caret += char_len(inserted);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        let start = byte_index_at_char(&self.value, self.caret - 1);
        let end = byte_index_at_char(&self.value, self.caret);
        self.value.replace_range(start..end, "");
        self.caret -= 1;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.caret >= self.len() {
            return false;
        }
        let start = byte_index_at_char(&self.value, self.caret);
        let end = byte_index_at_char(&self.value, self.caret + 1);
        self.value.replace_range(start..end, "");
        true
    }

    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.caret = (self.caret + 1).min(self.len());
    }

    pub fn move_line_start(&mut self) {
        let before = self.value.chars().take(self.caret);
        let line_start = before
            .enumerate()
            .filter(|(_, ch)| *ch == '\n')
            .map(|(index, _)| index + 1)
            .last()
            .unwrap_or(0);
        self.caret = line_start;
    }

    pub fn move_line_end(&mut self) {
        let rest = self
            .value
            .chars()
            .skip(self.caret)
            .take_while(|ch| *ch != '\n')
            .count();
        self.caret += rest;
    }

    /// Applies a key by name; printable input goes through `insert`.
    pub fn apply_key(&mut self, key: &str, key_char: Option<&str>, limit: usize) -> bool {
        match key {
            "backspace" => self.backspace(),
            "delete" => self.delete(),
            "left" => {
                self.move_left();
                false
            }
            "right" => {
                self.move_right();
                false
            }
            "home" => {
                self.move_line_start();
                false
            }
            "end" => {
                self.move_line_end();
                false
            }
            "enter" => self.insert("\n", limit),
            _ => {
                let typed = key_char
                    .filter(|value| !value.is_empty() && !value.contains('\u{7f}'))
                    .map(str::to_string)
                    .or_else(|| (char_len(key) == 1).then(|| key.to_string()));
                match typed {
                    Some(typed) => self.insert(&typed, limit),
                    None => false,
                }
            }
        }
    }
}
