//! Single-line text input with validation and blur/commit semantics.

use regex::Regex;

use crate::core::component::{Component, Focusable};
use crate::core::input_event::{EventDisposition, InputEvent};
use crate::core::keybindings::{lock_keybindings, Action, KeybindingsHandle};
use crate::core::text::{grapheme_segments, is_punctuation_char, truncate_to_width, visible_width};
use crate::error::{Result, TypeaheadError};

const EDIT_ACTIONS: [Action; 12] = [
    Action::Submit,
    Action::DeleteCharBackward,
    Action::DeleteCharForward,
    Action::DeleteWordBackward,
    Action::DeleteToLineStart,
    Action::DeleteToLineEnd,
    Action::CursorLeft,
    Action::CursorRight,
    Action::CursorWordLeft,
    Action::CursorWordRight,
    Action::CursorLineStart,
    Action::CursorLineEnd,
];

/// Validation status shown next to the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputStatus {
    #[default]
    None,
    Valid,
    Warning,
    Error,
}

impl InputStatus {
    pub fn default_icon(self) -> Option<&'static str> {
        match self {
            InputStatus::None => None,
            InputStatus::Valid => Some("✓"),
            InputStatus::Warning => Some("!"),
            InputStatus::Error => Some("✗"),
        }
    }
}

/// Outcome of feeding one event to a [`TextInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    /// The event was not meant for the input, or was rejected by validation.
    Ignored,
    /// Only the cursor moved.
    Moved,
    /// The value changed; carries the new value.
    Changed(String),
    /// Submit key; carries the current value.
    Submitted(String),
}

pub struct TextInputTheme {
    pub placeholder: Box<dyn Fn(&str) -> String>,
    pub status_icon: Box<dyn Fn(InputStatus, &str) -> String>,
    pub tooltip: Box<dyn Fn(&str) -> String>,
}

impl Default for TextInputTheme {
    fn default() -> Self {
        Self {
            placeholder: Box::new(str::to_string),
            status_icon: Box::new(|_, icon| icon.to_string()),
            tooltip: Box::new(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentClass {
    Space,
    Punctuation,
    Word,
}

fn classify(segment: &str) -> SegmentClass {
    if segment.chars().any(char::is_whitespace) {
        SegmentClass::Space
    } else if segment.chars().any(is_punctuation_char) {
        SegmentClass::Punctuation
    } else {
        SegmentClass::Word
    }
}

/// Byte offset of the start of the word before `cursor`, skipping trailing spaces.
fn word_start_before(text: &str, cursor: usize) -> usize {
    let mut pos = cursor;
    let mut segments = grapheme_segments(&text[..cursor]).rev().peekable();
    while let Some(segment) = segments.next_if(|segment| classify(segment) == SegmentClass::Space) {
        pos -= segment.len();
    }
    if let Some(class) = segments.peek().map(|segment| classify(segment)) {
        while let Some(segment) = segments.next_if(|segment| classify(segment) == class) {
            pos -= segment.len();
        }
    }
    pos
}

/// Byte offset just past the word after `cursor`, skipping leading spaces.
fn word_end_after(text: &str, cursor: usize) -> usize {
    let mut pos = cursor;
    let mut segments = grapheme_segments(&text[cursor..]).peekable();
    while let Some(segment) = segments.next_if(|segment| classify(segment) == SegmentClass::Space) {
        pos += segment.len();
    }
    if let Some(class) = segments.peek().map(|segment| classify(segment)) {
        while let Some(segment) = segments.next_if(|segment| classify(segment) == class) {
            pos += segment.len();
        }
    }
    pos
}

/// Single-line input with horizontal scrolling.
///
/// With `change_on_blur` off, `on_change` fires after every accepted edit. With it on,
/// edits only mark the input dirty and `on_change` fires once on blur or submit.
pub struct TextInput {
    value: String,
    cursor: usize,
    focused: bool,
    prompt: String,
    placeholder: Option<String>,
    validation: Option<Regex>,
    status: InputStatus,
    status_icon: Option<String>,
    status_tooltip: Option<String>,
    disabled: bool,
    change_on_blur: bool,
    dirty: bool,
    keybindings: KeybindingsHandle,
    theme: TextInputTheme,
    on_change: Option<Box<dyn FnMut(String)>>,
    on_blur: Option<Box<dyn FnMut(String)>>,
    on_submit: Option<Box<dyn FnMut(String)>>,
}

impl TextInput {
    pub fn new(keybindings: KeybindingsHandle) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            focused: false,
            prompt: "> ".to_string(),
            placeholder: None,
            validation: None,
            status: InputStatus::None,
            status_icon: None,
            status_tooltip: None,
            disabled: false,
            change_on_blur: false,
            dirty: false,
            keybindings,
            theme: TextInputTheme::default(),
            on_change: None,
            on_blur: None,
            on_submit: None,
        }
    }

    /// Restricts accepted values to those fully matching `pattern`. The empty value is
    /// always accepted so the field can be cleared.
    pub fn with_validation(mut self, pattern: &str) -> Result<Self> {
        self.set_validation(Some(pattern))?;
        Ok(self)
    }

    pub fn set_validation(&mut self, pattern: Option<&str>) -> Result<()> {
        self.validation = match pattern {
            Some(pattern) => Some(Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                TypeaheadError::InvalidValidation {
                    pattern: pattern.to_string(),
                    source,
                }
            })?),
            None => None,
        };
        Ok(())
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value without firing callbacks.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.clamp_cursor();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    pub fn set_status(&mut self, status: InputStatus) {
        self.status = status;
    }

    pub fn status(&self) -> InputStatus {
        self.status
    }

    pub fn set_status_icon(&mut self, icon: Option<String>) {
        self.status_icon = icon;
    }

    pub fn set_status_tooltip(&mut self, tooltip: Option<String>) {
        self.status_tooltip = tooltip;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_change_on_blur(&mut self, change_on_blur: bool) {
        self.change_on_blur = change_on_blur;
        self.dirty = false;
    }

    pub fn set_theme(&mut self, theme: TextInputTheme) {
        self.theme = theme;
    }

    pub fn set_on_change(&mut self, handler: Option<Box<dyn FnMut(String)>>) {
        self.on_change = handler;
    }

    pub fn set_on_blur(&mut self, handler: Option<Box<dyn FnMut(String)>>) {
        self.on_blur = handler;
    }

    pub fn set_on_submit(&mut self, handler: Option<Box<dyn FnMut(String)>>) {
        self.on_submit = handler;
    }

    fn clamp_cursor(&mut self) {
        if self.cursor > self.value.len() {
            self.cursor = self.value.len();
        }
        while self.cursor > 0 && !self.value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn accepts(&self, candidate: &str) -> bool {
        candidate.is_empty()
            || self
                .validation
                .as_ref()
                .map_or(true, |pattern| pattern.is_match(candidate))
    }

    /// Swaps in `candidate` if validation allows it.
    fn try_replace(&mut self, candidate: String, cursor: usize) -> TextEdit {
        if candidate == self.value {
            return if cursor == self.cursor {
                TextEdit::Ignored
            } else {
                self.cursor = cursor;
                TextEdit::Moved
            };
        }
        if !self.accepts(&candidate) {
            tracing::trace!(rejected = %candidate, "edit rejected by validation");
            return TextEdit::Ignored;
        }
        self.value = candidate;
        self.cursor = cursor;
        TextEdit::Changed(self.value.clone())
    }

    fn insert(&mut self, text: &str) -> TextEdit {
        if text.is_empty() {
            return TextEdit::Ignored;
        }
        let mut candidate = String::with_capacity(self.value.len() + text.len());
        candidate.push_str(&self.value[..self.cursor]);
        candidate.push_str(text);
        candidate.push_str(&self.value[self.cursor..]);
        let cursor = self.cursor + text.len();
        self.try_replace(candidate, cursor)
    }

    fn remove_range(&mut self, start: usize, end: usize) -> TextEdit {
        if start >= end {
            return TextEdit::Ignored;
        }
        let mut candidate = self.value.clone();
        candidate.replace_range(start..end, "");
        self.try_replace(candidate, start)
    }

    fn move_to(&mut self, cursor: usize) -> TextEdit {
        if cursor == self.cursor {
            return TextEdit::Ignored;
        }
        self.cursor = cursor;
        TextEdit::Moved
    }

    fn previous_boundary(&self) -> usize {
        grapheme_segments(&self.value[..self.cursor])
            .next_back()
            .map_or(self.cursor, |segment| self.cursor - segment.len())
    }

    fn next_boundary(&self) -> usize {
        grapheme_segments(&self.value[self.cursor..])
            .next()
            .map_or(self.cursor, |segment| self.cursor + segment.len())
    }

    /// Applies `event` to the value and cursor without running any callback.
    pub fn apply_event(&mut self, event: &InputEvent) -> TextEdit {
        if self.disabled {
            return TextEdit::Ignored;
        }
        self.clamp_cursor();

        let key_id = match event {
            InputEvent::Text { text, .. } => return self.insert(text),
            InputEvent::Paste { text, .. } => {
                let cleaned = text.replace(['\r', '\n'], "");
                return self.insert(&cleaned);
            }
            InputEvent::Key { key_id, .. } => key_id.as_str(),
            _ => return TextEdit::Ignored,
        };

        let action = lock_keybindings(&self.keybindings).resolve(Some(key_id), &EDIT_ACTIONS);
        let Some(action) = action else {
            return TextEdit::Ignored;
        };

        match action {
            Action::Submit => TextEdit::Submitted(self.value.clone()),
            Action::DeleteCharBackward => self.remove_range(self.previous_boundary(), self.cursor),
            Action::DeleteCharForward => self.remove_range(self.cursor, self.next_boundary()),
            Action::DeleteWordBackward => {
                self.remove_range(word_start_before(&self.value, self.cursor), self.cursor)
            }
            Action::DeleteToLineStart => self.remove_range(0, self.cursor),
            Action::DeleteToLineEnd => self.remove_range(self.cursor, self.value.len()),
            Action::CursorLeft => self.move_to(self.previous_boundary()),
            Action::CursorRight => self.move_to(self.next_boundary()),
            Action::CursorWordLeft => self.move_to(word_start_before(&self.value, self.cursor)),
            Action::CursorWordRight => self.move_to(word_end_after(&self.value, self.cursor)),
            Action::CursorLineStart => self.move_to(0),
            Action::CursorLineEnd => self.move_to(self.value.len()),
            _ => TextEdit::Ignored,
        }
    }

    fn notify_change(&mut self) {
        let value = self.value.clone();
        if let Some(handler) = self.on_change.as_mut() {
            handler(value);
        }
    }

    fn status_suffix(&self) -> Option<String> {
        let icon = self
            .status_icon
            .as_deref()
            .or_else(|| self.status.default_icon())?;
        Some(format!(" {}", (self.theme.status_icon)(self.status, icon)))
    }

    /// Renders the value into `available` columns, keeping the cursor cell in view.
    fn render_value(&self, available: usize) -> String {
        if self.value.is_empty() {
            let placeholder = self.placeholder.as_deref().unwrap_or("");
            let cursor_cell = if self.focused { "\x1b[7m \x1b[27m" } else { "" };
            let room = available.saturating_sub(usize::from(self.focused));
            let hint = truncate_to_width(placeholder, room, "", false);
            let hint = if hint.is_empty() {
                hint
            } else {
                (self.theme.placeholder)(&hint)
            };
            return truncate_to_width(&format!("{cursor_cell}{hint}"), available, "", true);
        }

        let segments: Vec<(usize, &str)> = grapheme_segments(&self.value)
            .scan(0, |offset, segment| {
                let start = *offset;
                *offset += segment.len();
                Some((start, segment))
            })
            .collect();
        let cursor_index = segments
            .iter()
            .position(|(start, _)| *start >= self.cursor)
            .unwrap_or(segments.len());
        let cursor_cell = if self.focused && cursor_index == segments.len() {
            1
        } else {
            0
        };

        let mut start = 0;
        while start < cursor_index
            && segments[start..=cursor_index.min(segments.len() - 1)]
                .iter()
                .map(|(_, segment)| visible_width(segment))
                .sum::<usize>()
                + cursor_cell
                > available
        {
            start += 1;
        }

        let mut line = String::new();
        let mut used = 0;
        for (index, (_, segment)) in segments.iter().enumerate().skip(start) {
            let width = visible_width(segment);
            if used + width > available {
                break;
            }
            if self.focused && index == cursor_index {
                line.push_str(&format!("\x1b[7m{segment}\x1b[27m"));
            } else {
                line.push_str(segment);
            }
            used += width;
        }
        if cursor_cell == 1 && used < available {
            line.push_str("\x1b[7m \x1b[27m");
            used += 1;
        }
        line.push_str(&" ".repeat(available.saturating_sub(used)));
        line
    }
}

impl Component for TextInput {
    fn render(&mut self, width: usize) -> Vec<String> {
        if width == 0 {
            return Vec::new();
        }
        self.clamp_cursor();

        let suffix = self.status_suffix().unwrap_or_default();
        let prompt_width = visible_width(&self.prompt);
        let available = width
            .saturating_sub(prompt_width)
            .saturating_sub(visible_width(&suffix));
        if available == 0 {
            return vec![truncate_to_width(&self.prompt, width, "", true)];
        }

        let mut lines = vec![format!(
            "{}{}{suffix}",
            self.prompt,
            self.render_value(available)
        )];
        if self.status != InputStatus::None {
            if let Some(tooltip) = self.status_tooltip.as_deref() {
                let tooltip = truncate_to_width(tooltip, width, "…", false);
                lines.push(truncate_to_width(&(self.theme.tooltip)(&tooltip), width, "", true));
            }
        }
        lines
    }

    fn handle_event(&mut self, event: &InputEvent) -> EventDisposition {
        match self.apply_event(event) {
            TextEdit::Ignored => EventDisposition::Propagate,
            TextEdit::Moved => EventDisposition::Handled,
            TextEdit::Changed(_) => {
                if self.change_on_blur {
                    self.dirty = true;
                } else {
                    self.notify_change();
                }
                EventDisposition::Handled
            }
            TextEdit::Submitted(value) => {
                if self.change_on_blur && self.dirty {
                    self.dirty = false;
                    self.notify_change();
                }
                if let Some(handler) = self.on_submit.as_mut() {
                    handler(value);
                }
                EventDisposition::Handled
            }
        }
    }

    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl Focusable for TextInput {
    fn set_focused(&mut self, focused: bool) {
        let blurred = self.focused && !focused;
        self.focused = focused;
        if !blurred {
            return;
        }
        if self.change_on_blur && self.dirty {
            self.dirty = false;
            self.notify_change();
        }
        let value = self.value.clone();
        if let Some(handler) = self.on_blur.as_mut() {
            handler(value);
        }
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::{InputStatus, TextEdit, TextInput};
    use crate::core::component::{Component, Focusable};
    use crate::core::input_event::{parse_input_events, EventDisposition, InputEvent};
    use crate::core::keybindings::default_keybindings_handle;
    use crate::error::TypeaheadError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn send(input: &mut TextInput, data: &str) {
        for event in parse_input_events(data) {
            input.handle_event(&event);
        }
    }

    #[test]
    fn edits_and_moves_cursor() {
        let mut input = TextInput::new(default_keybindings_handle());
        for ch in ["h", "e", "l", "l", "o"] {
            send(&mut input, ch);
        }
        assert_eq!(input.value(), "hello");
        assert_eq!(input.cursor(), 5);

        send(&mut input, "\x1b[D");
        send(&mut input, "\x1b[D");
        assert_eq!(input.cursor(), 3);

        send(&mut input, "p");
        assert_eq!(input.value(), "helplo");

        send(&mut input, "\x7f");
        assert_eq!(input.value(), "hello");
        assert_eq!(input.cursor(), 3);

        send(&mut input, "\x0b");
        assert_eq!(input.value(), "hel");
    }

    #[test]
    fn paste_strips_newlines_and_ctrl_w_deletes_word() {
        let mut input = TextInput::new(default_keybindings_handle());
        send(&mut input, "\x1b[200~hello\nworld\x1b[201~");
        assert_eq!(input.value(), "helloworld");

        send(&mut input, " there");
        send(&mut input, "\x17");
        assert_eq!(input.value(), "helloworld ");
        assert_eq!(input.cursor(), "helloworld ".len());
    }

    #[test]
    fn validation_rejects_non_matching_edits() {
        let mut input = TextInput::new(default_keybindings_handle())
            .with_validation("[0-9]*")
            .expect("valid pattern");

        assert_eq!(input.apply_event(&InputEvent::text("4")), TextEdit::Changed("4".into()));
        assert_eq!(input.apply_event(&InputEvent::text("x")), TextEdit::Ignored);
        assert_eq!(input.value(), "4");
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let result = TextInput::new(default_keybindings_handle()).with_validation("(");
        assert!(matches!(
            result,
            Err(TypeaheadError::InvalidValidation { ref pattern, .. }) if pattern == "("
        ));
    }

    #[test]
    fn change_fires_per_edit_or_on_blur() {
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut eager = TextInput::new(default_keybindings_handle());
        let sink = Rc::clone(&seen);
        eager.set_on_change(Some(Box::new(move |value| sink.borrow_mut().push(value))));
        send(&mut eager, "a");
        send(&mut eager, "b");
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "ab".to_string()]);

        seen.borrow_mut().clear();
        let mut lazy = TextInput::new(default_keybindings_handle());
        lazy.set_change_on_blur(true);
        let sink = Rc::clone(&seen);
        lazy.set_on_change(Some(Box::new(move |value| sink.borrow_mut().push(value))));
        lazy.set_focused(true);
        send(&mut lazy, "x");
        send(&mut lazy, "y");
        assert!(seen.borrow().is_empty());
        lazy.set_focused(false);
        assert_eq!(*seen.borrow(), vec!["xy".to_string()]);
    }

    #[test]
    fn submit_reports_value_and_disabled_ignores_input() {
        let mut input = TextInput::new(default_keybindings_handle());
        input.set_value("done");
        assert_eq!(
            input.apply_event(&InputEvent::key("enter")),
            TextEdit::Submitted("done".into())
        );

        input.set_disabled(true);
        assert_eq!(
            input.handle_event(&InputEvent::text("z")),
            EventDisposition::Propagate
        );
        assert_eq!(input.value(), "done");
    }

    #[test]
    fn renders_prompt_placeholder_and_status() {
        let mut input = TextInput::new(default_keybindings_handle());
        input.set_placeholder(Some("Search".to_string()));
        assert_eq!(input.render(12), vec!["> Search    "]);

        input.set_value("abc");
        input.set_status(InputStatus::Error);
        input.set_status_tooltip(Some("required".to_string()));
        assert_eq!(input.render(10), vec!["> abc    ✗", "required  "]);
    }

    #[test]
    fn long_values_scroll_to_keep_cursor_visible() {
        let mut input = TextInput::new(default_keybindings_handle());
        input.set_value("abcdefghij");
        send(&mut input, "\x1b[F");
        let line = input.render(7).remove(0);
        assert_eq!(line, "> fghij");
    }
}
