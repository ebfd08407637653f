//! Keybindings shared by the text input and the typeahead.
//!
//! A manager is owned per component tree through a [`KeybindingsHandle`]; there is no
//! process-wide table.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CursorLeft,
    CursorRight,
    CursorWordLeft,
    CursorWordRight,
    CursorLineStart,
    CursorLineEnd,
    DeleteCharBackward,
    DeleteCharForward,
    DeleteWordBackward,
    DeleteToLineStart,
    DeleteToLineEnd,
    Submit,
    SelectUp,
    SelectDown,
    SelectConfirm,
    SelectCancel,
    Tab,
}

pub type KeyId = String;

#[derive(Debug, Clone)]
pub enum KeyBinding {
    Single(KeyId),
    Multiple(Vec<KeyId>),
}

impl From<&str> for KeyBinding {
    fn from(value: &str) -> Self {
        KeyBinding::Single(value.to_string())
    }
}

impl From<Vec<&str>> for KeyBinding {
    fn from(value: Vec<&str>) -> Self {
        KeyBinding::Multiple(value.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeybindingsConfig {
    entries: HashMap<Action, KeyBinding>,
}

impl KeybindingsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<KeyBinding>>(&mut self, action: Action, keys: K) {
        self.entries.insert(action, keys.into());
    }
}

pub static DEFAULT_KEYBINDINGS: LazyLock<HashMap<Action, Vec<KeyId>>> = LazyLock::new(|| {
    use Action::*;

    let table: [(Action, &[&str]); 17] = [
        (CursorLeft, &["left", "ctrl+b"]),
        (CursorRight, &["right", "ctrl+f"]),
        (CursorWordLeft, &["alt+left", "ctrl+left", "alt+b"]),
        (CursorWordRight, &["alt+right", "ctrl+right", "alt+f"]),
        (CursorLineStart, &["home", "ctrl+a"]),
        (CursorLineEnd, &["end", "ctrl+e"]),
        (DeleteCharBackward, &["backspace"]),
        (DeleteCharForward, &["delete", "ctrl+d"]),
        (DeleteWordBackward, &["ctrl+w", "alt+backspace"]),
        (DeleteToLineStart, &["ctrl+u"]),
        (DeleteToLineEnd, &["ctrl+k"]),
        (Submit, &["enter"]),
        (SelectUp, &["up"]),
        (SelectDown, &["down"]),
        (SelectConfirm, &["enter"]),
        (SelectCancel, &["escape"]),
        (Tab, &["tab"]),
    ];

    table
        .into_iter()
        .map(|(action, keys)| (action, keys.iter().map(|key| key.to_string()).collect()))
        .collect()
});

pub struct KeybindingsManager {
    action_to_keys: HashMap<Action, Vec<KeyId>>,
}

impl KeybindingsManager {
    pub fn new(config: KeybindingsConfig) -> Self {
        let mut manager = Self {
            action_to_keys: HashMap::new(),
        };
        manager.build_maps(&config);
        manager
    }

    fn build_maps(&mut self, config: &KeybindingsConfig) {
        self.action_to_keys = DEFAULT_KEYBINDINGS.clone();

        for (action, binding) in config.entries.iter() {
            let key_list = match binding {
                KeyBinding::Single(key) => vec![key.clone()],
                KeyBinding::Multiple(keys) => keys.clone(),
            };
            self.action_to_keys.insert(*action, key_list);
        }
    }

    pub fn matches(&self, key_id: Option<&str>, action: Action) -> bool {
        let Some(key_id) = key_id else {
            return false;
        };
        self.action_to_keys
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|key| key == key_id))
    }

    /// First action bound to `key_id`, checked in the order given.
    pub fn resolve(&self, key_id: Option<&str>, candidates: &[Action]) -> Option<Action> {
        candidates
            .iter()
            .copied()
            .find(|action| self.matches(key_id, *action))
    }

    pub fn get_keys(&self, action: Action) -> Vec<KeyId> {
        self.action_to_keys.get(&action).cloned().unwrap_or_default()
    }

    pub fn set_config(&mut self, config: KeybindingsConfig) {
        self.build_maps(&config);
    }
}

pub type KeybindingsHandle = Arc<Mutex<KeybindingsManager>>;

pub fn default_keybindings_handle() -> KeybindingsHandle {
    Arc::new(Mutex::new(KeybindingsManager::new(KeybindingsConfig::default())))
}

pub(crate) fn lock_keybindings(handle: &KeybindingsHandle) -> MutexGuard<'_, KeybindingsManager> {
    match handle.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
