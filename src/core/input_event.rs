//! Structured input events delivered to components.

use crate::core::input::{parse_key, parse_sgr_mouse, parse_text, MouseKind};

/// Input event delivered to components.
///
/// Notes:
/// - `raw` is the exact byte sequence received from the terminal (UTF-8 decoded) when applicable.
/// - `key_id` is a normalized identifier for matching keybindings.
/// - Mouse coordinates are 0-based and relative to the component receiving the event; hosts
///   translate them before dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key {
        raw: String,
        key_id: String,
    },
    Text {
        raw: String,
        text: String,
    },
    Paste {
        raw: String,
        text: String,
    },
    Mouse {
        raw: String,
        kind: MouseKind,
        column: u16,
        row: u16,
    },
    UnknownRaw {
        raw: String,
    },
}

impl InputEvent {
    /// Synthesized key event, mainly for hosts that already decoded their input.
    pub fn key(key_id: impl Into<String>) -> Self {
        let key_id = key_id.into();
        InputEvent::Key {
            raw: String::new(),
            key_id,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        InputEvent::Text {
            raw: text.clone(),
            text,
        }
    }

    pub fn mouse(kind: MouseKind, column: u16, row: u16) -> Self {
        InputEvent::Mouse {
            raw: String::new(),
            kind,
            column,
            row,
        }
    }

    pub fn key_id(&self) -> Option<&str> {
        match self {
            InputEvent::Key { key_id, .. } => Some(key_id.as_str()),
            _ => None,
        }
    }
}

/// What the host should do with an event after a component saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// The component consumed the event; the host's default action is suppressed.
    Handled,
    /// The host should continue with its default action (focus traversal, bubbling).
    Propagate,
}

impl EventDisposition {
    pub fn is_handled(self) -> bool {
        self == EventDisposition::Handled
    }
}

pub fn parse_input_events(data: &str) -> Vec<InputEvent> {
    if data.is_empty() {
        return Vec::new();
    }

    const PASTE_START: &str = "\x1b[200~";
    const PASTE_END: &str = "\x1b[201~";

    fn parse_non_paste(data: &str) -> Vec<InputEvent> {
        if data.is_empty() {
            return Vec::new();
        }

        if let Some(report) = parse_sgr_mouse(data) {
            return vec![InputEvent::Mouse {
                raw: data.to_string(),
                kind: report.kind,
                column: report.column,
                row: report.row,
            }];
        }

        if let Some(text) = parse_text(data) {
            return vec![InputEvent::Text {
                raw: data.to_string(),
                text,
            }];
        }

        if let Some(key_id) = parse_key(data) {
            return vec![InputEvent::Key {
                raw: data.to_string(),
                key_id,
            }];
        }

        vec![InputEvent::UnknownRaw {
            raw: data.to_string(),
        }]
    }

    let mut events = Vec::new();
    let mut remaining = data;
    loop {
        let Some(start) = remaining.find(PASTE_START) else {
            events.extend(parse_non_paste(remaining));
            break;
        };

        events.extend(parse_non_paste(&remaining[..start]));

        let after_start = &remaining[start + PASTE_START.len()..];
        let Some(end_rel) = after_start.find(PASTE_END) else {
            events.push(InputEvent::UnknownRaw {
                raw: remaining.to_string(),
            });
            break;
        };

        let raw_end = start + PASTE_START.len() + end_rel + PASTE_END.len();
        events.push(InputEvent::Paste {
            raw: remaining[start..raw_end].to_string(),
            text: after_start[..end_rel].to_string(),
        });

        remaining = &after_start[end_rel + PASTE_END.len()..];
        if remaining.is_empty() {
            break;
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::{parse_input_events, InputEvent};
    use crate::core::input::MouseKind;

    #[test]
    fn space_is_text_not_key() {
        assert_eq!(
            parse_input_events(" "),
            vec![InputEvent::Text {
                raw: " ".to_string(),
                text: " ".to_string(),
            }]
        );
    }

    #[test]
    fn control_keys_become_key_events() {
        assert_eq!(parse_input_events("\r")[0].key_id(), Some("enter"));
        assert_eq!(parse_input_events("\x1b")[0].key_id(), Some("escape"));
        assert_eq!(parse_input_events("\x1b[A")[0].key_id(), Some("up"));
    }

    #[test]
    fn mouse_reports_become_mouse_events() {
        assert_eq!(
            parse_input_events("\x1b[<35;3;2M"),
            vec![InputEvent::Mouse {
                raw: "\x1b[<35;3;2M".to_string(),
                kind: MouseKind::Move,
                column: 2,
                row: 1,
            }]
        );
    }

    #[test]
    fn bracketed_paste_is_parsed_and_can_be_mixed() {
        let events = parse_input_events("a\x1b[200~b\nc\x1b[201~d");
        assert_eq!(
            events,
            vec![
                InputEvent::text("a"),
                InputEvent::Paste {
                    raw: "\x1b[200~b\nc\x1b[201~".to_string(),
                    text: "b\nc".to_string(),
                },
                InputEvent::text("d"),
            ]
        );
    }

    #[test]
    fn unterminated_paste_is_unknown() {
        assert!(matches!(
            parse_input_events("\x1b[200~abc").as_slice(),
            [InputEvent::UnknownRaw { .. }]
        ));
    }
}
