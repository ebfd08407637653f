//! Raw terminal input decoding: key ids, printable text and SGR mouse reports.

const CTRL_LETTER_BASE: u8 = 96;

/// Normalized identifier for a legacy (non-kitty) key sequence.
///
/// Identifiers follow the `modifier+name` shape used by the keybinding tables,
/// for example `"up"`, `"shift+tab"` or `"ctrl+w"`.
pub fn parse_key(data: &str) -> Option<String> {
    let named = match data {
        "\x1b" => "escape",
        "\t" => "tab",
        "\x1b[Z" => "shift+tab",
        "\r" | "\n" | "\x1bOM" => "enter",
        "\x1b\r" => "alt+enter",
        " " => "space",
        "\x7f" | "\x08" => "backspace",
        "\x1b\x7f" | "\x1b\x08" => "alt+backspace",
        "\x1b[A" | "\x1bOA" => "up",
        "\x1b[B" | "\x1bOB" => "down",
        "\x1b[C" | "\x1bOC" => "right",
        "\x1b[D" | "\x1bOD" => "left",
        "\x1b[1;5C" => "ctrl+right",
        "\x1b[1;5D" => "ctrl+left",
        "\x1b[1;3C" | "\x1bf" => "alt+right",
        "\x1b[1;3D" | "\x1bb" => "alt+left",
        "\x1b[H" | "\x1bOH" | "\x1b[1~" => "home",
        "\x1b[F" | "\x1bOF" | "\x1b[4~" => "end",
        "\x1b[3~" => "delete",
        "\x1b[5~" => "pageUp",
        "\x1b[6~" => "pageDown",
        _ => "",
    };
    if !named.is_empty() {
        return Some(named.to_string());
    }

    let bytes = data.as_bytes();
    if bytes.len() == 1 && (1..=26).contains(&bytes[0]) {
        return Some(format!("ctrl+{}", (bytes[0] + CTRL_LETTER_BASE) as char));
    }
    if bytes.len() == 2 && bytes[0] == 0x1b && bytes[1].is_ascii_lowercase() {
        return Some(format!("alt+{}", bytes[1] as char));
    }
    None
}

/// Printable text carried by `data`, if it contains no control characters.
pub fn parse_text(data: &str) -> Option<String> {
    if data.is_empty() || data.chars().any(|ch| ch.is_control()) {
        return None;
    }
    Some(data.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    /// Pointer moved without a button held (hover).
    Move,
    Press,
    Release,
}

/// Decoded SGR (`ESC [ < b ; x ; y M|m`) mouse report with 0-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseReport {
    pub kind: MouseKind,
    pub button: u16,
    pub column: u16,
    pub row: u16,
}

pub fn parse_sgr_mouse(data: &str) -> Option<MouseReport> {
    let body = data.strip_prefix("\x1b[<")?;
    let (body, pressed) = if let Some(body) = body.strip_suffix('M') {
        (body, true)
    } else {
        (body.strip_suffix('m')?, false)
    };

    let mut parts = body.split(';').map(|part| part.parse::<u16>().ok());
    let code = parts.next()??;
    let column = parts.next()??;
    let row = parts.next()??;
    if parts.next().is_some() || column == 0 || row == 0 {
        return None;
    }

    let motion = code & 32 != 0;
    let kind = if motion {
        MouseKind::Move
    } else if pressed {
        MouseKind::Press
    } else {
        MouseKind::Release
    };

    Some(MouseReport {
        kind,
        button: code & 0b11,
        column: column - 1,
        row: row - 1,
    })
}
