//! Text helpers: ANSI-aware width, truncation and grapheme iteration.
//!
//! These helpers are pure (string in/string out) so widgets can measure and clip
//! styled lines without knowing how the styling closures produced them.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const TAB_WIDTH: usize = 3;
const ANSI_RESET: &str = "\x1b[0m";

/// Byte length of the escape sequence starting at `pos`, if any.
///
/// Recognizes CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL` or `ESC ] ... ESC \`).
fn escape_len(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&0x1b) {
        return None;
    }

    match bytes.get(pos + 1)? {
        b'[' => {
            let mut idx = pos + 2;
            while idx < bytes.len() {
                if (0x40..=0x7e).contains(&bytes[idx]) {
                    return Some(idx + 1 - pos);
                }
                idx += 1;
            }
            None
        }
        b']' => {
            let mut idx = pos + 2;
            while idx < bytes.len() {
                if bytes[idx] == 0x07 {
                    return Some(idx + 1 - pos);
                }
                if bytes[idx] == 0x1b && bytes.get(idx + 1) == Some(&b'\\') {
                    return Some(idx + 2 - pos);
                }
                idx += 1;
            }
            None
        }
        _ => None,
    }
}

pub fn grapheme_segments(text: &str) -> unicode_segmentation::Graphemes<'_> {
    UnicodeSegmentation::graphemes(text, true)
}

pub fn is_punctuation_char(ch: char) -> bool {
    ch.is_ascii_punctuation()
}

/// Terminal column width of `input`, ignoring ANSI control sequences.
pub fn visible_width(input: &str) -> usize {
    if input.is_empty() {
        return 0;
    }

    let mut width = 0;
    let mut idx = 0;
    let mut run_start = 0;
    while idx < input.len() {
        if let Some(len) = escape_len(input, idx) {
            width += run_width(&input[run_start..idx]);
            idx += len;
            run_start = idx;
            continue;
        }
        idx += input[idx..].chars().next().map(char::len_utf8).unwrap_or(1);
    }
    width + run_width(&input[run_start..])
}

fn run_width(run: &str) -> usize {
    grapheme_segments(run)
        .map(|grapheme| {
            if grapheme == "\t" {
                TAB_WIDTH
            } else {
                UnicodeWidthStr::width(grapheme)
            }
        })
        .sum()
}

/// Clips `text` to `max_width` visible columns, appending `ellipsis` when clipped.
///
/// Escape sequences are copied through untouched; a reset is appended after a clip
/// so a dangling style never bleeds into the padding.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str, pad: bool) -> String {
    if max_width == 0 {
        return String::new();
    }

    let text_width = visible_width(text);
    if text_width <= max_width {
        if pad {
            return format!("{text}{}", " ".repeat(max_width - text_width));
        }
        return text.to_string();
    }

    let ellipsis_width = visible_width(ellipsis);
    let budget = max_width.saturating_sub(ellipsis_width);
    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    let mut saw_escape = false;
    let mut idx = 0;

    while idx < text.len() {
        if let Some(len) = escape_len(text, idx) {
            out.push_str(&text[idx..idx + len]);
            saw_escape = true;
            idx += len;
            continue;
        }
        let next_escape = (idx..text.len())
            .find(|&pos| text.as_bytes()[pos] == 0x1b)
            .unwrap_or(text.len());
        let mut consumed = idx;
        for grapheme in grapheme_segments(&text[idx..next_escape]) {
            let width = run_width(grapheme);
            if used + width > budget {
                break;
            }
            out.push_str(grapheme);
            used += width;
            consumed += grapheme.len();
        }
        if consumed < next_escape {
            break;
        }
        idx = next_escape;
    }

    if saw_escape {
        out.push_str(ANSI_RESET);
    }
    out.push_str(ellipsis);
    used += ellipsis_width.min(max_width);
    if pad && used < max_width {
        out.push_str(&" ".repeat(max_width - used));
    }
    out
}

/// Pads `line` with spaces up to `width` visible columns.
pub fn pad_to_width(line: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(line));
    if pad == 0 {
        return line.to_string();
    }
    format!("{line}{}", " ".repeat(pad))
}

/// Collapses line breaks so multi-line labels render on one row.
pub fn normalize_to_single_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_break = false;
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            if !last_was_break {
                out.push(' ');
            }
            last_was_break = true;
        } else {
            out.push(ch);
            last_was_break = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{normalize_to_single_line, pad_to_width, truncate_to_width, visible_width};

    #[test]
    fn ansi_ignored_in_width() {
        assert_eq!(visible_width("hi\x1b[31m!!\x1b[0m"), 4);
        assert_eq!(visible_width("\x1b]8;;https://example.com\x07link\x1b]8;;\x07"), 4);
    }

    #[test]
    fn wide_chars_count_double() {
        assert_eq!(visible_width("日本"), 4);
        assert_eq!(visible_width("a\tb"), 5);
    }

    #[test]
    fn truncate_keeps_escapes_and_appends_reset() {
        let clipped = truncate_to_width("\x1b[1mabcdef\x1b[0m", 4, "…", false);
        assert_eq!(clipped, "\x1b[1mabc\x1b[0m…");
        assert_eq!(visible_width(&clipped), 4);
    }

    #[test]
    fn truncate_pads_short_text_when_asked() {
        assert_eq!(truncate_to_width("ab", 4, "", true), "ab  ");
        assert_eq!(truncate_to_width("abcdef", 3, "", true), "abc");
        assert_eq!(truncate_to_width("abc", 0, "", true), "");
    }

    #[test]
    fn pad_and_normalize() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcd", 2), "abcd");
        assert_eq!(normalize_to_single_line(" one\r\ntwo\n"), "one two");
    }
}
