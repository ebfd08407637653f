//! Suggestion panel: loading line plus a windowed list of rows.

use crate::core::component::Component;
use crate::core::text::{normalize_to_single_line, truncate_to_width};
use crate::widgets::loader::LoadingIndicator;

const ACTIVE_PREFIX: &str = "→ ";
const ROW_PREFIX: &str = "  ";

pub struct SuggestionListTheme {
    pub active_row: Box<dyn Fn(&str) -> String>,
    pub row: Box<dyn Fn(&str) -> String>,
    pub scroll_info: Box<dyn Fn(&str) -> String>,
    pub spinner: Box<dyn Fn(&str) -> String>,
    pub loading_message: Box<dyn Fn(&str) -> String>,
}

impl Default for SuggestionListTheme {
    fn default() -> Self {
        Self {
            active_row: Box::new(str::to_string),
            row: Box::new(str::to_string),
            scroll_info: Box::new(str::to_string),
            spinner: Box::new(str::to_string),
            loading_message: Box::new(str::to_string),
        }
    }
}

/// Display-only list. Selection lives with the owner; the list just mirrors it and
/// remembers which rendered line shows which suggestion so pointer events can be mapped
/// back to an index.
pub struct SuggestionList {
    labels: Vec<String>,
    selected: Option<usize>,
    waiting: bool,
    max_visible: usize,
    active_row: Box<dyn Fn(&str) -> String>,
    row: Box<dyn Fn(&str) -> String>,
    scroll_info: Box<dyn Fn(&str) -> String>,
    loader: LoadingIndicator,
    row_map: Vec<Option<usize>>,
}

impl SuggestionList {
    pub fn new(max_visible: usize, theme: SuggestionListTheme) -> Self {
        let SuggestionListTheme {
            active_row,
            row,
            scroll_info,
            spinner,
            loading_message,
        } = theme;
        Self {
            labels: Vec::new(),
            selected: None,
            waiting: false,
            max_visible,
            active_row,
            row,
            scroll_info,
            loader: LoadingIndicator::new(spinner, loading_message, None),
            row_map: Vec::new(),
        }
    }

    pub fn set_rows(&mut self, labels: Vec<String>, selected: Option<usize>) {
        self.labels = labels;
        self.selected = selected.filter(|index| *index < self.labels.len());
    }

    pub fn set_waiting(&mut self, waiting: bool) {
        if waiting && !self.waiting {
            self.loader.reset();
        }
        self.waiting = waiting;
    }

    pub fn set_loading_message(&mut self, message: impl Into<String>) {
        self.loader.set_message(message);
    }

    pub fn set_max_visible(&mut self, max_visible: usize) {
        self.max_visible = max_visible;
    }

    pub fn is_visible(&self) -> bool {
        self.waiting || !self.labels.is_empty()
    }

    /// Suggestion index shown on rendered line `line` of the last render.
    pub fn row_at(&self, line: usize) -> Option<usize> {
        self.row_map.get(line).copied().flatten()
    }

    fn window(&self) -> (usize, usize) {
        let count = self.labels.len();
        let max_visible = self.max_visible.max(1).min(count);
        let start = if count <= max_visible {
            0
        } else {
            let candidate = self.selected.unwrap_or(0).saturating_sub(max_visible / 2);
            candidate.min(count - max_visible)
        };
        (start, start + max_visible)
    }

    fn render_row(&self, width: usize, index: usize, label: &str) -> String {
        let active = self.selected == Some(index);
        let prefix = if active { ACTIVE_PREFIX } else { ROW_PREFIX };
        let label = normalize_to_single_line(label);
        let body = truncate_to_width(&label, width.saturating_sub(2), "…", false);
        let line = truncate_to_width(&format!("{prefix}{body}"), width, "", true);
        if active {
            (self.active_row)(&line)
        } else {
            (self.row)(&line)
        }
    }
}

impl Component for SuggestionList {
    fn render(&mut self, width: usize) -> Vec<String> {
        self.row_map.clear();
        if width == 0 || !self.is_visible() {
            return Vec::new();
        }

        let mut lines = Vec::new();
        if self.waiting {
            lines.extend(self.loader.render(width));
            self.row_map.push(None);
        }

        if self.labels.is_empty() {
            return lines;
        }

        let (start, end) = self.window();
        for index in start..end {
            lines.push(self.render_row(width, index, &self.labels[index]));
            self.row_map.push(Some(index));
        }

        if start > 0 || end < self.labels.len() {
            let position = self.selected.map_or(0, |index| index + 1);
            let info = format!("  ({position}/{})", self.labels.len());
            let info = truncate_to_width(&info, width, "", true);
            lines.push((self.scroll_info)(&info));
            self.row_map.push(None);
        }

        lines
    }

    fn invalidate(&mut self) {
        self.loader.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::{SuggestionList, SuggestionListTheme};
    use crate::core::component::Component;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn hidden_when_idle_and_empty() {
        let mut list = SuggestionList::new(5, SuggestionListTheme::default());
        assert!(list.render(10).is_empty());
        assert_eq!(list.row_at(0), None);
    }

    #[test]
    fn marks_active_row() {
        let mut list = SuggestionList::new(5, SuggestionListTheme::default());
        list.set_rows(labels(&["apple", "apricot"]), Some(1));
        assert_eq!(list.render(10), vec!["  apple   ", "→ apricot "]);
        assert_eq!(list.row_at(1), Some(1));
    }

    #[test]
    fn loader_line_precedes_rows() {
        let theme = SuggestionListTheme {
            active_row: Box::new(|text| format!("[{text}]")),
            ..SuggestionListTheme::default()
        };
        let mut list = SuggestionList::new(5, theme);
        list.set_waiting(true);
        list.set_rows(labels(&["a"]), Some(0));

        let lines = list.render(8);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("⠋ Load"));
        assert_eq!(lines[1], "[→ a     ]");
        assert_eq!(list.row_at(0), None);
        assert_eq!(list.row_at(1), Some(0));
    }

    #[test]
    fn windows_long_lists_around_selection() {
        let mut list = SuggestionList::new(2, SuggestionListTheme::default());
        list.set_rows(labels(&["one", "two", "three", "four"]), Some(2));

        let lines = list.render(10);
        assert_eq!(lines, vec!["  two     ", "→ three   ", "  (3/4)   "]);
        assert_eq!(list.row_at(0), Some(1));
        assert_eq!(list.row_at(2), None);
    }

    #[test]
    fn out_of_range_selection_is_dropped() {
        let mut list = SuggestionList::new(5, SuggestionListTheme::default());
        list.set_rows(labels(&["only"]), Some(3));
        assert_eq!(list.render(8), vec!["  only  "]);
    }
}
