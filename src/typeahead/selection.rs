//! Typeahead snapshot and its selection/commit transitions.
//!
//! Cursor arithmetic is kept in free functions over `(count, selected)` so the
//! wraparound rules can be checked without building a whole snapshot.

/// A committed typeahead value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Committed<S> {
    /// A suggestion produced by the data source.
    Suggestion(S),
    /// Free-typed text; only produced when the typeahead is not rigid.
    Text(String),
}

/// Cursor after moving up: starts from the current index (or 0), steps back, wraps.
///
/// The first move from "no selection" lands on the last row.
pub fn select_previous(count: usize, selected: Option<usize>) -> Option<usize> {
    if count == 0 {
        return selected;
    }
    let start = selected.map_or(0, |index| index as i64);
    Some(wrap(start - 1, count))
}

/// Cursor after moving down: starts from the current index (or -1), steps forward, wraps.
///
/// The first move from "no selection" lands on row 0.
pub fn select_next(count: usize, selected: Option<usize>) -> Option<usize> {
    if count == 0 {
        return selected;
    }
    let start = selected.map_or(-1, |index| index as i64);
    Some(wrap(start + 1, count))
}

fn wrap(index: i64, count: usize) -> usize {
    index.rem_euclid(count as i64) as usize
}

/// The state owned by one typeahead instance.
#[derive(Debug, Clone)]
pub struct TypeaheadState<S> {
    input_text: String,
    term: String,
    suggestions: Vec<S>,
    selected_index: Option<usize>,
    waiting: bool,
    model: Option<Committed<S>>,
    rigid: bool,
    revision: u64,
}

impl<S: Clone> TypeaheadState<S> {
    pub fn new(rigid: bool, model: Option<Committed<S>>) -> Self {
        Self {
            input_text: String::new(),
            term: String::new(),
            suggestions: Vec::new(),
            selected_index: None,
            waiting: false,
            model,
            rigid,
            revision: 0,
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Search term the current suggestions were produced for.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn suggestions(&self) -> &[S] {
        &self.suggestions
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected(&self) -> Option<&S> {
        self.selected_index.and_then(|index| self.suggestions.get(index))
    }

    pub fn waiting(&self) -> bool {
        self.waiting
    }

    pub fn model(&self) -> Option<&Committed<S>> {
        self.model.as_ref()
    }

    pub fn rigid(&self) -> bool {
        self.rigid
    }

    /// Bumped whenever the suggestion list is replaced or cleared.
    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the suggestion panel has anything to show.
    pub fn panel_visible(&self) -> bool {
        self.waiting || !self.suggestions.is_empty()
    }

    pub(crate) fn set_input_text(&mut self, text: String) {
        self.input_text = text;
    }

    pub(crate) fn set_waiting(&mut self, waiting: bool) {
        self.waiting = waiting;
    }

    pub(crate) fn set_model(&mut self, model: Option<Committed<S>>) {
        self.model = model;
    }

    /// Installs a fresh result set; the old selection never carries over.
    pub(crate) fn replace_suggestions(&mut self, term: String, suggestions: Vec<S>) {
        self.term = term;
        self.suggestions = suggestions;
        self.selected_index = None;
        self.waiting = false;
        self.revision += 1;
    }

    pub fn select_previous(&mut self) {
        self.selected_index = select_previous(self.suggestions.len(), self.selected_index);
    }

    pub fn select_next(&mut self) {
        self.selected_index = select_next(self.suggestions.len(), self.selected_index);
    }

    /// Points the cursor at `index`; indices outside the list are ignored.
    pub fn select_at(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.selected_index = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_index = None;
    }

    /// Reports `value` through `on_change` once, records it as the model and clears
    /// the transient text, suggestions and selection.
    pub fn commit(&mut self, value: Committed<S>, on_change: &mut dyn FnMut(Committed<S>)) {
        on_change(value.clone());
        self.model = Some(value);
        self.input_text.clear();
        self.term.clear();
        self.suggestions.clear();
        self.selected_index = None;
        self.revision += 1;
    }

    /// Commits the selected suggestion, or the typed text when free text is allowed
    /// and the box is not empty.
    ///
    /// Returns whether anything was committed.
    pub fn choose_selected(&mut self, on_change: &mut dyn FnMut(Committed<S>)) -> bool {
        let value = match self.selected() {
            Some(suggestion) => Committed::Suggestion(suggestion.clone()),
            None if !self.rigid && !self.input_text.is_empty() => {
                Committed::Text(self.input_text.clone())
            }
            None => return false,
        };
        self.commit(value, on_change);
        true
    }

    /// Drops everything transient: waiting flag, suggestions, typed text and selection.
    pub fn reset_all(&mut self) {
        self.waiting = false;
        self.input_text.clear();
        self.term.clear();
        self.suggestions.clear();
        self.selected_index = None;
        self.revision += 1;
    }
}
