//! Typeahead controller: a text box over a debounced, generation-checked search.
//!
//! All state lives in one [`TypeaheadState`] mutated only through `&mut self`. Background
//! tasks never touch it; they queue [`SearchEvent`]s that are drained here, on the
//! owner's thread, before every event and every render. Pointer events are the
//! exception: they are mapped against the rows of the last render, before anything
//! queued since is applied.

use std::fmt::Display;
use std::ops::Range;

use tokio::runtime::Handle;

use crate::config::EnvConfig;
use crate::core::component::{Component, Focusable};
use crate::core::input::MouseKind;
use crate::core::input_event::{EventDisposition, InputEvent};
use crate::core::keybindings::{
    default_keybindings_handle, lock_keybindings, Action, KeybindingsHandle,
};
use crate::error::{Result, TypeaheadError};
use crate::typeahead::options::{OnChange, RenderSuggestion, TypeaheadOptions};
use crate::typeahead::search::{DataSource, RenderRequester, SearchEvent, SearchOrchestrator};
use crate::typeahead::selection::{Committed, TypeaheadState};
use crate::widgets::flex::Flex;
use crate::widgets::suggestion_list::SuggestionList;
use crate::widgets::text_input::{TextEdit, TextInput};

const NAVIGATION_ACTIONS: [Action; 5] = [
    Action::SelectUp,
    Action::SelectDown,
    Action::SelectConfirm,
    Action::SelectCancel,
    Action::Tab,
];

/// Handle returned by [`Typeahead::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<S> = Box<dyn FnMut(&TypeaheadState<S>)>;

/// Autocomplete input.
///
/// Must be created inside a tokio runtime; the debounce timer and the search loop run
/// on it. Dropping the typeahead stops both, and answers that arrive afterwards are
/// discarded.
pub struct Typeahead<S> {
    state: TypeaheadState<S>,
    on_change: OnChange<S>,
    render_suggestion: Option<RenderSuggestion<S>>,
    keybindings: KeybindingsHandle,
    input: TextInput,
    list: SuggestionList,
    layout: Flex,
    width: Option<usize>,
    disabled: bool,
    focused: bool,
    disposed: bool,
    orchestrator: SearchOrchestrator<S>,
    observers: Vec<(SubscriptionId, Observer<S>)>,
    next_subscription: u64,
    list_rows: Range<usize>,
    rendered_revision: Option<u64>,
}

impl<S> Typeahead<S>
where
    S: Clone + Display + Send + 'static,
{
    pub fn new(options: TypeaheadOptions<S>) -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| TypeaheadError::NoRuntime)?;
        let TypeaheadOptions {
            model,
            on_change,
            data_source,
            render_suggestion,
            rigid,
            status,
            status_icon,
            status_tooltip,
            placeholder,
            validation,
            width,
            height,
            change_on_blur,
            disabled,
            debounce,
            theme,
            keybindings,
        } = options;

        let keybindings = keybindings.unwrap_or_else(default_keybindings_handle);
        let mut input = TextInput::new(keybindings.clone());
        input.set_validation(validation.as_deref())?;
        input.set_placeholder(placeholder);
        input.set_status(status);
        input.set_status_icon(status_icon);
        input.set_status_tooltip(status_tooltip);
        input.set_disabled(disabled);
        input.set_theme(theme.input);
        // Searches follow every edit; deferring changes to blur is not supported here.
        input.set_change_on_blur(false);
        if change_on_blur {
            tracing::debug!("typeahead ignores change_on_blur");
        }

        let quiet = debounce.unwrap_or_else(|| EnvConfig::from_env().debounce_or_default());
        let orchestrator = SearchOrchestrator::spawn(&handle, quiet, data_source);
        tracing::debug!(quiet_ms = quiet.as_millis() as u64, rigid, "typeahead created");

        Ok(Self {
            state: TypeaheadState::new(rigid, model),
            on_change,
            render_suggestion,
            keybindings,
            input,
            list: SuggestionList::new(height, theme.list),
            layout: Flex::column(),
            width,
            disabled,
            focused: false,
            disposed: false,
            orchestrator,
            observers: Vec::new(),
            next_subscription: 0,
            list_rows: 0..0,
            rendered_revision: None,
        })
    }

    pub fn state(&self) -> &TypeaheadState<S> {
        &self.state
    }

    /// Registers `observer`, called with the snapshot after every state change.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&TypeaheadState<S>) + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Hook called from background tasks whenever search events are queued.
    pub fn set_render_requester(&mut self, requester: Option<RenderRequester>) {
        self.orchestrator.set_render_requester(requester);
    }

    /// Switches to a new data source. Answers from the old one go stale, the suggestion
    /// panel is cleared, and the typed text is searched again with the new source.
    pub fn set_data_source(&mut self, data_source: DataSource<S>) {
        if self.disposed {
            return;
        }
        self.orchestrator.replace_source(data_source);
        self.state.replace_suggestions(String::new(), Vec::new());
        if !self.state.input_text().is_empty() {
            self.orchestrator.push(self.state.input_text());
        }
        tracing::debug!("typeahead data source replaced");
        self.notify_observers();
    }

    /// Mirrors a model owned by the caller.
    pub fn set_model(&mut self, model: Option<Committed<S>>) {
        self.state.set_model(model);
        self.notify_observers();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.input.set_disabled(disabled);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Applies every queued search event. Returns how many changed the state.
    pub fn flush_search_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.orchestrator.try_next_event() {
            if self.apply_search_event(event) {
                applied += 1;
            }
        }
        if applied > 0 {
            self.notify_observers();
        }
        applied
    }

    /// Waits for the next search event, then drains whatever else is queued. Returns how
    /// many events changed the state; `0` once the typeahead is disposed.
    pub async fn process_next_search_event(&mut self) -> usize {
        let Some(event) = self.orchestrator.next_event().await else {
            return 0;
        };
        let first = usize::from(self.apply_search_event(event));
        if first > 0 {
            self.notify_observers();
        }
        first + self.flush_search_events()
    }

    /// Stops background work. Later answers from the data source are dropped.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.orchestrator.shutdown();
        self.observers.clear();
        tracing::debug!("typeahead disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn apply_search_event(&mut self, event: SearchEvent<S>) -> bool {
        let generations = self.orchestrator.generations();
        match event {
            SearchEvent::Dispatched { generation, term } => {
                if !generations.is_current(generation) {
                    tracing::debug!(generation, term = %term, "ignoring superseded dispatch");
                    return false;
                }
                self.state.set_waiting(true);
                true
            }
            SearchEvent::Results {
                generation,
                term,
                suggestions,
            } => {
                if !generations.is_current(generation) {
                    tracing::debug!(generation, term = %term, "discarding stale results");
                    return false;
                }
                tracing::debug!(generation, count = suggestions.len(), "applying results");
                self.state.replace_suggestions(term, suggestions);
                true
            }
            SearchEvent::Cleared => {
                if !self.state.input_text().is_empty() {
                    return false;
                }
                self.state.reset_all();
                true
            }
        }
    }

    fn notify_observers(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.state);
        }
    }

    /// Makes in-flight searches stale and supersedes any term still in the debouncer.
    fn cancel_searches(&mut self) {
        self.orchestrator.generations().invalidate();
        self.orchestrator.push("");
    }

    fn reset(&mut self) {
        self.cancel_searches();
        self.state.reset_all();
        self.input.set_value("");
    }

    fn on_text_changed(&mut self, text: String) {
        if text.is_empty() {
            self.reset();
        } else {
            self.state.set_input_text(text.clone());
            self.orchestrator.push(text);
        }
    }

    fn after_commit(&mut self) {
        self.cancel_searches();
        self.state.set_waiting(false);
        self.input.set_value("");
        tracing::debug!("typeahead committed");
    }

    fn choose(&mut self) {
        if self.state.choose_selected(&mut *self.on_change) {
            self.after_commit();
        }
    }

    /// Free text is committed on blur, or on tab with no suggestions, when not rigid.
    fn blur_commit(&mut self) {
        if self.state.rigid() || self.state.input_text().is_empty() {
            return;
        }
        let text = self.state.input_text().to_string();
        self.state.commit(Committed::Text(text), &mut *self.on_change);
        self.after_commit();
    }

    fn handle_action(&mut self, action: Action) -> EventDisposition {
        match action {
            Action::SelectUp => self.state.select_previous(),
            Action::SelectDown => self.state.select_next(),
            Action::SelectConfirm => self.choose(),
            Action::SelectCancel => self.reset(),
            Action::Tab => {
                if self.state.suggestions().is_empty() {
                    self.blur_commit();
                    self.notify_observers();
                    return EventDisposition::Propagate;
                }
                self.state.select_next();
            }
            _ => return EventDisposition::Propagate,
        }
        self.notify_observers();
        EventDisposition::Handled
    }

    fn handle_mouse(&mut self, kind: MouseKind, row: usize) -> EventDisposition {
        if !self.list_rows.contains(&row) {
            return EventDisposition::Propagate;
        }
        if self.rendered_revision != Some(self.state.revision()) {
            tracing::debug!(row, "ignoring pointer event on outdated suggestion rows");
            return EventDisposition::Propagate;
        }
        let Some(index) = self.list.row_at(row - self.list_rows.start) else {
            return EventDisposition::Propagate;
        };
        match kind {
            MouseKind::Move => self.state.select_at(index),
            MouseKind::Press => {
                self.state.select_at(index);
                self.choose();
            }
            MouseKind::Release => return EventDisposition::Propagate,
        }
        self.notify_observers();
        EventDisposition::Handled
    }

    fn label_for(&self, suggestion: &S) -> String {
        match self.render_suggestion.as_ref() {
            Some(render) => render(self.state.term(), suggestion),
            None => suggestion.to_string(),
        }
    }
}

impl<S> Component for Typeahead<S>
where
    S: Clone + Display + Send + 'static,
{
    fn render(&mut self, width: usize) -> Vec<String> {
        self.flush_search_events();
        let width = self.width.map_or(width, |fixed| fixed.min(width));

        if self.input.value() != self.state.input_text() {
            self.input.set_value(self.state.input_text());
        }
        let labels = self
            .state
            .suggestions()
            .iter()
            .map(|suggestion| self.label_for(suggestion))
            .collect();
        self.list.set_rows(labels, self.state.selected_index());
        self.list.set_waiting(self.state.waiting());

        let layout = self
            .layout
            .layout(width, &mut [&mut self.input as &mut dyn Component, &mut self.list]);
        self.list_rows = layout.child_rows.get(1).cloned().unwrap_or(0..0);
        self.rendered_revision = Some(self.state.revision());
        layout.lines
    }

    fn handle_event(&mut self, event: &InputEvent) -> EventDisposition {
        if self.disposed || self.disabled {
            return EventDisposition::Propagate;
        }
        if let InputEvent::Mouse { kind, row, .. } = event {
            return self.handle_mouse(*kind, usize::from(*row));
        }
        self.flush_search_events();

        if let InputEvent::Key { key_id, .. } = event {
            let action = lock_keybindings(&self.keybindings)
                .resolve(Some(key_id.as_str()), &NAVIGATION_ACTIONS);
            if let Some(action) = action {
                return self.handle_action(action);
            }
        }

        match self.input.apply_event(event) {
            TextEdit::Ignored => EventDisposition::Propagate,
            TextEdit::Moved => EventDisposition::Handled,
            TextEdit::Changed(text) => {
                self.on_text_changed(text);
                self.notify_observers();
                EventDisposition::Handled
            }
            TextEdit::Submitted(_) => {
                self.choose();
                self.notify_observers();
                EventDisposition::Handled
            }
        }
    }

    fn invalidate(&mut self) {
        self.input.invalidate();
        self.list.invalidate();
    }

    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl<S> Focusable for Typeahead<S>
where
    S: Clone + Display + Send + 'static,
{
    fn set_focused(&mut self, focused: bool) {
        let blurred = self.focused && !focused;
        self.focused = focused;
        self.input.set_focused(focused);
        if blurred && !self.disposed && !self.disabled {
            self.blur_commit();
            self.notify_observers();
        }
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::Typeahead;
    use crate::core::component::{Component, Focusable};
    use crate::core::input_event::{EventDisposition, InputEvent};
    use crate::error::TypeaheadError;
    use crate::typeahead::options::TypeaheadOptions;
    use crate::typeahead::search::DataSource;
    use crate::typeahead::selection::Committed;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    const QUIET: Duration = Duration::from_millis(300);

    type Commits = Rc<RefCell<Vec<Committed<String>>>>;

    fn fruit() -> DataSource<String> {
        DataSource::sync(|term| {
            let items = ["apple", "apricot", "banana"]
                .iter()
                .filter(|fruit| fruit.starts_with(term))
                .map(|fruit| fruit.to_string())
                .collect();
            (term.to_string(), items)
        })
    }

    fn typeahead(rigid: bool) -> (Typeahead<String>, Commits) {
        let commits: Commits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&commits);
        let options = TypeaheadOptions::builder()
            .on_change(move |value| sink.borrow_mut().push(value))
            .data_source(fruit())
            .rigid(rigid)
            .debounce(QUIET)
            .build()
            .expect("options");
        (Typeahead::new(options).expect("typeahead"), commits)
    }

    async fn settle(typeahead: &mut Typeahead<String>) {
        tokio::time::sleep(QUIET * 2).await;
        typeahead.flush_search_events();
    }

    #[test]
    fn requires_a_runtime() {
        let options = TypeaheadOptions::builder()
            .on_change(|_| {})
            .data_source(fruit())
            .build()
            .expect("options");
        assert!(matches!(Typeahead::new(options), Err(TypeaheadError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_validation_fails_construction() {
        let options = TypeaheadOptions::builder()
            .on_change(|_| {})
            .data_source(fruit())
            .validation("[")
            .build()
            .expect("options");
        assert!(matches!(
            Typeahead::new(options),
            Err(TypeaheadError::InvalidValidation { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_keys_move_selection() {
        let (mut typeahead, _) = typeahead(true);
        typeahead.handle_event(&InputEvent::text("ap"));
        settle(&mut typeahead).await;
        assert_eq!(typeahead.state().suggestions().len(), 2);

        typeahead.handle_event(&InputEvent::key("up"));
        assert_eq!(typeahead.state().selected_index(), Some(1));
        typeahead.handle_event(&InputEvent::key("down"));
        assert_eq!(typeahead.state().selected_index(), Some(0));

        typeahead.handle_event(&InputEvent::key("escape"));
        assert_eq!(typeahead.state().input_text(), "");
        assert!(typeahead.state().suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn render_stacks_rows_under_the_text_box() {
        let (mut typeahead, _) = typeahead(true);
        typeahead.handle_event(&InputEvent::text("ap"));
        tokio::time::sleep(QUIET * 2).await;

        let lines = typeahead.render(12);
        assert_eq!(lines, vec!["> ap        ", "  apple     ", "  apricot   "]);

        typeahead.handle_event(&InputEvent::key("down"));
        let lines = typeahead.render(12);
        assert_eq!(lines[1], "→ apple     ");
    }

    #[tokio::test(start_paused = true)]
    async fn blur_commits_free_text_only_when_loose() {
        let (mut loose, commits) = typeahead(false);
        loose.set_focused(true);
        loose.handle_event(&InputEvent::text("kiwi"));
        loose.set_focused(false);
        assert_eq!(*commits.borrow(), vec![Committed::Text("kiwi".to_string())]);

        let (mut rigid, commits) = typeahead(true);
        rigid.set_focused(true);
        rigid.handle_event(&InputEvent::text("kiwi"));
        rigid.set_focused(false);
        assert!(commits.borrow().is_empty());
        assert_eq!(rigid.state().input_text(), "kiwi");
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_typeahead_ignores_input() {
        let (mut typeahead, _) = typeahead(true);
        typeahead.set_disabled(true);
        assert_eq!(
            typeahead.handle_event(&InputEvent::text("a")),
            EventDisposition::Propagate
        );
        assert_eq!(typeahead.state().input_text(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn observers_see_every_change_until_unsubscribed() {
        let (mut typeahead, _) = typeahead(true);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = typeahead.subscribe(move |state| {
            sink.borrow_mut().push(state.input_text().to_string());
        });

        typeahead.handle_event(&InputEvent::text("b"));
        typeahead.handle_event(&InputEvent::text("a"));
        assert_eq!(*seen.borrow(), vec!["b".to_string(), "ba".to_string()]);

        assert!(typeahead.unsubscribe(id));
        typeahead.handle_event(&InputEvent::text("n"));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_data_source_clears_and_searches_again() {
        let (mut typeahead, _) = typeahead(true);
        typeahead.handle_event(&InputEvent::text("ap"));
        settle(&mut typeahead).await;
        typeahead.handle_event(&InputEvent::key("down"));

        typeahead.set_data_source(DataSource::sync(|term| {
            (term.to_string(), vec![format!("{term}-new")])
        }));
        assert!(typeahead.state().suggestions().is_empty());
        assert_eq!(typeahead.state().selected_index(), None);
        assert_eq!(typeahead.state().input_text(), "ap");

        settle(&mut typeahead).await;
        assert_eq!(typeahead.state().suggestions(), &["ap-new".to_string()]);
    }
}
