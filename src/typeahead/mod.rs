//! Typeahead: a text box whose edits feed a debounced, asynchronous suggestion search.

pub mod controller;
pub mod debounce;
pub mod options;
pub mod search;
pub mod selection;

pub use controller::{SubscriptionId, Typeahead};
pub use debounce::{debounce, Debounced, Debouncer};
pub use options::{
    OnChange, RenderSuggestion, TypeaheadOptions, TypeaheadOptionsBuilder, TypeaheadTheme,
    DEFAULT_VISIBLE_ROWS,
};
pub use search::{
    Completion, DataSource, Generations, RenderRequester, SearchEvent, SearchOrchestrator,
    SearchResult,
};
pub use selection::{select_next, select_previous, Committed, TypeaheadState};
