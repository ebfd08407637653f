//! Terminal typeahead widget.
//!
//! Invariant: search results are applied only on the owner's thread and only for the
//! current search generation.
//!
//! # Public API Overview
//! - Build a [`Typeahead`] from [`TypeaheadOptions`] inside a tokio runtime and feed it
//!   [`InputEvent`]s; it renders through the [`Component`] trait.
//! - Provide suggestions through a [`DataSource`]: synchronous, callback, or future based.
//! - Reuse the collaborators on their own: [`TextInput`], [`Flex`], [`SuggestionList`],
//!   [`LoadingIndicator`], and the [`debounce`] channel.
//! - Use [`EnvConfig`] and [`init_logging`] for env-driven configuration and tracing output.

#![allow(clippy::type_complexity)]

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod typeahead;
pub mod widgets;

/// Construction errors.
pub use crate::error::{Result, TypeaheadError};

/// Environment configuration and tracing setup.
pub use crate::config::{EnvConfig, DEFAULT_DEBOUNCE};
pub use crate::logging::init_logging;

/// Typeahead controller, options and search plumbing.
pub use crate::typeahead::{
    debounce, select_next, select_previous, Committed, Completion, DataSource, Debounced,
    Debouncer, Generations, RenderRequester, SearchEvent, SearchResult, SubscriptionId,
    Typeahead, TypeaheadOptions, TypeaheadOptionsBuilder, TypeaheadState, TypeaheadTheme,
};

/// Built-in UI components.
pub use crate::widgets::{
    Align, Direction, Flex, FlexLayout, InputStatus, LoadingIndicator, SuggestionList,
    SuggestionListTheme, TextEdit, TextInput, TextInputTheme,
};

/// Keybinding configuration and default mappings.
pub use crate::core::keybindings::{
    default_keybindings_handle, Action, KeyBinding, KeyId, KeybindingsConfig, KeybindingsHandle,
    KeybindingsManager, DEFAULT_KEYBINDINGS,
};

/// Input parsing.
pub use crate::core::input::{parse_key, MouseKind};
pub use crate::core::input_event::{parse_input_events, EventDisposition, InputEvent};

/// Component traits.
pub use crate::core::component::{Component, Focusable};

/// Returns whether a component exposes focus behavior via [`Focusable`].
pub fn is_focusable(component: &mut dyn Component) -> bool {
    component.as_focusable().is_some()
}

/// ANSI-aware text helpers.
pub use crate::core::text::{truncate_to_width, visible_width};
