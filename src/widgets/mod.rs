//! Widgets composed by the typeahead, usable on their own.

pub mod flex;
pub mod loader;
pub mod suggestion_list;
pub mod text_input;

pub use flex::{Align, Direction, Flex, FlexLayout};
pub use loader::LoadingIndicator;
pub use suggestion_list::{SuggestionList, SuggestionListTheme};
pub use text_input::{InputStatus, TextEdit, TextInput, TextInputTheme};
