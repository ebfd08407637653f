//! Typeahead configuration.

use std::time::Duration;

use crate::core::keybindings::KeybindingsHandle;
use crate::error::{Result, TypeaheadError};
use crate::typeahead::search::DataSource;
use crate::typeahead::selection::Committed;
use crate::widgets::suggestion_list::SuggestionListTheme;
use crate::widgets::text_input::{InputStatus, TextInputTheme};

/// Maximum suggestion rows shown at once when `height` is not set.
pub const DEFAULT_VISIBLE_ROWS: usize = 5;

pub type OnChange<S> = Box<dyn FnMut(Committed<S>)>;
pub type RenderSuggestion<S> = Box<dyn Fn(&str, &S) -> String>;

/// Styling passed through to the text box and the suggestion panel.
#[derive(Default)]
pub struct TypeaheadTheme {
    pub input: TextInputTheme,
    pub list: SuggestionListTheme,
}

/// Validated options for [`Typeahead::new`](crate::typeahead::Typeahead::new).
pub struct TypeaheadOptions<S> {
    pub(crate) model: Option<Committed<S>>,
    pub(crate) on_change: OnChange<S>,
    pub(crate) data_source: DataSource<S>,
    pub(crate) render_suggestion: Option<RenderSuggestion<S>>,
    pub(crate) rigid: bool,
    pub(crate) status: InputStatus,
    pub(crate) status_icon: Option<String>,
    pub(crate) status_tooltip: Option<String>,
    pub(crate) placeholder: Option<String>,
    pub(crate) validation: Option<String>,
    pub(crate) width: Option<usize>,
    pub(crate) height: usize,
    pub(crate) change_on_blur: bool,
    pub(crate) disabled: bool,
    pub(crate) debounce: Option<Duration>,
    pub(crate) theme: TypeaheadTheme,
    pub(crate) keybindings: Option<KeybindingsHandle>,
}

impl<S> TypeaheadOptions<S> {
    pub fn builder() -> TypeaheadOptionsBuilder<S> {
        TypeaheadOptionsBuilder::default()
    }
}

pub struct TypeaheadOptionsBuilder<S> {
    model: Option<Committed<S>>,
    on_change: Option<OnChange<S>>,
    data_source: Option<DataSource<S>>,
    render_suggestion: Option<RenderSuggestion<S>>,
    rigid: bool,
    status: InputStatus,
    status_icon: Option<String>,
    status_tooltip: Option<String>,
    placeholder: Option<String>,
    validation: Option<String>,
    width: Option<usize>,
    height: usize,
    change_on_blur: bool,
    disabled: bool,
    debounce: Option<Duration>,
    theme: TypeaheadTheme,
    keybindings: Option<KeybindingsHandle>,
}

impl<S> Default for TypeaheadOptionsBuilder<S> {
    fn default() -> Self {
        Self {
            model: None,
            on_change: None,
            data_source: None,
            render_suggestion: None,
            rigid: true,
            status: InputStatus::None,
            status_icon: None,
            status_tooltip: None,
            placeholder: None,
            validation: None,
            width: None,
            height: DEFAULT_VISIBLE_ROWS,
            change_on_blur: false,
            disabled: false,
            debounce: None,
            theme: TypeaheadTheme::default(),
            keybindings: None,
        }
    }
}

impl<S> TypeaheadOptionsBuilder<S> {
    /// Last committed value, owned by the caller.
    pub fn model(mut self, model: Committed<S>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn on_change(mut self, on_change: impl FnMut(Committed<S>) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn data_source(mut self, data_source: DataSource<S>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    /// Row label override, called with the search term the rows were produced for.
    pub fn render_suggestion(mut self, render: impl Fn(&str, &S) -> String + 'static) -> Self {
        self.render_suggestion = Some(Box::new(render));
        self
    }

    /// When false, free-typed text can be committed as well as suggestions.
    pub fn rigid(mut self, rigid: bool) -> Self {
        self.rigid = rigid;
        self
    }

    pub fn status(mut self, status: InputStatus) -> Self {
        self.status = status;
        self
    }

    pub fn status_icon(mut self, icon: impl Into<String>) -> Self {
        self.status_icon = Some(icon.into());
        self
    }

    pub fn status_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.status_tooltip = Some(tooltip.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Pattern the typed text must fully match; checked when the typeahead is built.
    pub fn validation(mut self, pattern: impl Into<String>) -> Self {
        self.validation = Some(pattern.into());
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Maximum suggestion rows visible at once.
    pub fn height(mut self, height: usize) -> Self {
        self.height = height.max(1);
        self
    }

    /// Accepted for compatibility. The typeahead always searches on every edit.
    pub fn change_on_blur(mut self, change_on_blur: bool) -> Self {
        self.change_on_blur = change_on_blur;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Quiet period before a typed term is searched.
    pub fn debounce(mut self, quiet: Duration) -> Self {
        self.debounce = Some(quiet);
        self
    }

    pub fn theme(mut self, theme: TypeaheadTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn keybindings(mut self, keybindings: KeybindingsHandle) -> Self {
        self.keybindings = Some(keybindings);
        self
    }

    pub fn build(self) -> Result<TypeaheadOptions<S>> {
        let on_change = self
            .on_change
            .ok_or(TypeaheadError::MissingOption("on_change"))?;
        let data_source = self
            .data_source
            .ok_or(TypeaheadError::MissingOption("data_source"))?;

        Ok(TypeaheadOptions {
            model: self.model,
            on_change,
            data_source,
            render_suggestion: self.render_suggestion,
            rigid: self.rigid,
            status: self.status,
            status_icon: self.status_icon,
            status_tooltip: self.status_tooltip,
            placeholder: self.placeholder,
            validation: self.validation,
            width: self.width,
            height: self.height,
            change_on_blur: self.change_on_blur,
            disabled: self.disabled,
            debounce: self.debounce,
            theme: self.theme,
            keybindings: self.keybindings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{TypeaheadOptions, DEFAULT_VISIBLE_ROWS};
    use crate::error::TypeaheadError;
    use crate::typeahead::search::DataSource;

    fn source() -> DataSource<String> {
        DataSource::sync(|term| (term.to_string(), Vec::new()))
    }

    #[test]
    fn missing_on_change_is_rejected() {
        let result = TypeaheadOptions::builder().data_source(source()).build();
        assert!(matches!(result, Err(TypeaheadError::MissingOption("on_change"))));
    }

    #[test]
    fn missing_data_source_is_rejected() {
        let result = TypeaheadOptions::<String>::builder().on_change(|_| {}).build();
        assert!(matches!(result, Err(TypeaheadError::MissingOption("data_source"))));
    }

    #[test]
    fn defaults_are_rigid_with_five_rows() {
        let options = TypeaheadOptions::builder()
            .on_change(|_| {})
            .data_source(source())
            .height(0)
            .build()
            .expect("complete options");
        assert!(options.rigid);
        assert_eq!(options.height, 1);
        assert!(options.debounce.is_none());

        let options = TypeaheadOptions::builder()
            .on_change(|_| {})
            .data_source(source())
            .build()
            .expect("complete options");
        assert_eq!(options.height, DEFAULT_VISIBLE_ROWS);
    }
}
