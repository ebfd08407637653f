//! Construction-time errors.

use thiserror::Error;

/// Errors reported while building a widget.
///
/// Everything here is a configuration problem caught before the first render; once a
/// widget exists, runtime failures (stale results, silent data sources) are handled
/// locally and never surface as errors.
#[derive(Debug, Error)]
pub enum TypeaheadError {
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),

    #[error("invalid validation pattern `{pattern}`: {source}")]
    InvalidValidation {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("typeahead must be created inside a tokio runtime")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, TypeaheadError>;
