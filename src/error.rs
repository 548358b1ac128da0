use std::error::Error as StdError;

/// Boxed error returned by actions and dispatch strategies.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Registration-time failures. Each variant names the offending pattern.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("unsupported http method: {0:?}")]
    UnsupportedHttpMethod(String),

    #[error("number of opening '[' and closing ']' does not match: pattern = {0:?}")]
    UnclosedOptionalSegments(String),

    #[error("optional segments can only occur at the end of a route: pattern = {0:?}")]
    OptionalSegmentsInMiddle(String),

    #[error("empty optional part: pattern = {0:?}")]
    EmptySegmentInOptional(String),

    #[error("placeholder is not closed: pattern = {0:?}")]
    UnclosedPlaceholder(String),

    #[error("placeholder name can not be empty: pattern = {0:?}")]
    EmptyPlaceholderName(String),

    #[error("placeholder {name:?} is used more than once: pattern = {pattern:?}")]
    DuplicatePlaceholder { pattern: String, name: String },

    #[error("invalid regex for placeholder {name:?}: pattern = {pattern:?}: {source}")]
    InvalidPlaceholderRegex {
        pattern: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("named groups are not allowed in placeholder {name:?}: pattern = {pattern:?}")]
    NamedGroupInPlaceholder { pattern: String, name: String },

    #[error("failed to compile route regex: {0}")]
    Regex(#[from] regex::Error),
}

/// Failures raised by a dispatch strategy itself, before any action runs.
///
/// Errors produced by the action are never wrapped in this type.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("action is not callable by this strategy: {0}")]
    NotCallable(String),

    #[error("no controller registered for class {0:?}")]
    UnknownClass(String),

    #[error("controller {class:?} has no method {method:?}")]
    UnknownMethod { class: String, method: String },
}
