use thiserror::Error;

/// Unified result type for the routing core.
pub type Result<T> = std::result::Result<T, UiError>;

/// Errors surfaced by the routing core and its persistence glue.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("default engine `{0}` is not registered")]
    DefaultEngineMissing(String),
    #[error("screen `{0}` lock poisoned")]
    ScreenPoisoned(String),
    #[error("state section `{0}` is not attached")]
    SectionNotAttached(String),
    #[error("unrecognised key binding `{0}`")]
    InvalidBinding(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
