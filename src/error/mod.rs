//! Error module orchestrator.
//!
//! The router and its collaborators share a single error enum; logging and the
//! terminal driver keep their own narrower error types.

mod types;

pub use types::{Result, UiError};
