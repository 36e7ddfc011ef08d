//! Session persistence: the selected engine and the section store it lives in.

mod state;
mod store;

pub use state::{SELECTED_ENGINE_FIELD, SessionState};
pub use store::{StateSection, StateStore};
