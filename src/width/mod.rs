//! Terminal display width helpers.

mod utils;

pub use utils::{display_width, skip_width, strip_ansi, truncate_to_width};
