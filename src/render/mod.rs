//! Terminal rendering backend for the routing core.

mod core;

pub use core::TerminalCanvas;
