//! Key identities, rotary events and the held-key table.

mod core;

pub use core::{Key, KeyState, Rotary, RotaryEvent};
