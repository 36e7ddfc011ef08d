//! Contracts for the engine subsystem plus a map-backed registry.
//!
//! Engines own their screens; lookups hand out `Arc` handles so the router can
//! reach an engine's screen without taking ownership of it.

mod registry;
mod transport;

pub use registry::{BasicEngine, EngineRegistry};
pub use transport::{Transport, TransportState};

use std::sync::Arc;

use crate::screen::SharedScreen;

pub const TAPE_DECK: &str = "TapeDeck";
pub const MIXER: &str = "Mixer";
pub const SYNTH: &str = "Synth";
pub const DRUMS: &str = "Drums";
pub const METRONOME: &str = "Metronome";

/// Engine selected when a requested name does not resolve.
pub const DEFAULT_ENGINE: &str = TAPE_DECK;

pub trait Engine: Send + Sync {
    fn name(&self) -> &str;
    fn screen(&self) -> SharedScreen;
}

pub trait EngineLookup: Send + Sync {
    fn engine_by_name(&self, name: &str) -> Option<Arc<dyn Engine>>;
}
