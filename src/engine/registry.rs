use std::collections::HashMap;
use std::sync::Arc;

use crate::screen::{SharedScreen, TitleScreen, shared};

use super::{DRUMS, Engine, EngineLookup, METRONOME, MIXER, SYNTH, TAPE_DECK};

/// Engine described only by its name and screen.
pub struct BasicEngine {
    name: String,
    screen: SharedScreen,
}

impl BasicEngine {
    pub fn new(name: impl Into<String>, screen: SharedScreen) -> Self {
        Self {
            name: name.into(),
            screen,
        }
    }

    /// Engine whose screen is a [`TitleScreen`] showing the engine name.
    pub fn titled(name: impl Into<String>) -> Self {
        let name = name.into();
        let screen = shared(TitleScreen::new(name.clone()));
        Self::new(name, screen)
    }
}

impl Engine for BasicEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn screen(&self) -> SharedScreen {
        Arc::clone(&self.screen)
    }
}

/// Name-keyed engine table. Registering a name twice replaces the earlier
/// engine.
#[derive(Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn Engine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding a titled engine for each panel category.
    pub fn with_panel_engines() -> Self {
        let mut registry = Self::new();
        for name in [TAPE_DECK, MIXER, SYNTH, DRUMS, METRONOME] {
            registry.register(BasicEngine::titled(name));
        }
        registry
    }

    pub fn register<E>(&mut self, engine: E)
    where
        E: Engine + 'static,
    {
        self.register_arc(Arc::new(engine));
    }

    pub fn register_arc(&mut self, engine: Arc<dyn Engine>) {
        self.engines.insert(engine.name().to_string(), engine);
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl EngineLookup for EngineRegistry {
    fn engine_by_name(&self, name: &str) -> Option<Arc<dyn Engine>> {
        self.engines.get(name).cloned()
    }
}
