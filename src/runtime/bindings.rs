//! Keyboard-to-panel key mapping for the terminal front end.
//!
//! Bindings are written as lowercase names: a single character (`"q"`,
//! `"["`), `"space"`, a named key (`"esc"`, `"enter"`, `"tab"`,
//! `"backspace"`, `"left"`, `"right"`, `"up"`, `"down"`) or a function key
//! (`"f1"` .. `"f24"`).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UiError};
use crate::keys::Key;

const NAMED_KEYS: [&str; 9] = [
    "space",
    "esc",
    "enter",
    "tab",
    "backspace",
    "left",
    "right",
    "up",
    "down",
];

const DEFAULT_BINDINGS: [(&str, Key); 32] = [
    ("esc", Key::Quit),
    ("f1", Key::Tape),
    ("f2", Key::Mixer),
    ("f3", Key::Synth),
    ("f4", Key::Drums),
    ("f5", Key::Metronome),
    ("space", Key::Play),
    ("g", Key::Rec),
    ("tab", Key::Shift),
    ("left", Key::Left),
    ("right", Key::Right),
    ("[", Key::LoopIn),
    ("]", Key::LoopOut),
    ("b", Key::Cut),
    ("n", Key::Lift),
    ("m", Key::Drop),
    ("1", Key::TrackOne),
    ("2", Key::TrackTwo),
    ("3", Key::TrackThree),
    ("4", Key::TrackFour),
    ("q", Key::RedUp),
    ("a", Key::RedDown),
    ("z", Key::RedClick),
    ("w", Key::BlueUp),
    ("s", Key::BlueDown),
    ("x", Key::BlueClick),
    ("e", Key::WhiteUp),
    ("d", Key::WhiteDown),
    ("c", Key::WhiteClick),
    ("r", Key::GreenUp),
    ("f", Key::GreenDown),
    ("v", Key::GreenClick),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: BTreeMap<String, Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let map = DEFAULT_BINDINGS
            .iter()
            .map(|(binding, key)| (binding.to_string(), *key))
            .collect();
        Self { map }
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Parse a JSON object of `"binding": "key_name"` pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Key> = serde_json::from_str(json)?;
        let mut bindings = Self::empty();
        for (binding, key) in raw {
            bindings.bind(&binding, key)?;
        }
        Ok(bindings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn bind(&mut self, binding: &str, key: Key) -> Result<()> {
        let binding = binding.to_lowercase();
        if !is_valid_binding(&binding) {
            return Err(UiError::InvalidBinding(binding));
        }
        self.map.insert(binding, key);
        Ok(())
    }

    pub fn resolve(&self, event: &KeyEvent) -> Option<Key> {
        let name = binding_name(event.code)?;
        self.map.get(&name).copied()
    }

    /// First binding (in name order) that produces `key`.
    pub fn binding_for(&self, key: Key) -> Option<&str> {
        self.map
            .iter()
            .find(|(_, bound)| **bound == key)
            .map(|(binding, _)| binding.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn binding_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(ch) => ch.to_lowercase().to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };
    Some(name)
}

fn is_valid_binding(binding: &str) -> bool {
    if binding.chars().count() == 1 {
        return binding != " ";
    }
    if NAMED_KEYS.contains(&binding) {
        return true;
    }
    binding
        .strip_prefix('f')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=24).contains(&n))
}
