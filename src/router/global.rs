//! Keys handled before the active screen sees them.

use crate::engine::{DRUMS, METRONOME, MIXER, SYNTH, TAPE_DECK};
use crate::keys::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    SelectEngine(&'static str),
    TogglePlay,
}

/// Every key with a global action.
pub const GLOBAL_KEYS: [Key; 7] = [
    Key::Quit,
    Key::Tape,
    Key::Mixer,
    Key::Synth,
    Key::Drums,
    Key::Metronome,
    Key::Play,
];

pub fn global_action(key: Key) -> Option<GlobalAction> {
    let action = match key {
        Key::Quit => GlobalAction::Quit,
        Key::Tape => GlobalAction::SelectEngine(TAPE_DECK),
        Key::Mixer => GlobalAction::SelectEngine(MIXER),
        Key::Synth => GlobalAction::SelectEngine(SYNTH),
        Key::Drums => GlobalAction::SelectEngine(DRUMS),
        Key::Metronome => GlobalAction::SelectEngine(METRONOME),
        Key::Play => GlobalAction::TogglePlay,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_global_keys() {
        for key in Key::ALL {
            assert_eq!(
                global_action(key).is_some(),
                GLOBAL_KEYS.contains(&key),
                "{key:?}"
            );
        }
    }

    #[test]
    fn rotary_keys_have_no_global_action() {
        for key in Key::ALL.iter().filter(|key| key.is_rotary()) {
            assert_eq!(global_action(*key), None);
        }
    }

    #[test]
    fn category_keys_select_engines() {
        assert_eq!(global_action(Key::Tape), Some(GlobalAction::SelectEngine("TapeDeck")));
        assert_eq!(global_action(Key::Metronome), Some(GlobalAction::SelectEngine("Metronome")));
        assert_eq!(global_action(Key::Play), Some(GlobalAction::TogglePlay));
        assert_eq!(global_action(Key::Quit), Some(GlobalAction::Quit));
    }
}
