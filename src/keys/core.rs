use serde::{Deserialize, Serialize};

/// Every physical or logical input the panel can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Quit,
    Tape,
    Mixer,
    Synth,
    Drums,
    Metronome,
    Play,
    Rec,
    Shift,
    Left,
    Right,
    LoopIn,
    LoopOut,
    Cut,
    Lift,
    Drop,
    TrackOne,
    TrackTwo,
    TrackThree,
    TrackFour,
    RedUp,
    RedDown,
    RedClick,
    BlueUp,
    BlueDown,
    BlueClick,
    WhiteUp,
    WhiteDown,
    WhiteClick,
    GreenUp,
    GreenDown,
    GreenClick,
}

impl Key {
    pub const ALL: [Key; 32] = [
        Key::Quit,
        Key::Tape,
        Key::Mixer,
        Key::Synth,
        Key::Drums,
        Key::Metronome,
        Key::Play,
        Key::Rec,
        Key::Shift,
        Key::Left,
        Key::Right,
        Key::LoopIn,
        Key::LoopOut,
        Key::Cut,
        Key::Lift,
        Key::Drop,
        Key::TrackOne,
        Key::TrackTwo,
        Key::TrackThree,
        Key::TrackFour,
        Key::RedUp,
        Key::RedDown,
        Key::RedClick,
        Key::BlueUp,
        Key::BlueDown,
        Key::BlueClick,
        Key::WhiteUp,
        Key::WhiteDown,
        Key::WhiteClick,
        Key::GreenUp,
        Key::GreenDown,
        Key::GreenClick,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rotary event carried by this key, if it is one of the eight
    /// encoder-direction keys. Encoder clicks are ordinary keys.
    pub const fn rotary(self) -> Option<RotaryEvent> {
        let (rotary, clicks) = match self {
            Key::RedUp => (Rotary::Red, 1),
            Key::RedDown => (Rotary::Red, -1),
            Key::BlueUp => (Rotary::Blue, 1),
            Key::BlueDown => (Rotary::Blue, -1),
            Key::WhiteUp => (Rotary::White, 1),
            Key::WhiteDown => (Rotary::White, -1),
            Key::GreenUp => (Rotary::Green, 1),
            Key::GreenDown => (Rotary::Green, -1),
            _ => return None,
        };
        Some(RotaryEvent { rotary, clicks })
    }

    pub const fn is_rotary(self) -> bool {
        self.rotary().is_some()
    }
}

/// Colour-coded encoder channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotary {
    Red,
    Blue,
    White,
    Green,
}

/// One detent of an encoder: `clicks` is `1` clockwise, `-1` counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotaryEvent {
    pub rotary: Rotary,
    pub clicks: i8,
}

/// Held-key table indexed by [`Key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyState {
    pressed: [bool; Key::COUNT],
}

impl Default for KeyState {
    fn default() -> Self {
        Self {
            pressed: [false; Key::COUNT],
        }
    }
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        self.pressed[key.index()] = pressed;
    }

    pub fn pressed(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL
            .iter()
            .copied()
            .filter(move |key| self.is_pressed(*key))
    }

    pub fn clear(&mut self) {
        self.pressed = [false; Key::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (idx, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.index(), idx, "{key:?} out of order");
        }
    }

    #[test]
    fn exactly_eight_rotary_keys() {
        let rotary: Vec<_> = Key::ALL.iter().filter(|k| k.is_rotary()).collect();
        assert_eq!(rotary.len(), 8);
        assert!(!Key::RedClick.is_rotary());
        assert_eq!(
            Key::WhiteDown.rotary(),
            Some(RotaryEvent {
                rotary: Rotary::White,
                clicks: -1
            })
        );
    }

    #[test]
    fn set_and_query() {
        let mut state = KeyState::new();
        assert!(Key::ALL.iter().all(|key| !state.is_pressed(*key)));

        state.set(Key::Shift, true);
        state.set(Key::Rec, true);
        assert!(state.is_pressed(Key::Shift));
        assert_eq!(state.pressed().collect::<Vec<_>>(), vec![Key::Rec, Key::Shift]);

        state.set(Key::Shift, false);
        assert!(!state.is_pressed(Key::Shift));
        state.clear();
        assert_eq!(state.pressed().count(), 0);
    }

    #[test]
    fn keys_use_snake_case_names() {
        let json = serde_json::to_string(&Key::TrackOne).unwrap();
        assert_eq!(json, "\"track_one\"");
        let key: Key = serde_json::from_str("\"green_click\"").unwrap();
        assert_eq!(key, Key::GreenClick);
    }
}
