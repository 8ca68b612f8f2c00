//! Logical controller inputs and the built-in default mapping

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical identifier for a controller button or directional axis.
///
/// These are the keys of the mapping document. Serialized as upper-case
/// snake names (`"LEFT_SHOULDER"`) so the persisted JSON stays a flat
/// string-to-string object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PadInput {
    A,
    B,
    X,
    Y,
    LeftShoulder,
    RightShoulder,
    Select,
    Start,
    LeftStick,
    RightStick,
    LeftTrigger,
    RightTrigger,
    Up,
    Down,
    Left,
    Right,
}

impl PadInput {
    /// All inputs in the order shown by the settings selector: physical
    /// buttons first, then the four directional pseudo-buttons.
    pub const ALL: [PadInput; 16] = [
        PadInput::A,
        PadInput::B,
        PadInput::X,
        PadInput::Y,
        PadInput::LeftShoulder,
        PadInput::RightShoulder,
        PadInput::Select,
        PadInput::Start,
        PadInput::LeftStick,
        PadInput::RightStick,
        PadInput::LeftTrigger,
        PadInput::RightTrigger,
        PadInput::Up,
        PadInput::Down,
        PadInput::Left,
        PadInput::Right,
    ];

    /// Maps a joystick button number to its logical input.
    ///
    /// Numbers beyond the known range (and events from exotic pads) return
    /// `None`; the poll loop still tracks their state but never dispatches.
    pub fn from_button_number(number: u8) -> Option<Self> {
        match number {
            0 => Some(PadInput::A),
            1 => Some(PadInput::B),
            2 => Some(PadInput::X),
            3 => Some(PadInput::Y),
            4 => Some(PadInput::LeftShoulder),
            5 => Some(PadInput::RightShoulder),
            6 => Some(PadInput::Select),
            7 => Some(PadInput::Start),
            8 => Some(PadInput::LeftStick),
            9 => Some(PadInput::RightStick),
            10 => Some(PadInput::LeftTrigger),
            11 => Some(PadInput::RightTrigger),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PadInput::A => "A",
            PadInput::B => "B",
            PadInput::X => "X",
            PadInput::Y => "Y",
            PadInput::LeftShoulder => "LEFT_SHOULDER",
            PadInput::RightShoulder => "RIGHT_SHOULDER",
            PadInput::Select => "SELECT",
            PadInput::Start => "START",
            PadInput::LeftStick => "LEFT_STICK",
            PadInput::RightStick => "RIGHT_STICK",
            PadInput::LeftTrigger => "LEFT_TRIGGER",
            PadInput::RightTrigger => "RIGHT_TRIGGER",
            PadInput::Up => "UP",
            PadInput::Down => "DOWN",
            PadInput::Left => "LEFT",
            PadInput::Right => "RIGHT",
        }
    }
}

impl fmt::Display for PadInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The built-in mapping used on first run and whenever loading fails.
///
/// The sticks have no default combo; they are still selectable in the
/// settings dialog.
pub fn default_mappings() -> BTreeMap<PadInput, String> {
    let mut map = BTreeMap::new();
    map.insert(PadInput::A, " ".to_string());
    map.insert(PadInput::B, "Return".to_string());
    map.insert(PadInput::X, "z".to_string());
    map.insert(PadInput::Y, "x".to_string());
    map.insert(PadInput::Left, "Left".to_string());
    map.insert(PadInput::Right, "Right".to_string());
    map.insert(PadInput::Up, "Up".to_string());
    map.insert(PadInput::Down, "Down".to_string());
    map.insert(PadInput::LeftShoulder, "Ctrl+Shift+z".to_string());
    map.insert(PadInput::RightShoulder, "Ctrl+z".to_string());
    map.insert(PadInput::Start, "Return".to_string());
    map.insert(PadInput::Select, "Backspace".to_string());
    map.insert(PadInput::LeftTrigger, "Ctrl+Shift+z".to_string());
    map.insert(PadInput::RightTrigger, "Ctrl+y".to_string());
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_upper_snake_names() {
        let json = serde_json::to_string(&PadInput::LeftShoulder).unwrap();
        assert_eq!(json, "\"LEFT_SHOULDER\"");

        let back: PadInput = serde_json::from_str("\"UP\"").unwrap();
        assert_eq!(back, PadInput::Up);
    }

    #[test]
    fn button_numbers_match_pad_layout() {
        assert_eq!(PadInput::from_button_number(0), Some(PadInput::A));
        assert_eq!(PadInput::from_button_number(7), Some(PadInput::Start));
        assert_eq!(
            PadInput::from_button_number(11),
            Some(PadInput::RightTrigger)
        );
        assert_eq!(PadInput::from_button_number(12), None);
    }

    #[test]
    fn defaults_cover_all_directions() {
        let map = default_mappings();
        assert_eq!(map.get(&PadInput::Left).map(String::as_str), Some("Left"));
        assert_eq!(map.get(&PadInput::Right).map(String::as_str), Some("Right"));
        assert_eq!(map.get(&PadInput::Up).map(String::as_str), Some("Up"));
        assert_eq!(map.get(&PadInput::Down).map(String::as_str), Some("Down"));
        assert!(map.get(&PadInput::LeftStick).is_none());
    }
}
