//! Key-combo descriptors
//!
//! A combo is a `+`-separated string such as `"Ctrl+Shift+z"`. Tokens are
//! trimmed and lowercased; `ctrl`/`control`, `shift` and `alt` accumulate as
//! modifiers, and every other token - an empty one included - is a
//! primary-key candidate, the last one winning. Combos that do not resolve
//! to a known key produce no events and no error.

use egui::{Event, Key, Modifiers};
use tracing::debug;

/// A parsed combo descriptor: modifier set plus primary-key token.
///
/// Built fresh at every dispatch; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    /// Lowercased primary-key token. If the combo contains several
    /// non-modifier tokens the last one wins (documented quirk).
    pub key: Option<String>,
}

impl KeyCombo {
    /// Splits a combo descriptor into modifiers and primary-key token.
    pub fn parse(combo: &str) -> Self {
        let mut modifiers = Modifiers::NONE;
        let mut key = None;

        for part in combo.split('+') {
            let token = part.trim().to_lowercase();
            match token.as_str() {
                "ctrl" | "control" => modifiers = modifiers.plus(Modifiers::CTRL),
                "shift" => modifiers = modifiers.plus(Modifiers::SHIFT),
                "alt" => modifiers = modifiers.plus(Modifiers::ALT),
                // Empty tokens count as key candidates too: "a+" ends on an
                // empty token, which wins and leaves the combo unresolved.
                _ => key = Some(token),
            }
        }

        Self { modifiers, key }
    }

    /// Resolves the primary-key token to an egui key, if it names one.
    pub fn resolve(&self) -> Option<Key> {
        self.key.as_deref().and_then(resolve_token)
    }
}

/// Resolves a lowercased token to an egui key.
///
/// Single characters map directly to letter/digit keys; longer tokens go
/// through the named-key table. Unknown tokens resolve to nothing.
fn resolve_token(token: &str) -> Option<Key> {
    if token.chars().count() == 1 {
        return match token.chars().next()? {
            'a' => Some(Key::A),
            'b' => Some(Key::B),
            'c' => Some(Key::C),
            'd' => Some(Key::D),
            'e' => Some(Key::E),
            'f' => Some(Key::F),
            'g' => Some(Key::G),
            'h' => Some(Key::H),
            'i' => Some(Key::I),
            'j' => Some(Key::J),
            'k' => Some(Key::K),
            'l' => Some(Key::L),
            'm' => Some(Key::M),
            'n' => Some(Key::N),
            'o' => Some(Key::O),
            'p' => Some(Key::P),
            'q' => Some(Key::Q),
            'r' => Some(Key::R),
            's' => Some(Key::S),
            't' => Some(Key::T),
            'u' => Some(Key::U),
            'v' => Some(Key::V),
            'w' => Some(Key::W),
            'x' => Some(Key::X),
            'y' => Some(Key::Y),
            'z' => Some(Key::Z),
            '0' => Some(Key::Num0),
            '1' => Some(Key::Num1),
            '2' => Some(Key::Num2),
            '3' => Some(Key::Num3),
            '4' => Some(Key::Num4),
            '5' => Some(Key::Num5),
            '6' => Some(Key::Num6),
            '7' => Some(Key::Num7),
            '8' => Some(Key::Num8),
            '9' => Some(Key::Num9),
            _ => None,
        };
    }

    match token {
        "space" => Some(Key::Space),
        "return" | "enter" => Some(Key::Enter),
        "backspace" => Some(Key::Backspace),
        "delete" => Some(Key::Delete),
        "escape" => Some(Key::Escape),
        "tab" => Some(Key::Tab),
        "up" => Some(Key::ArrowUp),
        "down" => Some(Key::ArrowDown),
        "left" => Some(Key::ArrowLeft),
        "right" => Some(Key::ArrowRight),
        "home" => Some(Key::Home),
        "end" => Some(Key::End),
        "pageup" => Some(Key::PageUp),
        "pagedown" => Some(Key::PageDown),
        "f1" => Some(Key::F1),
        "f2" => Some(Key::F2),
        "f3" => Some(Key::F3),
        "f4" => Some(Key::F4),
        "f5" => Some(Key::F5),
        "f6" => Some(Key::F6),
        "f7" => Some(Key::F7),
        "f8" => Some(Key::F8),
        "f9" => Some(Key::F9),
        "f10" => Some(Key::F10),
        "f11" => Some(Key::F11),
        "f12" => Some(Key::F12),
        _ => None,
    }
}

/// Text inserted alongside the key pair so text widgets receive the
/// character. Suppressed when ctrl/alt/command are held.
fn text_for(token: &str, key: Key, modifiers: Modifiers) -> Option<String> {
    if modifiers.ctrl || modifiers.alt || modifiers.command {
        return None;
    }
    match key {
        Key::Space => Some(" ".to_string()),
        Key::Enter => Some("\n".to_string()),
        Key::Tab => Some("\t".to_string()),
        _ => {
            let ch = token.chars().next().filter(|_| token.chars().count() == 1)?;
            if ch.is_ascii_alphanumeric() {
                if modifiers.shift {
                    Some(ch.to_ascii_uppercase().to_string())
                } else {
                    Some(ch.to_string())
                }
            } else {
                None
            }
        }
    }
}

/// Builds the synthetic event batch for a combo descriptor.
///
/// Returns a press/release pair (plus a text event for printable keys), or
/// `None` when the combo does not resolve - in which case nothing is
/// dispatched, matching the silent-drop policy.
pub fn events_for(combo: &str) -> Option<Vec<Event>> {
    let parsed = KeyCombo::parse(combo);
    let key = match parsed.resolve() {
        Some(key) => key,
        None => {
            debug!("Combo {:?} does not resolve to a key, dropping", combo);
            return None;
        }
    };

    let modifiers = parsed.modifiers;
    let mut events = vec![
        Event::Key {
            key,
            physical_key: Some(key),
            pressed: true,
            repeat: false,
            modifiers,
        },
        Event::Key {
            key,
            physical_key: Some(key),
            pressed: false,
            repeat: false,
            modifiers,
        },
    ];

    if let Some(text) = parsed
        .key
        .as_deref()
        .and_then(|token| text_for(token, key, modifiers))
    {
        events.push(Event::Text(text));
    }

    Some(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifiers_and_primary_key() {
        let combo = KeyCombo::parse("Ctrl+Shift+z");
        assert!(combo.modifiers.ctrl);
        assert!(combo.modifiers.shift);
        assert!(!combo.modifiers.alt);
        assert_eq!(combo.key.as_deref(), Some("z"));
        assert_eq!(combo.resolve(), Some(Key::Z));
    }

    #[test]
    fn named_key_without_modifiers() {
        let combo = KeyCombo::parse("Return");
        assert_eq!(combo.modifiers, Modifiers::NONE);
        assert_eq!(combo.resolve(), Some(Key::Enter));
    }

    #[test]
    fn control_alias_and_duplicates_collapse() {
        let combo = KeyCombo::parse("Control+ctrl+a");
        assert!(combo.modifiers.ctrl);
        assert!(!combo.modifiers.shift);
        assert_eq!(combo.resolve(), Some(Key::A));
    }

    #[test]
    fn last_non_modifier_token_wins() {
        let combo = KeyCombo::parse("a+b");
        assert_eq!(combo.key.as_deref(), Some("b"));
    }

    #[test]
    fn trailing_empty_token_wins_and_drops_combo() {
        let combo = KeyCombo::parse("a+");
        assert_eq!(combo.key.as_deref(), Some(""));
        assert!(events_for("a+").is_none());
        assert!(events_for("Ctrl+").is_none());
    }

    #[test]
    fn unresolvable_combo_dispatches_nothing() {
        assert!(events_for("Ctrl+Unknown123").is_none());
        assert!(events_for("").is_none());
        // A bare space trims to an empty token and stays unresolved.
        assert!(events_for(" ").is_none());
    }

    #[test]
    fn event_batch_is_press_release_text() {
        let events = events_for("z").unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            Event::Key {
                key: Key::Z,
                pressed: true,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            Event::Key {
                key: Key::Z,
                pressed: false,
                ..
            }
        ));
        assert!(matches!(&events[2], Event::Text(t) if t == "z"));
    }

    #[test]
    fn shifted_letter_inserts_uppercase_text() {
        let events = events_for("Shift+z").unwrap();
        assert!(matches!(&events[2], Event::Text(t) if t == "Z"));
    }

    #[test]
    fn ctrl_combo_has_no_text_event() {
        let events = events_for("Ctrl+z").unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn function_and_navigation_keys_resolve() {
        assert_eq!(KeyCombo::parse("F5").resolve(), Some(Key::F5));
        assert_eq!(KeyCombo::parse("PageDown").resolve(), Some(Key::PageDown));
        assert_eq!(KeyCombo::parse("Left").resolve(), Some(Key::ArrowLeft));
    }
}
