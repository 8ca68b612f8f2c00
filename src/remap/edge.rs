//! Edge detection over raw joystick events
//!
//! Tracks the last-known active flag per button and per axis direction so a
//! combo fires exactly once per inactive→active transition. Holding a button
//! or keeping a stick deflected produces no further triggers; releasing or
//! returning to the deadzone only clears flags and never dispatches.

use std::collections::HashMap;

use crate::device::RawEvent;
use crate::mapping::PadInput;

/// Axis deflection beyond which a direction counts as pressed.
pub const AXIS_THRESHOLD: f32 = 0.5;

/// Direction of an axis deflection relative to center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    Negative,
    Positive,
}

/// Key into the last-known-state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Button(u8),
    Axis { axis: u8, direction: AxisDirection },
}

/// Maps an axis deflection to its logical direction input.
///
/// Axis 0 is horizontal (LEFT/RIGHT), axis 1 vertical (UP/DOWN); other axes
/// are ignored.
fn direction_input(axis: u8, direction: AxisDirection) -> Option<PadInput> {
    match (axis, direction) {
        (0, AxisDirection::Negative) => Some(PadInput::Left),
        (0, AxisDirection::Positive) => Some(PadInput::Right),
        (1, AxisDirection::Negative) => Some(PadInput::Up),
        (1, AxisDirection::Positive) => Some(PadInput::Down),
        _ => None,
    }
}

/// Last-known active flags, owned exclusively by the poll loop.
///
/// Reset to empty whenever the loop enters its polling state.
#[derive(Debug, Default)]
pub struct InputState {
    flags: HashMap<StateKey, bool>,
}

impl InputState {
    pub fn clear(&mut self) {
        self.flags.clear();
    }

    /// Feeds one decoded record through edge detection.
    ///
    /// Returns the logical input whose combo should be dispatched, or `None`
    /// when the record causes no rising edge. Button state is tracked even
    /// for unknown button numbers; only known inputs ever dispatch.
    pub fn apply(&mut self, event: &RawEvent) -> Option<PadInput> {
        if event.is_button() {
            self.apply_button(event.number, event.pressed())
        } else if event.is_axis() {
            self.apply_axis(event.number, event.normalized())
        } else {
            None
        }
    }

    fn apply_button(&mut self, number: u8, pressed: bool) -> Option<PadInput> {
        let key = StateKey::Button(number);
        let was_active = self.flags.get(&key).copied().unwrap_or(false);
        self.flags.insert(key, pressed);

        if pressed && !was_active {
            PadInput::from_button_number(number)
        } else {
            None
        }
    }

    fn apply_axis(&mut self, axis: u8, normalized: f32) -> Option<PadInput> {
        if normalized < -AXIS_THRESHOLD {
            self.axis_edge(axis, AxisDirection::Negative)
        } else if normalized > AXIS_THRESHOLD {
            self.axis_edge(axis, AxisDirection::Positive)
        } else {
            // Deadzone: drop both direction flags, dispatch nothing.
            self.flags.remove(&StateKey::Axis {
                axis,
                direction: AxisDirection::Negative,
            });
            self.flags.remove(&StateKey::Axis {
                axis,
                direction: AxisDirection::Positive,
            });
            None
        }
    }

    fn axis_edge(&mut self, axis: u8, direction: AxisDirection) -> Option<PadInput> {
        let key = StateKey::Axis { axis, direction };
        let was_active = self.flags.get(&key).copied().unwrap_or(false);
        self.flags.insert(key, true);

        if was_active {
            None
        } else {
            direction_input(axis, direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::event::{EVENT_AXIS, EVENT_BUTTON, EVENT_INIT};

    fn button(number: u8, value: i16) -> RawEvent {
        RawEvent {
            timestamp: 0,
            value,
            kind: EVENT_BUTTON,
            number,
        }
    }

    fn axis(number: u8, normalized: f32) -> RawEvent {
        RawEvent {
            timestamp: 0,
            value: (normalized * 32767.0) as i16,
            kind: EVENT_AXIS,
            number,
        }
    }

    #[test]
    fn button_press_dispatches_once() {
        let mut state = InputState::default();
        assert_eq!(state.apply(&button(3, 1)), Some(PadInput::Y));
        // Held: repeated non-zero records stay silent.
        assert_eq!(state.apply(&button(3, 1)), None);
        assert_eq!(state.apply(&button(3, 0)), None);
        // Released and pressed again: a fresh edge.
        assert_eq!(state.apply(&button(3, 1)), Some(PadInput::Y));
    }

    #[test]
    fn init_replay_still_triggers_button_bit() {
        let mut state = InputState::default();
        let ev = RawEvent {
            timestamp: 0,
            value: 1,
            kind: EVENT_BUTTON | EVENT_INIT,
            number: 0,
        };
        assert_eq!(state.apply(&ev), Some(PadInput::A));
    }

    #[test]
    fn unknown_button_number_tracks_but_never_dispatches() {
        let mut state = InputState::default();
        assert_eq!(state.apply(&button(14, 1)), None);
        assert_eq!(state.apply(&button(14, 1)), None);
    }

    #[test]
    fn axis_sequence_dispatches_left_then_right() {
        let mut state = InputState::default();
        assert_eq!(state.apply(&axis(0, -1.0)), Some(PadInput::Left));
        // Still deflected past threshold: no repeat.
        assert_eq!(state.apply(&axis(0, -0.6)), None);
        // Back through center: clears both flags, dispatches nothing.
        assert_eq!(state.apply(&axis(0, 0.0)), None);
        assert_eq!(state.apply(&axis(0, 0.6)), Some(PadInput::Right));
    }

    #[test]
    fn vertical_axis_maps_up_and_down() {
        let mut state = InputState::default();
        assert_eq!(state.apply(&axis(1, -0.9)), Some(PadInput::Up));
        assert_eq!(state.apply(&axis(1, 0.0)), None);
        assert_eq!(state.apply(&axis(1, 0.9)), Some(PadInput::Down));
    }

    #[test]
    fn deadzone_values_never_dispatch() {
        let mut state = InputState::default();
        assert_eq!(state.apply(&axis(0, 0.5)), None);
        assert_eq!(state.apply(&axis(0, -0.5)), None);
        assert_eq!(state.apply(&axis(0, 0.2)), None);
    }

    #[test]
    fn extra_axes_are_ignored() {
        let mut state = InputState::default();
        assert_eq!(state.apply(&axis(2, -1.0)), None);
        assert_eq!(state.apply(&axis(5, 1.0)), None);
    }

    #[test]
    fn clear_resets_edge_tracking() {
        let mut state = InputState::default();
        assert_eq!(state.apply(&button(0, 1)), Some(PadInput::A));
        state.clear();
        assert_eq!(state.apply(&button(0, 1)), Some(PadInput::A));
    }
}
