//! Binary joystick event records
//!
//! The kernel joystick interface emits fixed 8-byte records in native byte
//! order: a millisecond timestamp, a signed value, an event-type bitmask and
//! the button/axis number. Records are decoded eagerly and never stored.

/// Size of one joystick event record in bytes.
pub const EVENT_SIZE: usize = 8;

/// Event-type bit: button press/release.
pub const EVENT_BUTTON: u8 = 0x01;

/// Event-type bit: axis movement.
pub const EVENT_AXIS: u8 = 0x02;

/// Event-type bit: initial state replay after open.
pub const EVENT_INIT: u8 = 0x80;

/// Raw scale of axis values reported by the kernel.
const AXIS_SCALE: f32 = 32767.0;

/// One decoded joystick event record.
///
/// `kind` is a bitmask; an init-replay record carries the button or axis bit
/// together with [`EVENT_INIT`], so the accessors below intentionally ignore
/// the init bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Event timestamp in milliseconds (kernel clock).
    pub timestamp: u32,
    /// Button state (0/1) or raw axis position.
    pub value: i16,
    /// Event-type bitmask.
    pub kind: u8,
    /// Button or axis number.
    pub number: u8,
}

impl RawEvent {
    /// Decodes one record from exactly [`EVENT_SIZE`] bytes, native byte order.
    pub fn decode(buf: &[u8; EVENT_SIZE]) -> Self {
        Self {
            timestamp: u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]),
            value: i16::from_ne_bytes([buf[4], buf[5]]),
            kind: buf[6],
            number: buf[7],
        }
    }

    pub fn is_button(&self) -> bool {
        self.kind & EVENT_BUTTON != 0
    }

    pub fn is_axis(&self) -> bool {
        self.kind & EVENT_AXIS != 0
    }

    pub fn is_init(&self) -> bool {
        self.kind & EVENT_INIT != 0
    }

    /// Button considered pressed for any non-zero value.
    pub fn pressed(&self) -> bool {
        self.value != 0
    }

    /// Axis position normalized to roughly [-1.0, 1.0].
    pub fn normalized(&self) -> f32 {
        f32::from(self.value) / AXIS_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: u32, value: i16, kind: u8, number: u8) -> [u8; EVENT_SIZE] {
        let mut buf = [0u8; EVENT_SIZE];
        buf[0..4].copy_from_slice(&timestamp.to_ne_bytes());
        buf[4..6].copy_from_slice(&value.to_ne_bytes());
        buf[6] = kind;
        buf[7] = number;
        buf
    }

    #[test]
    fn decodes_button_record() {
        let ev = RawEvent::decode(&record(1234, 1, EVENT_BUTTON, 3));
        assert_eq!(ev.timestamp, 1234);
        assert_eq!(ev.value, 1);
        assert_eq!(ev.number, 3);
        assert!(ev.is_button());
        assert!(!ev.is_axis());
        assert!(ev.pressed());
    }

    #[test]
    fn init_bit_does_not_mask_button_or_axis() {
        let ev = RawEvent::decode(&record(0, 1, EVENT_BUTTON | EVENT_INIT, 0));
        assert!(ev.is_button());
        assert!(ev.is_init());

        let ev = RawEvent::decode(&record(0, -20000, EVENT_AXIS | EVENT_INIT, 1));
        assert!(ev.is_axis());
        assert!(ev.is_init());
    }

    #[test]
    fn normalizes_axis_extremes() {
        let ev = RawEvent::decode(&record(0, 32767, EVENT_AXIS, 0));
        assert!((ev.normalized() - 1.0).abs() < 1e-6);

        let ev = RawEvent::decode(&record(0, -32767, EVENT_AXIS, 0));
        assert!((ev.normalized() + 1.0).abs() < 1e-6);

        let ev = RawEvent::decode(&record(0, 0, EVENT_AXIS, 0));
        assert_eq!(ev.normalized(), 0.0);
    }
}
