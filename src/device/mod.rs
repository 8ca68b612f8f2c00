//! Joystick device subsystem
//!
//! Talks to the Linux joystick interface (`/dev/input/jsN`) directly:
//!
//! 1. [`locator`] - Device discovery, non-blocking open and name probe
//! 2. [`event`] - Fixed-size binary event records and axis normalization
//!
//! # Architecture
//!
//! ```text
//! /dev/input/jsN ──► JoystickDevice ──► RawEvent
//!                    (non-blocking)     (8-byte record)
//! ```
//!
//! Reads never block; "no data right now" and "device gone" are distinct
//! outcomes so the poll loop can leave its polling state on disconnection.

pub mod event;
pub mod locator;

pub use event::{RawEvent, EVENT_SIZE};
pub use locator::{find_device, DeviceError, JoystickDevice};
