//! Remapping worker subsystem
//!
//! Implements the polling pipeline between the joystick device and the UI:
//!
//! 1. [`edge`] - Rising-edge detection over decoded records
//! 2. [`poll_loop`] - Idle/Polling state machine draining the device
//! 3. [`remap_handle`] - Worker lifecycle (idempotent start/stop)
//!
//! # Architecture
//!
//! ```text
//! Device ──► Poll Loop ──► Edge Detect ──► Combo Lookup ──► UI thread
//!            (10ms tick)   (InputState)    (MappingStore)   (dispatch)
//! ```
//!
//! The worker never touches UI machinery directly; resolved key events are
//! handed off through a channel and injected on the main thread.

pub mod edge;
pub mod poll_loop;
pub mod remap_handle;

pub use edge::InputState;
pub use poll_loop::{InputLoop, PollSettings};
pub use remap_handle::RemapperHandle;
