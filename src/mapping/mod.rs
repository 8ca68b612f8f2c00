//! Translation of controller inputs into keyboard combos
//!
//! This module owns the two halves of the remapping vocabulary:
//!
//! 1. [`types`] - the fixed set of logical controller inputs and the
//!    built-in default mapping
//! 2. [`combo`] - parsing of textual key-combo descriptors
//!    (e.g. `"Ctrl+Shift+z"`) into egui key events
//!
//! ```text
//! PadInput ──► combo string ──► KeyCombo ──► Vec<egui::Event>
//!             (mapping doc)     (parsed)     (press + release)
//! ```

pub mod combo;
pub mod types;

pub use combo::{events_for, KeyCombo};
pub use types::{default_mappings, PadInput};
