//! Poll loop with statum state machine for device polling
//!
//! Implements the two-state lifecycle of the remapping worker with
//! compile-time state safety. The loop runs in its own tokio task, drains
//! the joystick device every tick and turns rising edges into key-event
//! dispatches.
//!
//! # State Machine
//!
//! ```text
//! Idle ──acquire()──► Polling ──stop / disconnect──► Idle
//! ```
//!
//! # Architecture
//!
//! ```text
//! JoystickDevice ──► InputState ──► MappingStore ──► dispatch channel
//!   (RawEvent)      (edge detect)    (combo lookup)   (egui events)
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use statum::{machine, state};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::device::{find_device, DeviceError, JoystickDevice, RawEvent};
use crate::mapping::{combo, PadInput};
use crate::persistence::MappingStore;

use super::edge::InputState;

/// Tuning knobs for the poll loop.
#[derive(Clone, Debug)]
pub struct PollSettings {
    /// Delay between poll ticks in milliseconds.
    ///
    /// 10ms keeps latency well below human reaction time while avoiding a
    /// busy spin on the non-blocking descriptor.
    pub poll_interval_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
        }
    }
}

/// States of the poll loop lifecycle.
#[state]
#[derive(Debug, Clone)]
pub enum PollState {
    Idle,    // No device open
    Polling, // Device open, draining records every tick
}

/// The input poll loop with compile-time state safety via statum.
///
/// Owns the open device and the edge-detection state; neither is shared
/// outside the loop. Mapping lookups go through the shared store, resolved
/// events leave through the dispatch channel toward the UI thread.
#[machine]
pub struct InputLoop<S: PollState> {
    device: Option<JoystickDevice>,
    input_state: InputState,
    store: Arc<MappingStore>,
    dispatch_tx: mpsc::Sender<Vec<egui::Event>>,
    status_tx: mpsc::Sender<String>,
    settings: PollSettings,
}

impl<S: PollState> InputLoop<S> {
    /// Sends a transient status notification toward the UI. Best effort.
    fn notify(&self, message: impl Into<String>) {
        if let Err(e) = self.status_tx.try_send(message.into()) {
            debug!("Status notification dropped: {}", e);
        }
    }
}

impl InputLoop<Idle> {
    pub fn create(
        store: Arc<MappingStore>,
        dispatch_tx: mpsc::Sender<Vec<egui::Event>>,
        status_tx: mpsc::Sender<String>,
        settings: PollSettings,
    ) -> Self {
        debug!("Creating input loop with settings: {:?}", settings);
        Self::new(
            None,
            InputState::default(),
            store,
            dispatch_tx,
            status_tx,
            settings,
        )
    }

    /// Locates and opens the joystick device, transitioning to Polling.
    ///
    /// A single attempt, as on the original's start path: absence or an
    /// open failure leaves the worker idle until the next explicit start.
    /// Edge-detection state is reset on every entry to Polling.
    pub fn acquire(mut self) -> Result<InputLoop<Polling>, DeviceError> {
        let path = find_device().ok_or(DeviceError::NotFound)?;
        info!("Checking {}", path.display());

        let device = JoystickDevice::open(&path)?;
        info!("Successfully opened {}", path.display());

        self.input_state.clear();
        self.device = Some(device);
        Ok(self.transition())
    }
}

impl InputLoop<Polling> {
    /// Drains every immediately available record for this tick.
    ///
    /// `Ok(None)` from the device means "caught up" and ends the tick;
    /// a disconnection error is passed up so the loop can leave Polling.
    async fn drain(&mut self) -> Result<(), DeviceError> {
        loop {
            let next = match self.device.as_mut() {
                Some(device) => device.read_event()?,
                None => return Err(DeviceError::Disconnected),
            };
            match next {
                Some(event) => self.handle_event(event).await,
                None => return Ok(()),
            }
        }
    }

    /// Feeds one record through edge detection and dispatches its combo.
    async fn handle_event(&mut self, event: RawEvent) {
        let Some(input) = self.input_state.apply(&event) else {
            return;
        };

        info!(
            "Input {} triggered at {} (device time {}ms)",
            input,
            Local::now().format("%H:%M:%S%.3f"),
            event.timestamp
        );

        let Some(combo_str) = self.store.combo_for(input).await else {
            debug!("No combo mapped for {}", input);
            return;
        };
        debug!("Mapped {} to: {:?}", input, combo_str);

        self.dispatch(input, &combo_str);
    }

    fn dispatch(&mut self, input: PadInput, combo_str: &str) {
        match combo::events_for(combo_str) {
            Some(events) => {
                if let Err(e) = self.dispatch_tx.try_send(events) {
                    error!("Failed to dispatch combo for {}: {}", input, e);
                }
            }
            None => {
                // Unresolvable combos are dropped silently by design of the
                // combo syntax; events_for already logged the detail.
            }
        }
    }

    /// Main polling loop with graceful shutdown support.
    ///
    /// Runs until the stop flag flips or the device disconnects, then
    /// returns to Idle with the device closed.
    pub async fn run_until_stop(mut self, mut stop_rx: watch::Receiver<bool>) -> InputLoop<Idle> {
        info!("Starting poll loop");
        let interval = Duration::from_millis(self.settings.poll_interval_ms);

        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        info!("Stop signal received, leaving polling state");
                        break;
                    }
                }

                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = self.drain().await {
                        warn!("Device unreadable, leaving polling state: {}", e);
                        self.notify("Controller disconnected");
                        break;
                    }
                }
            }
        }

        self.device = None;
        info!("Poll loop returned to idle");
        self.transition()
    }
}
