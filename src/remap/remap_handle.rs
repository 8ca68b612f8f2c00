//! Remapper Handle - lifecycle management for the poll worker
//!
//! Owns the background task running the input poll loop and exposes the
//! start/stop contract used by the UI menu actions. Both operations are
//! idempotent: starting while running and stopping while stopped are no-ops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::device::DeviceError;
use crate::persistence::MappingStore;

use super::poll_loop::{InputLoop, PollSettings};

/// Bounded wait for the worker to observe the stop flag.
const STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Handle for the remapping worker task.
///
/// # Threading Model
///
/// Spawns one tokio task per start. The task performs a single device
/// acquisition attempt and, on success, polls until stopped or the device
/// disconnects. Stop is cooperative: the flag is raised and the task is
/// awaited for at most [`STOP_TIMEOUT`]; a worker that does not exit in
/// time is abandoned rather than force-killed.
pub struct RemapperHandle {
    store: Arc<MappingStore>,
    dispatch_tx: mpsc::Sender<Vec<egui::Event>>,
    status_tx: mpsc::Sender<String>,
    settings: PollSettings,
    task_handle: Option<JoinHandle<()>>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl RemapperHandle {
    pub fn new(
        store: Arc<MappingStore>,
        dispatch_tx: mpsc::Sender<Vec<egui::Event>>,
        status_tx: mpsc::Sender<String>,
        settings: Option<PollSettings>,
    ) -> Self {
        Self {
            store,
            dispatch_tx,
            status_tx,
            settings: settings.unwrap_or_default(),
            task_handle: None,
            stop_tx: None,
        }
    }

    /// Whether the worker task is currently alive.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Spawns the poll worker. No-op if the worker is already running.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("Remapper already running, ignoring start");
            return;
        }

        info!("Starting remapper worker");
        let (stop_tx, stop_rx) = watch::channel(false);

        let idle = InputLoop::create(
            self.store.clone(),
            self.dispatch_tx.clone(),
            self.status_tx.clone(),
            self.settings.clone(),
        );
        let status_tx = self.status_tx.clone();

        let task_handle = tokio::spawn(async move {
            match idle.acquire() {
                Ok(polling) => {
                    let _ = status_tx.try_send("Controller remapper started".to_string());
                    let _idle = polling.run_until_stop(stop_rx).await;
                    let _ = status_tx.try_send("Controller remapper stopped".to_string());
                }
                Err(DeviceError::NotFound) => {
                    warn!("No joystick device found, worker stays idle");
                    let _ = status_tx.try_send("No joystick device found".to_string());
                }
                Err(e) => {
                    error!("Failed to acquire joystick: {}", e);
                    let _ = status_tx.try_send(format!("Failed to start remapper: {}", e));
                }
            }
        });

        self.task_handle = Some(task_handle);
        self.stop_tx = Some(stop_tx);
    }

    /// Signals the worker to stop and waits up to [`STOP_TIMEOUT`] for it.
    ///
    /// No-op if no worker is running. The wait happens on a helper task so
    /// the caller (the UI thread) never blocks.
    pub fn stop(&mut self) {
        let Some(task_handle) = self.task_handle.take() else {
            debug!("Remapper not running, ignoring stop");
            return;
        };

        info!("Stopping remapper worker");
        if let Some(stop_tx) = self.stop_tx.take() {
            if stop_tx.send(true).is_err() {
                debug!("Worker already terminated before stop signal");
            }
        }

        tokio::spawn(async move {
            match tokio::time::timeout(STOP_TIMEOUT, task_handle).await {
                Ok(Ok(())) => debug!("Remapper worker exited cleanly"),
                Ok(Err(e)) => error!("Remapper worker panicked: {}", e),
                Err(_) => warn!(
                    "Remapper worker did not stop within {:?}, abandoning it",
                    STOP_TIMEOUT
                ),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_handle() -> (
        RemapperHandle,
        mpsc::Receiver<Vec<egui::Event>>,
        mpsc::Receiver<String>,
    ) {
        let mut path = std::env::temp_dir();
        path.push(format!("joykey-handle-test-{}", std::process::id()));
        path.push("mappings.json");
        let store = Arc::new(MappingStore::load(path));

        let (dispatch_tx, dispatch_rx) = mpsc::channel(16);
        let (status_tx, status_rx) = mpsc::channel(16);
        let handle = RemapperHandle::new(store, dispatch_tx, status_tx, None);
        (handle, dispatch_rx, status_rx)
    }

    #[tokio::test]
    async fn stop_without_start_is_noop() {
        let (mut handle, _dispatch_rx, _status_rx) = test_handle();
        assert!(!handle.is_running());
        handle.stop();
        handle.stop();
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn double_start_keeps_single_worker() {
        let (mut handle, _dispatch_rx, _status_rx) = test_handle();
        handle.start();
        // Second start while the first worker may still be alive must not
        // panic or leak the stop channel.
        handle.start();
        handle.stop();
        handle.stop();
    }
}
