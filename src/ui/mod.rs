//! # JoyKey User Interface Module
//!
//! Implements the application window: a scratch text area acting as the
//! injection target, the remapper start/stop controls, the mapping
//! settings dialog and a transient status line.
//!
//! ## Why This Module Exists
//!
//! The remapping worker produces key events on a background task; something
//! has to own that worker, receive its output on the main thread and feed
//! it into the widget tree. This module is that owner.
//!
//! ## Controller Event Integration Strategy
//!
//! Uses `raw_input_hook` to inject remapped key events directly into egui's
//! event stream before each frame. Injection only happens while a widget
//! holds keyboard focus; with no focused widget the events are drained and
//! dropped, mirroring a window manager refusing synthetic input without a
//! focus target.
//!
//! ## Layout
//!
//! Three-panel layout:
//! - **Top Panel**: Start Remapper / Stop Remapper / Settings actions
//! - **Central Panel**: scratch text target plus the active mapping table
//! - **Bottom Panel**: worker indicator and transient status messages
//!
//! Requests 30fps refresh (`33ms`) so status updates and injected events
//! surface promptly without a busy render loop.

pub mod common;
pub mod settings_menu;

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{self, Button, TextEdit, Vec2};
use tokio::sync::mpsc;
use tracing::debug;

use crate::persistence::MappingStore;
use crate::remap::RemapperHandle;

use self::common::UiColors;
use self::settings_menu::SettingsMenuData;

/// How long a status message stays visible in the bottom panel.
const STATUS_DISPLAY: Duration = Duration::from_secs(4);

/// Central UI component owning the remapper worker and its channels.
///
/// Holds the receiving end of both worker channels: resolved key events
/// (injected via `raw_input_hook`) and status strings (shown in the bottom
/// panel). The mapping store is shared with the worker and the settings
/// dialog.
pub struct JoykeyUI {
    /// Lifecycle handle for the background poll worker
    remapper: RemapperHandle,

    /// Receiver for resolved key events from the remapping worker
    dispatch_receiver: mpsc::Receiver<Vec<egui::Event>>,

    /// Receiver for transient status messages from the worker
    status_receiver: mpsc::Receiver<String>,

    /// Most recent status message and when it arrived
    status: Option<(String, Instant)>,

    /// Shared mapping table, also read by the worker
    store: Arc<MappingStore>,

    /// Whether the settings dialog window is open
    settings_open: bool,

    /// Mapping settings dialog state
    settings_menu_data: SettingsMenuData,

    /// Scratch buffer for the injection target text area
    scratchpad: String,
}

impl JoykeyUI {
    /// Creates the UI and starts the remapper immediately.
    ///
    /// Dark theme matches the rest of the palette in [`common`]. The
    /// remapper auto-start mirrors plugging the program in and having it
    /// work without a manual step; the menu actions remain available for
    /// restarting after a disconnect.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut remapper: RemapperHandle,
        dispatch_receiver: mpsc::Receiver<Vec<egui::Event>>,
        status_receiver: mpsc::Receiver<String>,
        store: Arc<MappingStore>,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        remapper.start();

        JoykeyUI {
            remapper,
            dispatch_receiver,
            status_receiver,
            status: None,
            settings_menu_data: SettingsMenuData::new(store.clone()),
            store,
            settings_open: false,
            scratchpad: String::new(),
        }
    }

    /// Pulls pending worker status messages, keeping only the latest.
    fn poll_status(&mut self) {
        while let Ok(message) = self.status_receiver.try_recv() {
            debug!("Status update: {}", message);
            self.status = Some((message, Instant::now()));
        }

        if let Some((_, arrived)) = &self.status {
            if arrived.elapsed() > STATUS_DISPLAY {
                self.status = None;
            }
        }
    }
}

impl eframe::App for JoykeyUI {
    /// Injects remapped key events into egui's input stream.
    ///
    /// Runs before each frame. Events are only injected while some widget
    /// has keyboard focus; otherwise the batch is drained and dropped so
    /// stale presses never replay when focus returns.
    fn raw_input_hook(&mut self, ctx: &egui::Context, raw_input: &mut egui::RawInput) {
        let has_focus = ctx.memory(|memory| memory.focused().is_some());

        while let Ok(events) = self.dispatch_receiver.try_recv() {
            if !has_focus {
                debug!("No focused widget, dropping {} injected events", events.len());
                continue;
            }
            for event in events {
                raw_input.events.push(event);
            }
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_status();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.ctx().request_repaint_after(Duration::from_millis(33));
            let width = ui.available_width() - 40.0;

            // Top action panel
            egui::TopBottomPanel::top("top_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        let start_button = Button::new("Start Remapper").min_size(Vec2 {
                            x: width / 3.0,
                            y: 20.0,
                        });
                        let stop_button = Button::new("Stop Remapper").min_size(Vec2 {
                            x: width / 3.0,
                            y: 20.0,
                        });
                        let settings_button = Button::new("Settings").min_size(Vec2 {
                            x: width / 3.0,
                            y: 20.0,
                        });

                        if ui.add(start_button).clicked() {
                            self.remapper.start();
                        };
                        if ui.add(stop_button).clicked() {
                            self.remapper.stop();
                        };
                        if ui.add(settings_button).clicked() {
                            self.settings_open = !self.settings_open;
                        };
                    });
                });

            // Central panel: injection target and active mappings
            egui::CentralPanel::default().show_inside(ui, |ui| {
                ui.label("Focus the field below to receive remapped input:");
                ui.add(
                    TextEdit::multiline(&mut self.scratchpad)
                        .desired_width(ui.available_width())
                        .desired_rows(6)
                        .hint_text("Remapped key presses land here while focused"),
                );

                ui.add_space(8.0);
                ui.label("Active mappings:");
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (input, combo) in self.store.snapshot() {
                        ui.monospace(format!("{:<16} {}", input.name(), combo));
                    }
                });
            });

            // Bottom status panel
            egui::TopBottomPanel::bottom("bottom_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        if self.remapper.is_running() {
                            ui.colored_label(UiColors::ACTIVE, "● remapper running");
                        } else {
                            ui.colored_label(UiColors::INACTIVE, "● remapper stopped");
                        }
                        if let Some((message, _)) = &self.status {
                            ui.label(message);
                        }
                    });
                });
        });

        if self.settings_open {
            egui::Window::new("Mapping Settings")
                .open(&mut self.settings_open)
                .resizable(true)
                .show(ctx, |ui| {
                    self.settings_menu_data.render(ui);
                });
        }
    }
}
