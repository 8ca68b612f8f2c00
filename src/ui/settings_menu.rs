//! Settings dialog for editing the mapping table

use std::sync::Arc;

use eframe::egui::{self, Frame, ScrollArea, Stroke, TextEdit, Ui};
use tracing::warn;

use crate::mapping::PadInput;
use crate::persistence::MappingStore;

use super::common::UiColors;

/// State of the mapping settings dialog.
///
/// Holds a display snapshot of the mapping table; every add/update/remove
/// goes straight through the store (which persists synchronously) and the
/// snapshot is refreshed afterwards.
pub struct SettingsMenuData {
    store: Arc<MappingStore>,
    selected_input: PadInput,
    combo_input: String,
    entries: Vec<(PadInput, String)>,
    error: Option<String>,
}

impl SettingsMenuData {
    pub fn new(store: Arc<MappingStore>) -> Self {
        let mut data = Self {
            store,
            selected_input: PadInput::A,
            combo_input: String::new(),
            entries: Vec::new(),
            error: None,
        };
        data.refresh();
        data
    }

    fn refresh(&mut self) {
        self.entries = self.store.snapshot().into_iter().collect();
    }

    /// Renders the mapping list, the input selector and the edit actions.
    pub fn render(&mut self, ui: &mut Ui) {
        ui.vertical(|ui| {
            self.render_mapping_list(ui);
            ui.add_space(5.0);
            self.render_edit_row(ui);
            ui.add_space(5.0);
            self.render_actions(ui);

            if let Some(error) = &self.error {
                ui.colored_label(UiColors::INACTIVE, error);
            }
        });
    }

    fn render_mapping_list(&mut self, ui: &mut Ui) {
        Frame::new()
            .stroke(Stroke::new(1.0, UiColors::BORDER))
            .fill(UiColors::EXTREME_BG)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                    for (input, combo) in &self.entries {
                        ui.label(format!("{}: {}", input, combo));
                    }
                    if self.entries.is_empty() {
                        ui.label("No mappings configured");
                    }
                });
            });
    }

    fn render_edit_row(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("Controller Button:");
            egui::ComboBox::from_id_salt("pad_input_selector")
                .selected_text(self.selected_input.name())
                .show_ui(ui, |ui| {
                    for input in PadInput::ALL {
                        ui.selectable_value(&mut self.selected_input, input, input.name());
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Keyboard Key:");
            ui.add(
                TextEdit::singleline(&mut self.combo_input)
                    .hint_text("e.g. z, Ctrl+z, Ctrl+Shift+z"),
            );
        });
    }

    fn render_actions(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add Mapping").clicked() {
                self.upsert_mapping();
            }
            if ui.button("Update Mapping").clicked() {
                self.upsert_mapping();
            }
            if ui.button("Remove Mapping").clicked() {
                self.remove_mapping();
            }
        });
    }

    fn upsert_mapping(&mut self) {
        let combo = self.combo_input.trim().to_string();
        if combo.is_empty() {
            self.error = Some("Key combo cannot be empty".to_string());
            return;
        }

        match self.store.set(self.selected_input, combo) {
            Ok(()) => self.error = None,
            Err(e) => {
                warn!("Failed to save mapping: {}", e);
                self.error = Some(format!("Failed to save mapping: {}", e));
            }
        }
        self.refresh();
    }

    fn remove_mapping(&mut self) {
        match self.store.remove(self.selected_input) {
            Ok(()) => self.error = None,
            Err(e) => {
                warn!("Failed to remove mapping: {}", e);
                self.error = Some(format!("Failed to remove mapping: {}", e));
            }
        }
        self.refresh();
    }
}
