//! Shared UI styling
//!
//! Centralized dark-theme palette so component styling stays consistent and
//! adjustable from one place. Compile-time constants avoid per-frame
//! allocation in the immediate-mode render path.

use eframe::egui::Color32;

/// Dark theme color palette for the JoyKey window.
pub struct UiColors;

impl UiColors {
    /// Primary background color for main content areas
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Deepest background color for emphasized content areas
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    /// Border color for component separation
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Running status indicator color - green
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Stopped status indicator color - red
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);
}
