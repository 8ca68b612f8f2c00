pub mod device;
pub mod mapping;
pub mod persistence;
pub mod remap;
pub mod ui;

use std::sync::Arc;

use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::persistence::MappingStore;
use crate::remap::RemapperHandle;
use crate::ui::JoykeyUI;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    info!("Loading key mappings");
    let store = Arc::new(MappingStore::load(MappingStore::default_path()));

    let (dispatch_tx, dispatch_rx) = mpsc::channel(100);
    let (status_tx, status_rx) = mpsc::channel(32);

    let remapper = RemapperHandle::new(store.clone(), dispatch_tx, status_tx, None);

    info!("Starting UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default().with_inner_size([520.0, 480.0]);

    eframe::run_native(
        "JoyKey",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(JoykeyUI::new(
                cc,
                remapper,
                dispatch_rx,
                status_rx,
                store,
            )))
        }),
    )
    .map_err(|e| eyre!("UI terminated with error: {}", e))?;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
