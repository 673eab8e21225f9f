use anyhow::{Context, Result};
use lectern::integration::{build_speech_output, document_parser, AppConfig};
use lectern::ui::{AppState, LecternApp};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lectern");

    let config = AppConfig::load_default().context("failed to load configuration")?;
    if let Err(e) = config.validate() {
        warn!("Configuration problem: {}", e);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("lectern-worker")
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let speech = Arc::new(build_speech_output(&config));
    let state = AppState::new(&config, speech, document_parser(), runtime.handle().clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Lectern")
            .with_inner_size([820.0, 680.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Lectern",
        options,
        Box::new(move |cc| Ok(Box::new(LecternApp::new(cc, state, runtime)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    Ok(())
}
