mod backend_bridge;
mod controller;
mod ui;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use client_core::{
    load_settings, ContentGateway, GeminiGateway, RewardNotifier, SessionController,
};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::FocusFlowApp;

#[derive(Debug, Parser)]
#[command(name = "focusflow-gui", about = "FocusFlow desktop app")]
struct Args {
    /// Settings file; defaults to ./focusflow.toml or the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn build_gateway(config: Option<&std::path::Path>) -> anyhow::Result<Arc<dyn ContentGateway>> {
    let settings = load_settings(config)?;
    let gateway = GeminiGateway::from_settings(&settings)?;
    tracing::info!(endpoint = gateway.endpoint(), "content gateway ready");
    Ok(Arc::new(gateway))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let runtime = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build backend runtime")?,
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    match build_gateway(args.config.as_deref()) {
        Ok(gateway) => {
            backend_bridge::runtime::launch(Arc::clone(&runtime), gateway, cmd_rx, ui_tx);
        }
        Err(err) => {
            // Without a worker every submission fails fast and shows the retry notice.
            drop(cmd_rx);
            tracing::error!("backend worker startup failure: {err:#}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("{err:#}"),
            )));
        }
    }

    let notifier = RewardNotifier::new(runtime.handle().clone());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("FocusFlow")
            .with_inner_size([1100.0, 820.0])
            .with_min_inner_size([480.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "FocusFlow",
        options,
        Box::new(move |cc| {
            Ok(Box::new(FocusFlowApp::new(
                cc,
                SessionController::new(notifier),
                cmd_tx,
                ui_rx,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop GUI exited with error: {err}"))
}
