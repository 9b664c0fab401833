//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::ContentGateway;
use crossbeam_channel::{Receiver, Sender};
use tokio::runtime::Runtime;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Runs the worker loop on its own thread, one task per command.
///
/// Every command yields exactly one `UiEvent`, so the ticket always returns
/// to the controller and its in-flight guard is lowered.
pub fn launch(
    runtime: Arc<Runtime>,
    gateway: Arc<dyn ContentGateway>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        tracing::info!("backend worker started");
        while let Ok(cmd) = cmd_rx.recv() {
            let gateway = Arc::clone(&gateway);
            let ui_tx = ui_tx.clone();
            tracing::debug!(command = cmd.name(), "backend command received");
            runtime.spawn(async move {
                let event = run_command(gateway.as_ref(), cmd).await;
                if ui_tx.send(event).is_err() {
                    tracing::warn!("ui event receiver dropped; discarding backend result");
                }
            });
        }
        tracing::info!("backend command queue closed; worker exiting");
    })
}

pub async fn run_command(gateway: &dyn ContentGateway, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::GenerateModule { ticket } => {
            let result = gateway.generate_module(&ticket.input).await;
            UiEvent::ModuleGenerated { ticket, result }
        }
        BackendCommand::RemixFragment { ticket } => {
            let result = gateway.remix_fragment(&ticket.text).await;
            UiEvent::FragmentRemixed { ticket, result }
        }
    }
}
