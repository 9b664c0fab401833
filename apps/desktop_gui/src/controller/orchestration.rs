//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{GatewayError, SessionController};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent, UiIntent};

/// Queues `cmd` for the worker. A command that cannot be queued is handed back.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Result<(), BackendCommand> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => {
            *status = "UI command queue is full; please retry".to_string();
            Err(cmd)
        }
        Err(TrySendError::Disconnected(cmd)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure)"
                    .to_string();
            Err(cmd)
        }
    }
}

/// Completes a command that never reached the worker so its guard is lowered.
fn fail_unsent(controller: &mut SessionController, cmd: BackendCommand) {
    let err = || GatewayError::Unavailable("backend command queue unavailable".to_string());
    match cmd {
        BackendCommand::GenerateModule { ticket } => {
            controller.finish_generation(ticket, Err(err()));
        }
        BackendCommand::RemixFragment { ticket } => {
            controller.finish_remix(ticket, Err(err()));
        }
    }
}

fn dispatch_or_fail(
    controller: &mut SessionController,
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    if let Err(cmd) = dispatch_backend_command(cmd_tx, cmd, status) {
        fail_unsent(controller, cmd);
    }
}

pub fn apply_intent(
    controller: &mut SessionController,
    cmd_tx: &Sender<BackendCommand>,
    intent: UiIntent,
    status: &mut String,
) {
    match intent {
        UiIntent::EditInput(text) => controller.set_input_text(text),
        UiIntent::AttachImage { bytes, mime_type } => {
            match controller.attach_image(bytes, &mime_type) {
                Ok(()) => status.clear(),
                Err(err) => {
                    *status =
                        UiError::from_message(UiErrorContext::AttachImage, err.to_string())
                            .banner_text();
                }
            }
        }
        UiIntent::ClearImage => controller.clear_image(),
        UiIntent::Submit => {
            if let Some(ticket) = controller.begin_generation() {
                dispatch_or_fail(
                    controller,
                    cmd_tx,
                    BackendCommand::GenerateModule { ticket },
                    status,
                );
            }
        }
        UiIntent::DismissNotice => controller.dismiss_failure_notice(),
        UiIntent::Answer {
            question_id,
            option_id,
            at,
        } => {
            let outcome = controller.answer_question(&question_id, &option_id, at);
            tracing::debug!(question_id, ?outcome, "answer applied");
        }
        UiIntent::Remix { index, text, at } => {
            if let Some(ticket) = controller.begin_remix(index, text, at) {
                dispatch_or_fail(
                    controller,
                    cmd_tx,
                    BackendCommand::RemixFragment { ticket },
                    status,
                );
            }
        }
        UiIntent::StartOver => {
            controller.reset_session();
            status.clear();
        }
    }
}

pub fn apply_event(controller: &mut SessionController, event: UiEvent, status: &mut String) {
    match event {
        UiEvent::ModuleGenerated { ticket, result } => {
            if let Err(err) = &result {
                let ui_err = UiError::from_message(UiErrorContext::Generation, err.to_string());
                tracing::warn!(category = ?ui_err.category(), "module generation failed");
            }
            controller.finish_generation(ticket, result);
        }
        UiEvent::FragmentRemixed { ticket, result } => {
            if let Err(err) = &result {
                let ui_err = UiError::from_message(UiErrorContext::Remix, err.to_string());
                tracing::debug!(category = ?ui_err.category(), "remix failed silently");
            }
            controller.finish_remix(ticket, result);
        }
        UiEvent::Error(err) => {
            tracing::error!(context = ?err.context(), "{}", err.message());
            *status = err.banner_text();
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{
        session::{GENERATION_FAILURE_NOTICE, IMAGE_ATTACH_REWARD, MODULE_REWARD, REMIX_REWARD},
        RewardNotifier, SessionController, ViewMode,
    };
    use crossbeam_channel::{bounded, Receiver};
    use shared::domain::{BreakdownItem, LearningModule, QuizOption, QuizQuestion, ScreenPoint};
    use tokio::runtime::Handle;

    use super::{apply_event, apply_intent};
    use crate::backend_bridge::commands::BackendCommand;
    use crate::controller::events::{UiError, UiErrorContext, UiEvent, UiIntent};

    fn module() -> LearningModule {
        LearningModule {
            summary: "Plants eat light.".to_string(),
            diagram: "☀ -> 🌿 -> 🍬".to_string(),
            analogy: "Leaves are solar panels.".to_string(),
            breakdown: (0..4)
                .map(|i| BreakdownItem {
                    emoji: "🌿".to_string(),
                    text: format!("Fact {i}"),
                    highlight_term: "Fact".to_string(),
                })
                .collect(),
            quiz: (0..5)
                .map(|i| QuizQuestion {
                    id: format!("q{i}"),
                    prompt: format!("Question {i}?"),
                    options: vec![
                        QuizOption {
                            id: "A".to_string(),
                            text: "Yes".to_string(),
                        },
                        QuizOption {
                            id: "B".to_string(),
                            text: "No".to_string(),
                        },
                    ],
                    correct_option_id: "A".to_string(),
                    explanation: "Because.".to_string(),
                })
                .collect(),
        }
    }

    fn controller() -> SessionController {
        SessionController::new(RewardNotifier::new(Handle::current()))
    }

    fn submit(
        controller: &mut SessionController,
        capacity: usize,
    ) -> (Receiver<BackendCommand>, String) {
        let (cmd_tx, cmd_rx) = bounded(capacity);
        let mut status = String::new();
        apply_intent(
            controller,
            &cmd_tx,
            UiIntent::EditInput("Photosynthesis".to_string()),
            &mut status,
        );
        apply_intent(controller, &cmd_tx, UiIntent::Submit, &mut status);
        (cmd_rx, status)
    }

    #[tokio::test]
    async fn submit_queues_generation_and_event_completes_it() {
        let mut controller = controller();
        let (cmd_rx, mut status) = submit(&mut controller, 4);
        assert_eq!(controller.session().mode(), ViewMode::Loading);

        let Ok(BackendCommand::GenerateModule { ticket }) = cmd_rx.try_recv() else {
            panic!("expected a queued generation command");
        };
        assert_eq!(ticket.input.text, "Photosynthesis");

        apply_event(
            &mut controller,
            UiEvent::ModuleGenerated {
                ticket,
                result: Ok(module()),
            },
            &mut status,
        );
        assert_eq!(controller.session().mode(), ViewMode::Module);
        assert_eq!(controller.session().score(), MODULE_REWARD);
    }

    #[tokio::test]
    async fn disconnected_worker_lowers_the_generation_guard() {
        let mut controller = controller();
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
        drop(cmd_rx);
        let mut status = String::new();

        controller.set_input_text("Photosynthesis");
        apply_intent(&mut controller, &cmd_tx, UiIntent::Submit, &mut status);

        assert!(status.contains("disconnected"));
        assert!(!controller.session().is_generating());
        assert_eq!(controller.session().mode(), ViewMode::Input);
        assert_eq!(
            controller.session().failure_notice(),
            Some(GENERATION_FAILURE_NOTICE)
        );
    }

    #[tokio::test]
    async fn full_queue_reports_retry_and_lowers_the_guard() {
        let (cmd_tx, _cmd_rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();

        let mut first = controller();
        first.set_input_text("Photosynthesis");
        apply_intent(&mut first, &cmd_tx, UiIntent::Submit, &mut status);
        assert!(first.session().is_generating());
        assert_eq!(status, "");

        let mut second = controller();
        second.set_input_text("Mitosis");
        apply_intent(&mut second, &cmd_tx, UiIntent::Submit, &mut status);
        assert_eq!(status, "UI command queue is full; please retry");
        assert!(!second.session().is_generating());
        assert!(second.session().can_submit());
    }

    #[tokio::test]
    async fn remix_intent_round_trips_through_the_queue() {
        let mut controller = controller();
        let (cmd_rx, mut status) = submit(&mut controller, 4);
        let Ok(BackendCommand::GenerateModule { ticket }) = cmd_rx.try_recv() else {
            panic!("expected a queued generation command");
        };
        controller.finish_generation(ticket, Ok(module()));

        let (cmd_tx, remix_rx) = bounded(4);
        apply_intent(
            &mut controller,
            &cmd_tx,
            UiIntent::Remix {
                index: 2,
                text: "🌿 Fact 2".to_string(),
                at: ScreenPoint::new(40.0, 60.0),
            },
            &mut status,
        );
        assert_eq!(controller.session().active_remix_index(), Some(2));

        let Ok(BackendCommand::RemixFragment { ticket }) = remix_rx.try_recv() else {
            panic!("expected a queued remix command");
        };
        assert_eq!(ticket.text, "🌿 Fact 2");
        apply_event(
            &mut controller,
            UiEvent::FragmentRemixed {
                ticket,
                result: Ok("Plants make candy from sunshine!".to_string()),
            },
            &mut status,
        );
        assert_eq!(controller.session().active_remix_index(), None);
        assert_eq!(
            controller.session().remixed_fragment(2),
            Some("Plants make candy from sunshine!")
        );
        assert_eq!(controller.session().score(), MODULE_REWARD + REMIX_REWARD);
    }

    #[tokio::test]
    async fn non_image_attachment_sets_status_without_reward() {
        let mut controller = controller();
        let (cmd_tx, _cmd_rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();

        apply_intent(
            &mut controller,
            &cmd_tx,
            UiIntent::AttachImage {
                bytes: b"%PDF".to_vec(),
                mime_type: "application/pdf".to_string(),
            },
            &mut status,
        );
        assert!(status.contains("please upload an image file"));
        assert_eq!(controller.session().score(), 0);

        apply_intent(
            &mut controller,
            &cmd_tx,
            UiIntent::AttachImage {
                bytes: vec![0x89, b'P', b'N', b'G'],
                mime_type: "image/png".to_string(),
            },
            &mut status,
        );
        assert_eq!(status, "");
        assert_eq!(controller.session().score(), IMAGE_ATTACH_REWARD);
        assert!(controller.session().can_submit());
    }

    #[tokio::test]
    async fn error_event_is_shown_in_status() {
        let mut controller = controller();
        let mut status = String::new();
        apply_event(
            &mut controller,
            UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                "no API key configured",
            )),
            &mut status,
        );
        assert!(status.starts_with("Backend worker failed to start"));
    }

    #[tokio::test]
    async fn start_over_clears_status_and_keeps_score() {
        let mut controller = controller();
        let (cmd_rx, mut status) = submit(&mut controller, 4);
        let Ok(BackendCommand::GenerateModule { ticket }) = cmd_rx.try_recv() else {
            panic!("expected a queued generation command");
        };
        controller.finish_generation(ticket, Ok(module()));
        status.push_str("stale message");

        let (cmd_tx, _rx) = bounded::<BackendCommand>(1);
        apply_intent(&mut controller, &cmd_tx, UiIntent::StartOver, &mut status);
        assert_eq!(status, "");
        assert_eq!(controller.session().mode(), ViewMode::Input);
        assert_eq!(controller.session().score(), MODULE_REWARD);
    }
}
