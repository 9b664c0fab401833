//! Application shell: owns the session controller and pumps backend events.

use std::path::Path;
use std::time::Duration;

use client_core::{Session, SessionController, ViewMode, Viewport};
use crossbeam_channel::{Receiver, Sender};
use egui::{Color32, RichText};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiEvent, UiIntent};
use crate::controller::orchestration::{apply_event, apply_intent};
use crate::ui::{module_view, reward_overlay, theme};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "heic", "heif"];

pub struct FocusFlowApp {
    controller: SessionController,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
}

impl FocusFlowApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: SessionController,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        cc.egui_ctx.set_visuals(theme::visuals());
        Self {
            controller,
            cmd_tx,
            ui_rx,
            status: String::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_event(&mut self.controller, event, &mut self.status);
        }
    }

    fn apply_intents(&mut self, intents: Vec<UiIntent>) {
        for intent in intents {
            apply_intent(&mut self.controller, &self.cmd_tx, intent, &mut self.status);
        }
    }

    fn needs_animation(&self) -> bool {
        let session = self.controller.session();
        self.controller.notifier().has_active()
            || session.is_generating()
            || session.active_remix_index().is_some()
    }
}

/// Mime type for a picked file, guessed from its extension.
pub fn image_mime_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn pick_image(status: &mut String) -> Option<UiIntent> {
    let path = rfd::FileDialog::new()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()?;
    let mime_type = image_mime_for(&path);
    match std::fs::read(&path) {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), mime_type, "image picked");
            Some(UiIntent::AttachImage { bytes, mime_type })
        }
        Err(err) => {
            *status = format!("Failed to read '{}': {err}", path.display());
            None
        }
    }
}

fn show_header(ctx: &egui::Context, score: u64) {
    egui::TopBottomPanel::top("focusflow_header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("🧠 FocusFlow").strong().size(22.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::Frame::NONE
                    .fill(theme::ACCENT_SOFT)
                    .corner_radius(16.0)
                    .inner_margin(egui::Margin::symmetric(12, 6))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(format!("Current Score: {score} XP"))
                                .strong()
                                .color(theme::ACCENT),
                        );
                    });
            });
        });
        ui.add_space(6.0);
    });
}

/// Returns true when the banner was dismissed.
fn show_banner(ui: &mut egui::Ui, message: &str) -> bool {
    let mut dismissed = false;
    egui::Frame::NONE
        .fill(theme::NOTICE_FILL)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(message).color(Color32::WHITE));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    dismissed = ui.small_button("Dismiss").clicked();
                });
            });
        });
    ui.add_space(8.0);
    dismissed
}

fn show_input_view(
    ui: &mut egui::Ui,
    session: &Session,
    status: &mut String,
    intents: &mut Vec<UiIntent>,
) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new("Turn boring stuff into a Knowledge Game.")
                .strong()
                .size(28.0),
        );
        ui.label(
            RichText::new("Paste notes or an article, or add a screenshot.")
                .weak(),
        );
    });
    ui.add_space(16.0);

    if let Some(notice) = session.failure_notice() {
        if show_banner(ui, notice) {
            intents.push(UiIntent::DismissNotice);
        }
    }

    let mut draft = session.input_text().to_string();
    let editor = egui::TextEdit::multiline(&mut draft)
        .hint_text("Paste your boring text here...")
        .desired_rows(10)
        .desired_width(f32::INFINITY);
    if ui.add(editor).changed() {
        intents.push(UiIntent::EditInput(draft));
    }
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let image_label = if session.attached_image().is_some() {
            "🖼 Image Added!"
        } else {
            "🖼 Add Image"
        };
        if ui.button(image_label).clicked() {
            if let Some(intent) = pick_image(status) {
                intents.push(intent);
            }
        }
        if let Some(image) = session.attached_image() {
            ui.label(
                RichText::new(format!("Image ready for analysis! ({})", image.mime_type))
                    .color(theme::CORRECT),
            );
            if ui.small_button("REMOVE").clicked() {
                intents.push(UiIntent::ClearImage);
            }
        }
    });
    ui.add_space(12.0);

    let submit = egui::Button::new(
        RichText::new("✨ Focusify It! ✨")
            .strong()
            .size(18.0)
            .color(Color32::WHITE),
    )
    .fill(theme::ACCENT)
    .min_size(egui::vec2(ui.available_width(), 44.0));
    if ui.add_enabled(session.can_submit(), submit).clicked() {
        intents.push(UiIntent::Submit);
    }
}

fn show_loading_view(ui: &mut egui::Ui) {
    ui.add_space(120.0);
    ui.vertical_centered(|ui| {
        ui.add(egui::Spinner::new().size(48.0));
        ui.add_space(12.0);
        ui.label(RichText::new("Gamifying...").strong().size(20.0));
        ui.label(RichText::new("Reading your content and building a quiz.").weak());
    });
}

impl eframe::App for FocusFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut intents = Vec::new();
        show_header(ctx, self.controller.session().score());

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.max_rect();
            self.controller.set_viewport(Viewport {
                width: rect.right(),
                height: rect.bottom(),
            });

            if !self.status.is_empty() && show_banner(ui, &self.status) {
                self.status.clear();
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.set_max_width(760.0_f32.min(ui.available_width()));
                    let session = self.controller.session();
                    match (session.mode(), session.module()) {
                        (ViewMode::Module, Some(module)) => {
                            module_view::show_module(ui, session, module, &mut intents);
                        }
                        (ViewMode::Loading, _) => show_loading_view(ui),
                        _ => show_input_view(ui, session, &mut self.status, &mut intents),
                    }
                });
        });

        self.apply_intents(intents);
        reward_overlay::show(
            ctx,
            &self.controller.active_rewards(),
            self.controller.notifier().display_duration(),
        );

        if self.needs_animation() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
