//! Renders a generated learning module and collects the user's intents.

use client_core::{session::CORRECT_ANSWER_REWARD, OptionState, Session};
use egui::{Color32, RichText};
use shared::domain::{BreakdownItem, LearningModule, QuizQuestion, ScreenPoint, TextSegment};

use crate::controller::events::UiIntent;
use crate::ui::theme;

pub const CORRECT_VERDICT: &str = "Nailed it!";
pub const INCORRECT_VERDICT: &str = "Not quite.";

/// Where a click landed, falling back to the widget center for keyboard activation.
pub fn point_of(response: &egui::Response) -> ScreenPoint {
    let pos = response
        .interact_pointer_pos()
        .unwrap_or_else(|| response.rect.center());
    ScreenPoint::new(pos.x, pos.y)
}

pub fn verdict_text(correct: bool) -> &'static str {
    if correct {
        CORRECT_VERDICT
    } else {
        INCORRECT_VERDICT
    }
}

fn section_title(ui: &mut egui::Ui, title: &str) {
    ui.add_space(18.0);
    ui.label(RichText::new(title).strong().size(20.0));
    ui.add_space(6.0);
}

fn card(ui: &mut egui::Ui, fill: Color32, add: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::NONE
        .fill(fill)
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add(ui);
        });
}

pub fn show_module(
    ui: &mut egui::Ui,
    session: &Session,
    module: &LearningModule,
    intents: &mut Vec<UiIntent>,
) {
    if ui.link("← Start New Session").clicked() {
        intents.push(UiIntent::StartOver);
    }

    section_title(ui, "🧠 TL;DR");
    card(ui, theme::ACCENT_SOFT, |ui| {
        ui.label(RichText::new(&module.summary).size(17.0));
    });

    section_title(ui, "🗺 Visual Map");
    card(ui, theme::DIAGRAM_FILL, |ui| {
        egui::ScrollArea::horizontal()
            .id_salt("diagram")
            .show(ui, |ui| {
                ui.label(
                    RichText::new(&module.diagram)
                        .monospace()
                        .color(theme::DIAGRAM_TEXT),
                );
            });
    });

    section_title(ui, "💡 Think of it like...");
    card(ui, theme::CARD_FILL, |ui| {
        ui.label(RichText::new(&module.analogy).italics());
    });

    section_title(ui, "🧩 Key Points");
    for (index, item) in module.breakdown.iter().enumerate() {
        show_breakdown_item(ui, session, index, item, intents);
        ui.add_space(8.0);
    }

    show_quiz(ui, session, module, intents);
}

fn show_breakdown_item(
    ui: &mut egui::Ui,
    session: &Session,
    index: usize,
    item: &BreakdownItem,
    intents: &mut Vec<UiIntent>,
) {
    card(ui, theme::CARD_FILL, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(&item.emoji).size(26.0));
            ui.vertical(|ui| {
                ui.set_max_width((ui.available_width() - 90.0).max(120.0));
                if let Some(remix) = session.remixed_fragment(index) {
                    ui.label(
                        RichText::new("👶 5-YEAR-OLD REMIX")
                            .small()
                            .strong()
                            .color(theme::ACCENT),
                    );
                    ui.label(RichText::new(remix).italics());
                } else {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        for segment in item.segments() {
                            match segment {
                                TextSegment::Plain(text) => ui.label(text),
                                TextSegment::Highlight(text) => ui.label(
                                    RichText::new(text)
                                        .strong()
                                        .background_color(theme::HIGHLIGHT_BG),
                                ),
                            };
                        }
                    });
                }
            });

            if session.can_remix(index) {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if session.active_remix_index() == Some(index) {
                        ui.spinner();
                    } else {
                        let response = ui
                            .button("🔄 Remix")
                            .on_hover_text("Explain it like I'm five");
                        if response.clicked() {
                            intents.push(UiIntent::Remix {
                                index,
                                text: item.remix_source(),
                                at: point_of(&response),
                            });
                        }
                    }
                });
            }
        });
    });
}

fn show_quiz(
    ui: &mut egui::Ui,
    session: &Session,
    module: &LearningModule,
    intents: &mut Vec<UiIntent>,
) {
    ui.add_space(18.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("🏆 Quick Check-in").strong().size(20.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!(
                    "EARN UP TO {} XP",
                    module.max_quiz_score(CORRECT_ANSWER_REWARD)
                ))
                .strong()
                .color(theme::ACCENT),
            );
        });
    });
    ui.label(
        RichText::new(format!(
            "{} of {} answered",
            session.answered_count(),
            module.quiz.len()
        ))
        .weak(),
    );
    ui.add_space(6.0);

    for (number, question) in module.quiz.iter().enumerate() {
        card(ui, theme::CARD_FILL, |ui| {
            show_question(ui, session, number + 1, question, intents);
        });
        ui.add_space(10.0);
    }

    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(format!(
                "🔐 ANSWERS REVEALED INSTANTLY • +{CORRECT_ANSWER_REWARD} XP PER CORRECT ANSWER"
            ))
            .small()
            .weak(),
        );
    });
}

fn show_question(
    ui: &mut egui::Ui,
    session: &Session,
    number: usize,
    question: &QuizQuestion,
    intents: &mut Vec<UiIntent>,
) {
    ui.label(RichText::new(format!("{number}. {}", question.prompt)).strong());
    ui.add_space(6.0);

    for option in &question.options {
        let state = session.option_state(question, &option.id);
        let (fill, text_color, marker) = match state {
            OptionState::Selectable => (Color32::WHITE, Color32::BLACK, ""),
            OptionState::RevealedCorrect => (theme::CORRECT_SOFT, theme::CORRECT, "  ✅"),
            OptionState::ChosenWrong => (theme::WRONG_SOFT, theme::WRONG, "  ❌"),
            OptionState::Dimmed => (Color32::WHITE, Color32::GRAY.gamma_multiply(0.6), ""),
        };
        let button = egui::Button::new(
            RichText::new(format!("{}{marker}", option.text)).color(text_color),
        )
        .fill(fill)
        .min_size(egui::vec2(ui.available_width(), 34.0));

        let response = ui.add(button);
        if state == OptionState::Selectable && response.clicked() {
            intents.push(UiIntent::Answer {
                question_id: question.id.clone(),
                option_id: option.id.clone(),
                at: point_of(&response),
            });
        }
    }

    if let Some(correct) = session.verdict(question) {
        ui.add_space(6.0);
        let color = if correct { theme::CORRECT } else { theme::WRONG };
        ui.label(RichText::new(verdict_text(correct)).strong().color(color));
        ui.label(&question.explanation);
    }
}

#[cfg(test)]
mod tests {
    use super::{verdict_text, CORRECT_VERDICT, INCORRECT_VERDICT};

    #[test]
    fn verdicts_match_answer_correctness() {
        assert_eq!(verdict_text(true), CORRECT_VERDICT);
        assert_eq!(verdict_text(false), INCORRECT_VERDICT);
    }
}
