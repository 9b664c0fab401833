//! Plain-text rendering of a learning module for the terminal.

use std::fmt::Write as _;

use client_core::{
    session::{CORRECT_ANSWER_REWARD, REMIX_REWARD},
    OptionState, RemixOutcome, Session,
};
use shared::domain::{BreakdownItem, LearningModule, QuizQuestion, TextSegment};

pub fn highlighted(item: &BreakdownItem) -> String {
    item.segments()
        .into_iter()
        .map(|segment| match segment {
            TextSegment::Plain(text) => text.to_string(),
            TextSegment::Highlight(text) => format!("*{text}*"),
        })
        .collect()
}

pub fn render_breakdown_item(session: &Session, index: usize, item: &BreakdownItem) -> String {
    match session.remixed_fragment(index) {
        Some(remix) => format!("{}. {} [5-year-old remix] {remix}", index + 1, item.emoji),
        None => format!("{}. {} {}", index + 1, item.emoji, highlighted(item)),
    }
}

/// Line shown after a remix attempt. Failures stay silent; the trigger remains.
pub fn remix_outcome_line(
    session: &Session,
    outcome: RemixOutcome,
    index: usize,
    item: &BreakdownItem,
) -> Option<String> {
    match outcome {
        RemixOutcome::Remixed => Some(format!(
            "{}  (+{REMIX_REWARD} XP)",
            render_breakdown_item(session, index, item)
        )),
        RemixOutcome::Failed | RemixOutcome::Skipped | RemixOutcome::Discarded => None,
    }
}

pub fn render_module(module: &LearningModule, session: &Session) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== TL;DR ==\n{}\n", module.summary);
    let _ = writeln!(out, "== Visual Map ==\n{}\n", module.diagram);
    let _ = writeln!(out, "== Think of it like... ==\n{}\n", module.analogy);
    let _ = writeln!(out, "== Key Points ==");
    for (index, item) in module.breakdown.iter().enumerate() {
        let _ = writeln!(out, "{}", render_breakdown_item(session, index, item));
    }
    let _ = writeln!(
        out,
        "\n== Quick Check-in (EARN UP TO {} XP) ==",
        module.max_quiz_score(CORRECT_ANSWER_REWARD)
    );
    out
}

pub fn render_question(session: &Session, number: usize, question: &QuizQuestion) -> String {
    let mut out = format!("{number}. {}\n", question.prompt);
    for option in &question.options {
        let marker = match session.option_state(question, &option.id) {
            OptionState::Selectable | OptionState::Dimmed => "",
            OptionState::RevealedCorrect => "  <- correct",
            OptionState::ChosenWrong => "  <- your answer",
        };
        let _ = writeln!(out, "   {}) {}{marker}", option.id, option.text);
    }
    out
}

/// Accepts an option id (case-insensitive) or its 1-based position.
pub fn parse_choice<'q>(question: &'q QuizQuestion, input: &str) -> Option<&'q str> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(option) = question
        .options
        .iter()
        .find(|option| option.id.eq_ignore_ascii_case(input))
    {
        return Some(option.id.as_str());
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.options.get(i))
        .map(|option| option.id.as_str())
}
