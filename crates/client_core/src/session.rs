//! Session state and the controller that owns every mutation of it.
//!
//! Asynchronous operations are split into a `begin_*` step that checks and
//! raises the single-flight guard and a `finish_*` step that always lowers it.
//! Front-ends that run gateway calls elsewhere (the desktop GUI worker) carry
//! the ticket across; `generate_module` / `remix_breakdown_item` run both
//! halves around an awaited gateway call.

use std::collections::HashMap;

use shared::domain::{ImageAttachment, LearningModule, QuizQuestion, ScreenPoint, SessionEpoch};
use tracing::{debug, error, info, warn};

use crate::{
    error::{GatewayError, SessionError},
    gateway::{ContentGateway, GenerationInput},
    rewards::{RewardEvent, RewardNotifier},
};

pub const IMAGE_ATTACH_REWARD: u64 = 5;
pub const MODULE_REWARD: u64 = 50;
pub const CORRECT_ANSWER_REWARD: u64 = 10;
pub const REMIX_REWARD: u64 = 10;

pub const GENERATION_FAILURE_NOTICE: &str =
    "Something went wrong transforming your content. Try again!";

const MODULE_REWARD_TOP_OFFSET: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn top_anchor(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, MODULE_REWARD_TOP_OFFSET.min(self.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Input,
    Loading,
    Module,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Skipped,
    Ready,
    Failed,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Ignored,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemixOutcome {
    Skipped,
    Remixed,
    Failed,
    Discarded,
}

/// How one quiz option is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Selectable,
    RevealedCorrect,
    ChosenWrong,
    Dimmed,
}

#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub input: GenerationInput,
    epoch: SessionEpoch,
}

#[derive(Debug, Clone)]
pub struct RemixTicket {
    pub index: usize,
    pub text: String,
    pub position: ScreenPoint,
    epoch: SessionEpoch,
}

#[derive(Debug)]
pub struct Session {
    input_text: String,
    attached_image: Option<ImageAttachment>,
    module: Option<LearningModule>,
    is_generating: bool,
    score: u64,
    answered_questions: HashMap<String, String>,
    remixed_fragments: HashMap<usize, String>,
    active_remix_index: Option<usize>,
    failure_notice: Option<String>,
    epoch: SessionEpoch,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            input_text: String::new(),
            attached_image: None,
            module: None,
            is_generating: false,
            score: 0,
            answered_questions: HashMap::new(),
            remixed_fragments: HashMap::new(),
            active_remix_index: None,
            failure_notice: None,
            epoch: SessionEpoch(0),
        }
    }
}

impl Session {
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn attached_image(&self) -> Option<&ImageAttachment> {
        self.attached_image.as_ref()
    }

    pub fn module(&self) -> Option<&LearningModule> {
        self.module.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answered_questions.get(question_id).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answered_questions.len()
    }

    pub fn remixed_fragment(&self, index: usize) -> Option<&str> {
        self.remixed_fragments.get(&index).map(String::as_str)
    }

    pub fn active_remix_index(&self) -> Option<usize> {
        self.active_remix_index
    }

    pub fn failure_notice(&self) -> Option<&str> {
        self.failure_notice.as_deref()
    }

    pub fn mode(&self) -> ViewMode {
        if self.module.is_some() {
            ViewMode::Module
        } else if self.is_generating {
            ViewMode::Loading
        } else {
            ViewMode::Input
        }
    }

    pub fn has_usable_input(&self) -> bool {
        !self.input_text.trim().is_empty() || self.attached_image.is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_generating && self.has_usable_input()
    }

    pub fn option_state(&self, question: &QuizQuestion, option_id: &str) -> OptionState {
        match self.answer_for(&question.id) {
            None => OptionState::Selectable,
            Some(_) if question.is_correct(option_id) => OptionState::RevealedCorrect,
            Some(chosen) if chosen == option_id => OptionState::ChosenWrong,
            Some(_) => OptionState::Dimmed,
        }
    }

    /// `Some(true)` when answered correctly, `None` while unanswered.
    pub fn verdict(&self, question: &QuizQuestion) -> Option<bool> {
        self.answer_for(&question.id)
            .map(|chosen| question.is_correct(chosen))
    }

    /// The remix trigger is offered only for items that have not been remixed.
    pub fn can_remix(&self, index: usize) -> bool {
        self.module
            .as_ref()
            .is_some_and(|module| index < module.breakdown.len())
            && !self.remixed_fragments.contains_key(&index)
    }

    fn clear_module_state(&mut self) {
        self.module = None;
        self.answered_questions.clear();
        self.remixed_fragments.clear();
        self.epoch = SessionEpoch(self.epoch.0 + 1);
    }
}

pub struct SessionController {
    session: Session,
    notifier: RewardNotifier,
    viewport: Viewport,
}

impl SessionController {
    pub fn new(notifier: RewardNotifier) -> Self {
        Self {
            session: Session::default(),
            notifier,
            viewport: Viewport::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifier(&self) -> &RewardNotifier {
        &self.notifier
    }

    pub fn active_rewards(&self) -> Vec<RewardEvent> {
        self.notifier.active()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn award(&mut self, amount: u64, label: &str, position: ScreenPoint) {
        self.session.score = self.session.score.saturating_add(amount);
        self.notifier.show(amount, label, position);
        info!(amount, label, score = self.session.score, "xp awarded");
    }

    pub fn attach_image(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<(), SessionError> {
        if !ImageAttachment::is_image_mime(mime_type) {
            return Err(SessionError::NotAnImage {
                mime_type: mime_type.to_string(),
            });
        }
        self.session.attached_image = Some(ImageAttachment {
            bytes,
            mime_type: mime_type.trim().to_ascii_lowercase(),
        });
        let center = self.viewport.center();
        self.award(IMAGE_ATTACH_REWARD, "IMAGE ADDED", center);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.session.attached_image = None;
    }

    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.session.input_text = text.into();
    }

    pub fn dismiss_failure_notice(&mut self) {
        self.session.failure_notice = None;
    }

    pub fn begin_generation(&mut self) -> Option<GenerationTicket> {
        if self.session.is_generating {
            debug!("generation already in flight");
            return None;
        }
        if !self.session.has_usable_input() {
            debug!("generation requested without usable input");
            return None;
        }

        self.session.is_generating = true;
        self.session.failure_notice = None;
        self.session.clear_module_state();

        Some(GenerationTicket {
            input: GenerationInput::new(
                self.session.input_text.clone(),
                self.session.attached_image.clone(),
            ),
            epoch: self.session.epoch,
        })
    }

    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<LearningModule, GatewayError>,
    ) -> GenerationOutcome {
        self.session.is_generating = false;

        if ticket.epoch != self.session.epoch {
            debug!("dropping generation result for a session that was reset");
            return GenerationOutcome::Discarded;
        }

        match result {
            Ok(module) => {
                info!(
                    breakdown = module.breakdown.len(),
                    questions = module.quiz.len(),
                    "learning module ready"
                );
                self.session.module = Some(module);
                let anchor = self.viewport.top_anchor();
                self.award(MODULE_REWARD, "MODULE UNLOCKED", anchor);
                GenerationOutcome::Ready
            }
            Err(err) => {
                error!(kind = ?err.kind(), "generation failed: {err}");
                self.session.failure_notice = Some(GENERATION_FAILURE_NOTICE.to_string());
                GenerationOutcome::Failed
            }
        }
    }

    pub async fn generate_module(&mut self, gateway: &dyn ContentGateway) -> GenerationOutcome {
        let Some(ticket) = self.begin_generation() else {
            return GenerationOutcome::Skipped;
        };
        let result = gateway.generate_module(&ticket.input).await;
        self.finish_generation(ticket, result)
    }

    pub fn answer_question(
        &mut self,
        question_id: &str,
        option_id: &str,
        position: ScreenPoint,
    ) -> AnswerOutcome {
        if self.session.answered_questions.contains_key(question_id) {
            return AnswerOutcome::Ignored;
        }
        let Some(correct) = self
            .session
            .module
            .as_ref()
            .and_then(|module| module.question(question_id))
            .map(|question| question.is_correct(option_id))
        else {
            debug!(question_id, "answer for unknown question ignored");
            return AnswerOutcome::Ignored;
        };

        self.session
            .answered_questions
            .insert(question_id.to_string(), option_id.to_string());

        if correct {
            self.award(CORRECT_ANSWER_REWARD, "CORRECT!", position);
            AnswerOutcome::Correct
        } else {
            debug!(question_id, option_id, "incorrect answer recorded");
            AnswerOutcome::Incorrect
        }
    }

    pub fn begin_remix(
        &mut self,
        index: usize,
        text: impl Into<String>,
        position: ScreenPoint,
    ) -> Option<RemixTicket> {
        if let Some(active) = self.session.active_remix_index {
            debug!(active, requested = index, "remix already in flight");
            return None;
        }
        let in_range = self
            .session
            .module
            .as_ref()
            .is_some_and(|module| index < module.breakdown.len());
        if !in_range {
            debug!(index, "remix requested for a missing breakdown item");
            return None;
        }

        self.session.active_remix_index = Some(index);
        Some(RemixTicket {
            index,
            text: text.into(),
            position,
            epoch: self.session.epoch,
        })
    }

    pub fn finish_remix(
        &mut self,
        ticket: RemixTicket,
        result: Result<String, GatewayError>,
    ) -> RemixOutcome {
        self.session.active_remix_index = None;

        if ticket.epoch != self.session.epoch {
            debug!(index = ticket.index, "dropping remix for a replaced module");
            return RemixOutcome::Discarded;
        }

        match result {
            Ok(rewrite) => {
                self.session.remixed_fragments.insert(ticket.index, rewrite);
                self.award(REMIX_REWARD, "REMIXED!", ticket.position);
                RemixOutcome::Remixed
            }
            Err(err) => {
                warn!(index = ticket.index, "remix failed: {err}");
                RemixOutcome::Failed
            }
        }
    }

    pub async fn remix_breakdown_item(
        &mut self,
        gateway: &dyn ContentGateway,
        index: usize,
        text: &str,
        position: ScreenPoint,
    ) -> RemixOutcome {
        let Some(ticket) = self.begin_remix(index, text, position) else {
            return RemixOutcome::Skipped;
        };
        let result = gateway.remix_fragment(&ticket.text).await;
        self.finish_remix(ticket, result)
    }

    pub fn reset_session(&mut self) {
        self.session.clear_module_state();
        self.session.input_text.clear();
        self.session.attached_image = None;
        self.session.failure_notice = None;
        info!(score = self.session.score, "session reset");
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
