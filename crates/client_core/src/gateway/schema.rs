//! Output schema for module generation and the strict decode applied to replies.

use std::collections::HashSet;

use serde_json::{json, Value};
use shared::domain::{LearningModule, MAX_DIAGRAM_COLUMNS};
use tracing::warn;

use crate::error::GatewayError;

pub const MIN_QUIZ_QUESTIONS: usize = 5;
pub const MIN_BREAKDOWN_ITEMS: usize = 4;
pub const MAX_BREAKDOWN_ITEMS: usize = 6;

pub fn module_response_schema() -> Value {
    let quiz_option = json!({
        "type": "OBJECT",
        "properties": {
            "id": {"type": "STRING", "description": "A, B, C, or D"},
            "text": {"type": "STRING"}
        },
        "required": ["id", "text"]
    });

    let quiz_question = json!({
        "type": "OBJECT",
        "properties": {
            "id": {"type": "STRING"},
            "prompt": {"type": "STRING"},
            "options": {"type": "ARRAY", "items": quiz_option},
            "correctOptionId": {
                "type": "STRING",
                "description": "The ID of the correct option (A, B, C, or D)"
            },
            "explanation": {"type": "STRING"}
        },
        "required": ["id", "prompt", "options", "correctOptionId", "explanation"]
    });

    let breakdown_item = json!({
        "type": "OBJECT",
        "properties": {
            "emoji": {"type": "STRING", "description": "A single relevant emoji"},
            "text": {"type": "STRING", "description": "Short sentence explanation"},
            "highlightTerm": {
                "type": "STRING",
                "description": "The specific term to highlight/bold"
            }
        },
        "required": ["emoji", "text", "highlightTerm"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A single-sentence high-energy summary."
            },
            "diagram": {
                "type": "STRING",
                "description": "A STRICTLY VERTICAL ASCII flowchart (top to bottom). Max width 30 characters. Use simple box borders (+-+) and down arrows (v) to ensure it fits on mobile screens."
            },
            "analogy": {
                "type": "STRING",
                "description": "Explain the concept using a video game, sport, or movie comparison."
            },
            "breakdown": {
                "type": "ARRAY",
                "items": breakdown_item,
                "description": "4-6 bite-sized key points."
            },
            "quiz": {
                "type": "ARRAY",
                "items": quiz_question,
                "description": "Minimum of 5 multiple choice questions."
            }
        },
        "required": ["summary", "diagram", "analogy", "breakdown", "quiz"]
    })
}

/// Decodes a reply into a module, rejecting anything the schema does not allow.
pub fn decode_module(raw: &str) -> Result<LearningModule, GatewayError> {
    let module: LearningModule = serde_json::from_str(raw.trim())?;
    validate_module(&module)?;

    let width = module.diagram_width();
    if width > MAX_DIAGRAM_COLUMNS {
        warn!(
            width,
            max = MAX_DIAGRAM_COLUMNS,
            "generated diagram is wider than the layout allows"
        );
    }
    Ok(module)
}

pub fn validate_module(module: &LearningModule) -> Result<(), GatewayError> {
    let breakdown = module.breakdown.len();
    if !(MIN_BREAKDOWN_ITEMS..=MAX_BREAKDOWN_ITEMS).contains(&breakdown) {
        return Err(GatewayError::Schema(format!(
            "expected {MIN_BREAKDOWN_ITEMS}-{MAX_BREAKDOWN_ITEMS} breakdown items, got {breakdown}"
        )));
    }

    if module.quiz.len() < MIN_QUIZ_QUESTIONS {
        return Err(GatewayError::Schema(format!(
            "expected at least {MIN_QUIZ_QUESTIONS} quiz questions, got {}",
            module.quiz.len()
        )));
    }

    let mut seen_ids = HashSet::new();
    for question in &module.quiz {
        if !seen_ids.insert(question.id.as_str()) {
            return Err(GatewayError::Schema(format!(
                "duplicate quiz question id '{}'",
                question.id
            )));
        }
        if question.options.is_empty() {
            return Err(GatewayError::Schema(format!(
                "quiz question '{}' has no options",
                question.id
            )));
        }
        if question.option(&question.correct_option_id).is_none() {
            return Err(GatewayError::Schema(format!(
                "quiz question '{}' names correct option '{}' which is not one of its options",
                question.id, question.correct_option_id
            )));
        }
    }

    Ok(())
}
