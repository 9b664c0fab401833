use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(RewardId);
id_newtype!(SessionEpoch);

/// Widest diagram line the mobile-friendly layout is designed for.
pub const MAX_DIAGRAM_COLUMNS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageAttachment {
    pub fn is_image_mime(mime_type: &str) -> bool {
        mime_type
            .trim()
            .to_ascii_lowercase()
            .strip_prefix("image/")
            .is_some_and(|subtype| !subtype.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BreakdownItem {
    pub emoji: String,
    pub text: String,
    pub highlight_term: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSegment<'a> {
    Plain(&'a str),
    Highlight(&'a str),
}

impl BreakdownItem {
    /// Splits `text` around every occurrence of the highlight term.
    pub fn segments(&self) -> Vec<TextSegment<'_>> {
        let term = self.highlight_term.as_str();
        if term.is_empty() {
            return vec![TextSegment::Plain(&self.text)];
        }

        let mut segments = Vec::new();
        let mut rest = self.text.as_str();
        while let Some(pos) = rest.find(term) {
            if pos > 0 {
                segments.push(TextSegment::Plain(&rest[..pos]));
            }
            segments.push(TextSegment::Highlight(&rest[pos..pos + term.len()]));
            rest = &rest[pos + term.len()..];
        }
        if !rest.is_empty() {
            segments.push(TextSegment::Plain(rest));
        }
        segments
    }

    /// Sentence handed to the remix operation.
    pub fn remix_source(&self) -> String {
        format!("{} {}", self.emoji, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
    pub correct_option_id: String,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn option(&self, option_id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    pub fn is_correct(&self, option_id: &str) -> bool {
        self.correct_option_id == option_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LearningModule {
    pub summary: String,
    pub diagram: String,
    pub analogy: String,
    pub breakdown: Vec<BreakdownItem>,
    pub quiz: Vec<QuizQuestion>,
}

impl LearningModule {
    pub fn question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.quiz.iter().find(|question| question.id == question_id)
    }

    pub fn diagram_width(&self) -> usize {
        self.diagram
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn max_quiz_score(&self, per_question: u64) -> u64 {
        self.quiz.len() as u64 * per_question
    }
}
