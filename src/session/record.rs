use crate::questions::{Category, Question};
use crate::scoring::ScoreBundle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a response's text came from
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResponseOrigin {
    Typed,
    Transcribed { confidence: f32 },
}

/// A candidate's answer to one question
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub origin: ResponseOrigin,
}

impl Response {
    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: ResponseOrigin::Typed,
        }
    }

    pub fn transcribed(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            origin: ResponseOrigin::Transcribed { confidence },
        }
    }

    /// True if the text has no non-whitespace content
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Snapshot of a question as stored in history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedQuestion {
    pub position: usize,
    pub text: String,
    pub topic: String,
}

impl From<&Question> for RecordedQuestion {
    fn from(question: &Question) -> Self {
        Self {
            position: question.position,
            text: question.text.to_string(),
            topic: question.topic.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: RecordedQuestion,
    pub response: Response,
    pub score: ScoreBundle,
}

/// One completed interview session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub category: Category,
    pub answers: Vec<AnsweredQuestion>,
    pub questions_answered: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Mean overall score across answers, rounded
    pub fn average_overall(&self) -> Option<u8> {
        if self.answers.is_empty() {
            return None;
        }
        let total: u32 = self.answers.iter().map(|a| a.score.overall as u32).sum();
        Some((total as f64 / self.answers.len() as f64).round() as u8)
    }
}
