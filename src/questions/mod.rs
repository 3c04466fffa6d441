//! Fixed interview question bank
//!
//! Every category has a canonical, ordered list of questions. Each question
//! names a topic whose expected keywords live in [`topics`].

mod bank;
pub mod topics;

pub use bank::Question;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Interview category
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Behavioral,
    Hr,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 3] = [Category::Technical, Category::Behavioral, Category::Hr];

    /// The canonical question list for this category
    pub fn questions(&self) -> &'static [Question] {
        match self {
            Category::Technical => bank::TECHNICAL,
            Category::Behavioral => bank::BEHAVIORAL,
            Category::Hr => bank::HR,
        }
    }

    /// Number of questions in a session of this category
    pub fn question_count(&self) -> usize {
        self.questions().len()
    }

    /// Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
            Category::Hr => "hr",
        }
    }

    /// Title shown on the results page
    pub fn title(&self) -> &'static str {
        match self {
            Category::Technical => "Technical Interview",
            Category::Behavioral => "Behavioral Interview",
            Category::Hr => "HR Interview",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(Category::Technical),
            "behavioral" => Ok(Category::Behavioral),
            "hr" => Ok(Category::Hr),
            other => Err(crate::InterviewError::ConfigError(format!(
                "Unknown interview category: {}",
                other
            ))),
        }
    }
}
