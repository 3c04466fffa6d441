use super::clarity::{clamp_clarity, ClarityEstimator, RandomClarity};
use super::feedback;
use crate::questions::{topics, Category, Question};
use crate::{InterviewError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Responses at or below this many characters get the flat structure score
const SHORT_RESPONSE_CHARS: usize = 100;
const SHORT_RESPONSE_STRUCTURE: u8 = 30;

/// Named steps of one response analysis, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStage {
    ReadingResponse,
    MatchingKeywords,
    EvaluatingStructure,
    EstimatingClarity,
    ComposingFeedback,
}

impl AnalysisStage {
    pub const ALL: [AnalysisStage; 5] = [
        AnalysisStage::ReadingResponse,
        AnalysisStage::MatchingKeywords,
        AnalysisStage::EvaluatingStructure,
        AnalysisStage::EstimatingClarity,
        AnalysisStage::ComposingFeedback,
    ];

    /// Progress label shown while the stage runs
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStage::ReadingResponse => "Reading your response",
            AnalysisStage::MatchingKeywords => "Checking key concepts",
            AnalysisStage::EvaluatingStructure => "Evaluating structure",
            AnalysisStage::EstimatingClarity => "Estimating clarity",
            AnalysisStage::ComposingFeedback => "Preparing feedback",
        }
    }
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Scores for one submitted response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBundle {
    pub relevance: u8,
    pub structure: u8,
    pub clarity: u8,
    pub overall: u8,
    pub feedback: String,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// Split a topic's keywords into those present in `text` and those absent
///
/// Matching is case-insensitive substring search; each keyword counts once.
pub fn match_keywords(text: &str, keywords: &[&str]) -> (Vec<String>, Vec<String>) {
    let haystack = text.to_lowercase();
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for keyword in keywords {
        let keyword = keyword.to_lowercase();
        if found.contains(&keyword) || missing.contains(&keyword) {
            continue;
        }
        if haystack.contains(&keyword) {
            found.push(keyword);
        } else {
            missing.push(keyword);
        }
    }

    (found, missing)
}

/// `min(100, round(100 * found / total * 1.5))`
pub fn relevance_score(found: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let raw = (100.0 * (found as f64 / total as f64) * 1.5).round();
    raw.min(100.0) as u8
}

/// Flat 30 for short responses, otherwise scaled by length up to 100
pub fn structure_score(chars: usize) -> u8 {
    if chars <= SHORT_RESPONSE_CHARS {
        return SHORT_RESPONSE_STRUCTURE;
    }
    let raw = ((chars as f64 / 500.0) * 120.0).round();
    raw.min(100.0) as u8
}

/// Weighted blend: half relevance, 30% structure, 20% clarity
pub fn overall_score(relevance: u8, structure: u8, clarity: u8) -> u8 {
    let raw = 0.5 * relevance as f64 + 0.3 * structure as f64 + 0.2 * clarity as f64;
    raw.round().clamp(0.0, 100.0) as u8
}

/// Keyword heuristic scorer with a pluggable clarity dimension
#[derive(Clone)]
pub struct ResponseScorer {
    clarity: Arc<dyn ClarityEstimator>,
}

impl Default for ResponseScorer {
    fn default() -> Self {
        Self::new(RandomClarity)
    }
}

impl std::fmt::Debug for ResponseScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseScorer").finish_non_exhaustive()
    }
}

impl ResponseScorer {
    pub fn new(clarity: impl ClarityEstimator + 'static) -> Self {
        Self {
            clarity: Arc::new(clarity),
        }
    }

    /// Share an existing estimator
    pub fn with_estimator(clarity: Arc<dyn ClarityEstimator>) -> Self {
        Self { clarity }
    }

    /// Score a response against a question's keyword topic
    pub fn score(&self, text: &str, question: &Question, category: Category) -> Result<ScoreBundle> {
        self.score_in_stages(text, question, category, |_| {})
    }

    /// Score a response, reporting each [`AnalysisStage`] before it runs
    pub fn score_in_stages<F>(
        &self,
        text: &str,
        question: &Question,
        category: Category,
        mut on_stage: F,
    ) -> Result<ScoreBundle>
    where
        F: FnMut(AnalysisStage),
    {
        on_stage(AnalysisStage::ReadingResponse);
        let keywords = topics::keywords(category, question.topic).ok_or_else(|| {
            error!(
                "No keyword topic '{}' for {} questions; refusing to score",
                question.topic, category
            );
            InterviewError::UnknownTopic {
                category: category.to_string(),
                topic: question.topic.to_string(),
            }
        })?;

        on_stage(AnalysisStage::MatchingKeywords);
        let (found, missing) = match_keywords(text, keywords);
        let relevance = relevance_score(found.len(), found.len() + missing.len());

        on_stage(AnalysisStage::EvaluatingStructure);
        let structure = structure_score(text.chars().count());

        on_stage(AnalysisStage::EstimatingClarity);
        let clarity = clamp_clarity(self.clarity.estimate(text));

        on_stage(AnalysisStage::ComposingFeedback);
        let overall = overall_score(relevance, structure, clarity);
        let feedback = feedback::compose(overall, &found, &missing);

        debug!(
            "Scored {}#{}: relevance={} structure={} clarity={} overall={} ({}/{} keywords)",
            category,
            question.position,
            relevance,
            structure,
            clarity,
            overall,
            found.len(),
            found.len() + missing.len()
        );

        Ok(ScoreBundle {
            relevance,
            structure,
            clarity,
            overall,
            feedback,
            matched_keywords: found,
            missing_keywords: missing,
        })
    }
}
