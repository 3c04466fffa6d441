//! Heuristic response scoring
//!
//! Relevance and structure are deterministic functions of the response text
//! and the question's keyword topic. Clarity is a placeholder supplied by a
//! pluggable [`ClarityEstimator`].

pub mod clarity;
pub mod feedback;
mod scorer;

pub use clarity::{ClarityEstimator, FixedClarity, RandomClarity, SeededClarity};
pub use scorer::{
    match_keywords, overall_score, relevance_score, structure_score, AnalysisStage,
    ResponseScorer, ScoreBundle,
};
