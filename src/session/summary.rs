//! Results and dashboard summaries over finished sessions

use super::record::SessionRecord;
use crate::questions::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Practice minutes credited per answered question
const MINUTES_PER_QUESTION: f64 = 3.5;
const STRONG_RELEVANCE: u8 = 70;
const STRONG_STRUCTURE: u8 = 70;
const STRONG_CLARITY: u8 = 85;

/// Results page for one finished session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub title: String,
    pub category: Category,
    pub questions_answered: usize,
    pub relevance: u8,
    pub structure: u8,
    pub clarity: u8,
    pub overall: u8,
    pub estimated_minutes: u32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl SessionSummary {
    pub fn from_record(record: &SessionRecord) -> Self {
        let scores = record.answers.iter().map(|a| &a.score);
        let relevance = mean(scores.clone().map(|s| s.relevance));
        let structure = mean(scores.clone().map(|s| s.structure));
        let clarity = mean(scores.clone().map(|s| s.clarity));
        let overall = mean(scores.map(|s| s.overall));

        let mut strengths = Vec::new();
        if relevance >= STRONG_RELEVANCE {
            strengths.push("Strong coverage of the key concepts".to_string());
        }
        if structure >= STRONG_STRUCTURE {
            strengths.push("Well-developed, detailed answers".to_string());
        }
        if clarity >= STRONG_CLARITY {
            strengths.push("Clear and concise explanations".to_string());
        }
        if strengths.is_empty() {
            strengths.push("Completed the full interview".to_string());
        }

        let mut improvements = Vec::new();
        if relevance < STRONG_RELEVANCE {
            improvements.push("Address more of the key concepts each question expects".to_string());
        }
        if structure < STRONG_STRUCTURE {
            improvements.push("Elaborate with specific examples and more context".to_string());
        }
        let missed = most_missed_keywords(record, 3);
        if !missed.is_empty() {
            improvements.push(format!("Practice discussing: {}", missed.join(", ")));
        }
        if improvements.is_empty() {
            improvements.push("Keep practicing to stay sharp".to_string());
        }

        Self {
            title: record.category.title().to_string(),
            category: record.category,
            questions_answered: record.questions_answered,
            relevance,
            structure,
            clarity,
            overall,
            estimated_minutes: (record.questions_answered as f64 * MINUTES_PER_QUESTION).floor()
                as u32,
            strengths,
            improvements,
        }
    }
}

/// Dashboard statistics across a user's history
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_sessions: usize,
    pub total_questions: usize,
    pub average_overall: Option<u8>,
    pub best_overall: Option<u8>,
    pub sessions_by_category: BTreeMap<Category, usize>,
    pub last_completed: Option<DateTime<Utc>>,
}

impl HistoryStats {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let session_scores: Vec<u8> = records.iter().filter_map(|r| r.average_overall()).collect();

        let mut sessions_by_category = BTreeMap::new();
        for record in records {
            *sessions_by_category.entry(record.category).or_insert(0) += 1;
        }

        Self {
            total_sessions: records.len(),
            total_questions: records.iter().map(|r| r.questions_answered).sum(),
            average_overall: (!session_scores.is_empty())
                .then(|| mean(session_scores.iter().copied())),
            best_overall: session_scores.iter().copied().max(),
            sessions_by_category,
            last_completed: records.iter().map(|r| r.completed_at).max(),
        }
    }

    pub fn has_history(&self) -> bool {
        self.total_sessions > 0
    }
}

fn mean(values: impl Iterator<Item = u8>) -> u8 {
    let (sum, count) = values.fold((0u32, 0u32), |(sum, count), v| (sum + v as u32, count + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u8
}

/// Keywords missed most often across a session, most frequent first
fn most_missed_keywords(record: &SessionRecord, limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for answer in &record.answers {
        for keyword in &answer.score.missing_keywords {
            *counts.entry(keyword.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(keyword, _)| keyword.to_string())
        .collect()
}
