//! End-to-end interview flows through the session controller

use mock_interview::scoring::FixedClarity;
use mock_interview::session::SessionSummary;
use mock_interview::storage::{history_key, Account, MemoryAccountStore, MemoryHistoryStore};
use mock_interview::{
    Advance, Category, HistoryStore, InterviewError, ResponseScorer, SessionController,
    SessionState,
};
use std::sync::Arc;

const REST_ANSWER: &str = "REST uses GET, POST, stateless communication";

struct Harness {
    controller: SessionController,
    store: MemoryHistoryStore,
    account: Account,
}

impl Harness {
    fn new() -> Self {
        let store = MemoryHistoryStore::new();
        let account = Account::new("Ada", "ada@example.com");
        let accounts = MemoryAccountStore::with_account(account.clone());
        let controller = SessionController::new(Arc::new(store.clone()), Arc::new(accounts))
            .with_scorer(ResponseScorer::new(FixedClarity(80)));
        Self {
            controller,
            store,
            account,
        }
    }

    fn history(&self) -> Vec<mock_interview::SessionRecord> {
        self.store.get(&history_key(&self.account.id)).unwrap()
    }
}

#[test]
fn test_rest_answer_gets_relevance() {
    let mut h = Harness::new();
    h.controller.start(Category::Technical).unwrap();

    let score = h.controller.answer(REST_ANSWER).unwrap();

    assert!(score.relevance > 0);
    assert_eq!(h.controller.state(), SessionState::ShowingFeedback(0));
    assert_eq!(h.controller.current_score(), Some(&score));
}

#[test]
fn test_next_question_does_not_persist() {
    let mut h = Harness::new();
    h.controller.start(Category::Technical).unwrap();
    h.controller.answer(REST_ANSWER).unwrap();

    assert_eq!(h.controller.request_next().unwrap(), Advance::Question(1));
    assert_eq!(h.controller.state(), SessionState::AwaitingResponse(1));
    assert!(h.history().is_empty());
}

#[test]
fn test_full_session_persists_exactly_one_record() {
    let mut h = Harness::new();
    let count = h.controller.start(Category::Behavioral).unwrap();
    assert_eq!(count, 4);

    let answers = [
        "The situation was a failing release; my action was to lead the result review",
        "I listened to my team member and we found a compromise through communication",
        "I set a measurable goal, planned milestones and tracked progress every week",
        "I welcomed the feedback, reflected on it and improved my code reviews",
    ];

    let mut finished = None;
    for (i, text) in answers.iter().enumerate() {
        assert_eq!(h.controller.state(), SessionState::AwaitingResponse(i));
        h.controller.answer(*text).unwrap();
        match h.controller.request_next().unwrap() {
            Advance::Question(next) => assert_eq!(next, i + 1),
            Advance::Finished(record) => finished = Some(record),
        }
    }

    let record = finished.expect("last question finishes the session");
    assert_eq!(h.controller.state(), SessionState::Finished);
    assert_eq!(record.questions_answered, 4);
    assert_eq!(record.answers.len(), 4);
    assert_eq!(record.category, Category::Behavioral);
    assert_eq!(record.user_id, h.account.id);

    let history = h.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], record);

    let summary = SessionSummary::from_record(&record);
    assert_eq!(summary.title, "Behavioral Interview");
    assert_eq!(summary.estimated_minutes, 14);
}

#[test]
fn test_start_returns_full_list_for_every_category() {
    for category in Category::ALL {
        let mut h = Harness::new();
        let count = h.controller.start(category).unwrap();

        assert_eq!(count, category.questions().len());
        assert_eq!(count, 4);
        assert_eq!(h.controller.question_count(), count);
        assert_eq!(h.controller.category(), Some(category));
        assert_eq!(h.controller.state(), SessionState::AwaitingResponse(0));
        assert_eq!(
            h.controller.current_question().map(|q| q.text),
            Some(category.questions()[0].text)
        );
    }
}

#[test]
fn test_whitespace_answer_is_rejected_in_place() {
    let mut h = Harness::new();
    h.controller.start(Category::Hr).unwrap();

    assert_eq!(
        h.controller.submit_response("   \n\t "),
        Err(InterviewError::EmptyResponse)
    );
    assert_eq!(h.controller.state(), SessionState::AwaitingResponse(0));
    assert!(h.controller.answered().is_empty());
}

#[test]
fn test_overall_stays_in_range_for_extreme_inputs() {
    let long = "stateless http get post put delete resource endpoint uri json ".repeat(200);
    for text in ["x", long.as_str()] {
        let mut h = Harness::new();
        h.controller.start(Category::Technical).unwrap();
        let score = h.controller.answer(text).unwrap();
        for value in [score.relevance, score.structure, score.clarity, score.overall] {
            assert!(value <= 100);
        }
    }
}

#[test]
fn test_more_keywords_never_lower_relevance() {
    let scorer = ResponseScorer::new(FixedClarity(80));
    let question = Category::Technical.questions()[0];

    let base = "An API built on http";
    let richer = format!("{} that is stateless and uses json resources", base);

    let a = scorer.score(base, &question, Category::Technical).unwrap();
    let b = scorer.score(&richer, &question, Category::Technical).unwrap();
    assert!(b.relevance >= a.relevance);
    assert!(b.matched_keywords.len() > a.matched_keywords.len());
}

#[test]
fn test_current_question_is_idempotent() {
    let mut h = Harness::new();
    h.controller.start(Category::Technical).unwrap();

    let first = h.controller.current_question().map(|q| q.text);
    let second = h.controller.current_question().map(|q| q.text);
    assert_eq!(first, second);
    assert_eq!(h.controller.state(), SessionState::AwaitingResponse(0));
}

#[test]
fn test_restart_after_finish_begins_fresh_session() {
    let mut h = Harness::new();
    h.controller.start(Category::Hr).unwrap();
    for _ in 0..4 {
        h.controller.answer("I am motivated by growth and impact").unwrap();
        h.controller.request_next().unwrap();
    }
    assert!(h.controller.state().is_finished());

    h.controller.start(Category::Technical).unwrap();
    assert_eq!(h.controller.state(), SessionState::AwaitingResponse(0));
    assert!(h.controller.answered().is_empty());
    assert_eq!(h.controller.category(), Some(Category::Technical));
    assert_eq!(h.history().len(), 1);
}

#[test]
fn test_signed_out_user_cannot_start() {
    let accounts = Arc::new(MemoryAccountStore::new());
    let mut controller = SessionController::new(Arc::new(MemoryHistoryStore::new()), accounts);
    assert_eq!(
        controller.start(Category::Technical),
        Err(InterviewError::NotAuthenticated)
    );
    assert_eq!(controller.state(), SessionState::NotStarted);
}
