//! Saving finished sessions and reading history back

use mock_interview::scoring::FixedClarity;
use mock_interview::session::HistoryStats;
use mock_interview::storage::{
    history_key, Account, JsonFileHistoryStore, MemoryAccountStore, MemoryHistoryStore,
};
use mock_interview::{
    Advance, Category, HistoryStore, InterviewError, PracticeConfig, ResponseScorer,
    SessionController, SessionEvent, SessionRecord, SessionState,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Store whose first `failures` appends fail
struct FlakyStore {
    inner: MemoryHistoryStore,
    failures: AtomicUsize,
    attempts: Mutex<Vec<SessionRecord>>,
}

impl FlakyStore {
    fn new(failures: usize) -> Self {
        Self {
            inner: MemoryHistoryStore::new(),
            failures: AtomicUsize::new(failures),
            attempts: Mutex::new(Vec::new()),
        }
    }
}

impl HistoryStore for FlakyStore {
    fn get(&self, key: &str) -> mock_interview::Result<Vec<SessionRecord>> {
        self.inner.get(key)
    }

    fn append(&self, key: &str, record: SessionRecord) -> mock_interview::Result<()> {
        self.attempts.lock().push(record.clone());
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(InterviewError::IOError("disk full".to_string()));
        }
        self.inner.append(key, record)
    }

    fn set(&self, key: &str, records: Vec<SessionRecord>) -> mock_interview::Result<()> {
        self.inner.set(key, records)
    }
}

fn run_to_last_feedback(controller: &mut SessionController, category: Category) {
    controller.start(category).unwrap();
    for i in 0..category.question_count() {
        controller
            .answer("I would explain the situation, my action and the result")
            .unwrap();
        if i + 1 < category.question_count() {
            assert_eq!(controller.request_next().unwrap(), Advance::Question(i + 1));
        }
    }
}

#[test]
fn test_failed_save_stays_retryable() {
    let store = Arc::new(FlakyStore::new(1));
    let account = Account::new("Ada", "ada@example.com");
    let accounts = Arc::new(MemoryAccountStore::with_account(account.clone()));
    let mut controller = SessionController::new(store.clone(), accounts)
        .with_scorer(ResponseScorer::new(FixedClarity(80)));
    let events = controller.event_receiver();

    run_to_last_feedback(&mut controller, Category::Hr);

    let err = controller.request_next().unwrap_err();
    assert!(matches!(err, InterviewError::PersistenceFailed(_)));
    assert!(err.is_recoverable());
    assert_eq!(controller.state(), SessionState::ShowingFeedback(3));
    assert!(events
        .try_iter()
        .any(|e| matches!(e, SessionEvent::PersistenceFailed { .. })));

    let record = match controller.request_next().unwrap() {
        Advance::Finished(record) => record,
        other => panic!("expected a finished session, got {:?}", other),
    };
    assert_eq!(controller.state(), SessionState::Finished);

    let saved = store.get(&history_key(&account.id)).unwrap();
    assert_eq!(saved, vec![record.clone()]);

    // The retry saves the same session, not a new one
    let attempts = store.attempts.lock();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].id, record.id);
    assert_eq!(attempts[0].answers, attempts[1].answers);
}

#[test]
fn test_restart_after_failed_save_reports_the_lost_session() {
    let store = Arc::new(FlakyStore::new(1));
    let accounts = Arc::new(MemoryAccountStore::with_account(Account::local("ada")));
    let mut controller = SessionController::new(store.clone(), accounts)
        .with_scorer(ResponseScorer::new(FixedClarity(80)));
    let events = controller.event_receiver();

    run_to_last_feedback(&mut controller, Category::Technical);
    assert!(controller.request_next().is_err());
    let unsaved = store.attempts.lock()[0].id;

    controller.start(Category::Technical).unwrap();
    assert!(events.try_iter().any(|e| e
        == SessionEvent::SessionDiscarded {
            session_id: unsaved,
            answered: 4,
        }));
    assert_eq!(controller.state(), SessionState::AwaitingResponse(0));
}

#[test]
fn test_file_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("history.json");
    let config = PracticeConfig::default()
        .with_history_path(&path)
        .with_stage_delay(Duration::ZERO)
        .with_clarity_seed(11);

    let account = Account::local("ada");
    let accounts = Arc::new(MemoryAccountStore::with_account(account.clone()));

    for category in [Category::Technical, Category::Behavioral] {
        let mut controller = config.session_controller(accounts.clone());
        run_to_last_feedback(&mut controller, category);
        assert!(matches!(
            controller.request_next().unwrap(),
            Advance::Finished(_)
        ));
    }

    let reopened = JsonFileHistoryStore::new(&path);
    let records = reopened.get(&history_key(&account.id)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].category, Category::Technical);
    assert_eq!(records[1].category, Category::Behavioral);

    let stats = HistoryStats::from_records(&records);
    assert_eq!(stats.total_sessions, 2);
    assert_eq!(stats.total_questions, 8);
    assert_eq!(stats.sessions_by_category.get(&Category::Hr), None);
    assert!(stats.best_overall.is_some());
}

#[test]
fn test_concurrent_sessions_on_one_history_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = PracticeConfig::default()
        .with_history_path(dir.path().join("history.json"))
        .with_stage_delay(Duration::ZERO);

    let users = ["ada", "grace", "linus"];
    let workers: Vec<_> = users
        .into_iter()
        .map(|name| {
            let accounts = Arc::new(MemoryAccountStore::with_account(Account::local(name)));
            let mut controller = config
                .session_controller(accounts)
                .with_scorer(ResponseScorer::new(FixedClarity(80)));
            std::thread::spawn(move || {
                for _ in 0..5 {
                    run_to_last_feedback(&mut controller, Category::Hr);
                    assert!(matches!(
                        controller.request_next().unwrap(),
                        Advance::Finished(_)
                    ));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let store = config.history_store();
    for name in users {
        let key = history_key(&Account::local(name).id);
        assert_eq!(store.get(&key).unwrap().len(), 5, "history of {}", name);
    }
}

#[test]
fn test_users_have_separate_histories() {
    let store = MemoryHistoryStore::new();
    let accounts = MemoryAccountStore::new();
    let mut controller =
        SessionController::new(Arc::new(store.clone()), Arc::new(accounts.clone()))
            .with_scorer(ResponseScorer::new(FixedClarity(90)));

    let ada = Account::local("ada");
    let grace = Account::local("grace");

    accounts.sign_in(ada.clone());
    run_to_last_feedback(&mut controller, Category::Technical);
    controller.request_next().unwrap();

    accounts.sign_in(grace.clone());
    run_to_last_feedback(&mut controller, Category::Hr);
    controller.request_next().unwrap();

    assert_eq!(store.get(&history_key(&ada.id)).unwrap().len(), 1);
    let grace_history = store.get(&history_key(&grace.id)).unwrap();
    assert_eq!(grace_history.len(), 1);
    assert_eq!(grace_history[0].category, Category::Hr);
}

#[test]
fn test_corrupt_history_file_is_a_persistence_error() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "{ not json").unwrap();

    let store = JsonFileHistoryStore::new(file.path());
    assert!(matches!(
        store.get(&history_key("u1")),
        Err(InterviewError::PersistenceFailed(_))
    ));
}
