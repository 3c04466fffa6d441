use super::analysis::{emit, PendingAnalysis};
use super::record::{AnsweredQuestion, RecordedQuestion, Response, SessionRecord};
use super::state::{SessionEvent, SessionState};
use crate::questions::{Category, Question};
use crate::scoring::{ResponseScorer, ScoreBundle};
use crate::storage::{history_key, AccountStore, HistoryStore};
use crate::{InterviewError, Result};
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Outcome of [`SessionController::request_next`]
#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    /// The next question is now awaiting a response
    Question(usize),
    /// The session ended and this record was saved
    Finished(SessionRecord),
}

/// The session currently driven by a controller
struct ActiveSession {
    id: Uuid,
    user_id: String,
    category: Category,
    questions: &'static [Question],
    answers: Vec<AnsweredQuestion>,
    started_at: DateTime<Utc>,
}

impl ActiveSession {
    fn to_record(&self, completed_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            id: self.id,
            user_id: self.user_id.clone(),
            category: self.category,
            answers: self.answers.clone(),
            questions_answered: self.answers.len(),
            started_at: self.started_at,
            completed_at,
        }
    }
}

/// Drives one interview session at a time
///
/// History is only appended to, once, when the last question is advanced
/// past. The controller assumes a single writer per user: two controllers
/// finishing sessions for the same user race on the same key and the store
/// decides the order.
pub struct SessionController {
    store: Arc<dyn HistoryStore>,
    accounts: Arc<dyn AccountStore>,
    scorer: ResponseScorer,
    stage_delay: Duration,
    state: SessionState,
    session: Option<ActiveSession>,
    pending: Option<PendingAnalysis>,
    event_tx: Sender<SessionEvent>,
    event_rx: Receiver<SessionEvent>,
}

impl SessionController {
    pub fn new(store: Arc<dyn HistoryStore>, accounts: Arc<dyn AccountStore>) -> Self {
        let (event_tx, event_rx) = bounded(100);

        Self {
            store,
            accounts,
            scorer: ResponseScorer::default(),
            stage_delay: Duration::ZERO,
            state: SessionState::NotStarted,
            session: None,
            pending: None,
            event_tx,
            event_rx,
        }
    }

    /// Use a specific scorer
    pub fn with_scorer(mut self, scorer: ResponseScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Pause before each analysis stage
    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay = delay;
        self
    }

    /// Receiver for progress events
    pub fn event_receiver(&self) -> Receiver<SessionEvent> {
        self.event_rx.clone()
    }

    // === Accessors ===

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn category(&self) -> Option<Category> {
        self.session.as_ref().map(|s| s.category)
    }

    /// Length of the active session's question list
    pub fn question_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.questions.len())
    }

    /// Question currently shown, if the session is between start and finish
    pub fn current_question(&self) -> Option<&'static Question> {
        let index = self.state.question_index()?;
        let questions = self.session.as_ref()?.questions;
        questions.get(index)
    }

    /// Score for the question whose feedback is shown
    pub fn current_score(&self) -> Option<&ScoreBundle> {
        match self.state {
            SessionState::ShowingFeedback(i) => self
                .session
                .as_ref()
                .and_then(|s| s.answers.get(i))
                .map(|a| &a.score),
            _ => None,
        }
    }

    /// Answers scored so far in the active session
    pub fn answered(&self) -> &[AnsweredQuestion] {
        self.session
            .as_ref()
            .map(|s| s.answers.as_slice())
            .unwrap_or(&[])
    }

    // === Transitions ===

    /// Begin a new session for `category`, returning its question count
    pub fn start(&mut self, category: Category) -> Result<usize> {
        if self.state.is_analyzing() {
            warn!("Rejected start of {} session during analysis", category);
            return Err(InterviewError::AnalysisInProgress);
        }

        let account = self
            .accounts
            .current()
            .ok_or(InterviewError::NotAuthenticated)?;

        if let Some(previous) = self.session.as_ref().filter(|_| !self.state.is_finished()) {
            if !previous.answers.is_empty() {
                warn!(
                    "Discarding unsaved {} session {} with {} answers",
                    previous.category,
                    previous.id,
                    previous.answers.len()
                );
                emit(
                    &self.event_tx,
                    SessionEvent::SessionDiscarded {
                        session_id: previous.id,
                        answered: previous.answers.len(),
                    },
                );
            }
        }

        let questions = category.questions();
        self.session = Some(ActiveSession {
            id: Uuid::new_v4(),
            user_id: account.id,
            category,
            questions,
            answers: Vec::with_capacity(questions.len()),
            started_at: Utc::now(),
        });
        self.pending = None;
        self.state = SessionState::AwaitingResponse(0);

        info!("Started {} session with {} questions", category, questions.len());
        emit(
            &self.event_tx,
            SessionEvent::SessionStarted {
                category,
                question_count: questions.len(),
            },
        );
        self.present_question(0);

        Ok(questions.len())
    }

    /// Submit typed text for the current question
    pub fn submit_response(&mut self, text: impl Into<String>) -> Result<()> {
        self.submit(Response::typed(text))
    }

    /// Submit a response for the current question and start its analysis
    pub fn submit(&mut self, response: Response) -> Result<()> {
        let index = match self.state {
            SessionState::AwaitingResponse(i) => i,
            SessionState::Analyzing(_) => {
                warn!("Rejected submission during analysis");
                return Err(InterviewError::AnalysisInProgress);
            }
            other => return Err(invalid_state("submit a response", other)),
        };

        if response.is_blank() {
            return Err(InterviewError::EmptyResponse);
        }

        let session = self
            .session
            .as_ref()
            .ok_or_else(|| invalid_state("submit a response", self.state))?;
        let question = session.questions[index];

        emit(&self.event_tx, SessionEvent::AnalysisStarted { index });
        let pending = PendingAnalysis::spawn(
            self.scorer.clone(),
            question,
            session.category,
            response,
            self.stage_delay,
            self.event_tx.clone(),
        )?;

        self.pending = Some(pending);
        self.state = SessionState::Analyzing(index);

        Ok(())
    }

    /// Wait for the running analysis and show its feedback
    pub fn wait_for_feedback(&mut self) -> Result<&ScoreBundle> {
        if !self.state.is_analyzing() {
            return Err(invalid_state("wait for feedback", self.state));
        }
        let pending = self
            .pending
            .take()
            .ok_or_else(|| invalid_state("wait for feedback", self.state))?;

        let result = pending.wait();
        self.complete_analysis(pending, result)
    }

    /// Non-blocking variant of [`wait_for_feedback`](Self::wait_for_feedback)
    ///
    /// Returns `Ok(None)` while the analysis is still running.
    pub fn poll_feedback(&mut self) -> Result<Option<&ScoreBundle>> {
        if !self.state.is_analyzing() {
            return Err(invalid_state("poll for feedback", self.state));
        }
        let result = match self.pending.as_ref().and_then(PendingAnalysis::try_result) {
            Some(result) => result,
            None if self.pending.is_some() => return Ok(None),
            None => return Err(invalid_state("poll for feedback", self.state)),
        };

        match self.pending.take() {
            Some(pending) => self.complete_analysis(pending, result).map(Some),
            None => Err(invalid_state("poll for feedback", self.state)),
        }
    }

    /// Submit typed text and wait for its feedback
    pub fn answer(&mut self, text: impl Into<String>) -> Result<ScoreBundle> {
        self.submit_response(text)?;
        self.wait_for_feedback().cloned()
    }

    /// Move past the feedback to the next question or finish the session
    pub fn request_next(&mut self) -> Result<Advance> {
        let index = match self.state {
            SessionState::ShowingFeedback(i) => i,
            SessionState::Analyzing(_) => return Err(InterviewError::AnalysisInProgress),
            other => return Err(invalid_state("advance", other)),
        };

        let session = self
            .session
            .as_ref()
            .ok_or_else(|| invalid_state("advance", self.state))?;

        if index + 1 < session.questions.len() {
            self.state = SessionState::AwaitingResponse(index + 1);
            self.present_question(index + 1);
            return Ok(Advance::Question(index + 1));
        }

        let record = session.to_record(Utc::now());
        let key = history_key(&record.user_id);

        match self.store.append(&key, record.clone()) {
            Ok(()) => {
                info!(
                    "Finished {} session {} ({} answers) for {}",
                    record.category, record.id, record.questions_answered, record.user_id
                );
                self.state = SessionState::Finished;
                emit(
                    &self.event_tx,
                    SessionEvent::SessionFinished {
                        record_id: record.id,
                    },
                );
                Ok(Advance::Finished(record))
            }
            Err(e) => {
                error!("Failed to save session {}: {}", record.id, e);
                emit(
                    &self.event_tx,
                    SessionEvent::PersistenceFailed {
                        error: e.to_string(),
                    },
                );
                Err(match e {
                    InterviewError::PersistenceFailed(_) => e,
                    other => InterviewError::PersistenceFailed(other.to_string()),
                })
            }
        }
    }

    fn present_question(&self, index: usize) {
        if let Some(question) = self.session.as_ref().and_then(|s| s.questions.get(index)) {
            emit(
                &self.event_tx,
                SessionEvent::QuestionPresented {
                    index,
                    text: question.text.to_string(),
                },
            );
        }
    }

    fn complete_analysis(
        &mut self,
        pending: PendingAnalysis,
        result: Result<ScoreBundle>,
    ) -> Result<&ScoreBundle> {
        let index = pending.index;

        let score = match result {
            Ok(score) => score,
            Err(e) => {
                error!("Analysis of question {} failed: {}", index + 1, e);
                self.state = SessionState::AwaitingResponse(index);
                emit(
                    &self.event_tx,
                    SessionEvent::AnalysisFailed {
                        index,
                        error: e.to_string(),
                    },
                );
                return Err(e);
            }
        };

        emit(
            &self.event_tx,
            SessionEvent::FeedbackReady {
                index,
                overall: score.overall,
            },
        );

        let state = self.state;
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| invalid_state("record feedback", state))?;
        let question = RecordedQuestion::from(&session.questions[index]);
        session.answers.push(AnsweredQuestion {
            question,
            response: pending.response,
            score,
        });
        self.state = SessionState::ShowingFeedback(index);

        session
            .answers
            .last()
            .map(|answer| &answer.score)
            .ok_or_else(|| invalid_state("record feedback", SessionState::ShowingFeedback(index)))
    }
}

fn invalid_state(operation: &str, state: SessionState) -> InterviewError {
    InterviewError::InvalidState {
        operation: operation.to_string(),
        state: state.to_string(),
    }
}
