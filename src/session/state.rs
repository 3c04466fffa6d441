use crate::questions::Category;
use crate::scoring::AnalysisStage;
use uuid::Uuid;

/// Position of a session in its question flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No session has been started on this controller
    #[default]
    NotStarted,
    /// Question `i` is shown and accepts a response
    AwaitingResponse(usize),
    /// The response to question `i` is being analyzed
    Analyzing(usize),
    /// Feedback for question `i` is shown
    ShowingFeedback(usize),
    /// Every question was answered and the record was saved
    Finished,
}

impl SessionState {
    /// Index of the current question, if any
    pub fn question_index(&self) -> Option<usize> {
        match self {
            SessionState::AwaitingResponse(i)
            | SessionState::Analyzing(i)
            | SessionState::ShowingFeedback(i) => Some(*i),
            SessionState::NotStarted | SessionState::Finished => None,
        }
    }

    pub fn is_awaiting_response(&self) -> bool {
        matches!(self, SessionState::AwaitingResponse(_))
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, SessionState::Analyzing(_))
    }

    pub fn is_showing_feedback(&self) -> bool {
        matches!(self, SessionState::ShowingFeedback(_))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::Finished)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::NotStarted => write!(f, "not started"),
            SessionState::AwaitingResponse(i) => write!(f, "awaiting response to question {}", i + 1),
            SessionState::Analyzing(i) => write!(f, "analyzing response to question {}", i + 1),
            SessionState::ShowingFeedback(i) => write!(f, "showing feedback for question {}", i + 1),
            SessionState::Finished => write!(f, "finished"),
        }
    }
}

/// Notifications for the presentation layer
///
/// State should be read from the controller; events only signal that
/// something changed and carry progress details.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SessionStarted {
        category: Category,
        question_count: usize,
    },
    QuestionPresented {
        index: usize,
        text: String,
    },
    AnalysisStarted {
        index: usize,
    },
    StageStarted {
        index: usize,
        stage: AnalysisStage,
    },
    FeedbackReady {
        index: usize,
        overall: u8,
    },
    AnalysisFailed {
        index: usize,
        error: String,
    },
    SessionFinished {
        record_id: Uuid,
    },
    PersistenceFailed {
        error: String,
    },
    /// An unfinished session was replaced by `start` before it was saved
    SessionDiscarded {
        session_id: Uuid,
        answered: usize,
    },
}
