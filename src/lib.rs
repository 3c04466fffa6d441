pub mod audio;
pub mod config;
pub mod questions;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod transcription;

pub use config::PracticeConfig;
pub use questions::{Category, Question};
pub use scoring::{ResponseScorer, ScoreBundle};
pub use session::{Advance, SessionController, SessionEvent, SessionRecord, SessionState};
pub use storage::{AccountStore, HistoryStore};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterviewError {
    #[error("Response is empty")]
    EmptyResponse,

    #[error("No keyword topic '{topic}' for {category} questions")]
    UnknownTopic { category: String, topic: String },

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Cannot {operation} while {state}")]
    InvalidState { operation: String, state: String },

    #[error("Analysis of the previous response is still in progress")]
    AnalysisInProgress,

    #[error("No signed-in account")]
    NotAuthenticated,

    #[error("Recorder is already recording")]
    RecorderBusy,

    #[error("Recorder is not recording")]
    RecorderIdle,

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for InterviewError {
    fn from(e: std::io::Error) -> Self {
        InterviewError::IOError(e.to_string())
    }
}

impl InterviewError {
    /// Check if the session can continue after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Corrected by the user in place
            InterviewError::EmptyResponse => true,
            // Session falls back to AwaitingResponse; restart picks a valid list
            InterviewError::UnknownTopic { .. } => true,
            // Retry the recording or switch to text
            InterviewError::TranscriptionFailed(_) => true,
            // The finished record is kept and the save can be retried
            InterviewError::PersistenceFailed(_) => true,
            InterviewError::InvalidState { .. } => true,
            InterviewError::AnalysisInProgress => true,
            InterviewError::NotAuthenticated => true,
            InterviewError::RecorderBusy => true,
            InterviewError::RecorderIdle => true,
            InterviewError::AudioProcessingError(_) => true,
            InterviewError::ChannelError(_) => true,
            InterviewError::ConfigError(_) => false,
            InterviewError::IOError(_) => false,
        }
    }

    /// Check if the current session has to be abandoned and started again
    pub fn ends_session(&self) -> bool {
        matches!(self, InterviewError::UnknownTopic { .. })
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            InterviewError::EmptyResponse => {
                "Please provide an answer before submitting.".to_string()
            }
            InterviewError::UnknownTopic { .. } => {
                "This question could not be scored. Please restart the interview.".to_string()
            }
            InterviewError::TranscriptionFailed(_) => {
                "Failed to transcribe audio. Please try again or type your answer.".to_string()
            }
            InterviewError::PersistenceFailed(_) => {
                "Your interview could not be saved. Please try again.".to_string()
            }
            InterviewError::InvalidState { .. } => {
                "That action is not available right now.".to_string()
            }
            InterviewError::AnalysisInProgress => {
                "Your answer is still being analyzed.".to_string()
            }
            InterviewError::NotAuthenticated => "Please sign in to start an interview.".to_string(),
            InterviewError::RecorderBusy => "A recording is already in progress.".to_string(),
            InterviewError::RecorderIdle => "No recording in progress.".to_string(),
            InterviewError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            InterviewError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            InterviewError::ChannelError(_) => {
                "Internal communication error. Please try again.".to_string()
            }
            InterviewError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InterviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_environment_errors_are_fatal() {
        assert!(InterviewError::EmptyResponse.is_recoverable());
        assert!(InterviewError::PersistenceFailed("disk full".into()).is_recoverable());
        assert!(!InterviewError::ConfigError("bad".into()).is_recoverable());
        assert!(!InterviewError::IOError("denied".into()).is_recoverable());
    }

    #[test]
    fn test_unscorable_question_ends_session() {
        let unknown = InterviewError::UnknownTopic {
            category: "hr".to_string(),
            topic: "closures".to_string(),
        };
        assert!(unknown.ends_session());
        assert!(unknown.is_recoverable());
        assert!(!InterviewError::EmptyResponse.ends_session());
        assert!(!InterviewError::TranscriptionFailed("timeout".into()).ends_session());
        assert!(!InterviewError::PersistenceFailed("disk full".into()).ends_session());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: InterviewError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, InterviewError::IOError(_)));
    }

    #[test]
    fn test_display_includes_context() {
        let err = InterviewError::UnknownTopic {
            category: "hr".to_string(),
            topic: "closures".to_string(),
        };
        assert_eq!(err.to_string(), "No keyword topic 'closures' for hr questions");
    }
}
