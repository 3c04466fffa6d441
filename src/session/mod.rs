//! Interview session flow
//!
//! A [`SessionController`] walks one category's fixed question list:
//! present a question, accept one response, analyze it on a worker, show the
//! feedback, advance. The finished [`SessionRecord`] is appended to the
//! injected [`HistoryStore`](crate::storage::HistoryStore).

mod analysis;
mod controller;
mod record;
mod state;
pub mod summary;

pub use crate::scoring::AnalysisStage;
pub use controller::{Advance, SessionController};
pub use record::{AnsweredQuestion, RecordedQuestion, Response, ResponseOrigin, SessionRecord};
pub use state::{SessionEvent, SessionState};
pub use summary::{HistoryStats, SessionSummary};
