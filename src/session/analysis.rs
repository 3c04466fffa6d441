//! Background analysis of one submitted response
//!
//! Each submission gets a short-lived worker thread that walks the
//! [`AnalysisStage`] sequence, emitting a stage event and pausing for the
//! configured delay before each stage. The worker reports exactly one
//! `Result<ScoreBundle>` on a capacity-1 channel.

use super::record::Response;
use super::state::SessionEvent;
use crate::questions::{Category, Question};
use crate::scoring::{ResponseScorer, ScoreBundle};
use crate::{InterviewError, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Send an event without ever blocking the sender
pub(crate) fn emit(event_tx: &Sender<SessionEvent>, event: SessionEvent) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            debug!("Event channel full, dropping {:?}", event);
        }
        Err(TrySendError::Disconnected(_)) => {}
    }
}

/// An analysis in flight for question `index`
pub(crate) struct PendingAnalysis {
    pub index: usize,
    pub response: Response,
    result_rx: Receiver<Result<ScoreBundle>>,
}

impl PendingAnalysis {
    /// Start analyzing `response` on a worker thread
    pub fn spawn(
        scorer: ResponseScorer,
        question: Question,
        category: Category,
        response: Response,
        stage_delay: Duration,
        event_tx: Sender<SessionEvent>,
    ) -> Result<Self> {
        let (result_tx, result_rx) = bounded(1);
        let index = question.position;
        let text = response.text.clone();

        thread::Builder::new()
            .name(format!("analysis-{}-{}", category, index))
            .spawn(move || {
                let result = scorer.score_in_stages(&text, &question, category, |stage| {
                    debug!("Question {}: {}", index + 1, stage);
                    emit(&event_tx, SessionEvent::StageStarted { index, stage });
                    if !stage_delay.is_zero() {
                        thread::sleep(stage_delay);
                    }
                });
                // Receiver gone means the controller was dropped mid-analysis
                let _ = result_tx.send(result);
            })
            .map_err(|e| {
                InterviewError::ChannelError(format!("Failed to spawn analysis worker: {}", e))
            })?;

        Ok(Self {
            index,
            response,
            result_rx,
        })
    }

    /// Block until the worker reports
    pub fn wait(&self) -> Result<ScoreBundle> {
        self.result_rx.recv().map_err(|_| {
            InterviewError::ChannelError("Analysis worker exited without a result".to_string())
        })?
    }

    /// Check for the worker's result without blocking
    pub fn try_result(&self) -> Option<Result<ScoreBundle>> {
        match self.result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(InterviewError::ChannelError(
                "Analysis worker exited without a result".to_string(),
            ))),
        }
    }
}
