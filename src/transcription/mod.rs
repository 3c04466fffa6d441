//! Speech-to-text for spoken answers
//!
//! A recorded clip goes out in one request and comes back as text plus a
//! confidence. There are no retries; a failed call is reported and the user
//! can record again or type the answer.

mod http;

pub use http::HttpTranscriber;

use crate::audio::AudioClip;
use crate::session::Response;
use crate::{InterviewError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of transcribing one clip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub transcription: String,
    #[serde(default)]
    pub confidence: f32,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip) -> Result<Transcription>;
}

/// Turn a recorded answer into a submittable response
pub async fn transcribe_answer(transcriber: &dyn Transcriber, clip: &AudioClip) -> Result<Response> {
    if clip.is_empty() {
        warn!("Refusing to transcribe an empty recording");
        return Err(InterviewError::TranscriptionFailed(
            "no audio was recorded".to_string(),
        ));
    }

    let result = transcriber.transcribe(clip).await?;
    let text = result.transcription.trim();
    if text.is_empty() {
        warn!("Transcription came back empty");
        return Err(InterviewError::TranscriptionFailed(
            "no speech was recognized".to_string(),
        ));
    }

    info!(
        "Transcribed {:.1}s of audio ({} chars, confidence {:.2})",
        clip.duration_seconds(),
        text.len(),
        result.confidence
    );
    Ok(Response::transcribed(text, result.confidence))
}

/// Synchronous front for callers without an async runtime
///
/// Owns one single-threaded runtime for its whole lifetime.
pub struct BlockingTranscriber<T> {
    inner: T,
    runtime: tokio::runtime::Runtime,
}

impl<T: Transcriber> BlockingTranscriber<T> {
    pub fn new(inner: T) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { inner, runtime })
    }

    /// Blocking [`transcribe_answer`]
    pub fn transcribe_answer(&self, clip: &AudioClip) -> Result<Response> {
        self.runtime.block_on(transcribe_answer(&self.inner, clip))
    }
}
