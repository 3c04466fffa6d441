use super::{Transcriber, Transcription};
use crate::audio::AudioClip;
use crate::{InterviewError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

const TRANSCRIBE_PATH: &str = "/speech-analysis/transcribe";

/// Transcription over the backend's speech-analysis endpoint
#[derive(Clone)]
pub struct HttpTranscriber {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct TranscribeRequest<'a> {
    audio_base64: &'a str,
}

impl HttpTranscriber {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            let auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                InterviewError::ConfigError(format!("Invalid transcription token: {}", e))
            })?;
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                InterviewError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), TRANSCRIBE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> Result<Transcription> {
        let wav = clip.to_wav_bytes()?;
        let encoded = STANDARD.encode(&wav);
        debug!("Sending {} bytes of WAV to {}", wav.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&TranscribeRequest {
                audio_base64: &encoded,
            })
            .send()
            .await
            .map_err(|e| {
                error!("Transcription request failed: {}", e);
                InterviewError::TranscriptionFailed(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            error!("Transcription rejected: token expired or missing");
            return Err(InterviewError::TranscriptionFailed(
                "authentication expired".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            error!("Transcription failed ({}): {}", status, body);
            return Err(InterviewError::TranscriptionFailed(format!(
                "server returned {}",
                status
            )));
        }

        response.json::<Transcription>().await.map_err(|e| {
            InterviewError::TranscriptionFailed(format!("invalid response body: {}", e))
        })
    }
}
