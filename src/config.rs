//! Practice configuration
//!
//! Loaded from a TOML file; every section and field is optional and falls
//! back to its default.
//!
//! ```toml
//! [analysis]
//! stage_delay_ms = 400
//! clarity_seed = 7
//!
//! [storage]
//! history_path = "/tmp/history.json"
//!
//! [transcription]
//! enabled = true
//! base_url = "http://localhost:8000"
//! token = "..."
//! timeout_secs = 30
//!
//! [recorder]
//! sample_rate = 16000
//! channels = 1
//! ```

use crate::audio::AudioRecorder;
use crate::scoring::{RandomClarity, ResponseScorer, SeededClarity};
use crate::session::SessionController;
use crate::storage::{AccountStore, JsonFileHistoryStore};
use crate::transcription::HttpTranscriber;
use crate::{InterviewError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const MAX_STAGE_DELAY_MS: u64 = 10_000;

/// Analysis pacing and the clarity placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Pause before each analysis stage, in milliseconds
    pub stage_delay_ms: u64,

    /// Fixed seed for reproducible clarity values
    pub clarity_seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stage_delay_ms: 400,
            clarity_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON document holding every user's session history
    pub history_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_path: default_history_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Bearer token for the backend
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:8000".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// Configuration for a practice run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    pub analysis: AnalysisConfig,
    pub storage: StorageConfig,
    pub transcription: TranscriptionConfig,
    pub recorder: RecorderConfig,
}

fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mock-interview")
        .join("history.json")
}

impl PracticeConfig {
    /// Load and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            InterviewError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_toml(&content).map_err(|e| match e {
            InterviewError::ConfigError(msg) => {
                InterviewError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PracticeConfig =
            toml::from_str(content).map_err(|e| InterviewError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Pause before each analysis stage
    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.analysis.stage_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Make clarity values reproducible
    pub fn with_clarity_seed(mut self, seed: u64) -> Self {
        self.analysis.clarity_seed = Some(seed);
        self
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.history_path = path.into();
        self
    }

    /// Enable spoken answers through the given backend
    pub fn with_transcription(mut self, base_url: impl Into<String>, token: Option<String>) -> Self {
        self.transcription.enabled = true;
        self.transcription.base_url = base_url.into();
        self.transcription.token = token;
        self
    }

    /// Typed answers only
    pub fn without_transcription(mut self) -> Self {
        self.transcription.enabled = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.analysis.stage_delay_ms > MAX_STAGE_DELAY_MS {
            return Err(InterviewError::ConfigError(format!(
                "stage_delay_ms must be at most {}, got {}",
                MAX_STAGE_DELAY_MS, self.analysis.stage_delay_ms
            )));
        }

        if self.storage.history_path.as_os_str().is_empty() {
            return Err(InterviewError::ConfigError(
                "history_path must not be empty".to_string(),
            ));
        }

        if self.recorder.sample_rate == 0 {
            return Err(InterviewError::ConfigError(
                "sample_rate must be positive".to_string(),
            ));
        }
        if !(1..=2).contains(&self.recorder.channels) {
            return Err(InterviewError::ConfigError(format!(
                "channels must be 1 or 2, got {}",
                self.recorder.channels
            )));
        }

        if self.transcription.enabled {
            let url = &self.transcription.base_url;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(InterviewError::ConfigError(format!(
                    "transcription base_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
            if self.transcription.timeout_secs == 0 {
                return Err(InterviewError::ConfigError(
                    "transcription timeout_secs must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.analysis.stage_delay_ms)
    }

    /// Scorer with a seeded clarity estimator when a seed is configured
    pub fn scorer(&self) -> ResponseScorer {
        match self.analysis.clarity_seed {
            Some(seed) => ResponseScorer::new(SeededClarity::new(seed)),
            None => ResponseScorer::new(RandomClarity),
        }
    }

    pub fn history_store(&self) -> JsonFileHistoryStore {
        JsonFileHistoryStore::new(&self.storage.history_path)
    }

    /// Session controller persisting to the configured history file
    pub fn session_controller(&self, accounts: Arc<dyn AccountStore>) -> SessionController {
        SessionController::new(Arc::new(self.history_store()), accounts)
            .with_scorer(self.scorer())
            .with_stage_delay(self.stage_delay())
    }

    pub fn recorder(&self) -> AudioRecorder {
        AudioRecorder::new(self.recorder.sample_rate, self.recorder.channels)
    }

    /// HTTP transcriber, or `None` when transcription is disabled
    pub fn transcriber(&self) -> Result<Option<HttpTranscriber>> {
        if !self.transcription.enabled {
            return Ok(None);
        }
        HttpTranscriber::new(
            &self.transcription.base_url,
            self.transcription.token.as_deref(),
            Duration::from_secs(self.transcription.timeout_secs),
        )
        .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PracticeConfig::default();
        assert_eq!(config.analysis.stage_delay_ms, 400);
        assert_eq!(config.recorder.sample_rate, 16000);
        assert_eq!(config.recorder.channels, 1);
        assert!(!config.transcription.enabled);
        assert_eq!(config.transcription.base_url, "http://localhost:8000");
        assert!(config.storage.history_path.ends_with("mock-interview/history.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PracticeConfig::default()
            .with_stage_delay(Duration::ZERO)
            .with_clarity_seed(7)
            .with_history_path("/tmp/h.json")
            .with_transcription("https://api.example.com", Some("t".to_string()));

        assert_eq!(config.stage_delay(), Duration::ZERO);
        assert_eq!(config.analysis.clarity_seed, Some(7));
        assert_eq!(config.storage.history_path, PathBuf::from("/tmp/h.json"));
        assert!(config.transcription.enabled);
        assert!(config.validate().is_ok());

        let config = config.without_transcription();
        assert!(!config.transcription.enabled);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = PracticeConfig::from_toml(
            r#"
            [analysis]
            stage_delay_ms = 0

            [transcription]
            enabled = true
            token = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.stage_delay_ms, 0);
        assert_eq!(config.analysis.clarity_seed, None);
        assert!(config.transcription.enabled);
        assert_eq!(config.transcription.token.as_deref(), Some("abc"));
        assert_eq!(config.transcription.timeout_secs, 30);
        assert_eq!(config.recorder, RecorderConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(PracticeConfig::from_toml("").unwrap(), PracticeConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            "[analysis]\nstage_delay_ms = 60000",
            "[recorder]\nsample_rate = 0",
            "[recorder]\nchannels = 6",
            "[storage]\nhistory_path = \"\"",
            "[transcription]\nenabled = true\nbase_url = \"localhost\"",
            "[transcription]\nenabled = true\ntimeout_secs = 0",
        ];
        for case in cases {
            assert!(
                matches!(PracticeConfig::from_toml(case), Err(InterviewError::ConfigError(_))),
                "expected rejection: {}",
                case
            );
        }
    }

    #[test]
    fn test_malformed_toml() {
        let result = PracticeConfig::from_toml("[analysis\nstage_delay_ms = ");
        assert!(matches!(result, Err(InterviewError::ConfigError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nclarity_seed = 42").unwrap();

        let config = PracticeConfig::load(file.path()).unwrap();
        assert_eq!(config.analysis.clarity_seed, Some(42));
    }

    #[test]
    fn test_load_missing_file() {
        let result = PracticeConfig::load("/nonexistent/mock-interview.toml");
        assert!(matches!(result, Err(InterviewError::ConfigError(_))));
    }

    #[test]
    fn test_transcriber_only_when_enabled() {
        let config = PracticeConfig::default();
        assert!(config.transcriber().unwrap().is_none());

        let config = config.with_transcription("http://localhost:9000", None);
        let transcriber = config.transcriber().unwrap().unwrap();
        assert_eq!(
            transcriber.endpoint(),
            "http://localhost:9000/speech-analysis/transcribe"
        );
    }

    #[test]
    fn test_seeded_scorer_is_reproducible() {
        let config = PracticeConfig::default().with_clarity_seed(3);
        let question = crate::Category::Hr.questions()[0];
        let a = config.scorer().score("answer", &question, crate::Category::Hr).unwrap();
        let b = config.scorer().score("answer", &question, crate::Category::Hr).unwrap();
        assert_eq!(a.clarity, b.clarity);
    }
}
