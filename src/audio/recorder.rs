use super::clip::AudioClip;
use crate::{InterviewError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Recorder lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecorderState {
    /// Nothing recorded yet, or reset
    #[default]
    Idle,
    /// Capturing audio
    Recording,
    /// Recording finished and a clip is available
    Stopped,
}

impl RecorderState {
    pub fn is_recording(&self) -> bool {
        matches!(self, RecorderState::Recording)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RecorderState::Idle)
    }

    pub fn has_clip(&self) -> bool {
        matches!(self, RecorderState::Stopped)
    }
}

impl std::fmt::Display for RecorderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecorderState::Idle => write!(f, "Idle"),
            RecorderState::Recording => write!(f, "Recording"),
            RecorderState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Producer side handed to the platform capture stream
#[derive(Clone)]
pub struct CaptureHandle {
    sample_tx: Sender<Vec<f32>>,
    gate: Arc<Mutex<bool>>,
}

impl CaptureHandle {
    /// Queue a chunk of samples; returns false when the recorder is not recording
    pub fn push(&self, chunk: Vec<f32>) -> bool {
        // Holding the gate while sending means stop() cannot miss this chunk
        let recording = self.gate.lock();
        if !*recording {
            return false;
        }
        self.sample_tx.send(chunk).is_ok()
    }

    pub fn is_recording(&self) -> bool {
        *self.gate.lock()
    }
}

/// Start/stop recorder for one answer at a time
pub struct AudioRecorder {
    sample_rate: u32,
    channels: u16,
    state: RecorderState,
    sample_tx: Sender<Vec<f32>>,
    sample_rx: Receiver<Vec<f32>>,
    gate: Arc<Mutex<bool>>,
    accumulator: Vec<f32>,
    started_at: Option<Instant>,
    recorded: Duration,
    clip: Option<AudioClip>,
}

impl AudioRecorder {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        let (sample_tx, sample_rx) = unbounded();

        Self {
            sample_rate,
            channels,
            state: RecorderState::Idle,
            sample_tx,
            sample_rx,
            gate: Arc::new(Mutex::new(false)),
            accumulator: Vec::new(),
            started_at: None,
            recorded: Duration::ZERO,
            clip: None,
        }
    }

    /// Handle for the capture stream to push samples through
    pub fn capture_handle(&self) -> CaptureHandle {
        CaptureHandle {
            sample_tx: self.sample_tx.clone(),
            gate: Arc::clone(&self.gate),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    /// The last finished clip
    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    /// Wall-clock length of the current or last recording
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) if self.state.is_recording() => started.elapsed(),
            _ => self.recorded,
        }
    }

    /// Samples collected so far in the current recording
    pub fn buffered_samples(&self) -> usize {
        self.accumulator.len()
    }

    /// Begin a new recording, discarding any previous clip
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_recording() {
            return Err(InterviewError::RecorderBusy);
        }

        self.discard_pending();
        self.accumulator.clear();
        self.clip = None;
        self.recorded = Duration::ZERO;
        self.started_at = Some(Instant::now());
        *self.gate.lock() = true;
        self.state = RecorderState::Recording;

        info!("Recording started");
        Ok(())
    }

    /// Move queued chunks into the recording; returns how many samples moved
    pub fn collect(&mut self) -> usize {
        if !self.state.is_recording() {
            return 0;
        }
        self.drain_into_accumulator()
    }

    /// Stop recording and produce the clip
    ///
    /// Every chunk queued before the stop is included.
    pub fn stop(&mut self) -> Result<AudioClip> {
        if !self.state.is_recording() {
            return Err(InterviewError::RecorderIdle);
        }

        *self.gate.lock() = false;
        let flushed = self.drain_into_accumulator();
        self.recorded = self.started_at.map(|s| s.elapsed()).unwrap_or_default();

        let clip = AudioClip::new(
            std::mem::take(&mut self.accumulator),
            self.sample_rate,
            self.channels,
        );
        debug!(
            "Recording stopped: {} samples ({} flushed at stop), {:.2}s",
            clip.samples.len(),
            flushed,
            clip.duration_seconds()
        );

        self.clip = Some(clip.clone());
        self.state = RecorderState::Stopped;
        Ok(clip)
    }

    /// Drop the recording and any clip, returning to idle
    pub fn reset(&mut self) {
        *self.gate.lock() = false;
        self.discard_pending();
        self.accumulator.clear();
        self.clip = None;
        self.started_at = None;
        self.recorded = Duration::ZERO;
        self.state = RecorderState::Idle;
    }

    fn drain_into_accumulator(&mut self) -> usize {
        let mut moved = 0;
        while let Ok(chunk) = self.sample_rx.try_recv() {
            moved += chunk.len();
            self.accumulator.extend_from_slice(&chunk);
        }
        moved
    }

    fn discard_pending(&mut self) {
        let stale: usize = self.sample_rx.try_iter().map(|chunk| chunk.len()).sum();
        if stale > 0 {
            debug!("Discarded {} stale samples", stale);
        }
    }
}
