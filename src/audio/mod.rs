//! Audio answer capture
//!
//! The platform capture stream is an external producer: it pushes sample
//! chunks into the recorder's channel. The recorder turns one start/stop
//! cycle into a finished [`AudioClip`].

mod clip;
mod recorder;

pub use clip::AudioClip;
pub use recorder::{AudioRecorder, CaptureHandle, RecorderState};
