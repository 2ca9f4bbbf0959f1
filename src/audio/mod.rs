//! Audio pipeline — microphone capture → format conversion → shared buffer.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → Frame (mpsc) → stereo_to_mono → resample
//!           → CaptureBuffer → (VadDetector) → SttEngine
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use speech_capture::audio::{AudioDevice, CaptureBuffer};
//!
//! let device = AudioDevice::open(None).unwrap();
//! let stream = device.start().unwrap();
//!
//! let buf = CaptureBuffer::new();
//! while let Ok(frame) = stream.read(Duration::from_millis(200)) {
//!     buf.append(&frame.samples);
//! }
//! ```

pub mod buffer;
pub mod device;
pub mod resample;
pub mod vad;

pub use buffer::CaptureBuffer;
pub use device::{AudioDevice, CaptureError, Frame, InputStream, StreamHandle};
pub use resample::{resample, stereo_to_mono};
pub use vad::VadDetector;
