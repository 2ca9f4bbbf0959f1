//! # speech-capture
//!
//! Microphone capture and offline Whisper transcription engine.
//!
//! ## Architecture
//!
//! ```text
//! Microphone → cpal callback → Frame (mpsc) → capture thread
//!                                                  │ downmix + resample
//!                                                  ▼
//!                                            CaptureBuffer
//!                                                  │ drain()
//!                                                  ▼
//!                          SpeechEngine ──▶ SttEngine::transcribe → text
//!                                ▲
//!                 WAV file ──────┘ (read_wav, bypasses the buffer)
//! ```
//!
//! [`engine::SpeechEngine`] is the public entry point: `init()` loads the
//! model, `start_recording()`/`stop_recording()` bracket a capture session,
//! and `transcribe_buffer()`/`transcribe_file()` produce text.

pub mod audio;
pub mod config;
pub mod engine;
pub mod stt;

// Convenience re-exports for downstream crates
pub use engine::{EngineError, RecordingState, SpeechEngine};
pub use stt::{SttEngine, SttError, WhisperEngine};
