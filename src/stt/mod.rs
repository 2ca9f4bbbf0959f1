//! STT (Speech-to-Text) module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  SttEngine (trait)                   │
//! │                                                      │
//! │   ┌─────────────┐    ┌──────────────┐                │
//! │   │  ModelPaths │    │ WhisperEngine│                │
//! │   │ - resolve   │───▶│ - ctx        │                │
//! │   │ - exists?   │    │ - params     │                │
//! │   └─────────────┘    └──────┬───────┘                │
//! │                             │                        │
//! │   ┌─────────────┐           ▼                        │
//! │   │  wav::read  │   ┌──────────────────┐             │
//! │   │ file → f32  │──▶│  transcribe()    │             │
//! │   └─────────────┘   │  audio → text    │             │
//! │                     └──────────────────┘             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use speech_capture::stt::{SttEngine, TranscribeParams, WhisperEngine};
//!
//! let params = TranscribeParams::default(); // language = "en", Greedy { best_of: 1 }
//! let engine = WhisperEngine::load("models/ggml-base.en.bin", params)
//!     .expect("model file missing");
//!
//! // audio: 16 kHz, mono, f32 PCM from the audio module
//! let audio: Vec<f32> = vec![0.0; 16_000]; // 1 s of silence
//! let text = engine.transcribe(&audio).unwrap();
//! println!("{text}");
//! ```

pub mod engine;
pub mod model;
pub mod transcribe;
pub mod wav;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{SttEngine, SttError, WhisperEngine};
pub use model::{default_model, find_model_by_id, ModelInfo, ModelPaths, ModelSize, WHISPER_MODELS};
pub use transcribe::{SamplingStrategy, Segment, TranscribeParams, TranscriptionResult};
pub use wav::{read_wav, WavError};

// test-only re-export so the speech-engine test module can import
// MockSttEngine without the full `crate::stt::engine::` path.
#[cfg(test)]
pub use engine::MockSttEngine;
