//! Speech-to-text backends.
//!
//! [`SttEngine`] is the narrow contract the rest of the crate programs
//! against: 16 kHz mono `f32` in, transcript text out.  It is object-safe
//! and `Send + Sync`, so [`crate::engine::SpeechEngine`] holds it as a
//! `Box<dyn SttEngine>`.
//!
//! [`WhisperEngine`] is the real backend over `whisper_rs`.  A context is
//! loaded exactly once by [`WhisperEngine::load`] and never re-initialised;
//! switching models means building a new engine.  [`MockSttEngine`]
//! (test-only) stands in for it where no GGML file is available.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters, WhisperState};

use crate::stt::transcribe::{SamplingStrategy, Segment, TranscribeParams, TranscriptionResult};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// Failures in the STT subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// No readable GGML file at the given path.
    #[error("no model file at {0}")]
    ModelNotFound(String),

    /// whisper-rs rejected the model or could not allocate run state.
    #[error("whisper context init failed: {0}")]
    ContextInit(String),

    /// The inference pass itself failed.
    #[error("inference failed: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// SttEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe speech-to-text interface.
///
/// # Contract
///
/// - `audio` is **16 kHz mono `f32`** PCM.
/// - An empty slice transcribes to `Ok("")`; silence is a result, not an
///   error.
pub trait SttEngine: Send + Sync {
    /// Transcribe `audio` to text.
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError>;
}

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// STT backend wrapping a loaded `whisper_rs::WhisperContext`.
///
/// The context holds only the read-only model weights; every call to
/// [`SttEngine::transcribe`] allocates a fresh `WhisperState`, so no locking
/// is needed to share the engine across threads.
pub struct WhisperEngine {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// whisper-rs wraps a raw context pointer but itself declares
// `unsafe impl Send + Sync` for WhisperContext (weights are immutable once
// loaded), and TranscribeParams is plain owned data.
// SAFETY: see above.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    /// Load the GGML model at `model_path`.
    ///
    /// This is the once-per-context initialisation; there is no reload.
    ///
    /// # Errors
    ///
    /// [`SttError::ModelNotFound`] when the path does not exist (or is not
    /// valid UTF-8, which the whisper C API requires);
    /// [`SttError::ContextInit`] when whisper-rs rejects the file.
    pub fn load(
        model_path: impl AsRef<Path>,
        params: TranscribeParams,
    ) -> Result<Self, SttError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| SttError::ModelNotFound(format!("{} (non-UTF-8 path)", path.display())))?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        log::info!("whisper model loaded: {}", path.display());
        Ok(Self { ctx, params })
    }

    /// Run inference and return the transcript with per-segment timing.
    ///
    /// [`SttEngine::transcribe`] is the plain-text shorthand.
    pub fn transcribe_full(&self, audio: &[f32]) -> Result<TranscriptionResult, SttError> {
        if audio.is_empty() {
            // Nothing recorded is a defined result.
            return Ok(TranscriptionResult {
                text: String::new(),
                segments: Vec::new(),
                duration_ms: 0,
            });
        }

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        let started = std::time::Instant::now();
        state
            .full(self.run_params(), audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let segments = collect_segments(&state)?;
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<String>()
            .trim()
            .to_string();

        Ok(TranscriptionResult {
            text,
            segments,
            duration_ms: started.elapsed().as_millis(),
        })
    }

    /// Translate our owned [`TranscribeParams`] into whisper-rs `FullParams`.
    ///
    /// The returned value borrows `self.params.language`; both stay alive
    /// until `state.full()` returns.
    fn run_params(&self) -> FullParams<'_, '_> {
        use whisper_rs::SamplingStrategy as Ws;

        let strategy = match self.params.strategy {
            SamplingStrategy::Greedy { best_of } => Ws::Greedy { best_of },
            SamplingStrategy::BeamSearch { beam_size, patience } => {
                Ws::BeamSearch { beam_size, patience }
            }
        };

        let mut fp = FullParams::new(strategy);
        fp.set_language(match self.params.language.as_str() {
            "auto" => None,
            lang => Some(lang),
        });
        fp.set_n_threads(self.params.n_threads);
        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }
        fp
    }
}

/// Pull every decoded segment out of a finished run.
fn collect_segments(state: &WhisperState) -> Result<Vec<Segment>, SttError> {
    let count = state
        .full_n_segments()
        .map_err(|e| SttError::Transcription(e.to_string()))?;

    let mut segments = Vec::with_capacity(count as usize);
    for i in 0..count {
        let text = state
            .full_get_segment_text(i)
            .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
        // whisper reports centisecond timestamps.
        let start_ms = state.full_get_segment_t0(i).unwrap_or(0).max(0) as u64 * 10;
        let end_ms = state.full_get_segment_t1(i).unwrap_or(0).max(0) as u64 * 10;
        segments.push(Segment {
            text,
            start_ms,
            end_ms,
        });
    }
    Ok(segments)
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        self.transcribe_full(audio).map(|r| r.text)
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// Backend double that answers every call with a canned result, so engine
/// behavior can be tested without a model file on disk.
#[cfg(test)]
pub struct MockSttEngine {
    reply: Result<String, SttError>,
}

#[cfg(test)]
impl MockSttEngine {
    /// A mock whose every transcription succeeds with `text`.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
        }
    }

    /// A mock whose every transcription fails with `error`.
    pub fn failing(error: SttError) -> Self {
        Self { reply: Err(error) }
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        // Honour the empty-input contract so callers are tested against it.
        if audio.is_empty() {
            return Ok(String::new());
        }
        self.reply.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn second_of_silence() -> Vec<f32> {
        vec![0.0f32; 16_000]
    }

    #[test]
    fn mock_replies_with_fixed_text() {
        let stt = MockSttEngine::fixed("turn on the lights");
        assert_eq!(
            stt.transcribe(&second_of_silence()).unwrap(),
            "turn on the lights"
        );
    }

    #[test]
    fn mock_replies_with_fixed_error() {
        let stt = MockSttEngine::failing(SttError::Transcription("boom".into()));
        assert!(matches!(
            stt.transcribe(&second_of_silence()),
            Err(SttError::Transcription(_))
        ));
    }

    #[test]
    fn mock_keeps_the_empty_input_contract() {
        // Even a failing mock must return "" for empty input.
        let stt = MockSttEngine::failing(SttError::Transcription("boom".into()));
        assert_eq!(stt.transcribe(&[]).unwrap(), "");
    }

    #[test]
    fn load_without_model_file_reports_not_found() {
        let result = WhisperEngine::load("/nonexistent/model.bin", TranscribeParams::default());
        assert!(
            matches!(result, Err(SttError::ModelNotFound(_))),
            "expected ModelNotFound, got {result:?}"
        );
    }

    #[test]
    fn not_found_error_names_the_path() {
        let e = SttError::ModelNotFound("/models/ggml-base.en.bin".into());
        assert!(e.to_string().contains("/models/ggml-base.en.bin"));
    }

    #[test]
    fn trait_object_dispatch_works() {
        // Also the object-safety check: this only compiles if the trait can
        // be boxed.
        let stt: Box<dyn SttEngine> = Box::new(MockSttEngine::fixed("ok"));
        assert_eq!(stt.transcribe(&second_of_silence()).unwrap(), "ok");
    }
}
