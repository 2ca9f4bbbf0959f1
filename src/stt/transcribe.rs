//! Inference parameters and transcription results.
//!
//! A [`TranscribeParams`] value is fixed at engine construction and applied
//! to every run; [`TranscriptionResult`] carries the transcript together
//! with Whisper's per-segment timing.

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// Settings applied to each Whisper inference run.
///
/// The defaults target English dictation with greedy decoding:
///
/// ```
/// use speech_capture::stt::{SamplingStrategy, TranscribeParams};
///
/// let params = TranscribeParams::default();
/// assert_eq!(params.language, "en");
/// assert_eq!(params.strategy, SamplingStrategy::Greedy { best_of: 1 });
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 code of the expected speech language, or `"auto"` for
    /// Whisper's language detection.
    pub language: String,

    /// Decoding strategy.  Greedy keeps latency low; beam search trades
    /// latency for accuracy.
    pub strategy: SamplingStrategy,

    /// CPU threads handed to the inference pass.
    pub n_threads: i32,

    /// Keep Whisper's progress chatter off stderr.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "en".into(),
            strategy: SamplingStrategy::default(),
            n_threads: inference_threads(),
            suppress_progress: true,
        }
    }
}

/// Thread count for the inference pass: all available cores, capped at 8
/// (Whisper gains little beyond that).
pub(crate) fn inference_threads() -> i32 {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    cores.min(8) as i32
}

// ---------------------------------------------------------------------------
// SamplingStrategy
// ---------------------------------------------------------------------------

/// Owned, `Clone`-able mirror of `whisper_rs::SamplingStrategy`.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    /// Single-pass decoding; `best_of` candidate tokens per step, 1 is
    /// fastest.
    Greedy { best_of: i32 },
    /// Beam search with `beam_size` parallel beams; `patience` ≥ 1.0 is
    /// standard beam search.
    BeamSearch { beam_size: i32, patience: f32 },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Greedy { best_of: 1 }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A completed transcription.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// The whitespace-trimmed transcript.
    pub text: String,
    /// Time-aligned segments in audio order.
    pub segments: Vec<Segment>,
    /// Wall-clock inference time in milliseconds.
    pub duration_ms: u128,
}

/// One time-aligned chunk of transcript text.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    /// Offset of the segment start from the beginning of the audio, ms.
    pub start_ms: u64,
    /// Offset of the segment end, ms.
    pub end_ms: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_english_greedy() {
        let p = TranscribeParams::default();
        assert_eq!(p.language, "en");
        assert_eq!(p.strategy, SamplingStrategy::Greedy { best_of: 1 });
        assert!(p.suppress_progress);
    }

    #[test]
    fn inference_threads_within_bounds() {
        let t = inference_threads();
        assert!((1..=8).contains(&t));
    }

    #[test]
    fn struct_update_overrides_one_field() {
        let p = TranscribeParams {
            language: "auto".into(),
            ..TranscribeParams::default()
        };
        assert_eq!(p.language, "auto");
        assert_eq!(p.n_threads, inference_threads());
    }
}
