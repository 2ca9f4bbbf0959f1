//! Energy-based voice-activity detection.
//!
//! [`VadDetector`] classifies 30 ms frames by RMS level and trims a clip to
//! the span between its first and last voiced frame.  Cutting the quiet
//! edges shortens the inference pass and stops the model from inventing
//! text over silence.

/// RMS threshold at sensitivity 0 — the least sensitive setting the
/// [`VadDetector::from_sensitivity`] mapping can produce.  0.04 suits a
/// loud room; quiet-room speech sits well above 0.01.
const MAX_RMS_THRESHOLD: f32 = 0.04;

/// Root-mean-square level of one frame.
fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
    mean_sq.sqrt()
}

// ---------------------------------------------------------------------------
// VadDetector
// ---------------------------------------------------------------------------

/// Trims leading and trailing silence from a mono clip.
///
/// ```rust
/// use speech_capture::audio::VadDetector;
///
/// let vad = VadDetector::new(0.01);
///
/// let mut clip = vec![0.0_f32; 480];      // 30 ms quiet
/// clip.extend(vec![0.5_f32; 480]);        // 30 ms speech
/// clip.extend(vec![0.0_f32; 480]);        // 30 ms quiet
///
/// assert_eq!(vad.trim_silence(&clip).len(), 480);
/// ```
pub struct VadDetector {
    /// Frames whose RMS stays at or below this are silence.
    rms_threshold: f32,
    /// Samples per classification frame; 480 = 30 ms at 16 kHz.
    frame_size: usize,
}

impl VadDetector {
    /// Detector with an explicit RMS threshold in `[0.0, 1.0]`.
    ///
    /// 0.01 works for quiet microphones; noisy environments want
    /// 0.02–0.05.
    pub fn new(rms_threshold: f32) -> Self {
        Self {
            rms_threshold,
            frame_size: 480,
        }
    }

    /// Detector derived from the user-facing sensitivity setting.
    ///
    /// `sensitivity` lives in `[0.0, 1.0]` (default 0.5) and is clamped.
    /// Higher sensitivity lets quieter audio count as voice, so the
    /// threshold runs inversely: `(1 - sensitivity) * 0.04`, i.e. 0.02 RMS
    /// at the default.
    pub fn from_sensitivity(sensitivity: f32) -> Self {
        Self::new((1.0 - sensitivity.clamp(0.0, 1.0)) * MAX_RMS_THRESHOLD)
    }

    /// Detector with a non-default frame size, for rates other than 16 kHz.
    ///
    /// # Panics
    ///
    /// Panics if `frame_size == 0`.
    pub fn with_frame_size(rms_threshold: f32, frame_size: usize) -> Self {
        assert!(frame_size > 0, "frame_size must be > 0");
        Self {
            rms_threshold,
            frame_size,
        }
    }

    /// The RMS threshold in effect.
    pub fn threshold(&self) -> f32 {
        self.rms_threshold
    }

    /// Cut `audio` down to the span from its first through its last voiced
    /// frame.
    ///
    /// Returns a sub-slice — no copy.  A clip with no voiced frame at all
    /// (including an empty clip) comes back zero-length.
    pub fn trim_silence<'a>(&self, audio: &'a [f32]) -> &'a [f32] {
        let voiced: Vec<bool> = audio
            .chunks(self.frame_size)
            .map(|frame| rms(frame) > self.rms_threshold)
            .collect();

        let Some(first) = voiced.iter().position(|&v| v) else {
            return &audio[..0];
        };
        let last = voiced.iter().rposition(|&v| v).unwrap_or(first);

        let start = first * self.frame_size;
        let end = ((last + 1) * self.frame_size).min(audio.len());
        &audio[start..end]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Silence, then speech at 0.5 amplitude, then silence again.
    fn clip(quiet_head: usize, speech: usize, quiet_tail: usize) -> Vec<f32> {
        let mut v = vec![0.0_f32; quiet_head];
        v.extend(vec![0.5_f32; speech]);
        v.extend(vec![0.0_f32; quiet_tail]);
        v
    }

    #[test]
    fn cuts_both_quiet_edges() {
        let vad = VadDetector::new(0.01);
        assert_eq!(vad.trim_silence(&clip(480, 480, 480)).len(), 480);
    }

    #[test]
    fn pure_silence_trims_to_nothing() {
        let vad = VadDetector::new(0.01);
        assert!(vad.trim_silence(&vec![0.0_f32; 1440]).is_empty());
    }

    #[test]
    fn pure_speech_is_untouched() {
        let vad = VadDetector::new(0.01);
        let speech = vec![0.5_f32; 960];
        assert_eq!(vad.trim_silence(&speech).len(), speech.len());
    }

    #[test]
    fn empty_clip_stays_empty() {
        assert!(VadDetector::new(0.01).trim_silence(&[]).is_empty());
    }

    #[test]
    fn interior_silence_survives() {
        // speech / silence / speech: the gap between voiced frames stays.
        let mut audio = clip(0, 480, 480);
        audio.extend(vec![0.5_f32; 480]);
        let vad = VadDetector::new(0.01);
        assert_eq!(vad.trim_silence(&audio).len(), 1440);
    }

    #[test]
    fn reports_its_threshold() {
        assert!((VadDetector::new(0.05).threshold() - 0.05).abs() < 1e-7);
    }

    // ---- sensitivity mapping -----------------------------------------------

    #[test]
    fn default_sensitivity_gives_midrange_threshold() {
        let vad = VadDetector::from_sensitivity(0.5);
        assert!((vad.threshold() - 0.02).abs() < 1e-7);
    }

    #[test]
    fn full_sensitivity_keeps_quiet_audio() {
        let vad = VadDetector::from_sensitivity(1.0);
        assert!(vad.threshold() < 1e-7);
        let faint = vec![0.001_f32; 960];
        assert_eq!(vad.trim_silence(&faint).len(), faint.len());
    }

    #[test]
    fn out_of_range_sensitivity_is_clamped() {
        assert!(VadDetector::from_sensitivity(7.0).threshold() < 1e-7);
        let floor = VadDetector::from_sensitivity(-3.0);
        assert!((floor.threshold() - MAX_RMS_THRESHOLD).abs() < 1e-7);
    }

    // ---- frame size --------------------------------------------------------

    #[test]
    fn honours_custom_frame_size() {
        let vad = VadDetector::with_frame_size(0.01, 160);
        assert_eq!(vad.trim_silence(&clip(160, 160, 160)).len(), 160);
    }

    #[test]
    #[should_panic(expected = "frame_size must be > 0")]
    fn rejects_zero_frame_size() {
        VadDetector::with_frame_size(0.01, 0);
    }
}
