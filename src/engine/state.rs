//! Engine lifecycle state.

// ---------------------------------------------------------------------------
// RecordingState
// ---------------------------------------------------------------------------

/// Lifecycle states of a [`crate::engine::SpeechEngine`].
///
/// ```text
/// Uninitialized ──init() ok──▶ Ready ──start_recording()──▶ Recording
///                                ▲                              │
///                                └───────stop_recording()───────┘
/// ```
///
/// `init()` is the only way out of `Uninitialized`; a failed load leaves the
/// state untouched.  `Recording` exists only while the capture thread is
/// alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// No model loaded yet — transcription and recording are unavailable.
    #[default]
    Uninitialized,

    /// Model loaded, no capture in progress.
    Ready,

    /// The capture thread is pulling frames into the buffer.
    Recording,
}

impl RecordingState {
    /// Returns `true` when a capture session is in progress.
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }

    /// A short human-readable label for log and status output.
    pub fn label(&self) -> &'static str {
        match self {
            RecordingState::Uninitialized => "Uninitialized",
            RecordingState::Ready => "Ready",
            RecordingState::Recording => "Recording",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_uninitialized() {
        assert_eq!(RecordingState::default(), RecordingState::Uninitialized);
    }

    #[test]
    fn only_recording_reports_recording() {
        assert!(!RecordingState::Uninitialized.is_recording());
        assert!(!RecordingState::Ready.is_recording());
        assert!(RecordingState::Recording.is_recording());
    }

    #[test]
    fn labels() {
        assert_eq!(RecordingState::Uninitialized.label(), "Uninitialized");
        assert_eq!(RecordingState::Ready.label(), "Ready");
        assert_eq!(RecordingState::Recording.label(), "Recording");
    }
}
