//! `SpeechEngine` — top-level lifecycle controller.
//!
//! ## Lifecycle
//!
//! ```text
//! SpeechEngine::new(config)            state = Uninitialized
//!     └─► init(model_path)             model loaded, state = Ready
//!         └─► start_recording()        device open, capture thread spawned,
//!             │                        state = Recording
//!             └─► stop_recording()     thread joined, device closed,
//!                                      state = Ready (buffer retained)
//! ```
//!
//! `transcribe_buffer()` drains everything captured since the last drain and
//! runs inference on it; `transcribe_file()` decodes a WAV file and runs
//! inference directly, independent of the capture path.
//!
//! ## Threading
//!
//! One capture thread exists per recording session.  It owns the receiving
//! end of the frame channel and touches nothing but the [`CaptureBuffer`]
//! and the shared stop flag.  The `cpal::Stream` guard is not `Send` on
//! every platform, so it stays with the engine on the controlling thread.
//! `stop_recording()` joins the thread; the join is bounded because the
//! thread's blocking read times out every [`READ_TIMEOUT`].
//!
//! Lifecycle calls take `&mut self`, so concurrent `start`/`stop` races are
//! unrepresentable; the capture thread itself never mutates engine state.

pub mod state;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::audio::{
    resample, stereo_to_mono, AudioDevice, CaptureBuffer, CaptureError, Frame, StreamHandle,
    VadDetector,
};
use crate::config::AppConfig;
use crate::stt::{SttEngine, SttError, TranscribeParams, WavError, WhisperEngine};

pub use state::RecordingState;

/// Upper bound on one blocking read inside the capture thread, and therefore
/// on how long `stop_recording()` can wait for the thread to notice the stop
/// flag.
const READ_TIMEOUT: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// All errors surfaced by [`SpeechEngine`].
///
/// Every failure leaves the engine in the state it was in before the call —
/// a failed `init` stays `Uninitialized`, a failed `start_recording` stays
/// `Ready`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A transcription or recording operation was attempted before a
    /// successful `init()`.
    #[error("speech model not loaded — call init() first")]
    NotInitialized,

    /// `start_recording()` was called while a capture session is active.
    #[error("recording is already in progress")]
    AlreadyRecording,

    /// The audio capture subsystem failed (no device, stream rejected, …).
    #[error(transparent)]
    Device(#[from] CaptureError),

    /// Model load or inference failure.
    #[error(transparent)]
    Stt(#[from] SttError),

    /// The input file could not be decoded.
    #[error(transparent)]
    Wav(#[from] WavError),
}

// ---------------------------------------------------------------------------
// CaptureSession
// ---------------------------------------------------------------------------

/// A live recording session: the stream guard (kept on the controlling
/// thread) plus the capture thread's join handle.
struct CaptureSession {
    /// RAII guard for the cpal stream; dropping it closes the device and
    /// disconnects the frame channel.  `None` when frames come from an
    /// external source (tests).
    stream: Option<StreamHandle>,
    worker: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// SpeechEngine
// ---------------------------------------------------------------------------

/// The speech capture and transcription engine.
///
/// Owns the model context, the shared capture buffer, and (while recording)
/// the audio device and capture thread.  The capture thread is always joined
/// before the engine is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use speech_capture::config::AppConfig;
/// use speech_capture::engine::SpeechEngine;
///
/// let mut engine = SpeechEngine::new(AppConfig::default());
/// engine.init("models/ggml-base.en.bin".as_ref()).unwrap();
///
/// engine.start_recording().unwrap();
/// std::thread::sleep(Duration::from_secs(3));
/// engine.stop_recording();
///
/// println!("{}", engine.transcribe_buffer().unwrap());
/// ```
pub struct SpeechEngine {
    config: AppConfig,
    /// Loaded model context.  `Some` exactly when the engine has left
    /// `Uninitialized`; there is no half-loaded in-between.
    stt: Option<Box<dyn SttEngine>>,
    buffer: Arc<CaptureBuffer>,
    /// Stop signal shared with the capture thread.
    running: Arc<AtomicBool>,
    state: RecordingState,
    session: Option<CaptureSession>,
    vad: VadDetector,
}

impl SpeechEngine {
    /// Create an engine in the `Uninitialized` state.
    ///
    /// No device or model is touched until [`init`](Self::init) /
    /// [`start_recording`](Self::start_recording).
    pub fn new(config: AppConfig) -> Self {
        let vad = VadDetector::from_sensitivity(config.audio.sensitivity);
        Self {
            config,
            stt: None,
            buffer: Arc::new(CaptureBuffer::new()),
            running: Arc::new(AtomicBool::new(false)),
            state: RecordingState::Uninitialized,
            session: None,
            vad,
        }
    }

    /// Create an engine that is already `Ready`, backed by the given STT
    /// implementation instead of a Whisper model loaded from disk.
    ///
    /// This is the seam for substituting a deterministic fake in tests, and
    /// for callers that construct the model context themselves.
    pub fn with_engine(config: AppConfig, stt: Box<dyn SttEngine>) -> Self {
        let mut engine = Self::new(config);
        engine.stt = Some(stt);
        engine.state = RecordingState::Ready;
        engine
    }

    /// Load the Whisper model from `model_path`.
    ///
    /// Safe to call again once loaded — the second call is a no-op `Ok`
    /// (the underlying context cannot be re-initialised; build a new engine
    /// to switch models).  On failure the engine remains `Uninitialized`.
    ///
    /// # Errors
    ///
    /// [`SttError::ModelNotFound`] / [`SttError::ContextInit`] via
    /// [`EngineError::Stt`].
    pub fn init(&mut self, model_path: &Path) -> Result<(), EngineError> {
        if self.stt.is_some() {
            return Ok(());
        }

        let params = TranscribeParams {
            language: self.config.stt.language.clone(),
            ..TranscribeParams::default()
        };
        let whisper = WhisperEngine::load(model_path, params)?;

        self.stt = Some(Box::new(whisper));
        self.state = RecordingState::Ready;
        Ok(())
    }

    /// Open the audio device and start the capture thread.
    ///
    /// On success the state is `Recording` and subsequent
    /// [`is_recording`](Self::is_recording) calls observe `true`.  A device
    /// failure leaves the state at `Ready` — there is no observable
    /// half-recording state.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotInitialized`] before a successful `init()`.
    /// - [`EngineError::AlreadyRecording`] while a session is active.
    /// - [`EngineError::Device`] when the device cannot be opened.
    pub fn start_recording(&mut self) -> Result<(), EngineError> {
        match self.state {
            RecordingState::Uninitialized => return Err(EngineError::NotInitialized),
            RecordingState::Recording => return Err(EngineError::AlreadyRecording),
            RecordingState::Ready => {}
        }

        let device = AudioDevice::open(self.config.audio.input_device.as_deref())?;
        let stream = device.start()?;
        let (handle, frames) = stream.split();

        log::info!(
            "recording started ({} Hz, {} ch)",
            device.sample_rate(),
            device.channels()
        );
        self.begin_session(frames, Some(handle));
        Ok(())
    }

    /// Stop the capture session: signal the capture thread, close the
    /// device, and join the thread.
    ///
    /// Idempotent — calling without an active session is a safe no-op.
    /// Samples accumulated so far stay in the buffer for a later
    /// [`transcribe_buffer`](Self::transcribe_buffer).
    pub fn stop_recording(&mut self) {
        if self.state != RecordingState::Recording {
            return;
        }

        self.running.store(false, Ordering::SeqCst);

        if let Some(session) = self.session.take() {
            // Closing the device first disconnects the frame channel, so the
            // worker's blocking read returns immediately instead of waiting
            // out its timeout.
            drop(session.stream);
            if session.worker.join().is_err() {
                log::warn!("capture thread panicked");
            }
        }

        self.state = RecordingState::Ready;
        log::info!("recording stopped — {} samples buffered", self.buffer.len());
    }

    /// Non-blocking check: is a capture session in progress?
    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    /// Current lifecycle state (snapshot).
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Duration of audio currently buffered, in seconds.
    pub fn buffered_secs(&self) -> f32 {
        self.buffer.duration_secs(self.config.audio.sample_rate)
    }

    /// Drain the capture buffer and transcribe its contents.
    ///
    /// An empty buffer yields `Ok("")` without running the model — nothing
    /// recorded is a defined result, not an error.  When
    /// `AudioConfig::trim_silence` is set, leading/trailing silence is
    /// removed first; otherwise the model sees the exact drained samples.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotInitialized`] before `init()`;
    /// [`EngineError::Stt`] on inference failure.
    pub fn transcribe_buffer(&self) -> Result<String, EngineError> {
        let stt = self.stt.as_ref().ok_or(EngineError::NotInitialized)?;

        let samples = self.buffer.drain();
        if samples.is_empty() {
            return Ok(String::new());
        }

        let audio: &[f32] = if self.config.audio.trim_silence {
            self.vad.trim_silence(&samples)
        } else {
            &samples
        };
        if audio.is_empty() {
            return Ok(String::new());
        }

        log::debug!("transcribing {} buffered samples", audio.len());
        Ok(stt.transcribe(audio)?)
    }

    /// Decode a WAV file and transcribe it.
    ///
    /// Independent of the capture path: neither the buffer nor the recording
    /// state is touched.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotInitialized`] before `init()`;
    /// [`EngineError::Wav`] when the file cannot be decoded;
    /// [`EngineError::Stt`] on inference failure.
    pub fn transcribe_file(&self, path: &Path) -> Result<String, EngineError> {
        let stt = self.stt.as_ref().ok_or(EngineError::NotInitialized)?;

        let samples = crate::stt::read_wav(path, self.config.audio.sample_rate)?;
        if samples.is_empty() {
            return Ok(String::new());
        }

        log::debug!(
            "transcribing {} samples from {}",
            samples.len(),
            path.display()
        );
        Ok(stt.transcribe(&samples)?)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Spawn the capture thread over an already-open frame source and enter
    /// `Recording`.
    fn begin_session(&mut self, frames: Receiver<Frame>, stream: Option<StreamHandle>) {
        self.running.store(true, Ordering::SeqCst);

        let buffer = Arc::clone(&self.buffer);
        let running = Arc::clone(&self.running);
        let target_rate = self.config.audio.sample_rate;

        let worker = thread::Builder::new()
            .name("capture".into())
            .spawn(move || capture_loop(frames, buffer, running, target_rate))
            .expect("failed to spawn capture thread");

        self.session = Some(CaptureSession { stream, worker });
        self.state = RecordingState::Recording;
    }
}

impl Drop for SpeechEngine {
    /// The capture thread is joined, never abandoned.
    fn drop(&mut self) {
        self.stop_recording();
    }
}

// ---------------------------------------------------------------------------
// Capture thread body
// ---------------------------------------------------------------------------

/// Pull frames until the stop flag clears or the stream disconnects,
/// converting each to the target mono rate before appending.
///
/// The buffer and the stop flag are the only state shared with the engine.
fn capture_loop(
    frames: Receiver<Frame>,
    buffer: Arc<CaptureBuffer>,
    running: Arc<AtomicBool>,
    target_rate: u32,
) {
    while running.load(Ordering::SeqCst) {
        match frames.recv_timeout(READ_TIMEOUT) {
            Ok(frame) => {
                let mono = stereo_to_mono(&frame.samples, frame.channels);
                let samples = resample(&mono, frame.sample_rate, target_rate);
                buffer.append(&samples);
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    log::debug!("capture thread exiting");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
