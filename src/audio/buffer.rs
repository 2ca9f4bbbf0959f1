//! Thread-safe growable buffer for `f32` audio samples.
//!
//! [`CaptureBuffer`] is the single point of shared mutable state between the
//! capture thread (producer) and the controlling thread (consumer).  All
//! mutation happens under one internal mutex, so a [`drain`](CaptureBuffer::drain)
//! always observes the exact concatenation of every `append` since the
//! previous drain — no partial writes, no lost samples.
//!
//! # Example
//!
//! ```rust
//! use speech_capture::audio::CaptureBuffer;
//!
//! let buf = CaptureBuffer::new();
//! buf.append(&[1.0, 2.0]);
//! buf.append(&[3.0]);
//! assert_eq!(buf.drain(), vec![1.0, 2.0, 3.0]);
//! assert!(buf.is_empty());
//! ```

use std::sync::Mutex;

// ---------------------------------------------------------------------------
// CaptureBuffer
// ---------------------------------------------------------------------------

/// Growable, mutex-guarded sample accumulator.
///
/// Unlike a fixed ring buffer, `CaptureBuffer` never discards samples — a
/// recording session is bounded by the user pressing stop, and the consumer
/// takes everything at once via [`drain`](Self::drain).
///
/// Every method takes `&self`; the buffer is safe to share between threads
/// behind an `Arc` without any external locking.
pub struct CaptureBuffer {
    samples: Mutex<Vec<f32>>,
}

impl CaptureBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            samples: Mutex::new(Vec::new()),
        }
    }

    /// Create an empty buffer with pre-allocated capacity.
    ///
    /// Pre-allocating for the expected recording length (e.g. `16_000 * 60`
    /// for one minute at 16 kHz) avoids reallocation inside the capture
    /// thread's critical section.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append `data` to the tail of the buffer.
    ///
    /// The critical section is a single `extend_from_slice`, so the producer
    /// is never blocked for longer than one memcpy.
    pub fn append(&self, data: &[f32]) {
        self.samples.lock().unwrap().extend_from_slice(data);
    }

    /// Atomically take the full contents and empty the buffer.
    ///
    /// The returned vector is exactly the concatenation of all `append` calls
    /// since the previous `drain`/`clear`, in call order.
    pub fn drain(&self) -> Vec<f32> {
        std::mem::take(&mut *self.samples.lock().unwrap())
    }

    /// Discard all samples without returning them.
    pub fn clear(&self) {
        self.samples.lock().unwrap().clear();
    }

    /// Number of samples currently stored.
    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    /// Returns `true` when the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.lock().unwrap().is_empty()
    }

    /// Current buffered duration in seconds, assuming `sample_rate` Hz mono.
    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.len() as f32 / sample_rate as f32
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
