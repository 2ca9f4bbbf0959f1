//! Downmix and sample-rate conversion.
//!
//! Capture runs at whatever rate and channel layout the device reports;
//! the model wants 16 kHz mono.  [`stereo_to_mono`] collapses interleaved
//! channels by averaging, [`resample`] converts between rates with linear
//! interpolation — sufficient for speech input, with `rubato`'s
//! `SincFixedIn` as the known upgrade if quality ever matters.

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Collapse interleaved multi-channel audio to mono, averaging each frame.
///
/// Output length is `samples.len() / channels`.  Mono input is returned as
/// an owned copy; `channels == 0` yields an empty vector.
///
/// ```rust
/// use speech_capture::audio::stereo_to_mono;
///
/// let interleaved = [0.8_f32, -0.8, 0.3, 0.1]; // L R L R
/// let mono = stereo_to_mono(&interleaved, 2);
/// assert!((mono[0]).abs() < 1e-6);
/// assert!((mono[1] - 0.2).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels == 0 {
        return Vec::new();
    }
    if channels == 1 {
        return samples.to_vec();
    }
    let width = channels as usize;
    samples
        .chunks_exact(width)
        .map(|frame| frame.iter().copied().sum::<f32>() / width as f32)
        .collect()
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Convert `samples` from `source_rate` to `target_rate` Hz by linear
/// interpolation.
///
/// Matching rates (and empty input) pass through unchanged.  Output length
/// is `ceil(len * target / source)`.
///
/// ```rust
/// use speech_capture::audio::resample;
///
/// let captured = vec![0.25_f32; 480]; // 10 ms @ 48 kHz
/// assert_eq!(resample(&captured, 48_000, 16_000).len(), 160);
/// ```
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    // Position advance in the source per output sample.
    let step = source_rate as f64 / target_rate as f64;
    let out_len = (samples.len() as f64 / step).ceil() as usize;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let base = pos as usize;
            let t = (pos - base as f64) as f32;
            match (samples.get(base), samples.get(base + 1)) {
                (Some(&a), Some(&b)) => a + (b - a) * t,
                (Some(&a), None) => a,
                _ => 0.0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
