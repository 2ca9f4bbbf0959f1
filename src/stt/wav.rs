//! WAV file decoding for the file-based transcription path.
//!
//! [`read_wav`] turns an uncompressed PCM WAV file into the 16 kHz mono
//! `f32` samples the STT engine expects: 16-bit integer samples are
//! normalised to `[-1.0, 1.0]`, stereo is downmixed by channel averaging,
//! and other sample rates are resampled.
//!
//! Decode failures are a separate error domain ([`WavError`]) from inference
//! failures, so callers can tell "bad file" apart from "model broke".

use std::path::Path;

use hound::{SampleFormat, WavReader};
use thiserror::Error;

use crate::audio::{resample, stereo_to_mono};

// ---------------------------------------------------------------------------
// WavError
// ---------------------------------------------------------------------------

/// Errors from opening or decoding a WAV file.
#[derive(Debug, Error)]
pub enum WavError {
    /// The file could not be opened, is not a RIFF/WAVE container, or its
    /// sample data is truncated.  Covers missing files (I/O error).
    #[error("failed to read WAV file: {0}")]
    Decode(#[from] hound::Error),

    /// More than two channels — only mono and stereo input is supported.
    #[error("unsupported channel count: {0} (expected mono or stereo)")]
    UnsupportedChannels(u16),

    /// A PCM encoding other than 16-bit integer or 32-bit float.
    #[error("unsupported sample format: {bits}-bit {format:?}")]
    UnsupportedFormat {
        bits: u16,
        format: SampleFormat,
    },
}

// ---------------------------------------------------------------------------
// read_wav
// ---------------------------------------------------------------------------

/// Read a PCM WAV file and convert it to `target_rate` Hz mono `f32`.
///
/// Supported encodings: 16-bit integer and 32-bit float, mono or stereo,
/// any sample rate (resampled to `target_rate`).
///
/// # Errors
///
/// [`WavError::Decode`] when the file is missing or not a decodable WAV;
/// [`WavError::UnsupportedChannels`] / [`WavError::UnsupportedFormat`] for
/// well-formed files the engine cannot consume.
pub fn read_wav(path: impl AsRef<Path>, target_rate: u32) -> Result<Vec<f32>, WavError> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    log::debug!(
        "reading WAV {}: {} Hz, {} ch, {}-bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    if !(1..=2).contains(&spec.channels) {
        return Err(WavError::UnsupportedChannels(spec.channels));
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32_768.0))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(WavError::UnsupportedFormat { bits, format });
        }
    };

    let mono = stereo_to_mono(&interleaved, spec.channels);
    Ok(resample(&mono, spec.sample_rate, target_rate))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::io::Write;
    use tempfile::tempdir;

    fn write_wav_i16(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).expect("create wav");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }

    #[test]
    fn reads_mono_16k_pcm16() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("mono.wav");
        write_wav_i16(&path, 16_000, 1, &[0, 16_384, -16_384, 32_767]);

        let samples = read_wav(&path, 16_000).expect("read");
        assert_eq!(samples.len(), 4);
        assert!((samples[0] - 0.0).abs() < 1e-6);
        assert!((samples[1] - 0.5).abs() < 1e-4);
        assert!((samples[2] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn downmixes_stereo_to_mono() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("stereo.wav");
        // Two L/R frames: (+0.5, -0.5) averages to 0, (0.25, 0.25) stays 0.25.
        write_wav_i16(&path, 16_000, 2, &[16_384, -16_384, 8_192, 8_192]);

        let samples = read_wav(&path, 16_000).expect("read");
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 0.0).abs() < 1e-4);
        assert!((samples[1] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn resamples_48k_to_16k() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("48k.wav");
        write_wav_i16(&path, 48_000, 1, &vec![8_192_i16; 480]); // 10 ms

        let samples = read_wav(&path, 16_000).expect("read");
        assert_eq!(samples.len(), 160); // 10 ms @ 16 kHz
    }

    #[test]
    fn reads_float_wav() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).expect("create wav");
        for &s in &[0.0_f32, 0.5, -0.5] {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");

        let samples = read_wav(&path, 16_000).expect("read");
        assert_eq!(samples, vec![0.0, 0.5, -0.5]);
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = read_wav("/nonexistent/audio.wav", 16_000).unwrap_err();
        assert!(matches!(err, WavError::Decode(_)));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("not-a-wav.wav");
        let mut f = std::fs::File::create(&path).expect("create");
        f.write_all(b"this is definitely not RIFF data").expect("write");

        let err = read_wav(&path, 16_000).unwrap_err();
        assert!(matches!(err, WavError::Decode(_)));
    }

    #[test]
    fn eight_bit_pcm_is_unsupported() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("8bit.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).expect("create wav");
        for s in [0_i8, 64, -64] {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");

        let err = read_wav(&path, 16_000).unwrap_err();
        assert!(matches!(
            err,
            WavError::UnsupportedFormat { bits: 8, .. }
        ));
    }

    #[test]
    fn empty_data_chunk_yields_empty_samples() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("empty.wav");
        write_wav_i16(&path, 16_000, 1, &[]);

        let samples = read_wav(&path, 16_000).expect("read");
        assert!(samples.is_empty());
    }
}
