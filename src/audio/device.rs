//! Microphone capture via `cpal`.
//!
//! [`AudioDevice::open`] resolves an input device and its native stream
//! configuration; [`AudioDevice::start`] builds the live stream.  The cpal
//! callback pushes each hardware buffer over a channel as a [`Frame`], so
//! consumers get a plain blocking [`read`](InputStream::read) instead of a
//! callback.  Dropping the stream (or the [`StreamHandle`] half after
//! [`split`](InputStream::split)) releases the device — close is the drop,
//! idempotent by construction.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One hardware buffer as handed over by the cpal callback.
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]` at the device's native
/// rate; [`crate::audio::stereo_to_mono`] and [`crate::audio::resample`]
/// bring them to the model format.
#[derive(Debug, Clone)]
pub struct Frame {
    pub samples: Vec<f32>,
    /// Rate of this frame, Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Capture subsystem failures.  Surfaced as-is; retrying is the caller's
/// decision.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("audio host has no default input device")]
    NoDevice,

    #[error("no input device named \"{0}\"")]
    DeviceNotFound(String),

    #[error("could not enumerate input devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("device reports no usable input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("could not build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("could not start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// StreamHandle / InputStream
// ---------------------------------------------------------------------------

/// RAII guard over the live `cpal::Stream`; dropping it stops capture and
/// frees the device.  Not `Send` on every platform, so it stays on the
/// thread that opened it.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

/// A running capture stream: the [`StreamHandle`] plus the receiving end of
/// the frame channel.
pub struct InputStream {
    handle: StreamHandle,
    frames: Receiver<Frame>,
}

impl InputStream {
    /// Wait up to `timeout` for the next frame.
    ///
    /// `Disconnected` means the stream was closed; `Timeout` bounds the wait
    /// so a caller polling a stop flag is stuck for at most one interval.
    pub fn read(&self, timeout: Duration) -> Result<Frame, RecvTimeoutError> {
        self.frames.recv_timeout(timeout)
    }

    /// Separate the thread-affine stream guard from the `Send` frame
    /// receiver, so a worker thread can consume frames while the guard
    /// stays behind.
    pub fn split(self) -> (StreamHandle, Receiver<Frame>) {
        (self.handle, self.frames)
    }
}

// ---------------------------------------------------------------------------
// AudioDevice
// ---------------------------------------------------------------------------

/// An input device plus the stream configuration it prefers.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use speech_capture::audio::AudioDevice;
///
/// let device = AudioDevice::open(None).unwrap();
/// let stream = device.start().unwrap();
/// while let Ok(frame) = stream.read(Duration::from_millis(200)) {
///     println!("{} samples @ {} Hz", frame.samples.len(), frame.sample_rate);
/// }
/// ```
pub struct AudioDevice {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl AudioDevice {
    /// Resolve an input device — by exact name, or the system default when
    /// `preferred` is `None` — and adopt its native stream configuration.
    ///
    /// Capture stays at the device rate; forcing a specific rate is a
    /// common way for stream creation to fail on real hardware, so format
    /// conversion happens downstream instead.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] / [`CaptureError::DeviceNotFound`] when
    /// resolution fails, [`CaptureError::DefaultConfig`] when the device
    /// cannot report a configuration.
    pub fn open(preferred: Option<&str>) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = match preferred {
            Some(name) => host
                .input_devices()?
                .find(|d| d.name().is_ok_and(|n| n == name))
                .ok_or_else(|| CaptureError::DeviceNotFound(name.to_string()))?,
            None => host.default_input_device().ok_or(CaptureError::NoDevice)?,
        };

        let native = device.default_input_config()?;
        Ok(Self {
            sample_rate: native.sample_rate().0,
            channels: native.channels(),
            config: native.into(),
            device,
        })
    }

    /// Build and play the input stream.
    ///
    /// The callback runs on cpal's audio thread and must never panic, so a
    /// send to a dropped receiver is simply discarded.
    ///
    /// # Errors
    ///
    /// [`CaptureError::BuildStream`] / [`CaptureError::PlayStream`] when the
    /// platform rejects the configuration.
    pub fn start(&self) -> Result<InputStream, CaptureError> {
        let (tx, frames) = mpsc::channel();
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(Frame {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                });
            },
            |err: cpal::StreamError| log::error!("cpal stream error: {err}"),
            None,
        )?;
        stream.play()?;

        Ok(InputStream {
            handle: StreamHandle { _stream: stream },
            frames,
        })
    }

    /// Native capture rate, Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channels per [`Frame`].
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_cross_threads() {
        // Frame travels over the channel into the capture thread.
        fn assert_send<T: Send>() {}
        assert_send::<Frame>();
    }

    #[test]
    fn missing_device_error_carries_the_name() {
        let e = CaptureError::DeviceNotFound("USB Mic".into());
        assert!(e.to_string().contains("USB Mic"));
    }

    /// The capture loop distinguishes "no frame yet" from "stream closed";
    /// pin the channel semantics it depends on.
    #[test]
    fn quiet_channel_times_out_then_disconnects() {
        let (tx, frames) = mpsc::channel::<Frame>();
        assert!(matches!(
            frames.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Timeout)
        ));
        drop(tx);
        assert!(matches!(
            frames.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Disconnected)
        ));
    }
}
