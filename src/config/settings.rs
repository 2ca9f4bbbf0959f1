//! Engine configuration and its TOML persistence.
//!
//! [`AppConfig`] is the one configuration value the engine consumes; it
//! round-trips through `settings.toml` so the settings layer above this
//! crate only ever hands over plain data.

use std::io;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Which model to load and which language to expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Catalogue id resolved through [`crate::stt::ModelPaths`],
    /// e.g. `"whisper-base.en"`.
    pub model: String,
    /// ISO-639-1 speech language, or `"auto"` for detection.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "whisper-base.en".into(),
            language: "en".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Capture and voice-activity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Rate the model consumes, Hz.  Whisper wants 16 000.
    pub sample_rate: u32,
    /// Voice-activity sensitivity in `[0.0, 1.0]`; higher treats quieter
    /// audio as voice.
    pub sensitivity: f32,
    /// Strip quiet edges from the buffer before inference.  Off by default
    /// so the model sees exactly what was captured.
    pub trim_silence: bool,
    /// Capture device by name; `None` takes the system default.
    pub input_device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            sensitivity: 0.5,
            trim_silence: false,
            input_device: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Root of `settings.toml`.
///
/// ```rust,no_run
/// use speech_capture::config::AppConfig;
///
/// let mut config = AppConfig::load().unwrap();
/// config.audio.sensitivity = 0.7;
/// config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub stt: SttConfig,
    pub audio: AudioConfig,
}

impl AppConfig {
    /// Read the platform `settings.toml`; a missing file is the first-run
    /// case and yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// [`load`](Self::load) against an explicit path (test seam).
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the platform `settings.toml`, creating directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// [`save`](Self::save) against an explicit path (test seam).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
