//! Command-line entry point — record-and-transcribe demo.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Resolve the configured GGML model file on disk.
//! 4. Load the model into a [`SpeechEngine`].
//! 5. With a file argument: transcribe that WAV and print the text.
//!    Without arguments: record from the microphone for a few seconds,
//!    then transcribe the captured buffer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};

use speech_capture::config::{AppConfig, AppPaths};
use speech_capture::engine::SpeechEngine;
use speech_capture::stt::{find_model_by_id, ModelPaths};

/// Microphone demo length.
const RECORD_SECS: u64 = 5;

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("speech-capture starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Model resolution
    let model_path = resolve_model_path(&config)?;

    // 4. Engine
    let mut engine = SpeechEngine::new(config);
    engine
        .init(&model_path)
        .with_context(|| format!("loading model {}", model_path.display()))?;

    // 5. Transcribe
    match std::env::args().nth(1) {
        Some(file) => {
            let text = engine.transcribe_file(Path::new(&file))?;
            println!("{text}");
        }
        None => {
            engine.start_recording()?;
            log::info!("recording for {RECORD_SECS} s — speak now");
            std::thread::sleep(Duration::from_secs(RECORD_SECS));
            engine.stop_recording();
            log::info!("captured {:.1} s of audio", engine.buffered_secs());

            let text = engine.transcribe_buffer()?;
            println!("{text}");
        }
    }

    Ok(())
}

/// Map the configured model id onto a file under the models directory.
fn resolve_model_path(config: &AppConfig) -> Result<PathBuf> {
    let paths = ModelPaths::from_app_paths(&AppPaths::new());

    let Some(model) = find_model_by_id(&config.stt.model) else {
        bail!("unknown model id \"{}\" in settings", config.stt.model);
    };

    let path = paths.model_path(model);
    if !path.exists() {
        bail!(
            "model file {} not found — download {} from {}",
            path.display(),
            model.file_name,
            model.source_url
        );
    }
    Ok(path)
}
