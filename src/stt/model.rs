//! GGML model catalogue and on-disk lookup.
//!
//! The engine is tested against the standard whisper.cpp GGML builds listed
//! in [`WHISPER_MODELS`]; [`ModelPaths`] maps a catalogue entry to its file
//! under the models directory resolved by [`crate::config::AppPaths`].

use std::path::PathBuf;

use crate::config::AppPaths;

// ---------------------------------------------------------------------------
// ModelSize
// ---------------------------------------------------------------------------

/// Capacity tier of a Whisper build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSize {
    /// Fastest, least accurate (~75 MB on disk).
    Tiny,
    /// The speed/accuracy balance most setups want (~142 MB).
    Base,
    /// Noticeably better accuracy at real latency cost (~466 MB).
    Small,
}

// ---------------------------------------------------------------------------
// ModelInfo
// ---------------------------------------------------------------------------

/// One catalogue entry: everything needed to identify, locate, and fetch a
/// GGML file.
#[derive(Debug)]
pub struct ModelInfo {
    /// Identifier used in `SttConfig::model`, e.g. `"whisper-base.en"`.
    pub id: &'static str,
    /// Name shown to users.
    pub display_name: &'static str,
    pub size: ModelSize,
    /// File name under the models directory, e.g. `"ggml-base.en.bin"`.
    pub file_name: &'static str,
    /// Rough download size, MB.
    pub file_size_mb: u64,
    /// Where to fetch the GGML file.
    pub source_url: &'static str,
    /// `"en"` for English-only builds, `"multilingual"` otherwise.
    pub language: &'static str,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// The whisper.cpp GGML builds this engine knows about.
///
/// For English speech the `.en` builds beat same-size multilingual ones on
/// both accuracy and footprint.
pub const WHISPER_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "whisper-tiny.en",
        display_name: "Whisper Tiny (English)",
        size: ModelSize::Tiny,
        file_name: "ggml-tiny.en.bin",
        file_size_mb: 75,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
        language: "en",
    },
    ModelInfo {
        id: "whisper-base.en",
        display_name: "Whisper Base (English)",
        size: ModelSize::Base,
        file_name: "ggml-base.en.bin",
        file_size_mb: 142,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
        language: "en",
    },
    ModelInfo {
        id: "whisper-small.en",
        display_name: "Whisper Small (English)",
        size: ModelSize::Small,
        file_name: "ggml-small.en.bin",
        file_size_mb: 466,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
        language: "en",
    },
    ModelInfo {
        id: "whisper-base",
        display_name: "Whisper Base (Multilingual)",
        size: ModelSize::Base,
        file_name: "ggml-base.bin",
        file_size_mb: 142,
        source_url: "https://huggingface.co/ggerganov/whisper.cpp",
        language: "multilingual",
    },
];

/// The catalogue entry used when the configuration names nothing else.
pub fn default_model() -> &'static ModelInfo {
    find_model_by_id("whisper-base.en").expect("default model must be in the catalogue")
}

/// Look a catalogue entry up by its `id`.
pub fn find_model_by_id(id: &str) -> Option<&'static ModelInfo> {
    WHISPER_MODELS.iter().find(|m| m.id == id)
}

// ---------------------------------------------------------------------------
// ModelPaths
// ---------------------------------------------------------------------------

/// Maps catalogue entries onto files in a models directory.
///
/// ```rust,no_run
/// use speech_capture::config::AppPaths;
/// use speech_capture::stt::{ModelPaths, WHISPER_MODELS};
///
/// let paths = ModelPaths::from_app_paths(&AppPaths::new());
/// for m in WHISPER_MODELS.iter().filter(|m| paths.is_available(m)) {
///     println!("installed: {}", m.display_name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Where GGML `.bin` files live (or will, once downloaded).
    pub models_dir: PathBuf,
}

impl ModelPaths {
    /// Use the platform models directory from [`AppPaths`].
    pub fn from_app_paths(app_paths: &AppPaths) -> Self {
        Self {
            models_dir: app_paths.models_dir.clone(),
        }
    }

    /// Use an explicit directory (test fixtures, portable installs).
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// On-disk path of `model`'s GGML file.
    pub fn model_path(&self, model: &ModelInfo) -> PathBuf {
        self.models_dir.join(model.file_name)
    }

    /// Whether `model`'s file is present.
    pub fn is_available(&self, model: &ModelInfo) -> bool {
        self.model_path(model).exists()
    }

    /// Every catalogue entry whose file is present.
    pub fn list_local_models(&self) -> Vec<&'static ModelInfo> {
        WHISPER_MODELS
            .iter()
            .filter(|m| self.is_available(m))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_ids_are_unique() {
        for (i, a) in WHISPER_MODELS.iter().enumerate() {
            for b in &WHISPER_MODELS[i + 1..] {
                assert_ne!(a.id, b.id);
                assert_ne!(a.file_name, b.file_name);
            }
        }
    }

    #[test]
    fn english_builds_carry_the_en_marker() {
        for m in WHISPER_MODELS.iter().filter(|m| m.language == "en") {
            assert!(m.file_name.contains(".en."), "{} lacks .en marker", m.id);
        }
    }

    #[test]
    fn default_is_the_english_base_build() {
        let m = default_model();
        assert_eq!(m.id, "whisper-base.en");
        assert_eq!(m.size, ModelSize::Base);
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(
            find_model_by_id("whisper-tiny.en").map(|m| m.size),
            Some(ModelSize::Tiny)
        );
        assert!(find_model_by_id("does-not-exist").is_none());
    }

    #[test]
    fn paths_join_dir_and_file_name() {
        let paths = ModelPaths::new("/models");
        let p = paths.model_path(default_model());
        assert!(p.ends_with("ggml-base.en.bin"));
    }

    #[test]
    fn nothing_available_in_a_missing_dir() {
        let paths = ModelPaths::new("/nonexistent/path");
        assert!(!paths.is_available(default_model()));
        assert!(paths.list_local_models().is_empty());
    }
}
