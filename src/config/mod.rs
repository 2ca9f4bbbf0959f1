//! Configuration — TOML-persisted settings and platform paths.
//!
//! [`AppConfig`] is the single configuration input consumed by
//! [`crate::engine::SpeechEngine`]; [`AppPaths`] resolves where settings and
//! model files live on each platform.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, SttConfig};
