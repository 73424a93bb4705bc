//! Error Types
//!
//! Errors only surface at the edges of the engine: loading configuration,
//! reading/writing the settings store, and parsing binding declarations.
//! Nothing in the per-frame tick path returns these; the tick path logs and
//! carries on.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing binding declarations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The input-type tag is not `keyboard`, `mouse` or `controller`
    /// (optionally suffixed with `-<player>`).
    #[error("unknown input type `{0}`")]
    UnknownInputType(String),

    /// An array of keys was given for an action not flagged `splitScreen`.
    #[error("action `{action}` lists several keys for `{input_type}` but is not a split-screen action")]
    NotSplitScreen { action: String, input_type: String },

    /// The named action does not exist in these bindings.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
}

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the persisted [`Settings`](crate::settings::Settings) store.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),

    /// A value of the wrong kind was written to a setting.
    #[error("setting `{key}` expects a {expected} value")]
    TypeMismatch { key: &'static str, expected: &'static str },
}
