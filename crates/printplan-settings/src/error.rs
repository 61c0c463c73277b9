//! Error types for the settings crate.
//!
//! This module provides structured error types for setting lookups,
//! settings file loading and scene description.

use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be loaded.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// A setting was requested but is not defined anywhere in the hierarchy.
    #[error("Missing setting '{0}'")]
    Missing(String),

    /// A setting value could not be parsed into the requested type.
    #[error("Invalid setting '{key}' = '{value}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// An extruder index that the scene does not define.
    #[error("Unknown extruder {0}")]
    UnknownExtruder(usize),

    /// The settings file format is not supported.
    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
