//! Crate-level error type

use printplan_bridge::BridgeError;
use printplan_core::GeometryError;
use printplan_planner::{OperationError, ScheduleError, TransformError};
use printplan_settings::SettingsError;
use thiserror::Error;

/// Unified error for the printplan facade
///
/// Wraps the error of every layer so callers can use one `Result` type.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Settings error
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Operation tree error
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Scheduling error
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Transformer error
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Bridging error
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a settings error, wherever it surfaced
    pub fn is_settings_error(&self) -> bool {
        matches!(
            self,
            Error::Settings(_) | Error::Transform(TransformError::Settings(_)) | Error::Bridge(BridgeError::Settings(_))
        )
    }

    /// Check if scheduling could not order every item
    pub fn is_deadlock(&self) -> bool {
        matches!(
            self,
            Error::Schedule(ScheduleError::Deadlock { .. })
                | Error::Transform(TransformError::Schedule(ScheduleError::Deadlock { .. }))
        )
    }
}

/// Result type using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
