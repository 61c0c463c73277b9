//! Error handling for bridging

use printplan_settings::SettingsError;
use thiserror::Error;

/// Bridging error type
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A setting needed by bridge detection is missing or invalid
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Bridge lines need a positive width to be laid out
    #[error("Invalid bridge line width: {0}")]
    InvalidLineWidth(i64),

    /// The mesh has no infill angle to bridge across
    #[error("Mesh '{0}' has no infill angles")]
    NoInfillAngles(String),
}

/// Result type alias for bridging.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_display() {
        assert_eq!(
            BridgeError::InvalidLineWidth(0).to_string(),
            "Invalid bridge line width: 0"
        );
        let err: BridgeError = SettingsError::Missing("skin_line_width".to_string()).into();
        assert!(err.to_string().starts_with("Settings error"));
    }
}
