//! printplan Settings Crate
//!
//! Handles slicing settings: hierarchical key/value lookups, enumerated
//! setting values, seam configuration, per-mesh derived values and the
//! global/extruder scene.

pub mod enums;
pub mod error;
pub mod mesh;
pub mod scene;
pub mod seam;
pub mod settings;

pub use enums::{EFillMethod, EPlatformAdhesion, EZSeamCornerPrefType, EZSeamType, InsetDirection};
pub use error::{SettingsError, SettingsResult};
pub use mesh::MeshSettings;
pub use scene::Scene;
pub use seam::ZSeamConfig;
pub use settings::{default_settings_path, Settings};
