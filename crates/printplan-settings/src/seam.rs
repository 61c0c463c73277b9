//! Seam placement configuration

use serde::{Deserialize, Serialize};

use printplan_core::{Coord, Point2};

use crate::enums::{EZSeamCornerPrefType, EZSeamType};
use crate::error::SettingsResult;
use crate::settings::Settings;

/// Where closed loops should start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZSeamConfig {
    pub seam_type: EZSeamType,
    /// Target position for user-specified seams
    pub position: Point2,
    pub corner_pref: EZSeamCornerPrefType,
    /// Minimum segment length considered when measuring corners
    pub simplify_curvature: Coord,
}

impl ZSeamConfig {
    pub fn new(seam_type: EZSeamType) -> Self {
        Self {
            seam_type,
            ..Self::default()
        }
    }

    pub fn with_corner_pref(mut self, corner_pref: EZSeamCornerPrefType) -> Self {
        self.corner_pref = corner_pref;
        self
    }

    pub fn with_position(mut self, position: Point2) -> Self {
        self.position = position;
        self
    }

    /// Read the `z_seam_*` settings, defaulting every missing key
    pub fn from_settings(settings: &Settings) -> SettingsResult<Self> {
        let defaults = Self::default();
        let seam_type = match settings.get_raw("z_seam_type") {
            Some(_) => settings.get("z_seam_type")?,
            None => defaults.seam_type,
        };
        let corner_pref = match settings.get_raw("z_seam_corner") {
            Some(_) => settings.get("z_seam_corner")?,
            None => defaults.corner_pref,
        };
        let position = Point2::new(
            settings.get_coord("z_seam_x").unwrap_or(0),
            settings.get_coord("z_seam_y").unwrap_or(0),
        );

        Ok(Self {
            seam_type,
            position,
            corner_pref,
            simplify_curvature: settings.get_coord("z_seam_simplify_curvature").unwrap_or(0),
        })
    }
}

impl Default for ZSeamConfig {
    fn default() -> Self {
        Self {
            seam_type: EZSeamType::Shortest,
            position: Point2::ORIGIN,
            corner_pref: EZSeamCornerPrefType::Inner,
            simplify_curvature: 0,
        }
    }
}
