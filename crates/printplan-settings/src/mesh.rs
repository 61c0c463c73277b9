//! Per-mesh settings and derived values

use printplan_core::AngleDegrees;

use crate::enums::EFillMethod;
use crate::error::SettingsResult;
use crate::seam::ZSeamConfig;
use crate::settings::Settings;

/// Settings of one mesh, with the values the planner derives from them
///
/// Feature extrusions hold an `Arc<MeshSettings>`; two features belong to the
/// same mesh when they share the same allocation.
#[derive(Debug, Clone)]
pub struct MeshSettings {
    pub name: String,
    pub settings: Settings,
    pub seam_config: ZSeamConfig,
    pub infill_angles: Vec<AngleDegrees>,
    pub skin_angles: Vec<AngleDegrees>,
    pub roofing_angles: Vec<AngleDegrees>,
}

impl MeshSettings {
    /// Derive seam and line angles from the raw settings
    pub fn from_settings(name: impl Into<String>, settings: Settings) -> SettingsResult<Self> {
        let seam_config = ZSeamConfig::from_settings(&settings)?;

        let mut infill_angles = settings.get_angles("infill_angles")?;
        if infill_angles.is_empty() {
            let pattern = settings.get_or("infill_pattern", EFillMethod::default());
            if matches!(pattern, EFillMethod::Cross | EFillMethod::Cross3D) {
                infill_angles.push(AngleDegrees::new(22.0));
            } else {
                infill_angles.push(AngleDegrees::new(45.0));
            }
            if matches!(pattern, EFillMethod::Lines | EFillMethod::ZigZag) {
                infill_angles.push(AngleDegrees::new(135.0));
            }
        }

        let mut skin_angles = settings.get_angles("skin_angles")?;
        if skin_angles.is_empty() {
            skin_angles = vec![AngleDegrees::new(45.0), AngleDegrees::new(135.0)];
        }

        let mut roofing_angles = settings.get_angles("roofing_angles")?;
        if roofing_angles.is_empty() {
            roofing_angles = vec![AngleDegrees::new(45.0), AngleDegrees::new(135.0)];
        }

        Ok(Self {
            name: name.into(),
            settings,
            seam_config,
            infill_angles,
            skin_angles,
            roofing_angles,
        })
    }

    /// Helper meshes (infill, cutting, anti-overhang) modify others and print nothing themselves
    pub fn is_printed(&self) -> bool {
        !(self.settings.get_or("infill_mesh", false)
            || self.settings.get_or("cutting_mesh", false)
            || self.settings.get_or("anti_overhang_mesh", false))
    }
}
