//! Global and per-extruder settings of a print job

use std::path::Path;
use std::sync::Arc;

use crate::error::{SettingsError, SettingsResult};
use crate::settings::Settings;

/// Settings for a whole print: one global level and one level per extruder
///
/// Extruder levels fall back to the global level.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub settings: Arc<Settings>,
    extruders: Vec<Arc<Settings>>,
}

impl Scene {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            extruders: Vec::new(),
        }
    }

    /// Add an extruder; its settings are re-parented onto the global level
    pub fn add_extruder(&mut self, mut settings: Settings) -> usize {
        settings.set_parent(Arc::clone(&self.settings));
        self.extruders.push(Arc::new(settings));
        self.extruders.len() - 1
    }

    pub fn with_extruder(mut self, settings: Settings) -> Self {
        self.add_extruder(settings);
        self
    }

    pub fn extruder_count(&self) -> usize {
        self.extruders.len()
    }

    pub fn extruder(&self, extruder_nr: usize) -> SettingsResult<&Arc<Settings>> {
        self.extruders
            .get(extruder_nr)
            .ok_or(SettingsError::UnknownExtruder(extruder_nr))
    }

    /// Load a scene from a global settings file and one file per extruder
    pub fn load_from_files(global: &Path, extruders: &[&Path]) -> SettingsResult<Self> {
        let mut scene = Self::new(Settings::load_from_file(global)?);
        for path in extruders {
            scene.add_extruder(Settings::load_from_file(path)?);
        }
        tracing::debug!(
            "Loaded scene from {} with {} extruder(s)",
            global.display(),
            scene.extruder_count()
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extruders_fall_back_to_global() {
        let scene = Scene::new(Settings::new().with("speed_slowdown_layers", 2))
            .with_extruder(Settings::new().with("speed_travel", 120))
            .with_extruder(Settings::new().with("speed_travel", 180));

        assert_eq!(scene.extruder_count(), 2);
        let second = scene.extruder(1).unwrap();
        assert_eq!(second.get::<f64>("speed_travel").unwrap(), 180.0);
        assert_eq!(second.get::<usize>("speed_slowdown_layers").unwrap(), 2);
        assert!(matches!(
            scene.extruder(2),
            Err(SettingsError::UnknownExtruder(2))
        ));
    }
}
