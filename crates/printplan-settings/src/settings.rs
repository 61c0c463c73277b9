//! Hierarchical key/value settings
//!
//! Values are stored as strings, exactly as they appear in settings files,
//! and parsed on lookup. A lookup that misses falls back to the parent
//! settings (mesh -> extruder -> global), so overrides only need to list
//! the keys they change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use printplan_core::{mm_to_coord, AngleDegrees, Coord};

use crate::error::{SettingsError, SettingsResult};

/// A settings level with optional fallback to a parent level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    values: BTreeMap<String, String>,
    #[serde(skip)]
    parent: Option<Arc<Settings>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty level that falls back to `parent`
    pub fn with_parent(parent: Arc<Settings>) -> Self {
        Self {
            values: BTreeMap::new(),
            parent: Some(parent),
        }
    }

    pub fn set_parent(&mut self, parent: Arc<Settings>) {
        self.parent = Some(parent);
    }

    pub fn parent(&self) -> Option<&Arc<Settings>> {
        self.parent.as_ref()
    }

    /// Set a value on this level
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    /// Builder-style [`Settings::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Whether the key is defined on this level or any parent
    pub fn has(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }

    /// Raw string value, searching parents
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(value) => Some(value.as_str()),
            None => self.parent.as_deref().and_then(|parent| parent.get_raw(key)),
        }
    }

    /// Parse a value into `T`
    pub fn get<T>(&self, key: &str) -> SettingsResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self
            .get_raw(key)
            .ok_or_else(|| SettingsError::Missing(key.to_string()))?;
        parse_value(key, raw)
    }

    /// Parse a value, using `default` when the key is missing or invalid
    pub fn get_or<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Ok(value) => value,
            Err(SettingsError::Missing(_)) => default,
            Err(e) => {
                tracing::warn!("{}, using default", e);
                default
            }
        }
    }

    /// A length setting given in millimetres, as fixed-point coordinates
    pub fn get_coord(&self, key: &str) -> SettingsResult<Coord> {
        self.get::<f64>(key).map(mm_to_coord)
    }

    /// A percentage setting as a ratio (`50` becomes `0.5`)
    pub fn get_ratio(&self, key: &str) -> SettingsResult<f64> {
        self.get::<f64>(key).map(|percent| percent / 100.0)
    }

    /// A list setting such as `[0, 90]`; a missing key yields an empty list
    pub fn get_list<T>(&self, key: &str) -> SettingsResult<Vec<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.get_raw(key) else {
            return Ok(Vec::new());
        };

        raw.trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| parse_value(key, item))
            .collect()
    }

    /// A list of angles in degrees
    pub fn get_angles(&self, key: &str) -> SettingsResult<Vec<AngleDegrees>> {
        Ok(self
            .get_list::<f64>(key)?
            .into_iter()
            .map(AngleDegrees::new)
            .collect())
    }

    /// Keys defined on this level only
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Copy every value of `other` onto this level, overriding existing keys
    pub fn merge(&mut self, other: &Settings) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Parse a flat TOML table of settings
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let mut settings = Self::new();
        for (key, value) in table {
            settings.values.insert(key, toml_value_to_string(&value)?);
        }
        Ok(settings)
    }

    /// Parse a flat JSON object of settings
    pub fn from_json_str(content: &str) -> SettingsResult<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
        let mut settings = Self::new();
        for (key, value) in object {
            settings.values.insert(key, json_value_to_string(&value)?);
        }
        Ok(settings)
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)
        } else {
            Err(SettingsError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// Location of the user's default settings file, if the platform has a config directory
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("printplan").join("settings.toml"))
}

fn parse_value<T>(key: &str, raw: &str) -> SettingsResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| SettingsError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn toml_value_to_string(value: &toml::Value) -> SettingsResult<String> {
    match value {
        toml::Value::String(text) => Ok(text.clone()),
        toml::Value::Integer(number) => Ok(number.to_string()),
        toml::Value::Float(number) => Ok(number.to_string()),
        toml::Value::Boolean(flag) => Ok(flag.to_string()),
        toml::Value::Array(items) => {
            let items = items
                .iter()
                .map(toml_value_to_string)
                .collect::<SettingsResult<Vec<_>>>()?;
            Ok(format!("[{}]", items.join(", ")))
        }
        other => Err(SettingsError::LoadError(format!(
            "Unsupported TOML value: {}",
            other
        ))),
    }
}

fn json_value_to_string(value: &serde_json::Value) -> SettingsResult<String> {
    match value {
        serde_json::Value::String(text) => Ok(text.clone()),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Bool(flag) => Ok(flag.to_string()),
        serde_json::Value::Array(items) => {
            let items = items
                .iter()
                .map(json_value_to_string)
                .collect::<SettingsResult<Vec<_>>>()?;
            Ok(format!("[{}]", items.join(", ")))
        }
        other => Err(SettingsError::LoadError(format!(
            "Unsupported JSON value: {}",
            other
        ))),
    }
}
