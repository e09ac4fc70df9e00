// Engine settings
// Loaded from ~/.config/mapgrid/settings.json

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of history snapshots retained.
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Default delimiter for legacy delimited-string cell values.
pub const DEFAULT_PAIR_DELIMITER: &str = "|";

/// Engine-level settings.
///
/// Unknown fields are ignored and missing fields fall back to defaults, so
/// older settings files keep loading after upgrades.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum retained history snapshots (oldest evicted first).
    pub history_cap: usize,

    /// Delimiter accepted when parsing legacy delimited-string pair values.
    pub pair_delimiter: String,

    /// User-adjusted column widths, keyed by column property name.
    /// Layered onto flattened column definitions at read time.
    pub column_widths: HashMap<String, f32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            pair_delimiter: DEFAULT_PAIR_DELIMITER.to_string(),
            column_widths: HashMap::new(),
        }
    }
}

impl EngineSettings {
    fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mapgrid");
        config_dir.join("settings.json")
    }

    /// Load settings from the platform config dir, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from an explicit path, falling back to defaults.
    ///
    /// A missing or unparseable file yields `Self::default()`; settings load
    /// must never fail.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the platform config dir.
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Width for a column property, if the user has adjusted it.
    pub fn column_width(&self, prop: &str) -> Option<f32> {
        self.column_widths.get(prop).copied()
    }

    /// Record a user width adjustment.
    pub fn set_column_width(&mut self, prop: impl Into<String>, width: f32) {
        self.column_widths.insert(prop.into(), width);
    }
}
