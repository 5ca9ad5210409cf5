use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: String,
    pub enabled_apps: Vec<String>,
    pub app_order: Vec<String>,
    pub app_positions: BTreeMap<String, GridPosition>,
    pub enabled_widgets: Vec<String>,
    pub widget_order: Vec<String>,
    /// Top-bar slot index to widget id.
    pub widget_positions: BTreeMap<usize, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: homehub_plugin_host::DEFAULT_LANGUAGE.to_string(),
            enabled_apps: Vec::new(),
            app_order: Vec::new(),
            app_positions: BTreeMap::new(),
            enabled_widgets: Vec::new(),
            widget_order: Vec::new(),
            widget_positions: BTreeMap::new(),
        }
    }
}

/// User preferences persisted as JSON. Every setter writes the whole file.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Mutex<Settings>,
}

impl SettingsStore {
    /// Open `settings.json` in `config_dir`. A missing or unreadable file
    /// yields the defaults.
    pub fn open(config_dir: &Path) -> Self {
        let path = config_dir.join(SETTINGS_FILE);
        let settings = load(&path);
        Self {
            path,
            settings: Mutex::new(settings),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Settings {
        self.settings.lock().clone()
    }

    pub fn language(&self) -> String {
        self.settings.lock().language.clone()
    }

    pub fn set_language(&self, language: &str) -> Result<(), SettingsError> {
        self.update(|s| s.language = language.to_string())
    }

    pub fn enabled_apps(&self) -> Vec<String> {
        self.settings.lock().enabled_apps.clone()
    }

    pub fn set_enabled_apps(&self, apps: Vec<String>) -> Result<(), SettingsError> {
        self.update(|s| s.enabled_apps = apps)
    }

    pub fn is_app_enabled(&self, id: &str) -> bool {
        self.settings.lock().enabled_apps.iter().any(|app| app == id)
    }

    pub fn app_order(&self) -> Vec<String> {
        self.settings.lock().app_order.clone()
    }

    pub fn set_app_order(&self, order: Vec<String>) -> Result<(), SettingsError> {
        self.update(|s| s.app_order = order)
    }

    pub fn app_positions(&self) -> BTreeMap<String, GridPosition> {
        self.settings.lock().app_positions.clone()
    }

    pub fn set_app_positions(
        &self,
        positions: BTreeMap<String, GridPosition>,
    ) -> Result<(), SettingsError> {
        self.update(|s| s.app_positions = positions)
    }

    pub fn enabled_widgets(&self) -> Vec<String> {
        self.settings.lock().enabled_widgets.clone()
    }

    pub fn set_enabled_widgets(&self, widgets: Vec<String>) -> Result<(), SettingsError> {
        self.update(|s| s.enabled_widgets = widgets)
    }

    pub fn is_widget_enabled(&self, id: &str) -> bool {
        self.settings.lock().enabled_widgets.iter().any(|w| w == id)
    }

    pub fn widget_order(&self) -> Vec<String> {
        self.settings.lock().widget_order.clone()
    }

    pub fn set_widget_order(&self, order: Vec<String>) -> Result<(), SettingsError> {
        self.update(|s| s.widget_order = order)
    }

    pub fn widget_positions(&self) -> BTreeMap<usize, String> {
        self.settings.lock().widget_positions.clone()
    }

    pub fn set_widget_positions(
        &self,
        positions: BTreeMap<usize, String>,
    ) -> Result<(), SettingsError> {
        self.update(|s| s.widget_positions = positions)
    }

    fn update(&self, apply: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        let mut settings = self.settings.lock();
        apply(&mut *settings);
        self.save(&*settings)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(settings)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn load(path: &Path) -> Settings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Settings::default(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read settings; using defaults");
            return Settings::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "corrupt settings file; using defaults");
        Settings::default()
    })
}
