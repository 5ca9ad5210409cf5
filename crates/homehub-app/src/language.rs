use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use homehub_plugin_host::DEFAULT_LANGUAGE;
use tracing::{debug, warn};

/// Flat key to string tables loaded from `<languages_dir>/<code>.json`.
#[derive(Debug)]
pub struct LanguageManager {
    languages_dir: PathBuf,
    current: String,
    translations: BTreeMap<String, String>,
}

impl LanguageManager {
    pub fn new(languages_dir: impl Into<PathBuf>) -> Self {
        Self {
            languages_dir: languages_dir.into(),
            current: DEFAULT_LANGUAGE.to_string(),
            translations: BTreeMap::new(),
        }
    }

    pub fn languages_dir(&self) -> &Path {
        &self.languages_dir
    }

    pub fn current_language(&self) -> &str {
        &self.current
    }

    /// Switch to `code`. The language becomes current even when its table
    /// cannot be loaded; lookups then fall back to defaults.
    pub fn load_language(&mut self, code: &str) {
        self.current = code.to_string();
        let path = self.languages_dir.join(format!("{code}.json"));
        self.translations = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "invalid language file");
                BTreeMap::new()
            }),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "language file not loaded");
                BTreeMap::new()
            }
        };
        debug!(language = code, keys = self.translations.len(), "language loaded");
    }

    pub fn translate(&self, key: &str, default: Option<&str>) -> String {
        self.translations
            .get(key)
            .map(String::as_str)
            .or(default)
            .unwrap_or(key)
            .to_string()
    }

    /// Codes of every `*.json` table, sorted. A missing directory still
    /// offers English.
    pub fn available_languages(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.languages_dir) else {
            return vec![DEFAULT_LANGUAGE.to_string()];
        };
        let mut codes: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        codes.sort();
        codes
    }
}
