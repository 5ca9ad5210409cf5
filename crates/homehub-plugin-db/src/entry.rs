use std::path::PathBuf;

use homehub_plugin_sdk::EntryReference;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A plugin name, either fixed or translated per language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayName {
    Plain(String),
    Localized(IndexMap<String, String>),
}

impl DisplayName {
    /// Resolve against `active`, then `default`, then `placeholder`.
    ///
    /// Plain names are returned unchanged regardless of language.
    pub fn resolve(&self, active: Option<&str>, default: &str, placeholder: &str) -> String {
        match self {
            DisplayName::Plain(name) => name.clone(),
            DisplayName::Localized(names) => active
                .and_then(|lang| names.get(lang))
                .or_else(|| names.get(default))
                .cloned()
                .unwrap_or_else(|| placeholder.to_string()),
        }
    }
}

impl From<&str> for DisplayName {
    fn from(value: &str) -> Self {
        DisplayName::Plain(value.to_string())
    }
}

impl From<String> for DisplayName {
    fn from(value: String) -> Self {
        DisplayName::Plain(value)
    }
}

/// Raw contents of an app's `manifest.json`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppManifest {
    pub id: Option<String>,
    pub name: Option<DisplayName>,
    pub entry_point: Option<String>,
}

/// Metadata for an app discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMetadata {
    pub id: String,
    pub name: DisplayName,
    /// `None` when the manifest had no usable entry point; such an app is
    /// listed but can never be instantiated.
    pub entry: Option<EntryReference>,
    pub path: PathBuf,
}

/// Metadata for a widget discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMetadata {
    pub id: String,
    pub name: String,
    pub entry: EntryReference,
    pub path: PathBuf,
}
