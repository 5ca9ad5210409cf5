use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use homehub_plugin_sdk::PluginError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Load a JSON document, treating a missing file as the default value.
pub(crate) fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, PluginError> {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).map_err(|err| {
            PluginError::Data(format!("failed to parse {}: {err}", path.display()))
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PluginError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| PluginError::Data(err.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}
