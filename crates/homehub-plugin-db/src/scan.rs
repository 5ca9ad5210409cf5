use std::fs;
use std::path::{Path, PathBuf};

use homehub_plugin_sdk::EntryReference;
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::{AppManifest, AppMetadata, DisplayName, WidgetMetadata};

/// File describing an app inside its directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Package name used in the entry references of discovered widgets.
pub const WIDGETS_PACKAGE: &str = "widgets";

/// Suffix a declared type must carry to count as a widget.
pub const WIDGET_SUFFIX: &str = "Widget";

pub const UNKNOWN_APP_NAME: &str = "Unknown App";

/// Top-level declarations only; indented ones belong to a nested scope.
static WIDGET_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:pub(?:\([^)]*\))?[ \t]+)?(?:class|struct|widget)[ \t]+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("widget declaration pattern is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no *Widget type declared in {path}")]
    NoWidgetType { path: PathBuf },
    #[error("unusable entry point in {path}: {message}")]
    InvalidEntry { path: PathBuf, message: String },
}

impl DiscoveryError {
    pub fn path(&self) -> &Path {
        match self {
            DiscoveryError::Io { path, .. }
            | DiscoveryError::Manifest { path, .. }
            | DiscoveryError::NoWidgetType { path }
            | DiscoveryError::InvalidEntry { path, .. } => path,
        }
    }
}

/// Result of scanning one directory.
///
/// `errors` holds candidates that looked like plugins but could not be read,
/// plus apps whose entry point is malformed (those are still listed);
/// `skipped` holds manifests that parsed but declared no id.
#[derive(Debug)]
pub struct ScanReport<T> {
    pub entries: Vec<T>,
    pub errors: Vec<DiscoveryError>,
    pub skipped: Vec<PathBuf>,
}

impl<T> Default for ScanReport<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            errors: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> ScanReport<T> {
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }
}

/// Naming convention for widget files.
#[derive(Debug, Clone)]
pub struct WidgetScanConfig {
    pub extensions: Vec<String>,
    pub reserved_prefix: String,
}

impl Default for WidgetScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".into(), "rs".into(), "widget".into()],
            reserved_prefix: "__".into(),
        }
    }
}

impl WidgetScanConfig {
    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        if name.starts_with(&self.reserved_prefix) {
            return false;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|known| known == ext))
            .unwrap_or(false)
    }
}

/// Immediate children of `dir`, sorted by file name. A missing directory has
/// no children.
fn children(dir: &Path, errors: &mut Vec<DiscoveryError>) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => paths.push(entry.into_path()),
            Err(err) => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                log::warn!("skipping entry while scanning {}: {}", dir.display(), err);
                errors.push(DiscoveryError::Io {
                    path,
                    source: err.into(),
                });
            }
        }
    }
    paths
}

/// Scan `dir` for app directories containing a `manifest.json`.
pub fn scan_apps(dir: &Path) -> ScanReport<AppMetadata> {
    let mut report = ScanReport::default();
    for path in children(dir, &mut report.errors) {
        if !path.is_dir() {
            continue;
        }
        let manifest_path = path.join(MANIFEST_FILE_NAME);
        if !manifest_path.is_file() {
            continue;
        }
        match load_manifest(&manifest_path) {
            Ok(manifest) => match app_metadata(manifest, &path, &mut report.errors) {
                Some(metadata) => {
                    log::debug!(
                        "discovered app {} at {}",
                        metadata.id,
                        manifest_path.display()
                    );
                    report.entries.push(metadata);
                }
                None => {
                    log::debug!("manifest {} declares no id", manifest_path.display());
                    report.skipped.push(manifest_path);
                }
            },
            Err(err) => {
                log::warn!("error loading app manifest: {err}");
                report.errors.push(err);
            }
        }
    }
    report
}

/// Load and parse a single app manifest.
pub fn load_manifest(path: &Path) -> Result<AppManifest, DiscoveryError> {
    let raw = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DiscoveryError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

fn app_metadata(
    manifest: AppManifest,
    path: &Path,
    errors: &mut Vec<DiscoveryError>,
) -> Option<AppMetadata> {
    let id = manifest.id.filter(|id| !id.trim().is_empty())?;
    let entry = manifest
        .entry_point
        .as_deref()
        .and_then(|entry_point| match EntryReference::parse(id.as_str(), entry_point) {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("app {id} has an unusable entry point: {err}");
                errors.push(DiscoveryError::InvalidEntry {
                    path: path.join(MANIFEST_FILE_NAME),
                    message: err.to_string(),
                });
                None
            }
        });
    Some(AppMetadata {
        name: manifest
            .name
            .unwrap_or_else(|| DisplayName::from(UNKNOWN_APP_NAME)),
        id,
        entry,
        path: path.to_path_buf(),
    })
}

/// Scan `dir` for widget files following `config`.
pub fn scan_widgets(dir: &Path, config: &WidgetScanConfig) -> ScanReport<WidgetMetadata> {
    let mut report = ScanReport::default();
    for path in children(dir, &mut report.errors) {
        if !path.is_file() || !config.matches(&path) {
            continue;
        }
        match widget_metadata(&path) {
            Ok(metadata) => {
                log::debug!(
                    "discovered widget {} ({}) at {}",
                    metadata.id,
                    metadata.entry.type_name,
                    path.display()
                );
                report.entries.push(metadata);
            }
            Err(err) => {
                log::warn!("error loading widget: {err}");
                report.errors.push(err);
            }
        }
    }
    report
}

fn widget_metadata(path: &Path) -> Result<WidgetMetadata, DiscoveryError> {
    let source = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let type_name = find_widget_type(&source).ok_or_else(|| DiscoveryError::NoWidgetType {
        path: path.to_path_buf(),
    })?;
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = type_name
        .strip_suffix(WIDGET_SUFFIX)
        .unwrap_or(&type_name)
        .to_string();
    Ok(WidgetMetadata {
        entry: EntryReference::new(WIDGETS_PACKAGE, id.clone(), type_name),
        id,
        name,
        path: path.to_path_buf(),
    })
}

/// First type declared in `source` whose name ends with [`WIDGET_SUFFIX`].
///
/// Only declarations count; a name that is merely imported never matches.
pub fn find_widget_type(source: &str) -> Option<String> {
    let mut found = WIDGET_DECLARATION
        .captures_iter(source)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str())
        .filter(|name| name.len() > WIDGET_SUFFIX.len() && name.ends_with(WIDGET_SUFFIX));
    let first = found.next()?;
    for extra in found {
        log::debug!("ignoring additional widget type {extra}; using {first}");
    }
    Some(first.to_string())
}
