use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "HomeHub";

/// On-disk layout of a hub installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubPaths {
    pub root: PathBuf,
    pub apps_dir: PathBuf,
    pub widgets_dir: PathBuf,
    pub languages_dir: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl HubPaths {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            apps_dir: root.join("apps"),
            widgets_dir: root.join("widgets"),
            languages_dir: root.join("languages"),
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            root,
        }
    }

    /// `<platform config dir>/HomeHub`, or `./HomeHub` when the platform has
    /// no config directory.
    pub fn default_root() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    /// Create the writable directories. Plugin directories are only read.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn config_file(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_directories_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let paths = HubPaths::from_root(dir.path());
        assert_eq!(paths.apps_dir, dir.path().join("apps"));
        assert_eq!(paths.config_file("settings.json"), dir.path().join("config/settings.json"));

        paths.ensure_dirs().unwrap();
        assert!(paths.data_dir.is_dir());
        assert!(paths.config_dir.is_dir());
        assert!(!paths.apps_dir.exists());
    }

    #[test]
    fn default_root_ends_with_app_dir() {
        assert!(HubPaths::default_root().ends_with(APP_DIR_NAME));
    }
}
