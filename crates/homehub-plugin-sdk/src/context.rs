use std::path::PathBuf;

/// Shared context handed to every plugin factory.
///
/// This is the only constructor argument a plugin ever receives. Fields the
/// host does not care about keep their defaults, so plugins never need to
/// check which arguments their constructor accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginContext {
    pub language: String,
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Default for PluginContext {
    fn default() -> Self {
        let base = std::env::temp_dir().join("homehub");
        Self {
            language: "en".to_string(),
            data_dir: base.join("data"),
            config_dir: base.join("config"),
        }
    }
}

impl PluginContext {
    pub fn new(language: impl Into<String>) -> Self {
        Self::default().with_language(language)
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Path of a data file owned by a plugin, e.g. its database.
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}
