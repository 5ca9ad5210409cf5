use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Source extensions tolerated on the module half of a manifest entry point.
const SOURCE_EXTENSIONS: &[&str] = &["py", "rs"];

/// Reference to the type implementing a plugin: `package.module:Type`.
///
/// Apps use their id as the package, widgets use `widgets`. The reference is
/// opaque to the scanner; it only becomes meaningful when resolved against a
/// [`PluginModule`](crate::PluginModule).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryReference {
    pub package: String,
    pub module: String,
    pub type_name: String,
}

impl EntryReference {
    pub fn new(
        package: impl Into<String>,
        module: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
            type_name: type_name.into(),
        }
    }

    /// Parse a manifest entry point of the form `<module>:<type>`.
    pub fn parse(package: impl Into<String>, entry_point: &str) -> Result<Self, PluginError> {
        let (module, type_name) = entry_point
            .split_once(':')
            .ok_or_else(|| PluginError::InvalidEntry(format!("missing ':' in {entry_point:?}")))?;
        let module = module.trim();
        let type_name = type_name.trim();
        if module.is_empty() || type_name.is_empty() || type_name.contains(':') {
            return Err(PluginError::InvalidEntry(format!(
                "expected <module>:<type>, got {entry_point:?}"
            )));
        }
        Ok(Self::new(package, strip_source_extension(module), type_name))
    }
}

fn strip_source_extension(module: &str) -> &str {
    match module.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && SOURCE_EXTENSIONS.contains(&ext) => stem,
        _ => module,
    }
}

impl fmt::Display for EntryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.package, self.module, self.type_name)
    }
}
