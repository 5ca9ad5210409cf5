use homehub_plugin_sdk::{EntryReference, PluginError};
use thiserror::Error;

/// Reasons a cataloged plugin could not be turned into an instance.
///
/// These never leave the registries' public operations; they are logged and
/// the request yields nothing.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no factory registered for {0}")]
    Unresolved(EntryReference),
    #[error("{0} declares no entry point")]
    MissingEntry(String),
    #[error("failed to construct {id}: {source}")]
    Construction {
        id: String,
        #[source]
        source: PluginError,
    },
}
