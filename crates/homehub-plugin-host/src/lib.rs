//! Registries that turn discovered plugins into live objects for the hub.
//!
//! [`AppRegistry`] keeps at most one instance per app id for the lifetime of
//! a catalog; [`WidgetRegistry`] builds a fresh widget on every request. Both
//! resolve entry references lazily against a [`PluginModule`] and swap their
//! whole catalog on rescan.
//!
//! Registries hold `Rc` handles and are meant to live on the UI thread.
//!
//! [`PluginModule`]: homehub_plugin_sdk::PluginModule

mod apps;
mod catalog;
mod error;
mod widgets;

pub use apps::{AppRegistry, AppState, Rescan};
pub use catalog::{Catalog, CatalogEntry};
pub use error::HostError;
pub use widgets::WidgetRegistry;

/// Language used when the active one has no translation.
pub const DEFAULT_LANGUAGE: &str = "en";

pub const UNKNOWN_APP_NAME: &str = homehub_plugin_db::UNKNOWN_APP_NAME;
