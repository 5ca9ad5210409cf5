//! Home Hub launcher shell.
//!
//! Wires the app and widget registries to persisted settings, translations,
//! a dashboard of app tiles, a top bar of widgets and a single content area.

pub mod dashboard;
pub mod hub;
pub mod language;
pub mod paths;
pub mod settings;
pub mod top_bar;

pub use dashboard::{Tile, DASHBOARD_COLUMNS};
pub use hub::{ContentArea, Hub, ResetReport, View};
pub use language::LanguageManager;
pub use paths::HubPaths;
pub use settings::{GridPosition, Settings, SettingsError, SettingsStore};
pub use top_bar::{TopBar, TOP_BAR_SLOTS};
