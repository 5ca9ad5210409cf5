//! Built-in Home Hub apps and widgets.

pub mod apps;
mod store;
pub mod widgets;

use homehub_plugin_sdk::{declare_homehub_plugins, PluginModule};

pub use apps::{CalendarApp, HomeAssistantApp, PantryApp, TaskBoardApp, WhiteboardApp};
pub use widgets::{CalendarWidget, ClockWidget, TimerWidget, VolumeControlWidget, WeatherWidget};

/// Registration table for every built-in plugin, keyed by the entry
/// references their bundled manifests and widget files use.
pub fn builtin_module() -> PluginModule {
    declare_homehub_plugins! {
        apps: [
            apps::calendar::CalendarAppFactory,
            apps::task_board::TaskBoardAppFactory,
            apps::pantry::PantryAppFactory,
            apps::whiteboard::WhiteboardAppFactory,
            apps::home_assistant::HomeAssistantAppFactory,
        ],
        widgets: [
            widgets::clock::ClockWidgetFactory,
            widgets::weather::WeatherWidgetFactory,
            widgets::volume::VolumeControlWidgetFactory,
            widgets::calendar::CalendarWidgetFactory,
            widgets::timer::TimerWidgetFactory,
        ],
    }
}

/// Pick the German or English variant of a UI string.
pub(crate) fn localized(language: &str, en: &str, de: &str) -> String {
    if language == "de" { de } else { en }.to_string()
}
