//! Home Hub Plugin SDK
//! ===================
//!
//! The contract between the hub and the apps and widgets it hosts. Plugins
//! are plain Rust types constructed through a [`PluginFactory`]-style trait
//! object registered in a [`PluginModule`]; the module is the closed, typed
//! table that on-disk manifests and widget files are resolved against.

mod context;
mod entry;
mod error;
mod registry;

pub use context::PluginContext;
pub use entry::EntryReference;
pub use error::PluginError;
pub use registry::{
    App, AppFactory, AppHandle, PluginModule, Refreshable, Widget, WidgetFactory,
};

/// Common imports for plugin authors.
pub mod prelude {
    pub use crate::{
        App, AppFactory, AppHandle, EntryReference, PluginContext, PluginError, PluginModule,
        Refreshable, Widget, WidgetFactory,
    };
}

/// Build a [`PluginModule`] from a list of app and widget factories.
///
/// # Example
///
/// ```ignore
/// use homehub_plugin_sdk::declare_homehub_plugins;
///
/// pub fn module() -> homehub_plugin_sdk::PluginModule {
///     declare_homehub_plugins! {
///         apps: [CalendarAppFactory],
///         widgets: [ClockWidgetFactory, TimerWidgetFactory],
///     }
/// }
/// ```
#[macro_export]
macro_rules! declare_homehub_plugins {
    (
        apps: [$($app:expr),* $(,)?],
        widgets: [$($widget:expr),* $(,)?] $(,)?
    ) => {{
        let mut module = $crate::PluginModule::new();
        $(module.register_app(::std::sync::Arc::new($app));)*
        $(module.register_widget(::std::sync::Arc::new($widget));)*
        module
    }};
}
