use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::{EntryReference, PluginContext, PluginError};

/// A live app shared between the registry cache and the hub's placement.
pub type AppHandle = Rc<RefCell<dyn App>>;

/// Optional capability for plugins that hold data which can go stale, for
/// example after the hub wiped the data directory.
pub trait Refreshable {
    fn refresh(&mut self) -> Result<(), PluginError>;
}

/// A full-screen module shown in the hub's content area.
///
/// At most one instance exists per app id; the hub swaps it in and out of the
/// content area without recreating it, so interaction state survives.
pub trait App {
    fn id(&self) -> &str;

    /// Title in the language the app was last told about.
    fn title(&self) -> String;

    fn on_language_changed(&mut self, _language: &str) {}

    /// Textual rendering used for the dashboard tile preview.
    fn render(&self) -> String;

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        None
    }
}

/// A small live element placed in the top bar or rendered as a preview.
///
/// Widgets are created fresh for every request and exclusively owned by the
/// requester.
pub trait Widget {
    fn id(&self) -> &str;

    fn title(&self) -> String;

    fn on_language_changed(&mut self, _language: &str) {}

    fn render(&self) -> String;

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        None
    }
}

pub trait AppFactory: Send + Sync {
    fn entry(&self) -> EntryReference;
    fn create(&self, ctx: &PluginContext) -> Result<AppHandle, PluginError>;
}

pub trait WidgetFactory: Send + Sync {
    fn entry(&self) -> EntryReference;
    fn create(&self, ctx: &PluginContext) -> Result<Box<dyn Widget>, PluginError>;
}

/// Closed table of every plugin type the hub knows how to construct.
#[derive(Default)]
pub struct PluginModule {
    apps: BTreeMap<EntryReference, Arc<dyn AppFactory>>,
    widgets: BTreeMap<EntryReference, Arc<dyn WidgetFactory>>,
}

impl PluginModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_app(&mut self, factory: Arc<dyn AppFactory>) -> &mut Self {
        let entry = factory.entry();
        if self.apps.insert(entry.clone(), factory).is_some() {
            log::warn!("app factory for {entry} registered twice; keeping the latest");
        }
        self
    }

    pub fn register_widget(&mut self, factory: Arc<dyn WidgetFactory>) -> &mut Self {
        let entry = factory.entry();
        if self.widgets.insert(entry.clone(), factory).is_some() {
            log::warn!("widget factory for {entry} registered twice; keeping the latest");
        }
        self
    }

    pub fn resolve_app(&self, entry: &EntryReference) -> Option<Arc<dyn AppFactory>> {
        self.apps.get(entry).cloned()
    }

    pub fn resolve_widget(&self, entry: &EntryReference) -> Option<Arc<dyn WidgetFactory>> {
        self.widgets.get(entry).cloned()
    }

    pub fn app_entries(&self) -> impl Iterator<Item = &EntryReference> {
        self.apps.keys()
    }

    pub fn widget_entries(&self) -> impl Iterator<Item = &EntryReference> {
        self.widgets.keys()
    }

    /// Merge another module into this one, e.g. built-ins plus extras.
    pub fn extend(&mut self, other: PluginModule) -> &mut Self {
        for factory in other.apps.into_values() {
            self.register_app(factory);
        }
        for factory in other.widgets.into_values() {
            self.register_widget(factory);
        }
        self
    }
}

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginModule")
            .field("apps", &self.apps.keys().collect::<Vec<_>>())
            .field("widgets", &self.widgets.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Notes {
        lines: Vec<String>,
    }

    impl App for Notes {
        fn id(&self) -> &str {
            "notes"
        }

        fn title(&self) -> String {
            "Notes".into()
        }

        fn render(&self) -> String {
            self.lines.join("\n")
        }
    }

    struct NotesFactory;

    impl AppFactory for NotesFactory {
        fn entry(&self) -> EntryReference {
            EntryReference::new("notes", "app", "NotesApp")
        }

        fn create(&self, _ctx: &PluginContext) -> Result<AppHandle, PluginError> {
            Ok(Rc::new(RefCell::new(Notes {
                lines: vec!["milk".into()],
            })))
        }
    }

    #[test]
    fn resolves_registered_factories_by_entry() {
        let mut module = PluginModule::new();
        module.register_app(Arc::new(NotesFactory));

        let entry = EntryReference::new("notes", "app", "NotesApp");
        let factory = module.resolve_app(&entry).expect("registered");
        let app = factory.create(&PluginContext::default()).unwrap();
        assert_eq!(app.borrow().render(), "milk");
        assert!(app.borrow_mut().as_refreshable().is_none());

        let other = EntryReference::new("notes", "app", "Other");
        assert!(module.resolve_app(&other).is_none());
        assert!(module.resolve_widget(&entry).is_none());
    }

    #[test]
    fn macro_builds_module() {
        let module = crate::declare_homehub_plugins! {
            apps: [NotesFactory],
            widgets: [],
        };
        assert_eq!(module.app_entries().count(), 1);
        assert_eq!(module.widget_entries().count(), 0);
    }
}
