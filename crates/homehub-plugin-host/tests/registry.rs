use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use homehub_plugin_host::{AppRegistry, AppState, CatalogEntry, WidgetRegistry};
use homehub_plugin_sdk::{
    App, AppFactory, AppHandle, EntryReference, PluginContext, PluginError, PluginModule,
    Widget, WidgetFactory,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

struct TestApp {
    id: String,
    language: String,
}

impl App for TestApp {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> String {
        self.id.clone()
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        format!("{} [{}]", self.id, self.language)
    }
}

struct TestAppFactory {
    package: &'static str,
    created: Arc<AtomicUsize>,
}

impl AppFactory for TestAppFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new(self.package, "app", "App")
    }

    fn create(&self, ctx: &PluginContext) -> Result<AppHandle, PluginError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Rc::new(RefCell::new(TestApp {
            id: self.package.to_string(),
            language: ctx.language.clone(),
        })))
    }
}

struct BrokenAppFactory;

impl AppFactory for BrokenAppFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new("broken", "app", "App")
    }

    fn create(&self, _ctx: &PluginContext) -> Result<AppHandle, PluginError> {
        Err(PluginError::Construction("database locked".into()))
    }
}

struct ClockWidget {
    language: String,
}

impl Widget for ClockWidget {
    fn id(&self) -> &str {
        "clock"
    }

    fn title(&self) -> String {
        "Clock".into()
    }

    fn render(&self) -> String {
        format!("12:00 ({})", self.language)
    }
}

struct ClockWidgetFactory;

impl WidgetFactory for ClockWidgetFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new("widgets", "clock", "ClockWidget")
    }

    fn create(&self, ctx: &PluginContext) -> Result<Box<dyn Widget>, PluginError> {
        Ok(Box::new(ClockWidget {
            language: ctx.language.clone(),
        }))
    }
}

fn write_manifest(root: &Path, dir: &str, body: &str) {
    let app_dir = root.join(dir);
    fs::create_dir_all(&app_dir).unwrap();
    fs::write(app_dir.join("manifest.json"), body).unwrap();
}

fn module(created: &Arc<AtomicUsize>) -> Arc<PluginModule> {
    let mut module = PluginModule::new();
    for package in ["app1", "app2", "calendar"] {
        module.register_app(Arc::new(TestAppFactory {
            package,
            created: Arc::clone(created),
        }));
    }
    module.register_app(Arc::new(BrokenAppFactory));
    module.register_widget(Arc::new(ClockWidgetFactory));
    Arc::new(module)
}

fn sample_apps(root: &Path) {
    write_manifest(
        root,
        "app1",
        r#"{"id": "app1", "name": "App One", "entry_point": "app.py:App"}"#,
    );
    write_manifest(
        root,
        "app2",
        r#"{"id": "app2", "name": "App Two", "entry_point": "app.py:App"}"#,
    );
    write_manifest(root, "bad_app", "{invalid_json");
}

fn sorted(mut entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    entries
}

#[test]
fn lists_valid_apps_and_skips_corrupt_manifest() {
    let dir = tempdir().unwrap();
    sample_apps(dir.path());
    let created = Arc::new(AtomicUsize::new(0));
    let registry = AppRegistry::new(dir.path(), module(&created), PluginContext::default());

    assert_eq!(
        sorted(registry.list_all(None)),
        vec![
            CatalogEntry::new("app1", "App One"),
            CatalogEntry::new("app2", "App Two"),
        ]
    );
    assert_eq!(registry.last_errors().len(), 1);
    assert_eq!(created.load(Ordering::SeqCst), 0, "listing never instantiates");
}

#[test]
fn missing_directory_yields_empty_catalog() {
    let dir = tempdir().unwrap();
    let created = Arc::new(AtomicUsize::new(0));
    let mut registry = AppRegistry::new(
        dir.path().join("missing"),
        module(&created),
        PluginContext::default(),
    );
    assert!(registry.is_empty());
    assert!(registry.last_errors().is_empty());
    assert!(registry.get_instance("app1", None).is_none());
}

#[test]
fn app_instances_are_cached_per_id() {
    let dir = tempdir().unwrap();
    sample_apps(dir.path());
    let created = Arc::new(AtomicUsize::new(0));
    let mut registry = AppRegistry::new(dir.path(), module(&created), PluginContext::default());

    assert_eq!(registry.state("app1"), Some(AppState::Cataloged));
    let first = registry.get_instance("app1", Some("de")).unwrap();
    assert_eq!(registry.state("app1"), Some(AppState::Instantiated));
    let second = registry.get_instance("app1", Some("fr")).unwrap();

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(second.borrow().render(), "app1 [de]", "language only applies at construction");
    assert_eq!(registry.live_instances().len(), 1);
}

#[test]
fn unknown_and_unresolvable_ids_return_none() {
    let dir = tempdir().unwrap();
    write_manifest(
        dir.path(),
        "ghost",
        r#"{"id": "ghost", "name": "Ghost", "entry_point": "app:Missing"}"#,
    );
    write_manifest(
        dir.path(),
        "broken",
        r#"{"id": "broken", "name": "Broken", "entry_point": "app:App"}"#,
    );
    write_manifest(dir.path(), "hub", r#"{"id": "hub", "name": "Hub"}"#);
    let created = Arc::new(AtomicUsize::new(0));
    let mut registry = AppRegistry::new(dir.path(), module(&created), PluginContext::default());

    assert!(registry.get_instance("does-not-exist", None).is_none());
    assert_eq!(registry.state("does-not-exist"), None);

    assert!(registry.get_instance("ghost", None).is_none());
    assert_eq!(registry.state("ghost"), Some(AppState::Cataloged));

    assert!(registry.get_instance("broken", None).is_none());
    assert_eq!(registry.state("broken"), Some(AppState::TypeResolved));

    assert!(registry.get_instance("hub", None).is_none());
    assert_eq!(registry.len(), 3);
}

#[test]
fn localized_names_fall_back_to_default_language() {
    let dir = tempdir().unwrap();
    write_manifest(
        dir.path(),
        "calendar",
        r#"{"id": "calendar", "name": {"en": "Calendar", "de": "Kalender"}, "entry_point": "app:App"}"#,
    );
    let created = Arc::new(AtomicUsize::new(0));
    let registry = AppRegistry::new(dir.path(), module(&created), PluginContext::default());

    assert_eq!(registry.list_all(Some("de"))[0].name, "Kalender");
    assert_eq!(registry.list_all(Some("fr"))[0].name, "Calendar");
    assert_eq!(registry.list_all(None)[0].name, "Calendar");
}

#[test]
fn rescan_keeps_ids_and_hands_back_live_instances() {
    let dir = tempdir().unwrap();
    sample_apps(dir.path());
    let created = Arc::new(AtomicUsize::new(0));
    let mut registry = AppRegistry::new(dir.path(), module(&created), PluginContext::default());

    let placed = registry.get_instance("app1", None).unwrap();
    let before = sorted(registry.list_all(None));

    let mut rescan = registry.scan();
    assert_eq!(sorted(registry.list_all(None)), before);
    assert_eq!(registry.state("app1"), Some(AppState::Cataloged));

    let orphan = rescan.take("app1").expect("app1 was live");
    assert!(Rc::ptr_eq(&orphan, &placed));
    assert!(rescan.is_empty());

    let fresh = registry.get_instance("app1", None).unwrap();
    assert!(!Rc::ptr_eq(&fresh, &placed));
    assert_eq!(created.load(Ordering::SeqCst), 2);
    assert_eq!(placed.borrow().id(), "app1", "orphaned instance stays usable");
}

fn write_widget(root: &Path, file: &str, body: &str) {
    fs::write(root.join(file), body).unwrap();
}

#[test]
fn widgets_are_discovered_from_files() {
    let dir = tempdir().unwrap();
    write_widget(dir.path(), "clock.py", "class ClockWidget(QWidget):\n    pass\n");
    write_widget(dir.path(), "weather.py", "class WeatherWidget(QWidget):\n    pass\n");
    let registry = WidgetRegistry::new(
        dir.path(),
        module(&Arc::new(AtomicUsize::new(0))),
        PluginContext::default(),
    );

    assert_eq!(
        sorted(registry.list_all(None)),
        vec![
            CatalogEntry::new("clock", "Clock"),
            CatalogEntry::new("weather", "Weather"),
        ]
    );
}

#[test]
fn widget_requests_always_build_new_objects() {
    let dir = tempdir().unwrap();
    write_widget(dir.path(), "clock.py", "class ClockWidget(QWidget):\n    pass\n");
    let mut registry = WidgetRegistry::new(
        dir.path(),
        module(&Arc::new(AtomicUsize::new(0))),
        PluginContext::default(),
    );

    let first = registry.get_instance("clock", None).unwrap();
    let second = registry.get_instance("clock", Some("de")).unwrap();
    assert!(!std::ptr::eq(
        first.as_ref() as *const dyn Widget as *const (),
        second.as_ref() as *const dyn Widget as *const ()
    ));
    assert_eq!(first.render(), "12:00 (en)");
    assert_eq!(second.render(), "12:00 (de)");
    assert!(registry.is_resolved("clock"));
}

#[test]
fn unregistered_widget_type_is_listed_but_not_instantiated() {
    let dir = tempdir().unwrap();
    write_widget(dir.path(), "weather.py", "class WeatherWidget(QWidget):\n    pass\n");
    let mut registry = WidgetRegistry::new(
        dir.path(),
        module(&Arc::new(AtomicUsize::new(0))),
        PluginContext::default(),
    );

    assert!(registry.contains("weather"));
    assert!(registry.get_instance("weather", None).is_none());
    assert!(!registry.is_resolved("weather"));
    assert!(registry.get_instance("missing", None).is_none());
}

#[test]
fn widget_rescan_resets_resolution() {
    let dir = tempdir().unwrap();
    write_widget(dir.path(), "clock.py", "class ClockWidget(QWidget):\n    pass\n");
    write_widget(dir.path(), "weather.py", "class WeatherWidget(QWidget):\n    pass\n");
    let mut registry = WidgetRegistry::new(
        dir.path(),
        module(&Arc::new(AtomicUsize::new(0))),
        PluginContext::default(),
    );
    let placed = registry.get_instance("clock", None).unwrap();
    assert!(registry.is_resolved("clock"));
    let before = sorted(registry.list_all(None));

    registry.scan();

    assert!(!registry.is_resolved("clock"));
    assert_eq!(sorted(registry.list_all(None)), before);
    assert_eq!(placed.render(), "12:00 (en)", "handed-out widgets are unaffected");
    assert!(registry.get_instance("clock", None).is_some());
    assert!(registry.is_resolved("clock"));
}
