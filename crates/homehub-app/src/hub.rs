use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use homehub_plugin_host::{AppRegistry, CatalogEntry, WidgetRegistry};
use homehub_plugin_sdk::{AppHandle, PluginContext, PluginModule};
use tracing::{debug, info, warn};

use crate::dashboard::{build_tiles, Tile};
use crate::language::LanguageManager;
use crate::paths::HubPaths;
use crate::settings::SettingsStore;
use crate::top_bar::{widget_preview, TopBar};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Dashboard,
    App(String),
}

struct Placement {
    id: String,
    app: AppHandle,
}

/// The area an app is shown in. Holds at most one app; placing another
/// releases the previous placement without destroying the app.
#[derive(Default)]
pub struct ContentArea {
    placed: Option<Placement>,
}

impl ContentArea {
    fn place(&mut self, id: &str, app: AppHandle) {
        if let Some(previous) = self.placed.replace(Placement {
            id: id.to_string(),
            app,
        }) {
            debug!(app_id = %previous.id, "released content area");
        }
    }

    fn release(&mut self) {
        self.placed = None;
    }

    pub fn active_id(&self) -> Option<&str> {
        self.placed.as_ref().map(|placement| placement.id.as_str())
    }

    pub fn active(&self) -> Option<&AppHandle> {
        self.placed.as_ref().map(|placement| &placement.app)
    }

    pub fn render(&self) -> Option<String> {
        let app = self.active()?.borrow();
        Some(app.render())
    }
}

/// Files removed and failures collected by [`Hub::reset_data`].
#[derive(Debug, Default)]
pub struct ResetReport {
    pub deleted: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// The launcher shell: registries, settings, the top bar and the content
/// area, wired together.
pub struct Hub {
    paths: HubPaths,
    settings: SettingsStore,
    languages: LanguageManager,
    apps: AppRegistry,
    widgets: WidgetRegistry,
    top_bar: TopBar,
    content: ContentArea,
    view: View,
}

impl Hub {
    pub fn new(paths: HubPaths, module: PluginModule) -> Result<Self> {
        paths
            .ensure_dirs()
            .with_context(|| format!("create hub directories under {}", paths.root.display()))?;
        let settings = SettingsStore::open(&paths.config_dir);
        let mut languages = LanguageManager::new(&paths.languages_dir);
        languages.load_language(&settings.language());

        let base = PluginContext::new(languages.current_language())
            .with_data_dir(&paths.data_dir)
            .with_config_dir(&paths.config_dir);
        let module = Arc::new(module);
        let apps = AppRegistry::new(&paths.apps_dir, Arc::clone(&module), base.clone());
        let widgets = WidgetRegistry::new(&paths.widgets_dir, module, base);

        let mut hub = Self {
            paths,
            settings,
            languages,
            apps,
            widgets,
            top_bar: TopBar::default(),
            content: ContentArea::default(),
            view: View::Dashboard,
        };
        hub.populate_first_run();
        hub.rebuild_top_bar();
        info!(
            apps = hub.apps.len(),
            widgets = hub.widgets.len(),
            language = hub.languages.current_language(),
            "hub ready"
        );
        Ok(hub)
    }

    /// Enable everything that was discovered when nothing is enabled yet.
    fn populate_first_run(&mut self) {
        if self.settings.enabled_apps().is_empty() {
            let ids = self.list_apps().into_iter().map(|entry| entry.id).collect();
            if let Err(err) = self.settings.set_enabled_apps(ids) {
                warn!(error = %err, "failed to persist enabled apps");
            }
        }
        if self.settings.enabled_widgets().is_empty() {
            let ids = self.list_widgets().into_iter().map(|entry| entry.id).collect();
            if let Err(err) = self.settings.set_enabled_widgets(ids) {
                warn!(error = %err, "failed to persist enabled widgets");
            }
        }
    }

    pub fn paths(&self) -> &HubPaths {
        &self.paths
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn languages(&self) -> &LanguageManager {
        &self.languages
    }

    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn top_bar(&self) -> &TopBar {
        &self.top_bar
    }

    pub fn content(&self) -> &ContentArea {
        &self.content
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn active_app_id(&self) -> Option<&str> {
        match &self.view {
            View::App(id) => Some(id),
            View::Dashboard => None,
        }
    }

    pub fn language(&self) -> &str {
        self.languages.current_language()
    }

    pub fn translate(&self, key: &str) -> String {
        self.languages.translate(key, None)
    }

    pub fn list_apps(&self) -> Vec<CatalogEntry> {
        self.apps.list_all(Some(self.languages.current_language()))
    }

    pub fn list_widgets(&self) -> Vec<CatalogEntry> {
        self.widgets.list_all(Some(self.languages.current_language()))
    }

    /// Show app `id` in the content area. Returns `false` and leaves the
    /// current view alone when the app cannot be instantiated.
    pub fn launch_app(&mut self, id: &str) -> bool {
        let language = self.languages.current_language().to_string();
        let Some(app) = self.apps.get_instance(id, Some(&language)) else {
            warn!(app_id = id, "cannot launch app");
            return false;
        };
        self.content.place(id, app);
        self.view = View::App(id.to_string());
        info!(app_id = id, "launched app");
        true
    }

    /// Return to the dashboard. The app stays cached in its registry.
    pub fn show_dashboard(&mut self) {
        self.content.release();
        self.view = View::Dashboard;
    }

    pub fn dashboard_tiles(&mut self) -> Vec<Tile> {
        let language = self.languages.current_language().to_string();
        build_tiles(&self.settings.app_positions(), &mut self.apps, &language)
    }

    pub fn rebuild_top_bar(&mut self) {
        let language = self.languages.current_language().to_string();
        self.top_bar = TopBar::build(&self.settings.widget_positions(), &mut self.widgets, &language);
    }

    pub fn widget_preview(&mut self, id: &str) -> Option<String> {
        let language = self.languages.current_language().to_string();
        widget_preview(&mut self.widgets, id, &language)
    }

    /// Persist `code`, load its translations and tell every live app and
    /// top-bar widget about it.
    pub fn set_language(&mut self, code: &str) {
        if let Err(err) = self.settings.set_language(code) {
            warn!(language = code, error = %err, "failed to persist language");
        }
        self.languages.load_language(code);
        for (id, app) in self.live_apps() {
            debug!(app_id = %id, language = code, "notifying app of language change");
            app.borrow_mut().on_language_changed(code);
        }
        for widget in self.top_bar.widgets_mut() {
            widget.on_language_changed(code);
        }
        info!(language = code, "language changed");
    }

    /// Delete every file in the data directory, then let live apps and
    /// top-bar widgets reload their state.
    pub fn reset_data(&mut self) -> ResetReport {
        let mut report = ResetReport::default();
        match fs::read_dir(&self.paths.data_dir) {
            Ok(entries) => {
                for entry in entries.filter_map(|entry| entry.ok()) {
                    let path = entry.path();
                    if !path.is_file() {
                        continue;
                    }
                    match fs::remove_file(&path) {
                        Ok(()) => report.deleted.push(path),
                        Err(err) => report
                            .errors
                            .push(format!("failed to delete {}: {err}", path.display())),
                    }
                }
            }
            Err(err) => report.errors.push(format!(
                "failed to read {}: {err}",
                self.paths.data_dir.display()
            )),
        }
        info!(
            deleted = report.deleted.len(),
            errors = report.errors.len(),
            "application data reset"
        );

        for (id, app) in self.live_apps() {
            let mut app = app.borrow_mut();
            if let Some(refreshable) = app.as_refreshable() {
                if let Err(err) = refreshable.refresh() {
                    warn!(app_id = %id, error = %err, "failed to refresh app");
                }
            }
        }
        for widget in self.top_bar.widgets_mut() {
            let id = widget.id().to_string();
            if let Some(refreshable) = widget.as_refreshable() {
                if let Err(err) = refreshable.refresh() {
                    warn!(widget_id = %id, error = %err, "failed to refresh widget");
                }
            }
        }
        report
    }

    /// Rescan both plugin directories and rebuild the top bar.
    ///
    /// Instances dropped from the app cache stay alive while the content area
    /// still shows them; they go away on the next navigation.
    pub fn rescan(&mut self) {
        let rescan = self.apps.scan();
        if !rescan.is_empty() {
            debug!(
                orphaned = rescan.orphaned.len(),
                active = ?self.content.active_id(),
                "released cached apps after rescan"
            );
        }
        drop(rescan);
        self.widgets.scan();
        self.rebuild_top_bar();
    }

    /// Apps with a live instance: the registry cache plus a placement that a
    /// rescan orphaned.
    fn live_apps(&self) -> Vec<(String, AppHandle)> {
        let mut live = self.apps.live_instances();
        if let Some(placement) = &self.content.placed {
            if !live.iter().any(|(_, app)| Rc::ptr_eq(app, &placement.app)) {
                live.push((placement.id.clone(), Rc::clone(&placement.app)));
            }
        }
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_area_holds_one_placement() {
        let mut area = ContentArea::default();
        assert!(area.render().is_none());
        let dir = tempfile::tempdir().unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        let module = homehub_plugins::builtin_module();
        let make = |package: &str, type_name: &str| {
            let entry = homehub_plugin_sdk::EntryReference::new(package, "app", type_name);
            module.resolve_app(&entry).unwrap().create(&ctx).unwrap()
        };

        area.place("calendar", make("calendar", "CalendarApp"));
        area.place("whiteboard", make("whiteboard", "WhiteboardApp"));
        assert_eq!(area.active_id(), Some("whiteboard"));
        assert_eq!(area.render().as_deref(), Some("Whiteboard\n0 strokes"));
        area.release();
        assert!(area.active().is_none());
    }
}
