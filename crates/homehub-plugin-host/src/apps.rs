use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use homehub_plugin_db::{scan_apps, AppMetadata, DiscoveryError};
use homehub_plugin_sdk::{AppFactory, AppHandle, PluginContext, PluginModule};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::HostError;
use crate::{DEFAULT_LANGUAGE, UNKNOWN_APP_NAME};

/// Where an app id is in its lifecycle. Ids that were never scanned have no
/// state at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Cataloged,
    TypeResolved,
    Instantiated,
}

struct AppDescriptor {
    metadata: AppMetadata,
    factory: Option<Arc<dyn AppFactory>>,
    instance: Option<AppHandle>,
}

impl AppDescriptor {
    fn new(metadata: AppMetadata) -> Self {
        Self {
            metadata,
            factory: None,
            instance: None,
        }
    }

    fn state(&self) -> AppState {
        if self.instance.is_some() {
            AppState::Instantiated
        } else if self.factory.is_some() {
            AppState::TypeResolved
        } else {
            AppState::Cataloged
        }
    }
}

/// Live instances the registry let go of during a rescan.
///
/// The registry no longer references them; whoever receives this decides
/// whether they stay alive. Dropping it releases the registry's share only,
/// handles placed elsewhere keep their app.
#[must_use = "orphaned apps are dropped unless the caller keeps them"]
#[derive(Default)]
pub struct Rescan {
    pub orphaned: Vec<(String, AppHandle)>,
}

impl Rescan {
    pub fn is_empty(&self) -> bool {
        self.orphaned.is_empty()
    }

    /// The orphaned handle for `id`, if one was live before the rescan.
    pub fn take(&mut self, id: &str) -> Option<AppHandle> {
        let index = self.orphaned.iter().position(|(orphan, _)| orphan == id)?;
        Some(self.orphaned.swap_remove(index).1)
    }
}

impl fmt::Debug for Rescan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rescan")
            .field(
                "orphaned",
                &self.orphaned.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Catalog of apps found in a directory, plus the single live instance of
/// each app that has been requested.
pub struct AppRegistry {
    apps_dir: PathBuf,
    module: Arc<PluginModule>,
    base: PluginContext,
    catalog: Catalog<AppDescriptor>,
    errors: Vec<DiscoveryError>,
}

impl AppRegistry {
    /// Create the registry and scan `apps_dir` right away.
    pub fn new(
        apps_dir: impl Into<PathBuf>,
        module: Arc<PluginModule>,
        base: PluginContext,
    ) -> Self {
        let mut registry = Self {
            apps_dir: apps_dir.into(),
            module,
            base,
            catalog: Catalog::default(),
            errors: Vec::new(),
        };
        let initial = registry.scan();
        debug_assert!(initial.is_empty());
        registry
    }

    pub fn apps_dir(&self) -> &Path {
        &self.apps_dir
    }

    /// Replace the catalog with a fresh scan of the apps directory.
    ///
    /// Resolved types and cached instances of the old catalog are dropped
    /// from the registry; live instances are handed back in the [`Rescan`].
    pub fn scan(&mut self) -> Rescan {
        let report = scan_apps(&self.apps_dir);
        let catalog = Catalog::from_descriptors(
            report
                .entries
                .into_iter()
                .map(|metadata| (metadata.id.clone(), AppDescriptor::new(metadata))),
        );
        info!(
            path = %self.apps_dir.display(),
            count = catalog.len(),
            errors = report.errors.len(),
            "scanned apps"
        );
        let previous = std::mem::replace(&mut self.catalog, catalog);
        self.errors = report.errors;
        Rescan {
            orphaned: previous
                .into_iter()
                .filter_map(|(id, descriptor)| descriptor.instance.map(|app| (id, app)))
                .collect(),
        }
    }

    /// Every cataloged app with its display name resolved for `active_language`.
    pub fn list_all(&self, active_language: Option<&str>) -> Vec<CatalogEntry> {
        self.catalog
            .iter()
            .map(|(id, descriptor)| {
                CatalogEntry::new(
                    id,
                    descriptor.metadata.name.resolve(
                        active_language,
                        DEFAULT_LANGUAGE,
                        UNKNOWN_APP_NAME,
                    ),
                )
            })
            .collect()
    }

    /// The live instance for `id`, constructing it on first request.
    ///
    /// `active_language` only matters for that first construction; later
    /// language changes reach the app through `App::on_language_changed`.
    /// Unknown ids and apps that fail to resolve or construct yield `None`.
    pub fn get_instance(&mut self, id: &str, active_language: Option<&str>) -> Option<AppHandle> {
        let ctx = self.context_for(active_language);
        let descriptor = self.catalog.get_mut(id)?;
        if let Some(app) = &descriptor.instance {
            return Some(Rc::clone(app));
        }

        let factory = match descriptor.factory.as_ref() {
            Some(factory) => Arc::clone(factory),
            None => match resolve(&self.module, &descriptor.metadata) {
                Ok(factory) => {
                    debug!(app_id = id, "resolved app type");
                    descriptor.factory = Some(Arc::clone(&factory));
                    factory
                }
                Err(err) => {
                    warn!(app_id = id, error = %err, "error loading app");
                    return None;
                }
            },
        };

        match factory.create(&ctx) {
            Ok(app) => {
                info!(app_id = id, language = %ctx.language, "instantiated app");
                descriptor.instance = Some(Rc::clone(&app));
                Some(app)
            }
            Err(source) => {
                let err = HostError::Construction {
                    id: id.to_string(),
                    source,
                };
                warn!(app_id = id, error = %err, "error instantiating app");
                None
            }
        }
    }

    pub fn state(&self, id: &str) -> Option<AppState> {
        self.catalog.get(id).map(AppDescriptor::state)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.catalog.contains(id)
    }

    /// Apps that currently have an instance, in catalog order.
    pub fn live_instances(&self) -> Vec<(String, AppHandle)> {
        self.catalog
            .iter()
            .filter_map(|(id, descriptor)| {
                descriptor
                    .instance
                    .as_ref()
                    .map(|app| (id.to_string(), Rc::clone(app)))
            })
            .collect()
    }

    /// Discovery errors from the most recent scan.
    pub fn last_errors(&self) -> &[DiscoveryError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Update the context handed to apps constructed from now on.
    pub fn set_base_context(&mut self, base: PluginContext) {
        self.base = base;
    }

    fn context_for(&self, active_language: Option<&str>) -> PluginContext {
        match active_language {
            Some(language) => self.base.clone().with_language(language),
            None => self.base.clone(),
        }
    }
}

fn resolve(
    module: &PluginModule,
    metadata: &AppMetadata,
) -> Result<Arc<dyn AppFactory>, HostError> {
    let entry = metadata
        .entry
        .as_ref()
        .ok_or_else(|| HostError::MissingEntry(metadata.id.clone()))?;
    module
        .resolve_app(entry)
        .ok_or_else(|| HostError::Unresolved(entry.clone()))
}

impl fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRegistry")
            .field("apps_dir", &self.apps_dir)
            .field("app_ids", &self.catalog.ids().collect::<Vec<_>>())
            .field("live", &self.live_instances().len())
            .finish()
    }
}
