use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use homehub_plugin_db::{scan_widgets, DiscoveryError, WidgetMetadata, WidgetScanConfig};
use homehub_plugin_sdk::{PluginContext, PluginModule, Widget, WidgetFactory};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::HostError;

struct WidgetDescriptor {
    metadata: WidgetMetadata,
    factory: Option<Arc<dyn WidgetFactory>>,
}

/// Catalog of widget files found in a directory.
///
/// Unlike apps, widget objects are never cached: each request builds a new
/// one that belongs to the caller alone.
pub struct WidgetRegistry {
    widgets_dir: PathBuf,
    config: WidgetScanConfig,
    module: Arc<PluginModule>,
    base: PluginContext,
    catalog: Catalog<WidgetDescriptor>,
    errors: Vec<DiscoveryError>,
}

impl WidgetRegistry {
    pub fn new(
        widgets_dir: impl Into<PathBuf>,
        module: Arc<PluginModule>,
        base: PluginContext,
    ) -> Self {
        Self::with_config(widgets_dir, WidgetScanConfig::default(), module, base)
    }

    pub fn with_config(
        widgets_dir: impl Into<PathBuf>,
        config: WidgetScanConfig,
        module: Arc<PluginModule>,
        base: PluginContext,
    ) -> Self {
        let mut registry = Self {
            widgets_dir: widgets_dir.into(),
            config,
            module,
            base,
            catalog: Catalog::default(),
            errors: Vec::new(),
        };
        registry.scan();
        registry
    }

    pub fn widgets_dir(&self) -> &Path {
        &self.widgets_dir
    }

    /// Replace the catalog with a fresh scan of the widgets directory.
    pub fn scan(&mut self) {
        let report = scan_widgets(&self.widgets_dir, &self.config);
        let catalog = Catalog::from_descriptors(report.entries.into_iter().map(|metadata| {
            (
                metadata.id.clone(),
                WidgetDescriptor {
                    metadata,
                    factory: None,
                },
            )
        }));
        info!(
            path = %self.widgets_dir.display(),
            count = catalog.len(),
            errors = report.errors.len(),
            "scanned widgets"
        );
        self.catalog = catalog;
        self.errors = report.errors;
    }

    /// Every cataloged widget. Widget names come from type names and are the
    /// same in every language.
    pub fn list_all(&self, _active_language: Option<&str>) -> Vec<CatalogEntry> {
        self.catalog
            .iter()
            .map(|(id, descriptor)| CatalogEntry::new(id, descriptor.metadata.name.as_str()))
            .collect()
    }

    /// Build a new instance of widget `id`.
    pub fn get_instance(
        &mut self,
        id: &str,
        active_language: Option<&str>,
    ) -> Option<Box<dyn Widget>> {
        let ctx = match active_language {
            Some(language) => self.base.clone().with_language(language),
            None => self.base.clone(),
        };
        let descriptor = self.catalog.get_mut(id)?;
        let factory = match descriptor.factory.as_ref() {
            Some(factory) => Arc::clone(factory),
            None => {
                let entry = &descriptor.metadata.entry;
                match self.module.resolve_widget(entry) {
                    Some(factory) => {
                        debug!(widget_id = id, entry = %entry, "resolved widget type");
                        descriptor.factory = Some(Arc::clone(&factory));
                        factory
                    }
                    None => {
                        let err = HostError::Unresolved(entry.clone());
                        warn!(widget_id = id, error = %err, "error loading widget");
                        return None;
                    }
                }
            }
        };
        match factory.create(&ctx) {
            Ok(widget) => Some(widget),
            Err(source) => {
                let err = HostError::Construction {
                    id: id.to_string(),
                    source,
                };
                warn!(widget_id = id, error = %err, "error instantiating widget");
                None
            }
        }
    }

    /// Whether the type behind `id` has been resolved since the last scan.
    pub fn is_resolved(&self, id: &str) -> bool {
        self.catalog
            .get(id)
            .is_some_and(|descriptor| descriptor.factory.is_some())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.catalog.contains(id)
    }

    pub fn last_errors(&self) -> &[DiscoveryError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn set_base_context(&mut self, base: PluginContext) {
        self.base = base;
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("widgets_dir", &self.widgets_dir)
            .field("widget_ids", &self.catalog.ids().collect::<Vec<_>>())
            .finish()
    }
}
