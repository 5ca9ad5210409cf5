use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use homehub_plugin_sdk::{
    App, AppFactory, AppHandle, EntryReference, PluginContext, PluginError, Refreshable,
};
use serde::{Deserialize, Serialize};

use crate::localized;
use crate::store::{load_json, save_json};

const DATA_FILE: &str = "pantry.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    pub quantity: f64,
    pub unit: String,
    pub barcode: Option<String>,
}

/// Household inventory keyed by item name.
pub struct PantryApp {
    language: String,
    path: PathBuf,
    items: BTreeMap<String, PantryItem>,
}

impl PantryApp {
    pub fn open(ctx: &PluginContext) -> Result<Self, PluginError> {
        let path = ctx.data_file(DATA_FILE);
        Ok(Self {
            language: ctx.language.clone(),
            items: load_json(&path)?,
            path,
        })
    }

    /// Add stock, creating the item if needed.
    pub fn stock(
        &mut self,
        name: &str,
        quantity: f64,
        unit: &str,
        barcode: Option<String>,
    ) -> Result<(), PluginError> {
        let mut items = self.items.clone();
        let item = items
            .entry(name.to_string())
            .or_insert_with(|| PantryItem {
                quantity: 0.0,
                unit: unit.to_string(),
                barcode: None,
            });
        item.quantity += quantity;
        if barcode.is_some() {
            item.barcode = barcode;
        }
        self.commit(items)
    }

    /// Take `quantity` away; items that run out are removed. Returns the
    /// remaining quantity, or `None` for unknown items.
    pub fn consume(&mut self, name: &str, quantity: f64) -> Result<Option<f64>, PluginError> {
        let mut items = self.items.clone();
        let Some(item) = items.get_mut(name) else {
            return Ok(None);
        };
        item.quantity = (item.quantity - quantity).max(0.0);
        let remaining = item.quantity;
        if remaining <= f64::EPSILON {
            items.remove(name);
        }
        self.commit(items)?;
        Ok(Some(remaining))
    }

    /// Persist `items`, and only then make them the visible state.
    fn commit(&mut self, items: BTreeMap<String, PantryItem>) -> Result<(), PluginError> {
        save_json(&self.path, &items)?;
        self.items = items;
        Ok(())
    }

    pub fn find_by_barcode(&self, barcode: &str) -> Option<(&str, &PantryItem)> {
        self.items
            .iter()
            .find(|(_, item)| item.barcode.as_deref() == Some(barcode))
            .map(|(name, item)| (name.as_str(), item))
    }

    pub fn items(&self) -> &BTreeMap<String, PantryItem> {
        &self.items
    }
}

impl App for PantryApp {
    fn id(&self) -> &str {
        "pantry_manager"
    }

    fn title(&self) -> String {
        localized(&self.language, "Pantry", "Vorratskammer")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        let mut out = self.title();
        for (name, item) in &self.items {
            out.push_str(&format!("\n{name}: {} {}", item.quantity, item.unit));
        }
        out
    }

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }
}

impl Refreshable for PantryApp {
    fn refresh(&mut self) -> Result<(), PluginError> {
        self.items = load_json(&self.path)?;
        Ok(())
    }
}

pub struct PantryAppFactory;

impl AppFactory for PantryAppFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new("pantry_manager", "app", "PantryApp")
    }

    fn create(&self, ctx: &PluginContext) -> Result<AppHandle, PluginError> {
        Ok(Rc::new(RefCell::new(PantryApp::open(ctx)?)))
    }
}
