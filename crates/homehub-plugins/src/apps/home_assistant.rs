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

const CONFIG_FILE: &str = "home_assistant.json";
const STATES_FILE: &str = "home_assistant_states.json";

/// Connection settings, read from the hub's config directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeAssistantConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    /// Entities shown on the app page, in display order.
    #[serde(default)]
    pub entities: Vec<String>,
}

impl HomeAssistantConfig {
    pub fn is_configured(&self) -> bool {
        self.base_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Mirror of the last known entity states. Network access is left to the
/// embedder, which pushes states in through [`HomeAssistantApp::set_state`].
pub struct HomeAssistantApp {
    language: String,
    config_path: PathBuf,
    states_path: PathBuf,
    config: HomeAssistantConfig,
    states: BTreeMap<String, String>,
}

impl HomeAssistantApp {
    pub fn open(ctx: &PluginContext) -> Result<Self, PluginError> {
        let config_path = ctx.config_dir.join(CONFIG_FILE);
        let states_path = ctx.data_file(STATES_FILE);
        Ok(Self {
            language: ctx.language.clone(),
            config: load_json(&config_path)?,
            states: load_json(&states_path)?,
            config_path,
            states_path,
        })
    }

    pub fn config(&self) -> &HomeAssistantConfig {
        &self.config
    }

    pub fn set_state(&mut self, entity: &str, state: &str) -> Result<(), PluginError> {
        let mut states = self.states.clone();
        states.insert(entity.to_string(), state.to_string());
        save_json(&self.states_path, &states)?;
        self.states = states;
        Ok(())
    }

    pub fn state(&self, entity: &str) -> Option<&str> {
        self.states.get(entity).map(String::as_str)
    }

    /// Flip a `light.*` or `switch.*` entity between on and off.
    pub fn toggle(&mut self, entity: &str) -> Result<Option<&str>, PluginError> {
        let toggleable = entity.starts_with("light.") || entity.starts_with("switch.");
        if !toggleable {
            return Ok(None);
        }
        let next = match self.state(entity) {
            Some("on") => "off",
            _ => "on",
        };
        self.set_state(entity, next)?;
        Ok(self.state(entity))
    }
}

impl App for HomeAssistantApp {
    fn id(&self) -> &str {
        "home_assistant"
    }

    fn title(&self) -> String {
        localized(&self.language, "Home Assistant", "Smart Home")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        let mut out = self.title();
        if !self.config.is_configured() {
            out.push('\n');
            out.push_str(&localized(
                &self.language,
                "Not configured",
                "Nicht eingerichtet",
            ));
            return out;
        }
        for entity in &self.config.entities {
            let state = self.state(entity).unwrap_or("?");
            out.push_str(&format!("\n{entity}: {state}"));
        }
        out
    }

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }
}

impl Refreshable for HomeAssistantApp {
    fn refresh(&mut self) -> Result<(), PluginError> {
        self.config = load_json(&self.config_path)?;
        self.states = load_json(&self.states_path)?;
        Ok(())
    }
}

pub struct HomeAssistantAppFactory;

impl AppFactory for HomeAssistantAppFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new("home_assistant", "app", "HomeAssistantApp")
    }

    fn create(&self, ctx: &PluginContext) -> Result<AppHandle, PluginError> {
        Ok(Rc::new(RefCell::new(HomeAssistantApp::open(ctx)?)))
    }
}
