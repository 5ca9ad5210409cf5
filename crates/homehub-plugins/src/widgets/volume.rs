use homehub_plugin_sdk::{EntryReference, PluginContext, PluginError, Widget, WidgetFactory};

use crate::localized;

pub const MAX_VOLUME: u8 = 100;
const DEFAULT_VOLUME: u8 = 50;
const STEP: u8 = 5;

/// Output volume slider with mute.
pub struct VolumeControlWidget {
    language: String,
    level: u8,
    muted: bool,
}

impl VolumeControlWidget {
    pub fn new(ctx: &PluginContext) -> Self {
        Self {
            language: ctx.language.clone(),
            level: DEFAULT_VOLUME,
            muted: false,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level actually applied to the output; zero while muted.
    pub fn effective_level(&self) -> u8 {
        if self.muted {
            0
        } else {
            self.level
        }
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(MAX_VOLUME);
    }

    pub fn step_up(&mut self) {
        self.set_level(self.level.saturating_add(STEP));
    }

    pub fn step_down(&mut self) {
        self.set_level(self.level.saturating_sub(STEP));
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }
}

impl Widget for VolumeControlWidget {
    fn id(&self) -> &str {
        "volume_control"
    }

    fn title(&self) -> String {
        localized(&self.language, "Volume", "Lautstärke")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        if self.muted {
            return localized(&self.language, "Muted", "Stumm");
        }
        format!("{}%", self.level)
    }
}

pub struct VolumeControlWidgetFactory;

impl WidgetFactory for VolumeControlWidgetFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new(super::PACKAGE, "volume_control", "VolumeControlWidget")
    }

    fn create(&self, ctx: &PluginContext) -> Result<Box<dyn Widget>, PluginError> {
        Ok(Box::new(VolumeControlWidget::new(ctx)))
    }
}
