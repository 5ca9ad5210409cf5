use chrono::{DateTime, Local, TimeZone};
use homehub_plugin_sdk::{EntryReference, PluginContext, PluginError, Widget, WidgetFactory};

use crate::localized;

const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%A, %-d. %B %Y";

/// Current time and date. Reads the wall clock on every render.
pub struct ClockWidget {
    language: String,
    show_date: bool,
}

impl ClockWidget {
    pub fn new(ctx: &PluginContext) -> Self {
        Self {
            language: ctx.language.clone(),
            show_date: true,
        }
    }

    pub fn set_show_date(&mut self, show: bool) {
        self.show_date = show;
    }

    pub fn render_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let time = now.format(TIME_FORMAT).to_string();
        if !self.show_date {
            return time;
        }
        format!("{time}\n{}", now.format(DATE_FORMAT))
    }
}

impl Widget for ClockWidget {
    fn id(&self) -> &str {
        "clock"
    }

    fn title(&self) -> String {
        localized(&self.language, "Clock", "Uhr")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        self.render_at(&Local::now())
    }
}

pub struct ClockWidgetFactory;

impl WidgetFactory for ClockWidgetFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new(super::PACKAGE, "clock", "ClockWidget")
    }

    fn create(&self, ctx: &PluginContext) -> Result<Box<dyn Widget>, PluginError> {
        Ok(Box::new(ClockWidget::new(ctx)))
    }
}
