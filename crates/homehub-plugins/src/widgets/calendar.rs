use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use homehub_plugin_sdk::{
    EntryReference, PluginContext, PluginError, Refreshable, Widget, WidgetFactory,
};

use crate::apps::calendar::{CalendarData, CALENDAR_DATA_FILE};
use crate::localized;
use crate::store::load_json;

/// Compact view of the calendar app's upcoming events.
pub struct CalendarWidget {
    language: String,
    path: PathBuf,
    data: CalendarData,
}

impl CalendarWidget {
    pub fn open(ctx: &PluginContext) -> Result<Self, PluginError> {
        let path = ctx.data_file(CALENDAR_DATA_FILE);
        Ok(Self {
            language: ctx.language.clone(),
            data: load_json(&path)?,
            path,
        })
    }

    pub fn render_on(&self, today: NaiveDate) -> String {
        let mut upcoming = self.data.upcoming(today);
        match upcoming.next() {
            None => localized(&self.language, "No upcoming events", "Keine Termine"),
            Some(next) => {
                let more = upcoming.count();
                let mut out = format!("{} {}", next.date.format("%d.%m."), next.title);
                if more > 0 {
                    out.push_str(&format!(" (+{more})"));
                }
                out
            }
        }
    }
}

impl Widget for CalendarWidget {
    fn id(&self) -> &str {
        "calendar"
    }

    fn title(&self) -> String {
        localized(&self.language, "Calendar", "Kalender")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        self.render_on(Local::now().date_naive())
    }

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }
}

impl Refreshable for CalendarWidget {
    fn refresh(&mut self) -> Result<(), PluginError> {
        self.data = load_json(&self.path)?;
        Ok(())
    }
}

pub struct CalendarWidgetFactory;

impl WidgetFactory for CalendarWidgetFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new(super::PACKAGE, "calendar", "CalendarWidget")
    }

    fn create(&self, ctx: &PluginContext) -> Result<Box<dyn Widget>, PluginError> {
        Ok(Box::new(CalendarWidget::open(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::apps::CalendarApp;

    #[test]
    fn shows_next_event_from_calendar_app_data() {
        let dir = tempdir().unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();

        let mut widget = CalendarWidget::open(&ctx).unwrap();
        assert_eq!(widget.render_on(day(1)), "No upcoming events");

        let mut app = CalendarApp::open(&ctx).unwrap();
        app.add_event(day(1), "Past").unwrap();
        app.add_event(day(10), "Dentist").unwrap();
        app.add_event(day(12), "Party").unwrap();

        widget.refresh().unwrap();
        assert_eq!(widget.render_on(day(5)), "10.06. Dentist (+1)");
    }
}
