use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::NaiveDate;
use homehub_plugin_sdk::{
    App, AppFactory, AppHandle, EntryReference, PluginContext, PluginError, Refreshable,
};
use serde::{Deserialize, Serialize};

use crate::localized;
use crate::store::{load_json, save_json};

/// Data file shared with the calendar widget.
pub const CALENDAR_DATA_FILE: &str = "calendar.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CalendarData {
    pub events: Vec<CalendarEvent>,
}

impl CalendarData {
    pub(crate) fn upcoming(&self, from: NaiveDate) -> impl Iterator<Item = &CalendarEvent> {
        self.events.iter().filter(move |event| event.date >= from)
    }
}

pub struct CalendarApp {
    language: String,
    path: PathBuf,
    data: CalendarData,
}

impl CalendarApp {
    pub fn open(ctx: &PluginContext) -> Result<Self, PluginError> {
        let path = ctx.data_file(CALENDAR_DATA_FILE);
        let data = load_json(&path)?;
        Ok(Self {
            language: ctx.language.clone(),
            path,
            data,
        })
    }

    pub fn add_event(&mut self, date: NaiveDate, title: impl Into<String>) -> Result<(), PluginError> {
        let mut data = self.data.clone();
        data.events.push(CalendarEvent {
            date,
            title: title.into(),
        });
        data.events.sort_by(|a, b| a.date.cmp(&b.date));
        save_json(&self.path, &data)?;
        self.data = data;
        Ok(())
    }

    pub fn events_by_day(&self) -> BTreeMap<NaiveDate, Vec<&str>> {
        let mut days: BTreeMap<NaiveDate, Vec<&str>> = BTreeMap::new();
        for event in &self.data.events {
            days.entry(event.date).or_default().push(&event.title);
        }
        days
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.data.events
    }
}

impl App for CalendarApp {
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
        let mut out = self.title();
        if self.data.events.is_empty() {
            out.push('\n');
            out.push_str(&localized(&self.language, "No events", "Keine Termine"));
        }
        for (day, titles) in self.events_by_day() {
            out.push_str(&format!("\n{day}: {}", titles.join(", ")));
        }
        out
    }

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }
}

impl Refreshable for CalendarApp {
    fn refresh(&mut self) -> Result<(), PluginError> {
        self.data = load_json(&self.path)?;
        Ok(())
    }
}

pub struct CalendarAppFactory;

impl AppFactory for CalendarAppFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new("calendar", "app", "CalendarApp")
    }

    fn create(&self, ctx: &PluginContext) -> Result<AppHandle, PluginError> {
        Ok(Rc::new(RefCell::new(CalendarApp::open(ctx)?)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn events_persist_and_refresh_after_reset() {
        let dir = tempdir().unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        let mut app = CalendarApp::open(&ctx).unwrap();
        app.add_event(date(2024, 5, 2), "Dentist").unwrap();
        app.add_event(date(2024, 5, 1), "Groceries").unwrap();
        assert_eq!(app.events()[0].title, "Groceries");

        let reopened = CalendarApp::open(&ctx).unwrap();
        assert_eq!(reopened.events().len(), 2);

        std::fs::remove_file(dir.path().join(CALENDAR_DATA_FILE)).unwrap();
        app.refresh().unwrap();
        assert!(app.events().is_empty());
    }

    #[test]
    fn render_follows_language() {
        let dir = tempdir().unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        let mut app = CalendarApp::open(&ctx).unwrap();
        assert_eq!(app.render(), "Calendar\nNo events");
        app.on_language_changed("de");
        assert_eq!(app.render(), "Kalender\nKeine Termine");
    }
}
