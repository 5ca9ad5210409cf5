use std::path::PathBuf;

use homehub_plugin_sdk::{
    EntryReference, PluginContext, PluginError, Refreshable, Widget, WidgetFactory,
};
use serde::{Deserialize, Serialize};

use crate::localized;
use crate::store::load_json;

/// Latest reading written by whatever feeds the hub its weather data. It is
/// application data, so a hub data reset clears it.
pub const WEATHER_DATA_FILE: &str = "weather.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    #[serde(default)]
    pub location: Option<String>,
    pub temperature_c: Option<f32>,
    #[serde(default)]
    pub condition: Option<String>,
}

pub struct WeatherWidget {
    language: String,
    path: PathBuf,
    reading: WeatherReading,
}

impl WeatherWidget {
    pub fn open(ctx: &PluginContext) -> Result<Self, PluginError> {
        let path = ctx.data_file(WEATHER_DATA_FILE);
        Ok(Self {
            language: ctx.language.clone(),
            reading: load_json(&path)?,
            path,
        })
    }

    pub fn reading(&self) -> &WeatherReading {
        &self.reading
    }
}

impl Widget for WeatherWidget {
    fn id(&self) -> &str {
        "weather"
    }

    fn title(&self) -> String {
        localized(&self.language, "Weather", "Wetter")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        let Some(temperature) = self.reading.temperature_c else {
            return localized(&self.language, "No data", "Keine Daten");
        };
        let mut out = format!("{temperature:.0}°C");
        if let Some(condition) = &self.reading.condition {
            out.push(' ');
            out.push_str(condition);
        }
        if let Some(location) = &self.reading.location {
            out.push_str(&format!(" ({location})"));
        }
        out
    }

    fn as_refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }
}

impl Refreshable for WeatherWidget {
    fn refresh(&mut self) -> Result<(), PluginError> {
        self.reading = load_json(&self.path)?;
        Ok(())
    }
}

pub struct WeatherWidgetFactory;

impl WidgetFactory for WeatherWidgetFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new(super::PACKAGE, "weather", "WeatherWidget")
    }

    fn create(&self, ctx: &PluginContext) -> Result<Box<dyn Widget>, PluginError> {
        Ok(Box::new(WeatherWidget::open(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn renders_reading_after_refresh() {
        let dir = tempdir().unwrap();
        let ctx = PluginContext::new("de").with_data_dir(dir.path());
        let mut widget = WeatherWidget::open(&ctx).unwrap();
        assert_eq!(widget.render(), "Keine Daten");

        std::fs::write(
            dir.path().join(WEATHER_DATA_FILE),
            r#"{"location": "Berlin", "temperature_c": 18.4, "condition": "Sonnig"}"#,
        )
        .unwrap();
        widget.refresh().unwrap();
        assert_eq!(widget.render(), "18°C Sonnig (Berlin)");
    }

    #[test]
    fn corrupt_reading_fails_construction() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(WEATHER_DATA_FILE), "{").unwrap();
        let ctx = PluginContext::default().with_data_dir(dir.path());
        assert!(matches!(
            WeatherWidgetFactory.create(&ctx),
            Err(PluginError::Data(_))
        ));
    }
}
