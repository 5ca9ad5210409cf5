//! Top-bar widgets. Every widget type lives in `widgets.<file stem>`.

pub mod calendar;
pub mod clock;
pub mod timer;
pub mod volume;
pub mod weather;

pub use calendar::CalendarWidget;
pub use clock::ClockWidget;
pub use timer::TimerWidget;
pub use volume::VolumeControlWidget;
pub use weather::WeatherWidget;

/// Package every widget entry reference uses.
pub(crate) const PACKAGE: &str = "widgets";
