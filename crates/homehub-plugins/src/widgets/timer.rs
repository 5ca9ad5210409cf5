use std::time::Duration;

use homehub_plugin_sdk::{EntryReference, PluginContext, PluginError, Widget, WidgetFactory};

use crate::localized;

/// Kitchen-style countdown timer. Time only advances through
/// [`TimerWidget::tick`], which the hub drives from its frame loop.
pub struct TimerWidget {
    language: String,
    preset: Duration,
    remaining: Duration,
    running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

impl TimerWidget {
    pub const DEFAULT_PRESET: Duration = Duration::from_secs(5 * 60);

    pub fn new(ctx: &PluginContext) -> Self {
        Self {
            language: ctx.language.clone(),
            preset: Self::DEFAULT_PRESET,
            remaining: Self::DEFAULT_PRESET,
            running: false,
        }
    }

    pub fn set_preset(&mut self, preset: Duration) {
        self.preset = preset;
        self.reset();
    }

    pub fn start(&mut self) {
        if !self.remaining.is_zero() {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.remaining = self.preset;
    }

    /// Advance by `elapsed`. Returns `true` exactly once, when the countdown
    /// reaches zero.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.running = false;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else if self.remaining.is_zero() {
            TimerState::Finished
        } else if self.remaining == self.preset {
            TimerState::Idle
        } else {
            TimerState::Paused
        }
    }
}

impl Widget for TimerWidget {
    fn id(&self) -> &str {
        "timer"
    }

    fn title(&self) -> String {
        localized(&self.language, "Timer", "Timer")
    }

    fn on_language_changed(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn render(&self) -> String {
        if self.state() == TimerState::Finished {
            return localized(&self.language, "Time's up!", "Zeit ist um!");
        }
        let secs = self.remaining.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

pub struct TimerWidgetFactory;

impl WidgetFactory for TimerWidgetFactory {
    fn entry(&self) -> EntryReference {
        EntryReference::new(super::PACKAGE, "timer", "TimerWidget")
    }

    fn create(&self, ctx: &PluginContext) -> Result<Box<dyn Widget>, PluginError> {
        Ok(Box::new(TimerWidget::new(ctx)))
    }
}
