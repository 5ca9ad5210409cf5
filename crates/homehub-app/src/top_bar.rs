use std::collections::BTreeMap;

use homehub_plugin_host::WidgetRegistry;
use homehub_plugin_sdk::Widget;
use tracing::{debug, warn};

pub const TOP_BAR_SLOTS: usize = 5;

/// Fixed row of widget slots across the top of the hub.
///
/// Each slot exclusively owns the widget placed in it.
#[derive(Default)]
pub struct TopBar {
    slots: Vec<Option<Box<dyn Widget>>>,
}

impl TopBar {
    /// Fill the slots from saved positions. Unset slots and widgets that fail
    /// to load stay empty.
    pub fn build(
        positions: &BTreeMap<usize, String>,
        widgets: &mut WidgetRegistry,
        language: &str,
    ) -> Self {
        let slots = (0..TOP_BAR_SLOTS)
            .map(|slot| {
                let id = positions.get(&slot)?;
                let widget = widgets.get_instance(id, Some(language));
                if widget.is_none() {
                    warn!(slot, widget = %id, "top bar widget unavailable");
                }
                widget
            })
            .collect();
        for slot in positions.keys().filter(|slot| **slot >= TOP_BAR_SLOTS) {
            debug!(slot, "ignoring widget position beyond the top bar");
        }
        Self { slots }
    }

    pub fn slot(&self, index: usize) -> Option<&dyn Widget> {
        self.slots.get(index)?.as_deref()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn widgets_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Widget>> {
        self.slots.iter_mut().flatten()
    }

    /// Render every slot; empty slots render as `None`.
    pub fn render(&self) -> Vec<Option<String>> {
        let mut out: Vec<_> = self
            .slots
            .iter()
            .map(|slot| slot.as_ref().map(|widget| widget.render()))
            .collect();
        out.resize(TOP_BAR_SLOTS, None);
        out
    }
}

/// Render a throwaway instance of `id`, independent of any placed widget.
pub fn widget_preview(widgets: &mut WidgetRegistry, id: &str, language: &str) -> Option<String> {
    widgets
        .get_instance(id, Some(language))
        .map(|widget| widget.render())
}
