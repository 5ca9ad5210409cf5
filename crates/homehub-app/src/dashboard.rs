use std::collections::BTreeMap;

use homehub_plugin_host::{AppRegistry, CatalogEntry};
use serde::Serialize;

use crate::settings::GridPosition;

pub const DASHBOARD_COLUMNS: usize = 3;

/// One launchable app on the dashboard grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub id: String,
    pub name: String,
    pub row: usize,
    pub col: usize,
    /// Rendering of the app instance, `None` when it cannot be created.
    pub preview: Option<String>,
}

/// Row-major fill of `entries` over [`DASHBOARD_COLUMNS`] columns.
pub fn default_positions(entries: &[CatalogEntry]) -> BTreeMap<String, GridPosition> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let position = GridPosition::new(index / DASHBOARD_COLUMNS, index % DASHBOARD_COLUMNS);
            (entry.id.clone(), position)
        })
        .collect()
}

/// Build the dashboard tiles.
///
/// Saved positions win; without any, every cataloged app is laid out with
/// [`default_positions`]. Positions naming apps that are no longer cataloged
/// are skipped. Previews instantiate apps through the registry cache.
pub fn build_tiles(
    saved: &BTreeMap<String, GridPosition>,
    apps: &mut AppRegistry,
    language: &str,
) -> Vec<Tile> {
    let entries = apps.list_all(Some(language));
    let positions = if saved.is_empty() {
        default_positions(&entries)
    } else {
        saved.clone()
    };

    let mut tiles: Vec<Tile> = entries
        .into_iter()
        .filter_map(|entry| {
            let position = positions.get(&entry.id)?;
            let preview = apps
                .get_instance(&entry.id, Some(language))
                .map(|app| {
                    let app = app.borrow();
                    app.render()
                });
            Some(Tile {
                row: position.row,
                col: position.col,
                preview,
                id: entry.id,
                name: entry.name,
            })
        })
        .collect();
    tiles.sort_by_key(|tile| (tile.row, tile.col));
    tiles
}
