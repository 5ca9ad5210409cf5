use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// What the hub sees of a cataloged plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Id-keyed descriptors in scan order.
///
/// A catalog is never edited in place by a scan: the registry builds a new
/// one and swaps it in.
#[derive(Debug)]
pub struct Catalog<D> {
    entries: IndexMap<String, D>,
}

impl<D> Default for Catalog<D> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<D> Catalog<D> {
    /// Build a catalog; when an id repeats, the later descriptor wins.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = (String, D)>) -> Self {
        let mut entries = IndexMap::new();
        for (id, descriptor) in descriptors {
            if let Some(_previous) = entries.insert(id.clone(), descriptor) {
                warn!(plugin_id = %id, "duplicate plugin id; keeping the last one found");
            }
        }
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&D> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut D> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &D)> {
        self.entries.iter().map(|(id, d)| (id.as_str(), d))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D> IntoIterator for Catalog<D> {
    type Item = (String, D);
    type IntoIter = indexmap::map::IntoIter<String, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keeps_scan_order() {
        let catalog = Catalog::from_descriptors(vec![
            ("weather".to_string(), 1),
            ("clock".to_string(), 2),
            ("timer".to_string(), 3),
        ]);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["weather", "clock", "timer"]);
    }

    #[test]
    fn duplicate_ids_keep_latest_descriptor() {
        let catalog = Catalog::from_descriptors(vec![
            ("calendar".to_string(), "old"),
            ("tasks".to_string(), "tasks"),
            ("calendar".to_string(), "new"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("calendar"), Some(&"new"));
    }
}
