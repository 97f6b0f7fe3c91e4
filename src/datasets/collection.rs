//! Named, ordered collections of grid datasets.

use super::{Dataset, GridDataset};
use indexmap::IndexMap;

/// Grid datasets keyed by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DatasetCollection {
    store: IndexMap<String, GridDataset>,
}

impl DatasetCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset under its quantity name, returning any dataset it
    /// replaces. A replaced dataset keeps its position.
    pub fn insert(&mut self, dataset: GridDataset) -> Option<GridDataset> {
        let key = dataset.quantity().name.clone();
        self.insert_as(key, dataset)
    }

    /// Add a dataset under an explicit key.
    pub fn insert_as(&mut self, key: impl Into<String>, dataset: GridDataset) -> Option<GridDataset> {
        self.store.insert(key.into(), dataset)
    }

    /// Dataset stored under `key`.
    pub fn get(&self, key: &str) -> Option<&GridDataset> {
        self.store.get(key)
    }

    /// Check if `key` is in the collection.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GridDataset)> {
        self.store.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl FromIterator<GridDataset> for DatasetCollection {
    fn from_iter<T: IntoIterator<Item = GridDataset>>(iter: T) -> Self {
        let mut collection = Self::new();
        for dataset in iter {
            collection.insert(dataset);
        }
        collection
    }
}
