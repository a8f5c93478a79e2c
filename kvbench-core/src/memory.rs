//! In-Memory Backend
//!
//! Reference [`Database`] implementation used by the CLI's `memory` backend and by the
//! test suite. Every optional capability is supported. Secondary indexes are kept as
//! field-value → key sets and updated on each write.

use crate::database::{AccessMode, Capabilities, Database};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Partition {
    records: BTreeMap<String, Value>,
    /// key path → (field value as JSON text → record keys)
    indexes: HashMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl Partition {
    fn insert(&mut self, key: &str, value: Value) {
        if let Some(previous) = self.records.get(key) {
            for (path, index) in &mut self.indexes {
                if let Some(field) = previous.get(path) {
                    let field = field.to_string();
                    if let Some(keys) = index.get_mut(&field) {
                        keys.remove(key);
                        if keys.is_empty() {
                            index.remove(&field);
                        }
                    }
                }
            }
        }

        for (path, index) in &mut self.indexes {
            if let Some(field) = value.get(path) {
                index
                    .entry(field.to_string())
                    .or_default()
                    .insert(key.to_string());
            }
        }

        self.records.insert(key.to_string(), value);
    }

    fn build_index(&mut self, key_path: &str) {
        let mut index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (key, value) in &self.records {
            if let Some(field) = value.get(key_path) {
                index.entry(field.to_string()).or_default().insert(key.clone());
            }
        }
        self.indexes.insert(key_path.to_string(), index);
    }
}

/// Thread-safe in-memory keyed store
#[derive(Debug)]
pub struct MemoryDatabase {
    name: String,
    stores: Mutex<HashMap<String, Partition>>,
}

impl MemoryDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::with_name("memory")
    }

    /// Create an empty database reported under a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// Number of records in a store, or `None` if the store does not exist
    pub fn len(&self, store: &str) -> Option<usize> {
        self.lock().get(store).map(|p| p.records.len())
    }

    /// Names of the provisioned stores, sorted
    pub fn store_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Partition>> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn partition<'a>(
    stores: &'a HashMap<String, Partition>,
    store: &str,
) -> Result<&'a Partition, StoreError> {
    stores
        .get(store)
        .ok_or_else(|| StoreError::UnknownStore(store.to_string()))
}

fn partition_mut<'a>(
    stores: &'a mut HashMap<String, Partition>,
    store: &str,
) -> Result<&'a mut Partition, StoreError> {
    stores
        .get_mut(store)
        .ok_or_else(|| StoreError::UnknownStore(store.to_string()))
}

#[async_trait]
impl Database for MemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.lock().clear();
        Ok(())
    }

    async fn create_stores(&self, names: &[String]) -> Result<(), StoreError> {
        let mut stores = self.lock();
        for name in names {
            stores.entry(name.clone()).or_default();
        }
        Ok(())
    }

    async fn get(
        &self,
        store: &str,
        key: &str,
        _mode: AccessMode,
    ) -> Result<Option<Value>, StoreError> {
        let stores = self.lock();
        Ok(partition(&stores, store)?.records.get(key).cloned())
    }

    async fn set(&self, store: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let mut stores = self.lock();
        partition_mut(&mut stores, store)?.insert(key, value);
        Ok(())
    }

    async fn bulk_get(
        &self,
        stores: &[String],
        keys: &[String],
        _mode: AccessMode,
    ) -> Result<Vec<Option<Value>>, StoreError> {
        let guard = self.lock();
        let mut out = Vec::with_capacity(stores.len() * keys.len());
        for store in stores {
            let partition = partition(&guard, store)?;
            out.extend(keys.iter().map(|k| partition.records.get(k).cloned()));
        }
        Ok(out)
    }

    async fn bulk_set(
        &self,
        stores: &[String],
        keys: &[String],
        values: &[Value],
    ) -> Result<(), StoreError> {
        if keys.len() != values.len() {
            return Err(StoreError::Backend(format!(
                "bulk_set got {} keys but {} values",
                keys.len(),
                values.len()
            )));
        }

        let mut guard = self.lock();
        // Validate every store first so a failed call writes nothing
        for store in stores {
            partition(&guard, store)?;
        }
        for store in stores {
            let partition = partition_mut(&mut guard, store)?;
            for (key, value) in keys.iter().zip(values) {
                partition.insert(key, value.clone());
            }
        }
        Ok(())
    }

    async fn get_all(&self, store: &str, _mode: AccessMode) -> Result<Vec<Value>, StoreError> {
        let stores = self.lock();
        Ok(partition(&stores, store)?.records.values().cloned().collect())
    }

    async fn get_all_by_index(
        &self,
        store: &str,
        index: &str,
        key: &Value,
        _mode: AccessMode,
    ) -> Result<Vec<Value>, StoreError> {
        let stores = self.lock();
        let partition = partition(&stores, store)?;
        let entries = partition
            .indexes
            .get(index)
            .ok_or_else(|| StoreError::UnknownIndex {
                store: store.to_string(),
                index: index.to_string(),
            })?;

        Ok(entries
            .get(&key.to_string())
            .into_iter()
            .flatten()
            .filter_map(|k| partition.records.get(k).cloned())
            .collect())
    }

    async fn create_index(&self, store: &str, key_path: &str) -> Result<(), StoreError> {
        let mut stores = self.lock();
        partition_mut(&mut stores, store)?.build_index(key_path);
        Ok(())
    }
}
