//! Database Capability
//!
//! The uniform async interface a backend under test implements. Required operations
//! are plain trait methods; optional ones have default bodies that report
//! `StoreError::Unsupported`, and the backend advertises which optional operations it
//! really implements through [`Capabilities`] so cases can be judged runnable before a
//! run starts.

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of optional operations a backend supports
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// `bulk_get`
    pub const BULK_GET: Self = Self(1 << 0);
    /// `bulk_set`
    pub const BULK_SET: Self = Self(1 << 1);
    /// `get_all`
    pub const GET_ALL: Self = Self(1 << 2);
    /// `create_index` and `get_all_by_index`
    pub const INDEX: Self = Self(1 << 3);

    const NAMES: [(Self, &'static str); 4] = [
        (Self::BULK_GET, "bulk-get"),
        (Self::BULK_SET, "bulk-set"),
        (Self::GET_ALL, "get-all"),
        (Self::INDEX, "index"),
    ];

    /// No optional operations
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every optional operation
    pub const fn all() -> Self {
        Self(Self::BULK_GET.0 | Self::BULK_SET.0 | Self::GET_ALL.0 | Self::INDEX.0)
    }

    /// Whether every capability in `other` is present
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Capabilities in `self` that are absent from `available`
    pub const fn missing_from(self, available: Self) -> Self {
        Self(self.0 & !available.0)
    }

    /// Whether the set is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(cap, _)| self.contains(*cap))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join(", "))
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capabilities({self})")
    }
}

/// Transaction mode for reads on backends that distinguish them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Read-only access
    #[default]
    ReadOnly,
    /// Read-write access
    ReadWrite,
}

/// A keyed-storage backend under test.
///
/// Values are JSON documents. Stores are named partitions created with
/// [`Database::create_stores`]. `clear` must leave the backend empty, with no stores.
#[async_trait]
pub trait Database: Send + Sync {
    /// Human-readable backend name used in reports
    fn name(&self) -> &str;

    /// Optional operations this backend implements
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Acquire a persistent connection, if the backend holds one
    async fn open(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Release the connection acquired by `open`
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Drop every store and record
    async fn clear(&self) -> Result<(), StoreError>;

    /// Provision one or more named stores; existing stores are left untouched
    async fn create_stores(&self, names: &[String]) -> Result<(), StoreError>;

    /// Provision a single named store
    async fn create_store(&self, name: &str) -> Result<(), StoreError> {
        self.create_stores(&[name.to_string()]).await
    }

    /// Read one record
    async fn get(
        &self,
        store: &str,
        key: &str,
        mode: AccessMode,
    ) -> Result<Option<Value>, StoreError>;

    /// Write one record
    async fn set(&self, store: &str, key: &str, value: Value) -> Result<(), StoreError>;

    /// Read every key from every listed store, store-major
    async fn bulk_get(
        &self,
        _stores: &[String],
        _keys: &[String],
        _mode: AccessMode,
    ) -> Result<Vec<Option<Value>>, StoreError> {
        Err(StoreError::Unsupported("bulk_get"))
    }

    /// Write every key/value pair into every listed store
    async fn bulk_set(
        &self,
        _stores: &[String],
        _keys: &[String],
        _values: &[Value],
    ) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("bulk_set"))
    }

    /// Read every record of a store in key order
    async fn get_all(&self, _store: &str, _mode: AccessMode) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Unsupported("get_all"))
    }

    /// Read every record whose indexed field equals `key`
    async fn get_all_by_index(
        &self,
        _store: &str,
        _index: &str,
        _key: &Value,
        _mode: AccessMode,
    ) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Unsupported("get_all_by_index"))
    }

    /// Create a secondary index over a top-level field; the index is named after the field
    async fn create_index(&self, _store: &str, _key_path: &str) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("create_index"))
    }
}
