//! Test stores — mock `KeyValueStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::storage::KeyValueStore;

/// An in-memory store that also counts writes per key.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
    saves: Mutex<Vec<String>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one raw value.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_value(key: &str, value: serde_json::Value) -> Self {
        let store = Self::default();
        store.values.lock().unwrap().insert(key.to_owned(), value);
        store
    }

    /// Returns the raw value currently stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Returns the keys written so far, in write order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_keys(&self) -> Vec<String> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> Result<(), DomainError> {
        self.values.lock().unwrap().insert(key.to_owned(), value);
        self.saves.lock().unwrap().push(key.to_owned());
        Ok(())
    }
}

/// A store that always returns an infrastructure error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn load(&self, _key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }

    async fn save(&self, _key: &str, _value: serde_json::Value) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }
}
