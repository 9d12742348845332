//! Key-value persistence abstraction.
//!
//! The core stores two JSON blobs: the learner's game options and the
//! profile list. The backing store (browser local storage, a directory of
//! JSON files, an in-memory map in tests) lives outside this crate.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::DomainError;

/// Key under which the current `GameOptions` are stored.
pub const OPTIONS_KEY: &str = "options";

/// Key under which the profile list is stored.
pub const PROFILES_KEY: &str = "profiles";

/// Get/set store for JSON-serializable values keyed by string.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Loads the raw value stored under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: serde_json::Value) -> Result<(), DomainError>;
}

/// Loads and decodes the value under `key`, falling back to `fallback()`
/// when the key is absent or the stored blob does not decode.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` only if the store itself fails.
pub async fn load_or_else<T, F>(
    store: &dyn KeyValueStore,
    key: &str,
    fallback: F,
) -> Result<T, DomainError>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let Some(raw) = store.load(key).await? else {
        return Ok(fallback());
    };
    match serde_json::from_value(raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key, error = %e, "stored value is malformed, using default");
            Ok(fallback())
        }
    }
}

/// Encodes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if encoding or the store fails.
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), DomainError> {
    let raw = serde_json::to_value(value)
        .map_err(|e| DomainError::Infrastructure(format!("serialization failed: {e}")))?;
    store.save(key, raw).await
}
