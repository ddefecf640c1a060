// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without host storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fdg_driver::{ConfigError, ConfigStore};

/// In-memory implementation of [`ConfigStore`].
///
/// Clones share storage, so a test can hand one clone to a
/// [`ConfigService`](fdg_driver::ConfigService) and inspect the other.
///
/// # Example
///
/// ```
/// use fdg_dry_tests::InMemoryConfigStore;
/// use fdg_driver::{ConfigService, DriverConfig};
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
/// service.save_driver_config(&DriverConfig::default()).unwrap();
/// assert_eq!(store.save_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemoryConfigStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `json` under `key`.
    pub fn with_json(key: &str, json: &str) -> Self {
        let store = Self::new();
        store.with_inner(|inner| {
            inner.data.insert(key.to_owned(), json.as_bytes().to_vec());
        });
        store
    }

    /// Make every load fail with `ConfigError::Other`.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.with_inner(|inner| inner.fail_on_load = fail);
    }

    /// Make every save fail with `ConfigError::Other`.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.with_inner(|inner| inner.fail_on_save = fail);
    }

    /// Attempted loads, including failed ones.
    pub fn load_count(&self) -> usize {
        self.with_inner(|inner| inner.load_count)
    }

    /// Attempted saves, including failed ones.
    pub fn save_count(&self) -> usize {
        self.with_inner(|inner| inner.save_count)
    }

    /// Raw bytes stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.with_inner(|inner| inner.data.get(key).cloned())
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut inner)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        self.with_inner(|inner| {
            inner.load_count += 1;
            if inner.fail_on_load {
                return Err(ConfigError::Other("simulated load failure".into()));
            }
            inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
        })
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        self.with_inner(|inner| {
            inner.save_count += 1;
            if inner.fail_on_save {
                return Err(ConfigError::Other("simulated save failure".into()));
            }
            inner.data.insert(key.to_owned(), data.to_vec());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_found() {
        let store = InMemoryConfigStore::new();
        assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn failures_are_counted() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_save(true);
        assert!(matches!(
            store.save_raw("k", b"v"),
            Err(ConfigError::Other(_))
        ));
        assert_eq!(store.save_count(), 1);
        assert!(store.raw("k").is_none());
    }
}
