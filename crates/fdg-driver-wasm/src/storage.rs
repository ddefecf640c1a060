// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `localStorage` as a [`ConfigStore`].

use fdg_driver::{ConfigError, ConfigStore};
use web_sys::{Storage, Window};

use crate::error::{describe, HostError};

/// Config blobs stored as UTF-8 strings in `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorageConfigStore {
    storage: Storage,
}

impl LocalStorageConfigStore {
    /// Store backed by `window.localStorage`.
    pub fn new(window: &Window) -> Result<Self, HostError> {
        let storage = window
            .local_storage()
            .map_err(HostError::from)?
            .ok_or(HostError::NoStorage)?;
        Ok(Self { storage })
    }
}

impl ConfigStore for LocalStorageConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        match self.storage.get_item(key) {
            Ok(Some(text)) => Ok(text.into_bytes()),
            Ok(None) => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Other(describe(&err))),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let text = std::str::from_utf8(data)
            .map_err(|err| ConfigError::Other(format!("config is not utf-8: {err}")))?;
        self.storage
            .set_item(key, text)
            .map_err(|err| ConfigError::Other(describe(&err)))
    }
}
