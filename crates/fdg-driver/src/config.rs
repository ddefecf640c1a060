// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Driver configuration and its storage port.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::fps::DEFAULT_WINDOW_CAPACITY;
use crate::spawn::{EntitySpawnRequest, SpawnTemplate};

/// Store key under which hosts persist [`DriverConfig`].
pub const CONFIG_KEY: &str = "fdg-driver.config";

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A field failed validation.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Offending field (camelCase, as written by hosts).
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Catch-all error variant (host storage failures).
    #[error("other: {0}")]
    Other(String),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Everything the host page injects into the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverConfig {
    /// Nominal delay between ticks (ms).
    pub frame_interval_ms: f64,
    /// Ticks per benchmark batch.
    pub batch_size: u64,
    /// Growth stops once the estimate is at or below this many fps.
    pub fps_floor: f64,
    /// Sliding-window capacity of the fps estimator.
    pub window_capacity: usize,
    /// DOM id of the arena container.
    pub arena_id: String,
    /// Request cloned for every benchmark spawn.
    pub spawn_template: SpawnTemplate,
    /// Entities spawned once, right after `init`.
    pub initial_spawns: Vec<EntitySpawnRequest>,
    /// Optional hard cap on benchmark entities.
    pub max_entities: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16.0,
            batch_size: 50,
            fps_floor: 25.0,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            arena_id: "arena".to_owned(),
            spawn_template: SpawnTemplate::default(),
            initial_spawns: Vec::new(),
            max_entities: None,
        }
    }
}

impl DriverConfig {
    /// Parse JSON and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field; the first violation wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_interval_ms.is_finite() || self.frame_interval_ms <= 0.0 {
            return Err(ConfigError::invalid(
                "frameIntervalMs",
                format!("must be finite and > 0, got {}", self.frame_interval_ms),
            ));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("batchSize", "must be at least 1"));
        }
        if !self.fps_floor.is_finite() || self.fps_floor <= 0.0 {
            return Err(ConfigError::invalid(
                "fpsFloor",
                format!("must be finite and > 0, got {}", self.fps_floor),
            ));
        }
        if self.window_capacity < 2 {
            return Err(ConfigError::invalid(
                "windowCapacity",
                "needs at least 2 samples to form a delta",
            ));
        }
        if self.arena_id.trim().is_empty() {
            return Err(ConfigError::invalid("arenaId", "must not be empty"));
        }
        if self.max_entities == Some(0) {
            return Err(ConfigError::invalid("maxEntities", "must be at least 1"));
        }
        check_request("spawnTemplate", self.spawn_template.request())?;
        for request in &self.initial_spawns {
            check_request("initialSpawns", request)?;
        }
        Ok(())
    }
}

fn check_request(field: &'static str, request: &EntitySpawnRequest) -> Result<(), ConfigError> {
    let numbers = [
        request.x, request.y, request.vx, request.vy, request.w, request.h,
    ];
    if numbers.iter().any(|n| !n.is_finite()) {
        return Err(ConfigError::invalid(field, "coordinates must be finite"));
    }
    if request.w < 0.0 || request.h < 0.0 {
        return Err(ConfigError::invalid(
            field,
            "collision extent must be non-negative",
        ));
    }
    Ok(())
}

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Stored driver config, or defaults when none is stored. Always validated.
    pub fn load_driver_config(&self) -> Result<DriverConfig, ConfigError> {
        let config = self
            .load::<DriverConfig>(CONFIG_KEY)?
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Validate and persist a driver config.
    pub fn save_driver_config(&self, config: &DriverConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.save(CONFIG_KEY, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = DriverConfig::from_json("{}").unwrap();
        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.window_capacity, 45);
        assert_eq!(config.arena_id, "arena");
    }

    #[test]
    fn camel_case_keys_override_defaults() {
        let config = DriverConfig::from_json(
            r#"{"frameIntervalMs": 8, "batchSize": 10, "fpsFloor": 30, "arenaId": "stage",
                "spawnTemplate": {"x": 5, "y": 5, "vx": 1, "vy": -1, "w": 20, "h": 20,
                                  "payload": "<i>x</i>", "labels": ["greeeeeen"]}}"#,
        )
        .unwrap();
        assert_eq!(config.frame_interval_ms, 8.0);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.arena_id, "stage");
        assert!(config
            .spawn_template
            .request()
            .labels
            .contains("greeeeeen"));
    }

    #[test]
    fn rejects_window_below_two() {
        let err = DriverConfig::from_json(r#"{"windowCapacity": 1}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "windowCapacity",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_interval_and_negative_extent() {
        assert!(DriverConfig::from_json(r#"{"frameIntervalMs": 0}"#).is_err());
        let bad = r#"{"initialSpawns": [{"x":0,"y":0,"vx":0,"vy":0,"w":-1,"h":1,"payload":""}]}"#;
        assert!(matches!(
            DriverConfig::from_json(bad),
            Err(ConfigError::Invalid {
                field: "initialSpawns",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        assert!(matches!(
            DriverConfig::from_json("{nope"),
            Err(ConfigError::Serde(_))
        ));
    }
}
