// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Spawn requests handed to the engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Opaque visual content for an entity (an HTML fragment in the browser host).
///
/// The driver never inspects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualPayload(pub String);

impl VisualPayload {
    /// Wrap raw content.
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// Borrow the raw content.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the engine needs to create one entity.
///
/// Built fresh for every spawn and moved into
/// [`SimulationEngine::spawn_entity`](crate::SimulationEngine::spawn_entity);
/// the driver keeps no reference afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpawnRequest {
    /// Position, x (px).
    pub x: f64,
    /// Position, y (px).
    pub y: f64,
    /// Velocity, x (px/s).
    pub vx: f64,
    /// Velocity, y (px/s).
    pub vy: f64,
    /// Collision extent, width (px).
    pub w: f64,
    /// Collision extent, height (px).
    pub h: f64,
    /// Visual content.
    pub payload: VisualPayload,
    /// Label set; order is irrelevant.
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl EntitySpawnRequest {
    /// Labels as an ordered list (the shape JS hosts expect).
    pub fn label_list(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }
}

/// The fixed request shape the benchmark clones for every spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnTemplate(EntitySpawnRequest);

impl SpawnTemplate {
    /// Use `request` as the template.
    pub fn new(request: EntitySpawnRequest) -> Self {
        Self(request)
    }

    /// Build a fresh request from the template.
    pub fn instantiate(&self) -> EntitySpawnRequest {
        self.0.clone()
    }

    /// Borrow the template request.
    pub fn request(&self) -> &EntitySpawnRequest {
        &self.0
    }
}

impl Default for SpawnTemplate {
    fn default() -> Self {
        Self(EntitySpawnRequest {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            w: 100.0,
            h: 100.0,
            payload: VisualPayload::new("<div></div>"),
            labels: BTreeSet::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_deduplicate_and_ignore_order() {
        let req: EntitySpawnRequest = serde_json::from_value(serde_json::json!({
            "x": 1.0, "y": 2.0, "vx": 0.0, "vy": 0.0, "w": 10.0, "h": 10.0,
            "payload": "<b>hi</b>",
            "labels": ["node", "green", "node"]
        }))
        .unwrap();
        assert_eq!(req.label_list(), vec!["green".to_owned(), "node".to_owned()]);
        assert_eq!(req.payload.as_str(), "<b>hi</b>");
    }

    #[test]
    fn template_instances_are_independent() {
        let template = SpawnTemplate::default();
        let mut first = template.instantiate();
        first.labels.insert("mutated".into());
        assert!(template.instantiate().labels.is_empty());
    }
}
