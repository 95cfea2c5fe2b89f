//! Vertex and edge types of the lineage property graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property name → value mapping carried by vertices and edges.
///
/// A `BTreeMap` keeps serialized output stable across runs.
pub type Properties = BTreeMap<String, String>;

/// A metadata entity taking part in lineage (table, column, process, port,
/// glossary term, ...).
///
/// Identity is the GUID: two entities with the same GUID are the same vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageEntity {
    pub guid: String,
    pub type_name: String,
    #[serde(default)]
    pub properties: Properties,
}

impl LineageEntity {
    /// Create an entity without properties.
    pub fn new(guid: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            type_name: type_name.into(),
            properties: Properties::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Identity of an edge: `(from, to, label)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// A directed, labelled relationship between two lineage entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Edge {
    /// Create an edge without properties.
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
            properties: Properties::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The identity triple of this edge.
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            from: self.from.clone(),
            to: self.to.clone(),
            label: self.label.clone(),
        }
    }

    /// Whether this edge has the given identity triple.
    pub fn matches(&self, key: &EdgeKey) -> bool {
        self.from == key.from && self.to == key.to && self.label == key.label
    }

    /// Stable string id used by the interchange formats.
    pub fn id(&self) -> String {
        format!("{}|{}|{}", self.from, self.label, self.to)
    }
}
