//! Core memory graph type definitions.
//!
//! Defines [`NodeType`], [`RelationshipType`], the [`ContextValue`] union used for
//! free-form node metadata, [`MemoryNode`] (a full node record), and
//! [`MemoryRelationship`] (a directed, weighted edge between two nodes).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{MemoryError, MemoryResult};

/// Structured metadata attached to a node. Keys are unique; order is irrelevant.
pub type Context = BTreeMap<String, ContextValue>;

/// Kind of a memory node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Stored by an external caller.
    Normal,
    /// Produced by background discovery for a cluster of nodes.
    Summary,
    /// Reserved for derived, non-summary knowledge.
    Abstract,
}

impl NodeType {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Summary => "summary",
            Self::Abstract => "abstract",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "summary" => Ok(Self::Summary),
            "abstract" => Ok(Self::Abstract),
            _ => Err(format!("unknown node type: {s}")),
        }
    }
}

/// Category of an inferred relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Both nodes carry the same `context.project`.
    ProjectRelated,
    /// Both nodes carry the same `context.type`.
    TypeSimilar,
    /// Related by content or other context overlap only.
    Semantic,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectRelated => "project_related",
            Self::TypeSimilar => "type_similar",
            Self::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project_related" => Ok(Self::ProjectRelated),
            "type_similar" => Ok(Self::TypeSimilar),
            "semantic" => Ok(Self::Semantic),
            _ => Err(format!("unknown relationship type: {s}")),
        }
    }
}

/// A single context value.
///
/// Serialized untagged so the persisted JSON reads like plain JSON. Integers and
/// floats are kept apart so a value survives a storage round trip unchanged.
/// Integers above `i64::MAX` land in `UInt`; variant order matters here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Integer(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<ContextValue>),
    Map(BTreeMap<String, ContextValue>),
}

impl ContextValue {
    /// Render the value as a plain string: text without quotes, everything else as JSON.
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for ContextValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Self::Integer(v),
            Err(_) => Self::UInt(value),
        }
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A memory node, matching the `memory_nodes` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryNode {
    /// UUID v7 primary key.
    pub id: String,
    /// Non-empty text body.
    pub content: String,
    /// Free-form structured metadata.
    pub context: Context,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the most recent lookup. Starts equal to `created_at`.
    pub last_accessed_at: String,
    /// Number of successful lookups.
    pub access_count: u64,
    /// Ranking value for search results.
    pub priority_score: f64,
    pub node_type: NodeType,
}

impl MemoryNode {
    /// Context value for `key`, if present.
    pub fn context_value(&self, key: &str) -> Option<&ContextValue> {
        self.context.get(key)
    }
}

/// A directed, weighted edge between two memory nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRelationship {
    pub from_node_id: String,
    pub to_node_id: String,
    /// Strength in `[0.0, 1.0]`.
    pub weight: f64,
    pub relationship_type: RelationshipType,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Convert caller-supplied JSON into a [`Context`]. Anything but an object
/// (including `null`) is rejected.
pub fn context_from_json(value: serde_json::Value) -> MemoryResult<Context> {
    match value {
        serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(MemoryError::Validation(format!(
            "context must be a JSON object, got {other}"
        ))),
    }
}

/// Current time in the fixed-width RFC 3339 form used for every stored timestamp.
///
/// Microsecond precision with a `Z` suffix, so string order equals time order.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
