//! Knowledge overview: a compact digest of what the store holds, optionally
//! narrowed to a topic.

use rusqlite::Connection;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::error::MemoryResult;
use super::search::search_nodes;
use super::stats::graph_stats;
use super::truncate_preview;

const TOPIC_SAMPLE: usize = 50;
const TOPIC_PREVIEWS: usize = 10;
const TOPIC_PREVIEW_CHARS: usize = 80;
const VALUES_PER_KEY: usize = 5;
const RECENT_PREVIEWS: usize = 5;
const RECENT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KnowledgeOverview {
    /// Digest of memories matching a topic.
    Topic {
        topic: String,
        matched: usize,
        /// Distinct values seen per context key (at most five per key).
        context_values: BTreeMap<String, Vec<String>>,
        top_memories: Vec<String>,
    },
    /// Whole-store digest.
    General {
        memory_count: u64,
        graph_size: u64,
        recent_memories: Vec<String>,
    },
}

/// Build an overview for `topic`, or for the whole store when `topic` is `None`.
pub fn knowledge_overview(conn: &Connection, topic: Option<&str>) -> MemoryResult<KnowledgeOverview> {
    match topic {
        Some(topic) => topic_overview(conn, topic),
        None => general_overview(conn),
    }
}

fn topic_overview(conn: &Connection, topic: &str) -> MemoryResult<KnowledgeOverview> {
    let nodes = search_nodes(conn, topic, TOPIC_SAMPLE)?;

    let mut seen: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in &nodes {
        for (key, value) in &node.context {
            seen.entry(key.clone()).or_default().insert(value.render());
        }
    }
    let context_values = seen
        .into_iter()
        .map(|(key, values)| (key, values.into_iter().take(VALUES_PER_KEY).collect()))
        .collect();

    let top_memories = nodes
        .iter()
        .take(TOPIC_PREVIEWS)
        .map(|n| truncate_preview(&n.content, TOPIC_PREVIEW_CHARS))
        .collect();

    Ok(KnowledgeOverview::Topic {
        topic: topic.to_string(),
        matched: nodes.len(),
        context_values,
        top_memories,
    })
}

fn general_overview(conn: &Connection) -> MemoryResult<KnowledgeOverview> {
    let stats = graph_stats(conn)?;
    let recent_memories = search_nodes(conn, "", RECENT_PREVIEWS)?
        .iter()
        .map(|n| truncate_preview(&n.content, RECENT_PREVIEW_CHARS))
        .collect();

    Ok(KnowledgeOverview::General {
        memory_count: stats.node_count,
        graph_size: stats.graph_size(),
        recent_memories,
    })
}
