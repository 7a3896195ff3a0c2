//! Substring search and result ranking.
//!
//! Matching is a case-sensitive substring test over `content` and the serialized
//! `context` JSON (`instr()`, since SQLite `LIKE` folds ASCII case). Results are
//! ranked by `priority_score DESC, last_accessed_at DESC`. Searching is not an
//! access: counters are left untouched.

use rusqlite::{params, Connection};
use serde::Serialize;

use super::error::MemoryResult;
use super::store::{node_from_row, NODE_COLUMNS};
use super::types::{Context, MemoryNode, NodeType};

/// Smallest limit a caller may request.
pub const MIN_LIMIT: usize = 1;
/// Largest limit a caller may request.
pub const MAX_LIMIT: usize = 100;

/// A ranked search hit as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub id: String,
    pub content: String,
    pub context: Context,
    pub created_at: String,
    pub priority_score: f64,
    pub node_type: NodeType,
}

impl From<MemoryNode> for QueryResult {
    fn from(node: MemoryNode) -> Self {
        Self {
            id: node.id,
            content: node.content,
            context: node.context,
            created_at: node.created_at,
            priority_score: node.priority_score,
            node_type: node.node_type,
        }
    }
}

/// Clamp a caller-supplied limit to `[MIN_LIMIT, MAX_LIMIT]`, falling back to `default`.
pub fn clamp_limit(requested: Option<i64>, default: usize) -> usize {
    let wanted = match requested {
        Some(n) if n < MIN_LIMIT as i64 => MIN_LIMIT,
        Some(n) => usize::try_from(n).unwrap_or(MAX_LIMIT),
        None => default,
    };
    wanted.clamp(MIN_LIMIT, MAX_LIMIT)
}

/// Nodes whose content or serialized context contains `query`, best first.
///
/// An empty query matches every node. `limit` is applied as given.
pub fn search_nodes(conn: &Connection, query: &str, limit: usize) -> MemoryResult<Vec<MemoryNode>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NODE_COLUMNS} FROM memory_nodes \
         WHERE instr(content, ?1) > 0 OR instr(context, ?1) > 0 \
         ORDER BY priority_score DESC, last_accessed_at DESC \
         LIMIT ?2"
    ))?;

    let nodes = stmt
        .query_map(params![query, limit as i64], node_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(query = %query, results_count = nodes.len(), "memory search completed");
    Ok(nodes)
}
