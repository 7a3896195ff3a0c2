use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

use super::error::MemoryResult;
use super::relations::count_relationships;

/// Aggregate graph counts for health reporting.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphStats {
    pub node_count: u64,
    pub relationship_count: u64,
}

impl GraphStats {
    /// Nodes plus relationships.
    pub fn graph_size(&self) -> u64 {
        self.node_count + self.relationship_count
    }
}

/// Count nodes and relationships.
pub fn graph_stats(conn: &Connection) -> MemoryResult<GraphStats> {
    let node_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM memory_nodes", [], |row| row.get(0))?;
    let relationship_count = count_relationships(conn)?;

    Ok(GraphStats {
        node_count: node_count as u64,
        relationship_count,
    })
}

/// Count nodes by node type. Every type is present, zero when empty.
pub fn count_by_node_type(conn: &Connection) -> MemoryResult<HashMap<String, u64>> {
    let mut map = HashMap::new();
    for t in &["normal", "summary", "abstract"] {
        map.insert(t.to_string(), 0);
    }

    let mut stmt = conn.prepare("SELECT node_type, COUNT(*) FROM memory_nodes GROUP BY node_type")?;
    let rows: Vec<(String, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    for (t, count) in rows {
        map.insert(t, count as u64);
    }
    Ok(map)
}
