//! SQL DDL for the memory graph tables.
//!
//! Defines `memory_nodes`, `memory_relationships`, and `schema_meta`. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for the core tables.
const SCHEMA_SQL: &str = r#"
-- Memory nodes
CREATE TABLE IF NOT EXISTS memory_nodes (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL CHECK(length(content) > 0),
    context TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    last_accessed_at TEXT NOT NULL,
    access_count INTEGER NOT NULL DEFAULT 0 CHECK(access_count >= 0),
    priority_score REAL NOT NULL DEFAULT 1.0,
    node_type TEXT NOT NULL DEFAULT 'normal' CHECK(node_type IN ('normal','summary','abstract'))
);

CREATE INDEX IF NOT EXISTS idx_nodes_priority ON memory_nodes(priority_score DESC);
CREATE INDEX IF NOT EXISTS idx_nodes_accessed ON memory_nodes(last_accessed_at DESC);

-- Directed relationship graph, one edge per ordered pair
CREATE TABLE IF NOT EXISTS memory_relationships (
    from_node_id TEXT NOT NULL REFERENCES memory_nodes(id),
    to_node_id TEXT NOT NULL REFERENCES memory_nodes(id),
    weight REAL NOT NULL CHECK(weight >= 0.0 AND weight <= 1.0),
    relationship_type TEXT NOT NULL CHECK(relationship_type IN ('project_related','type_similar','semantic')),
    created_at TEXT NOT NULL,
    PRIMARY KEY (from_node_id, to_node_id)
);

CREATE INDEX IF NOT EXISTS idx_relationships_weight ON memory_relationships(weight DESC);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
