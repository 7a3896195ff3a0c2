#![allow(dead_code)]

use memgraph::db;
use memgraph::memory::types::{Context, ContextValue};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// A fresh in-memory database behind the shared handle the engine and discovery use.
pub fn shared_db() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(test_db()))
}

/// Build a context from string pairs.
pub fn ctx(pairs: &[(&str, &str)]) -> Context {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), ContextValue::from(*v)))
        .collect()
}

/// Insert a node directly via the store module. Returns its id.
pub fn insert_node(conn: &Connection, content: &str, pairs: &[(&str, &str)]) -> String {
    memgraph::memory::store::store_node(conn, content, &ctx(pairs)).unwrap()
}

/// Force a node's ranking fields, for ordering tests.
pub fn set_rank(conn: &Connection, id: &str, priority: f64, last_accessed_at: &str) {
    conn.execute(
        "UPDATE memory_nodes SET priority_score = ?1, last_accessed_at = ?2 WHERE id = ?3",
        rusqlite::params![priority, last_accessed_at, id],
    )
    .unwrap();
}
