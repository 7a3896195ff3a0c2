//! Adapter-agnostic core surface over the shared store.
//!
//! Every operation moves its SQLite work onto the blocking pool, the same way
//! the MCP tools and CLI commands reach the database.

use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::RetrievalConfig;
use crate::memory::access::get_node;
use crate::memory::error::{MemoryError, MemoryResult};
use crate::memory::overview::{knowledge_overview, KnowledgeOverview};
use crate::memory::search::{clamp_limit, search_nodes, QueryResult};
use crate::memory::stats::graph_stats;
use crate::memory::store::store_node;
use crate::memory::types::{Context, MemoryNode, NodeType};

/// A node returned by [`MemoryEngine::recall_memory`], with access counters
/// already updated by the lookup.
#[derive(Debug, Clone, Serialize)]
pub struct RecalledMemory {
    pub id: String,
    pub content: String,
    pub context: Context,
    pub created_at: String,
    pub last_accessed_at: String,
    pub access_count: u64,
    pub priority_score: f64,
    pub node_type: NodeType,
}

impl From<MemoryNode> for RecalledMemory {
    fn from(node: MemoryNode) -> Self {
        Self {
            id: node.id,
            content: node.content,
            context: node.context,
            created_at: node.created_at,
            last_accessed_at: node.last_accessed_at,
            access_count: node.access_count,
            priority_score: node.priority_score,
            node_type: node.node_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub memory_count: u64,
    /// Nodes plus relationships.
    pub graph_size: u64,
    pub db_path: String,
}

#[derive(Clone)]
pub struct MemoryEngine {
    db: Arc<Mutex<Connection>>,
    db_path: PathBuf,
    retrieval: RetrievalConfig,
}

impl MemoryEngine {
    pub fn new(db: Arc<Mutex<Connection>>, db_path: impl AsRef<Path>, retrieval: RetrievalConfig) -> Self {
        Self {
            db,
            db_path: db_path.as_ref().to_path_buf(),
            retrieval,
        }
    }

    /// Shared connection, for the discovery worker.
    pub fn db(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.db)
    }

    /// Store a memory. A missing context is stored as an empty object.
    pub async fn store_memory(&self, content: String, context: Option<Context>) -> MemoryResult<String> {
        let context = context.unwrap_or_default();
        self.run_blocking(move |conn| store_node(conn, &content, &context))
            .await
    }

    /// Ranked substring search. `limit` is clamped to `[1, 100]`.
    pub async fn query_memories(&self, query: String, limit: Option<i64>) -> MemoryResult<Vec<QueryResult>> {
        let limit = clamp_limit(limit, self.retrieval.default_limit);
        let nodes = self
            .run_blocking(move |conn| search_nodes(conn, &query, limit))
            .await?;
        Ok(nodes.into_iter().map(QueryResult::from).collect())
    }

    /// Look up a memory by id, recording the access. Unknown ids give `None`.
    pub async fn recall_memory(&self, id: String) -> MemoryResult<Option<RecalledMemory>> {
        let node = self.run_blocking(move |conn| get_node(conn, &id)).await?;
        Ok(node.map(RecalledMemory::from))
    }

    pub async fn get_health_status(&self) -> MemoryResult<HealthStatus> {
        let stats = self.run_blocking(|conn| graph_stats(conn)).await?;
        Ok(HealthStatus {
            status: "healthy",
            memory_count: stats.node_count,
            graph_size: stats.graph_size(),
            db_path: self.db_path.display().to_string(),
        })
    }

    pub async fn knowledge_overview(&self, topic: Option<String>) -> MemoryResult<KnowledgeOverview> {
        self.run_blocking(move |conn| knowledge_overview(conn, topic.as_deref()))
            .await
    }

    async fn run_blocking<T, F>(&self, f: F) -> MemoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> MemoryResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut conn = db
                .lock()
                .map_err(|e| MemoryError::Task(format!("db lock poisoned: {e}")))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| MemoryError::Task(e.to_string()))?
    }
}
