//! Write path and row mapping for memory nodes.
//!
//! [`store_node`] is the single entry point for new nodes. Reads live in
//! [`super::access`] (point lookup with access tracking) and [`super::search`].

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::error::{MemoryError, MemoryResult};
use super::types::{timestamp_now, Context, MemoryNode, NodeType};

/// Column list shared by every node SELECT, in [`node_from_row`] order.
pub(crate) const NODE_COLUMNS: &str = "id, content, context, created_at, last_accessed_at, \
     access_count, priority_score, node_type";

/// Priority assigned to every new node.
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// Store a new `normal` node. Returns its id.
pub fn store_node(conn: &Connection, content: &str, context: &Context) -> MemoryResult<String> {
    store_node_with_type(conn, content, context, NodeType::Normal)
}

/// Store a new node with an explicit node type.
///
/// Fails with [`MemoryError::Validation`] when `content` is empty; nothing is written.
pub fn store_node_with_type(
    conn: &Connection,
    content: &str,
    context: &Context,
    node_type: NodeType,
) -> MemoryResult<String> {
    if content.is_empty() {
        return Err(MemoryError::Validation("content must not be empty".into()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let now = timestamp_now();
    let context_json = serde_json::to_string(context)?;

    conn.execute(
        "INSERT INTO memory_nodes \
         (id, content, context, created_at, last_accessed_at, access_count, priority_score, node_type) \
         VALUES (?1, ?2, ?3, ?4, ?4, 0, ?5, ?6)",
        params![
            id,
            content,
            context_json,
            now,
            DEFAULT_PRIORITY,
            node_type.as_str(),
        ],
    )?;

    tracing::info!(memory_id = %id, content_len = content.len(), node_type = %node_type, "memory stored");
    Ok(id)
}

/// Find an existing summary for `project`: a node whose content starts with
/// `"Summary of {project}:"`. Case-sensitive.
pub fn find_project_summary(conn: &Connection, project: &str) -> MemoryResult<Option<String>> {
    let prefix = summary_prefix(project);
    let id = conn
        .query_row(
            "SELECT id FROM memory_nodes \
             WHERE substr(content, 1, length(?1)) = ?1 \
             ORDER BY created_at LIMIT 1",
            params![prefix],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Leading line of a project summary's content.
pub fn summary_prefix(project: &str) -> String {
    format!("Summary of {project}:")
}

/// Map a row selected with [`NODE_COLUMNS`] into a [`MemoryNode`].
pub(crate) fn node_from_row(row: &Row<'_>) -> rusqlite::Result<MemoryNode> {
    let context_json: String = row.get(2)?;
    let context: Context = serde_json::from_str(&context_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let node_type_str: String = row.get(7)?;
    let node_type = node_type_str.parse::<NodeType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })?;

    let access_count: i64 = row.get(5)?;

    Ok(MemoryNode {
        id: row.get(0)?,
        content: row.get(1)?,
        context,
        created_at: row.get(3)?,
        last_accessed_at: row.get(4)?,
        access_count: access_count.max(0) as u64,
        priority_score: row.get(6)?,
        node_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::ContextValue;

    fn test_db() -> Connection {
        crate::db::open_memory_database().unwrap()
    }

    fn count_nodes(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM memory_nodes", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_store_new_node_defaults() {
        let conn = test_db();
        let mut context = Context::new();
        context.insert("project".into(), "Alpha".into());

        let id = store_node(&conn, "Started working on project Alpha", &context).unwrap();

        let (content, created, accessed, count, priority, node_type): (
            String,
            String,
            String,
            i64,
            f64,
            String,
        ) = conn
            .query_row(
                "SELECT content, created_at, last_accessed_at, access_count, priority_score, node_type \
                 FROM memory_nodes WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .unwrap();

        assert_eq!(content, "Started working on project Alpha");
        assert_eq!(created, accessed);
        assert_eq!(count, 0);
        assert_eq!(priority, 1.0);
        assert_eq!(node_type, "normal");
    }

    #[test]
    fn test_empty_content_is_rejected() {
        let conn = test_db();
        let err = store_node(&conn, "", &Context::new()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(count_nodes(&conn), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let conn = test_db();
        let a = store_node(&conn, "same", &Context::new()).unwrap();
        let b = store_node(&conn, "same", &Context::new()).unwrap();
        assert_ne!(a, b);
        assert_eq!(count_nodes(&conn), 2);
    }

    #[test]
    fn test_context_is_persisted_as_json_object() {
        let conn = test_db();
        let mut context = Context::new();
        context.insert("urgency".into(), "high".into());
        context.insert("count".into(), ContextValue::Integer(2));

        let id = store_node(&conn, "Database migration on Friday", &context).unwrap();
        let raw: String = conn
            .query_row(
                "SELECT context FROM memory_nodes WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["urgency"], "high");
        assert_eq!(value["count"], 2);
    }

    #[test]
    fn test_find_project_summary_is_prefix_and_case_sensitive() {
        let conn = test_db();
        assert!(find_project_summary(&conn, "X").unwrap().is_none());

        store_node(&conn, "Notes: Summary of X: not a summary", &Context::new()).unwrap();
        store_node(&conn, "summary of X: lowercase", &Context::new()).unwrap();
        store_node(&conn, "Summary of Xylophone:\n", &Context::new()).unwrap();
        assert!(find_project_summary(&conn, "X").unwrap().is_none());

        let id = store_node_with_type(
            &conn,
            "Summary of X:\n\nTotal memories: 3",
            &Context::new(),
            NodeType::Summary,
        )
        .unwrap();
        assert_eq!(find_project_summary(&conn, "X").unwrap(), Some(id));
    }
}
