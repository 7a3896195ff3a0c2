//! Point lookup with access tracking.
//!
//! Every successful lookup bumps `access_count` and moves `last_accessed_at`
//! forward inside one IMMEDIATE transaction, so concurrent lookups of the same
//! node never lose an increment.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::error::MemoryResult;
use super::store::{node_from_row, NODE_COLUMNS};
use super::types::{timestamp_now, MemoryNode};

/// Look up a node by id and record the access.
///
/// Returns `Ok(None)` for an unknown id. The returned node reflects the new
/// access count and timestamp.
pub fn get_node(conn: &mut Connection, id: &str) -> MemoryResult<Option<MemoryNode>> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let now = timestamp_now();
    let updated = tx.execute(
        "UPDATE memory_nodes \
         SET last_accessed_at = CASE WHEN ?1 > last_accessed_at THEN ?1 ELSE last_accessed_at END, \
             access_count = access_count + 1 \
         WHERE id = ?2",
        params![now, id],
    )?;

    if updated == 0 {
        tx.rollback()?;
        tracing::debug!(memory_id = %id, "memory not found");
        return Ok(None);
    }

    let node = tx
        .query_row(
            &format!("SELECT {NODE_COLUMNS} FROM memory_nodes WHERE id = ?1"),
            params![id],
            node_from_row,
        )
        .optional()?;

    tx.commit()?;

    tracing::info!(memory_id = %id, "memory retrieved");
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::store::store_node;
    use crate::memory::types::Context;

    fn test_db() -> Connection {
        crate::db::open_memory_database().unwrap()
    }

    #[test]
    fn test_get_increments_access_count() {
        let mut conn = test_db();
        let id = store_node(&conn, "Meeting with Alice", &Context::new()).unwrap();

        let first = get_node(&mut conn, &id).unwrap().unwrap();
        assert_eq!(first.access_count, 1);
        assert!(first.last_accessed_at >= first.created_at);

        let second = get_node(&mut conn, &id).unwrap().unwrap();
        assert_eq!(second.access_count, 2);
        assert!(second.last_accessed_at >= first.last_accessed_at);
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let mut conn = test_db();
        assert!(get_node(&mut conn, "no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_last_accessed_never_moves_backwards() {
        let mut conn = test_db();
        let id = store_node(&conn, "Future-dated", &Context::new()).unwrap();

        // Simulate a clock that was ahead when the node was last read
        let future = "2999-01-01T00:00:00.000000Z";
        conn.execute(
            "UPDATE memory_nodes SET last_accessed_at = ?1 WHERE id = ?2",
            params![future, id],
        )
        .unwrap();

        let node = get_node(&mut conn, &id).unwrap().unwrap();
        assert_eq!(node.last_accessed_at, future);
        assert_eq!(node.access_count, 1);
    }
}
