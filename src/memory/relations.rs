//! Relationship storage.
//!
//! Edges are keyed by the ordered pair `(from_node_id, to_node_id)`; writing the
//! same pair again replaces the previous edge. Both endpoints must exist
//! (enforced by foreign keys).

use rusqlite::{params, Connection};

use super::error::{MemoryError, MemoryResult};
use super::types::{MemoryRelationship, RelationshipType};

/// Insert or replace a relationship.
pub fn put_relationship(conn: &Connection, relationship: &MemoryRelationship) -> MemoryResult<()> {
    if !(0.0..=1.0).contains(&relationship.weight) {
        return Err(MemoryError::Validation(format!(
            "relationship weight must be between 0.0 and 1.0, got {}",
            relationship.weight
        )));
    }

    conn.execute(
        "INSERT OR REPLACE INTO memory_relationships \
         (from_node_id, to_node_id, weight, relationship_type, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            relationship.from_node_id,
            relationship.to_node_id,
            relationship.weight,
            relationship.relationship_type.as_str(),
            relationship.created_at,
        ],
    )?;
    Ok(())
}

/// Total number of stored relationships.
pub fn count_relationships(conn: &Connection) -> MemoryResult<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM memory_relationships",
        [],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Outgoing edges of a node, strongest first.
pub fn relationships_from(conn: &Connection, node_id: &str) -> MemoryResult<Vec<MemoryRelationship>> {
    let mut stmt = conn.prepare(
        "SELECT from_node_id, to_node_id, weight, relationship_type, created_at \
         FROM memory_relationships WHERE from_node_id = ?1 \
         ORDER BY weight DESC, created_at DESC",
    )?;
    let rows = stmt
        .query_map(params![node_id], |row| {
            let kind: String = row.get(3)?;
            let relationship_type = kind.parse::<RelationshipType>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    e.into(),
                )
            })?;
            Ok(MemoryRelationship {
                from_node_id: row.get(0)?,
                to_node_id: row.get(1)?,
                weight: row.get(2)?,
                relationship_type,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::store::store_node;
    use crate::memory::types::{timestamp_now, Context};

    fn test_db() -> Connection {
        crate::db::open_memory_database().unwrap()
    }

    fn edge(from: &str, to: &str, weight: f64, kind: RelationshipType) -> MemoryRelationship {
        MemoryRelationship {
            from_node_id: from.to_string(),
            to_node_id: to.to_string(),
            weight,
            relationship_type: kind,
            created_at: timestamp_now(),
        }
    }

    #[test]
    fn test_put_and_count() {
        let conn = test_db();
        let a = store_node(&conn, "A", &Context::new()).unwrap();
        let b = store_node(&conn, "B", &Context::new()).unwrap();

        put_relationship(&conn, &edge(&a, &b, 0.5, RelationshipType::Semantic)).unwrap();
        assert_eq!(count_relationships(&conn).unwrap(), 1);

        // Reverse direction is a distinct edge
        put_relationship(&conn, &edge(&b, &a, 0.5, RelationshipType::Semantic)).unwrap();
        assert_eq!(count_relationships(&conn).unwrap(), 2);
    }

    #[test]
    fn test_put_replaces_same_pair() {
        let conn = test_db();
        let a = store_node(&conn, "A", &Context::new()).unwrap();
        let b = store_node(&conn, "B", &Context::new()).unwrap();

        put_relationship(&conn, &edge(&a, &b, 0.4, RelationshipType::Semantic)).unwrap();
        put_relationship(&conn, &edge(&a, &b, 0.9, RelationshipType::ProjectRelated)).unwrap();

        assert_eq!(count_relationships(&conn).unwrap(), 1);
        let edges = relationships_from(&conn, &a).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].weight, 0.9);
        assert_eq!(edges[0].relationship_type, RelationshipType::ProjectRelated);
    }

    #[test]
    fn test_weight_out_of_range_is_rejected() {
        let conn = test_db();
        let a = store_node(&conn, "A", &Context::new()).unwrap();
        let b = store_node(&conn, "B", &Context::new()).unwrap();

        let err = put_relationship(&conn, &edge(&a, &b, 1.2, RelationshipType::Semantic)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(count_relationships(&conn).unwrap(), 0);
    }

    #[test]
    fn test_missing_endpoint_is_storage_error() {
        let conn = test_db();
        let a = store_node(&conn, "A", &Context::new()).unwrap();

        let err = put_relationship(&conn, &edge(&a, "ghost", 0.5, RelationshipType::Semantic))
            .unwrap_err();
        assert!(matches!(err, MemoryError::Storage(_)));
    }

    #[test]
    fn test_relationships_from_orders_by_weight() {
        let conn = test_db();
        let a = store_node(&conn, "A", &Context::new()).unwrap();
        let b = store_node(&conn, "B", &Context::new()).unwrap();
        let c = store_node(&conn, "C", &Context::new()).unwrap();

        put_relationship(&conn, &edge(&a, &b, 0.35, RelationshipType::Semantic)).unwrap();
        put_relationship(&conn, &edge(&a, &c, 0.8, RelationshipType::TypeSimilar)).unwrap();

        let edges = relationships_from(&conn, &a).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].to_node_id, c);
        assert_eq!(edges[1].to_node_id, b);
        assert!(relationships_from(&conn, &b).unwrap().is_empty());
    }
}
