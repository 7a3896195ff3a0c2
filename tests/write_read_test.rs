mod helpers;

use helpers::{ctx, insert_node, set_rank, test_db};
use memgraph::db;
use memgraph::memory::access::get_node;
use memgraph::memory::search::search_nodes;
use memgraph::memory::store::store_node;
use memgraph::memory::types::{context_from_json, Context, ContextValue, NodeType};

#[test]
fn store_then_get_round_trips_content_and_context() {
    let mut conn = test_db();

    let mut context = ctx(&[("project", "Q4 Strategy"), ("type", "meeting")]);
    context.insert(
        "participants".into(),
        ContextValue::List(vec!["Alice".into(), "Bob".into()]),
    );
    context.insert("duration_min".into(), ContextValue::Integer(45));

    let id = store_node(&conn, "Quarterly planning meeting", &context).unwrap();
    let node = get_node(&mut conn, &id).unwrap().unwrap();

    assert_eq!(node.id, id);
    assert_eq!(node.content, "Quarterly planning meeting");
    assert_eq!(node.context, context);
    assert_eq!(node.node_type, NodeType::Normal);
    assert_eq!(node.priority_score, 1.0);
    assert_eq!(node.access_count, 1);
}

#[test]
fn large_unsigned_context_values_round_trip_exactly() {
    let mut conn = test_db();

    let original = serde_json::json!({"n": 18446744073709551615u64, "small": 7, "ratio": 0.5});
    let context = context_from_json(original.clone()).unwrap();
    let id = store_node(&conn, "big numbers", &context).unwrap();

    let node = get_node(&mut conn, &id).unwrap().unwrap();
    assert_eq!(node.context, context);
    assert_eq!(node.context["n"], ContextValue::UInt(u64::MAX));
    assert_eq!(node.context["small"], ContextValue::Integer(7));
    assert_eq!(serde_json::to_value(&node.context).unwrap(), original);
}

#[test]
fn concurrent_lookups_lose_no_increments() {
    const THREADS: u64 = 4;
    const LOOKUPS: u64 = 25;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.db");
    let conn = db::open_database(&path).unwrap();
    let id = insert_node(&conn, "hot node", &[]);

    // Open every connection up front so schema setup never races.
    let conns: Vec<_> = (0..THREADS)
        .map(|_| db::open_database(&path).unwrap())
        .collect();

    let handles: Vec<_> = conns
        .into_iter()
        .map(|mut conn| {
            let id = id.clone();
            std::thread::spawn(move || {
                for _ in 0..LOOKUPS {
                    assert!(get_node(&mut conn, &id).unwrap().is_some());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let count: i64 = conn
        .query_row(
            "SELECT access_count FROM memory_nodes WHERE id = ?1",
            [&id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count as u64, THREADS * LOOKUPS);
}

#[test]
fn empty_content_writes_nothing() {
    let conn = test_db();

    let err = store_node(&conn, "", &Context::new()).unwrap_err();
    assert!(err.is_validation());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_nodes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn unknown_id_is_none() {
    let mut conn = test_db();
    insert_node(&conn, "something", &[]);
    assert!(get_node(&mut conn, "does-not-exist").unwrap().is_none());
}

#[test]
fn each_lookup_counts_once_and_never_moves_back() {
    let mut conn = test_db();
    let id = insert_node(&conn, "tracked", &[]);

    let mut last_seen = String::new();
    for expected in 1..=4u64 {
        let node = get_node(&mut conn, &id).unwrap().unwrap();
        assert_eq!(node.access_count, expected);
        assert!(node.last_accessed_at >= last_seen);
        assert!(node.last_accessed_at >= node.created_at);
        last_seen = node.last_accessed_at;
    }

    // A stored timestamp from the future is kept, not rewound
    set_rank(&conn, &id, 1.0, "2999-01-01T00:00:00.000000Z");
    let node = get_node(&mut conn, &id).unwrap().unwrap();
    assert_eq!(node.last_accessed_at, "2999-01-01T00:00:00.000000Z");
    assert_eq!(node.access_count, 5);
}

#[test]
fn search_orders_by_priority_then_recency() {
    let conn = test_db();
    let low = insert_node(&conn, "note low", &[]);
    let high_old = insert_node(&conn, "note high old", &[]);
    let high_new = insert_node(&conn, "note high new", &[]);

    set_rank(&conn, &low, 0.5, "2030-01-01T00:00:00.000000Z");
    set_rank(&conn, &high_old, 2.0, "2024-01-01T00:00:00.000000Z");
    set_rank(&conn, &high_new, 2.0, "2025-01-01T00:00:00.000000Z");

    let ids: Vec<String> = search_nodes(&conn, "", 10)
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![high_new, high_old, low]);
}

#[test]
fn search_respects_limit_and_does_not_count_access() {
    let conn = test_db();
    for i in 0..5 {
        insert_node(&conn, &format!("entry {i}"), &[]);
    }

    let hits = search_nodes(&conn, "", 3).unwrap();
    assert_eq!(hits.len(), 3);

    let again = search_nodes(&conn, "entry", 10).unwrap();
    assert_eq!(again.len(), 5);
    assert!(again.iter().all(|n| n.access_count == 0));
}

#[test]
fn search_matches_context_and_is_case_sensitive() {
    let conn = test_db();
    let react = insert_node(&conn, "Frontend work", &[("tech", "React")]);
    insert_node(&conn, "backend work", &[("tech", "Rust")]);

    let hits = search_nodes(&conn, "React", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, react);

    assert!(search_nodes(&conn, "react", 10).unwrap().is_empty());
    assert_eq!(search_nodes(&conn, "work", 10).unwrap().len(), 2);
}
