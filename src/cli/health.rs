//! CLI `health` command: store status, integrity check, and counts by node type.

use anyhow::{Context, Result};

use crate::config::MemgraphConfig;
use crate::db;
use crate::memory::stats::{count_by_node_type, graph_stats};

pub fn health(config: &MemgraphConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `memgraph serve` or `memgraph store` to initialize.");
        return Ok(());
    }

    let conn = db::open_database(&db_path)
        .context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;
    let stats = graph_stats(&conn)?;
    let by_type = count_by_node_type(&conn)?;

    println!("memgraph Health Report");
    println!("======================");
    println!();
    println!("Status:            healthy");
    println!("Database:          {}", db_path.display());
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Graph:");
    println!("  Memories:        {}", stats.node_count);
    println!("  Relationships:   {}", stats.relationship_count);
    println!("  Graph size:      {}", stats.graph_size());
    println!();
    println!("By node type:");
    for t in &["normal", "summary", "abstract"] {
        println!("  {:<16} {}", t, by_type.get(*t).copied().unwrap_or(0));
    }
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }

    Ok(())
}
