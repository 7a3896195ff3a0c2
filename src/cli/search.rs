use anyhow::Result;

use crate::config::MemgraphConfig;
use crate::memory::search::{clamp_limit, search_nodes};
use crate::memory::truncate_preview;

/// Run a substring search from the terminal.
pub fn search(config: &MemgraphConfig, query: &str, limit: Option<i64>) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;
    let limit = clamp_limit(limit, config.retrieval.default_limit);

    let nodes = search_nodes(&conn, query, limit)?;
    if nodes.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", nodes.len());

    for (i, node) in nodes.iter().enumerate() {
        println!(
            "  {}. [{}] {} (priority: {:.2}, last access: {})",
            i + 1,
            node.node_type,
            node.id,
            node.priority_score,
            node.last_accessed_at,
        );
        println!("     {}", truncate_preview(&node.content, 120));
        println!();
    }

    Ok(())
}
