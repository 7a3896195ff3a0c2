//! CLI `recall` command: print one node and its outgoing relationships.

use anyhow::Result;

use crate::config::MemgraphConfig;
use crate::memory::access::get_node;
use crate::memory::relations::relationships_from;

/// Look up a memory by id. Counts as an access, like the MCP tool.
pub fn recall(config: &MemgraphConfig, id: &str) -> Result<()> {
    let mut conn = crate::db::open_database(config.resolved_db_path())?;

    let Some(node) = get_node(&mut conn, id)? else {
        println!("Memory not found: {id}");
        return Ok(());
    };

    println!("Memory {}", node.id);
    println!("{}", "=".repeat(44));
    println!("  Type:           {}", node.node_type);
    println!("  Created:        {}", node.created_at);
    println!("  Last accessed:  {}", node.last_accessed_at);
    println!("  Access count:   {}", node.access_count);
    println!("  Priority:       {:.2}", node.priority_score);
    if !node.context.is_empty() {
        println!("  Context:        {}", serde_json::to_string(&node.context)?);
    }
    println!();
    println!("{}", node.content);

    let edges = relationships_from(&conn, &node.id)?;
    if !edges.is_empty() {
        println!();
        println!("Related ({}):", edges.len());
        for edge in &edges {
            println!(
                "  -> {} [{}] weight {:.3}",
                edge.to_node_id, edge.relationship_type, edge.weight
            );
        }
    }

    Ok(())
}
