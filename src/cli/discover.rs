use anyhow::Result;
use std::sync::{Arc, Mutex};

use crate::config::MemgraphConfig;
use crate::discovery::{Discovery, DiscoveryCycle};

/// Run a single discovery cycle in the foreground and print what it did.
pub fn discover(config: &MemgraphConfig) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;
    let discovery = Discovery::new(Arc::new(Mutex::new(conn)), config.discovery.clone());

    let report = discovery.run_cycle()?;

    if report.skipped {
        println!(
            "Discovery skipped: {} memory(ies) stored, at least 2 needed.",
            report.node_count
        );
        return Ok(());
    }

    println!("Discovery cycle complete");
    println!("  Memories:                {}", report.node_count);
    println!("  Pairs scored:            {}", report.pairs_scored);
    println!("  Relationships found:     {}", report.relationships_found);
    println!("  Relationships persisted: {}", report.relationships_persisted);
    println!("  Summaries created:       {}", report.summaries_created);
    Ok(())
}
