use anyhow::{Context, Result};

use crate::config::MemgraphConfig;
use crate::memory::types::context_from_json;

/// Store one memory from the terminal and print its id.
pub fn store(config: &MemgraphConfig, content: &str, context_json: Option<&str>) -> Result<()> {
    let context = match context_json {
        Some(raw) => {
            let value: serde_json::Value =
                serde_json::from_str(raw).context("--context is not valid JSON")?;
            context_from_json(value)?
        }
        None => Default::default(),
    };

    let conn = crate::db::open_database(config.resolved_db_path())?;
    let id = crate::memory::store::store_node(&conn, content, &context)?;

    println!("{id}");
    Ok(())
}
