//! MCP `store_memory` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoreMemoryParams {
    #[schemars(description = "The text content of the memory. Must not be empty.")]
    pub content: String,

    #[schemars(
        description = "Optional JSON object of structured context, e.g. {\"project\": \"webapp\", \"type\": \"meeting\"}"
    )]
    pub context: Option<serde_json::Value>,
}
