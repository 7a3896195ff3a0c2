//! MCP `query_memories` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `query_memories` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct QueryMemoriesParams {
    /// Case-sensitive substring matched against content and context.
    #[schemars(
        description = "Case-sensitive text matched against memory content and context. Empty matches everything."
    )]
    pub query: String,

    /// Maximum number of results (1–100). Defaults to 10.
    #[schemars(description = "Maximum number of results to return (1-100). Defaults to 10.")]
    pub limit: Option<i64>,
}
