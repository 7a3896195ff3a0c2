//! MCP `exhaustive_search` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `exhaustive_search` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExhaustiveSearchParams {
    #[schemars(description = "Case-sensitive text matched against memory content and context. Empty matches everything.")]
    pub query: String,
}
