//! MCP `get_knowledge_overview` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `get_knowledge_overview` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeOverviewParams {
    /// Topic to narrow the overview to. Omit for a whole-store overview.
    #[schemars(
        description = "Optional topic to focus on. Omit for an overview of everything stored."
    )]
    pub topic: Option<String>,
}
