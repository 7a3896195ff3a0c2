pub mod exhaustive_search;
pub mod knowledge_overview;
pub mod query_memories;
pub mod recall_memory;
pub mod store_memory;

use exhaustive_search::ExhaustiveSearchParams;
use knowledge_overview::KnowledgeOverviewParams;
use query_memories::QueryMemoriesParams;
use recall_memory::RecallMemoryParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, GetPromptRequestParams, GetPromptResult, ListPromptsResult, ListResourcesResult,
    PaginatedRequestParams, Prompt, PromptArgument, PromptMessage, PromptMessageRole, RawResource,
    ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use store_memory::StoreMemoryParams;

use crate::engine::MemoryEngine;
use crate::memory::search::MAX_LIMIT;
use crate::memory::types::context_from_json;

pub const MEMORY_ASSISTANT_PROMPT: &str = "memory_assistant";
pub const HEALTH_RESOURCE_URI: &str = "memory://health";
pub const RECENT_RESOURCE_URI: &str = "memory://recent";

const RECENT_RESOURCE_LIMIT: i64 = 10;
const JSON_MIME: &str = "application/json";

/// The memgraph MCP tool handler. Wraps a [`MemoryEngine`] and exposes its
/// operations via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct MemgraphTools {
    tool_router: ToolRouter<Self>,
    engine: MemoryEngine,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {e}"))
}

fn internal_error(e: impl std::fmt::Display) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

#[tool_router]
impl MemgraphTools {
    pub fn new(engine: MemoryEngine) -> Self {
        Self {
            tool_router: Self::tool_router(),
            engine,
        }
    }

    /// Store a new memory node.
    #[tool(description = "Store a new memory with optional structured context (a JSON object). Returns the new memory's id.")]
    async fn store_memory(
        &self,
        Parameters(params): Parameters<StoreMemoryParams>,
    ) -> Result<String, String> {
        let context = params
            .context
            .map(context_from_json)
            .transpose()
            .map_err(|e| e.to_string())?;

        tracing::info!(content_len = params.content.len(), "store_memory called");

        let id = self
            .engine
            .store_memory(params.content, context)
            .await
            .map_err(|e| format!("store failed: {e}"))?;

        Ok(serde_json::json!({ "memory_id": id, "status": "stored" }).to_string())
    }

    /// Search memories by substring.
    #[tool(description = "Search memories whose content or context contains the query text. Results are ranked by priority, then most recent access.")]
    async fn query_memories(
        &self,
        Parameters(params): Parameters<QueryMemoriesParams>,
    ) -> Result<String, String> {
        tracing::info!(query = %params.query, limit = ?params.limit, "query_memories called");

        let results = self
            .engine
            .query_memories(params.query, params.limit)
            .await
            .map_err(|e| format!("query failed: {e}"))?;

        to_json(&serde_json::json!({
            "total": results.len(),
            "memories": results,
        }))
    }

    /// Search with the largest allowed limit.
    #[tool(description = "Search across all memories with the maximum result limit (100). Each result includes its creation time.")]
    async fn exhaustive_search(
        &self,
        Parameters(params): Parameters<ExhaustiveSearchParams>,
    ) -> Result<String, String> {
        tracing::info!(query = %params.query, "exhaustive_search called");

        let results = self
            .engine
            .query_memories(params.query.clone(), Some(MAX_LIMIT as i64))
            .await
            .map_err(|e| format!("search failed: {e}"))?;

        to_json(&serde_json::json!({
            "query": params.query,
            "total": results.len(),
            "memories": results,
        }))
    }

    /// Fetch one memory by id, recording the access.
    #[tool(description = "Retrieve a memory by id. Updates its access count and last access time.")]
    async fn recall_memory(
        &self,
        Parameters(params): Parameters<RecallMemoryParams>,
    ) -> Result<String, String> {
        tracing::info!(memory_id = %params.memory_id, "recall_memory called");

        match self
            .engine
            .recall_memory(params.memory_id.clone())
            .await
            .map_err(|e| format!("recall failed: {e}"))?
        {
            Some(memory) => to_json(&memory),
            None => Ok(serde_json::json!({
                "found": false,
                "memory_id": params.memory_id,
            })
            .to_string()),
        }
    }

    /// Report store health.
    #[tool(description = "Get memory store health: memory count, graph size (memories plus relationships), and database path.")]
    async fn get_health_status(&self) -> Result<String, String> {
        let health = self
            .engine
            .get_health_status()
            .await
            .map_err(|e| format!("health check failed: {e}"))?;
        to_json(&health)
    }

    /// Summarize what is stored, optionally around a topic.
    #[tool(description = "Get an overview of stored knowledge. With a topic: matching memories and the context values they use. Without: totals and the most recent memories.")]
    async fn get_knowledge_overview(
        &self,
        Parameters(params): Parameters<KnowledgeOverviewParams>,
    ) -> Result<String, String> {
        let overview = self
            .engine
            .knowledge_overview(params.topic)
            .await
            .map_err(|e| format!("overview failed: {e}"))?;
        to_json(&overview)
    }
}

impl MemgraphTools {
    fn prompts() -> Vec<Prompt> {
        let context = PromptArgument {
            name: "context".into(),
            title: None,
            description: Some("Current context or topic of conversation".into()),
            required: Some(false),
        };
        vec![Prompt::new(
            MEMORY_ASSISTANT_PROMPT,
            Some("A helpful assistant for managing and querying your memories"),
            Some(vec![context]),
        )]
    }

    /// The `memory_assistant` prompt, embedding the live memory count.
    async fn assistant_prompt(&self, context: Option<&str>) -> Result<GetPromptResult, McpError> {
        let health = self
            .engine
            .get_health_status()
            .await
            .map_err(|e| McpError::internal_error(format!("health check failed: {e}"), None))?;

        let text = format!(
            "You are a helpful memory management assistant. You have access to a knowledge \
             base with {} memories.\n\n\
             Current context: {}\n\n\
             You can help users:\n\
             - Store new memories with appropriate context\n\
             - Search and retrieve existing memories\n\
             - Get overviews of their knowledge base\n\
             - Recall specific memories by ID\n\n\
             Suggest relevant memory operations when appropriate. When users mention something \
             they might want to remember, offer to store it as a memory.",
            health.memory_count,
            context.unwrap_or("general"),
        );

        Ok(GetPromptResult {
            description: Some("Memory management assistant prompt".into()),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
        })
    }

    fn resources() -> Vec<Resource> {
        [
            (
                HEALTH_RESOURCE_URI,
                "System Health",
                "Current health and statistics of the memory system",
            ),
            (
                RECENT_RESOURCE_URI,
                "Recent Memories",
                "Highest ranked memories, most recently accessed first",
            ),
        ]
        .into_iter()
        .map(|(uri, name, description)| {
            let mut raw = RawResource::new(uri, name);
            raw.description = Some(description.into());
            raw.mime_type = Some(JSON_MIME.into());
            raw.no_annotation()
        })
        .collect()
    }

    /// Read one of the `memory://` resources as pretty-printed JSON.
    async fn read_memory_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let body = match uri {
            HEALTH_RESOURCE_URI => {
                let health = self.engine.get_health_status().await.map_err(internal_error)?;
                serde_json::to_string_pretty(&health).map_err(internal_error)?
            }
            RECENT_RESOURCE_URI => {
                let recent = self
                    .engine
                    .query_memories(String::new(), Some(RECENT_RESOURCE_LIMIT))
                    .await
                    .map_err(internal_error)?;
                serde_json::to_string_pretty(&recent).map_err(internal_error)?
            }
            other => {
                return Err(McpError::resource_not_found(
                    format!("unknown resource: {other}"),
                    None,
                ))
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some(JSON_MIME.into()),
                text: body,
                meta: None,
            }],
        })
    }
}

#[tool_handler]
impl ServerHandler for MemgraphTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "memgraph is a persistent memory graph. Use store_memory to save memories, \
                 query_memories or exhaustive_search to search, and recall_memory to read one \
                 by id. Related memories and project summaries are discovered in the background."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(Self::prompts()))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        if request.name != MEMORY_ASSISTANT_PROMPT {
            return Err(McpError::invalid_params(
                format!("unknown prompt: {}", request.name),
                None,
            ));
        }
        let context = request
            .arguments
            .as_ref()
            .and_then(|args| args.get("context"))
            .and_then(|v| v.as_str());
        self.assistant_prompt(context).await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(Self::resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_memory_resource(&request.uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrievalConfig;
    use std::sync::{Arc, Mutex};

    fn tools() -> MemgraphTools {
        let conn = crate::db::open_memory_database().unwrap();
        MemgraphTools::new(MemoryEngine::new(
            Arc::new(Mutex::new(conn)),
            ":memory:",
            RetrievalConfig::default(),
        ))
    }

    #[tokio::test]
    async fn store_query_recall_round_trip() {
        let tools = tools();

        let stored = tools
            .store_memory(Parameters(StoreMemoryParams {
                content: "Sprint planning".into(),
                context: Some(serde_json::json!({"project": "webapp"})),
            }))
            .await
            .unwrap();
        let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
        let id = stored["memory_id"].as_str().unwrap().to_string();

        let found = tools
            .query_memories(Parameters(QueryMemoriesParams {
                query: "webapp".into(),
                limit: Some(500),
            }))
            .await
            .unwrap();
        let found: serde_json::Value = serde_json::from_str(&found).unwrap();
        assert_eq!(found["total"], 1);
        assert_eq!(found["memories"][0]["id"], id.as_str());

        let recalled = tools
            .recall_memory(Parameters(RecallMemoryParams { memory_id: id }))
            .await
            .unwrap();
        let recalled: serde_json::Value = serde_json::from_str(&recalled).unwrap();
        assert_eq!(recalled["access_count"], 1);
        assert_eq!(recalled["context"]["project"], "webapp");
    }

    #[tokio::test]
    async fn rejects_non_object_context() {
        let err = tools()
            .store_memory(Parameters(StoreMemoryParams {
                content: "x".into(),
                context: Some(serde_json::json!(["not", "an", "object"])),
            }))
            .await
            .unwrap_err();
        assert!(err.contains("context must be a JSON object"));
    }

    #[tokio::test]
    async fn unknown_memory_is_a_normal_result() {
        let out = tools()
            .recall_memory(Parameters(RecallMemoryParams {
                memory_id: "nope".into(),
            }))
            .await
            .unwrap();
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["found"], false);
        assert_eq!(out["memory_id"], "nope");
    }

    #[tokio::test]
    async fn exhaustive_search_ignores_default_limit() {
        let tools = tools();
        for i in 0..12 {
            tools
                .store_memory(Parameters(StoreMemoryParams {
                    content: format!("log entry {i}"),
                    context: None,
                }))
                .await
                .unwrap();
        }

        let out = tools
            .exhaustive_search(Parameters(ExhaustiveSearchParams {
                query: "log".into(),
            }))
            .await
            .unwrap();
        let out: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["total"], 12);
        assert_eq!(out["query"], "log");
        assert!(out["memories"][0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn assistant_prompt_embeds_memory_count() {
        let tools = tools();
        for content in ["one", "two"] {
            tools
                .store_memory(Parameters(StoreMemoryParams {
                    content: content.into(),
                    context: None,
                }))
                .await
                .unwrap();
        }

        let prompt = tools.assistant_prompt(Some("planning")).await.unwrap();
        assert_eq!(prompt.messages.len(), 1);
        let rmcp::model::PromptMessageContent::Text { text } = &prompt.messages[0].content else {
            panic!("expected a text message");
        };
        assert!(text.contains("knowledge base with 2 memories"));
        assert!(text.contains("Current context: planning"));

        let fallback = tools.assistant_prompt(None).await.unwrap();
        let rmcp::model::PromptMessageContent::Text { text } = &fallback.messages[0].content else {
            panic!("expected a text message");
        };
        assert!(text.contains("Current context: general"));

        let listed = MemgraphTools::prompts();
        assert_eq!(listed[0].name, MEMORY_ASSISTANT_PROMPT);
    }

    #[tokio::test]
    async fn memory_resources_read_as_json() {
        let tools = tools();
        tools
            .store_memory(Parameters(StoreMemoryParams {
                content: "recent note".into(),
                context: None,
            }))
            .await
            .unwrap();

        let uris: Vec<String> = MemgraphTools::resources()
            .into_iter()
            .map(|r| r.raw.uri)
            .collect();
        assert_eq!(uris, vec![HEALTH_RESOURCE_URI, RECENT_RESOURCE_URI]);

        let text_of = |result: ReadResourceResult| match result.contents.into_iter().next() {
            Some(ResourceContents::TextResourceContents { text, mime_type, .. }) => {
                assert_eq!(mime_type.as_deref(), Some(JSON_MIME));
                serde_json::from_str::<serde_json::Value>(&text).unwrap()
            }
            other => panic!("unexpected contents: {other:?}"),
        };

        let health = text_of(tools.read_memory_resource(HEALTH_RESOURCE_URI).await.unwrap());
        assert_eq!(health["memory_count"], 1);

        let recent = text_of(tools.read_memory_resource(RECENT_RESOURCE_URI).await.unwrap());
        assert_eq!(recent[0]["content"], "recent note");

        let err = tools.read_memory_resource("memory://nope").await.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);
    }

    #[tokio::test]
    async fn overview_without_topic() {
        let tools = tools();
        tools
            .store_memory(Parameters(StoreMemoryParams {
                content: "first".into(),
                context: None,
            }))
            .await
            .unwrap();

        let overview = tools
            .get_knowledge_overview(Parameters(KnowledgeOverviewParams { topic: None }))
            .await
            .unwrap();
        let overview: serde_json::Value = serde_json::from_str(&overview).unwrap();
        assert_eq!(overview["kind"], "general");
        assert_eq!(overview["memory_count"], 1);
    }
}
