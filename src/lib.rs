//! Persistent memory graph for AI agents, with background relationship discovery.
//!
//! memgraph stores free-text memories with structured context in SQLite, serves
//! them over [MCP](https://modelcontextprotocol.io/), and runs a background worker
//! that links related memories and writes per-project summaries.
//!
//! | Node type | Produced by |
//! |-----------|-------------|
//! | **normal** | Callers, via `store_memory` |
//! | **summary** | Background discovery, one per project cluster |
//! | **abstract** | Reserved |
//!
//! # Architecture
//!
//! - **Storage**: SQLite (WAL) with a node table and a weighted relationship table
//! - **Search**: case-sensitive substring match over content and context, ranked
//!   by priority then most recent access
//! - **Discovery**: a cancellable fixed-interval loop that scores sampled node
//!   pairs and summarizes project clusters
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP/SSE
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`memory`]: Node store, access tracking, search, relationships, and stats
//! - [`discovery`]: Relationship scoring, project summaries, and the scheduler
//! - [`engine`]: Async core surface shared by every adapter

pub mod config;
pub mod db;
pub mod discovery;
pub mod engine;
pub mod memory;
