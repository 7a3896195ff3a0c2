mod cli;
mod config;
mod db;
mod discovery;
mod engine;
mod memory;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memgraph", version, about = "Persistent memory graph with background relationship discovery")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (and background discovery)
    Serve {
        /// Transport to serve on. Defaults to `server.transport` from config.
        #[arg(long, value_enum)]
        transport: Option<Transport>,
    },
    /// Store a memory
    Store {
        content: String,
        /// Context as a JSON object, e.g. '{"project": "webapp"}'
        #[arg(long)]
        context: Option<String>,
    },
    /// Search memories by substring
    Search {
        #[arg(default_value = "")]
        query: String,
        /// Maximum results (1-100)
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Show a memory and its relationships
    Recall { id: String },
    /// Print a database health report
    Health,
    /// Run one discovery cycle in the foreground
    Discover,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transport {
    Stdio,
    Sse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::MemgraphConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            let transport = match transport {
                Some(t) => t,
                None => match config.server.transport.as_str() {
                    "stdio" => Transport::Stdio,
                    "sse" | "http" => Transport::Sse,
                    other => anyhow::bail!("unknown transport in config: {other}"),
                },
            };
            match transport {
                Transport::Stdio => server::serve_stdio(config).await?,
                Transport::Sse => server::serve_sse(config).await?,
            }
        }
        Command::Store { content, context } => {
            cli::store(&config, &content, context.as_deref())?;
        }
        Command::Search { query, limit } => {
            cli::search(&config, &query, limit)?;
        }
        Command::Recall { id } => {
            cli::recall(&config, &id)?;
        }
        Command::Health => {
            cli::health(&config)?;
        }
        Command::Discover => {
            cli::discover(&config)?;
        }
    }

    Ok(())
}
