//! Paper Snowball - Entry Point
//!
//! Searches papers, fetches title suggestions and follows references from the
//! command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_snowball::config::{Config, api};
use paper_snowball::models::{Provider, ReferenceDepth, ResponseFormat};
use paper_snowball::view::{ReferenceExplorer, SearchSession, ViewState};
use paper_snowball::{ScholarClient, actions, formatters};

#[derive(Parser, Debug)]
#[command(name = "paper-snowball")]
#[command(about = "Search papers and snowball their references")]
#[command(version)]
struct Cli {
    /// Base URL of the search backend
    #[arg(long, env = api::BASE_URL_ENV, default_value = api::BASE_URL)]
    api_url: String,

    /// Output format: markdown or json
    #[arg(long, default_value = "markdown")]
    format: ResponseFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search papers by free-text query
    Search {
        /// Search query
        query: String,

        /// Publication year filter
        #[arg(long)]
        year: Option<String>,

        /// Provider: semantic_scholar, arxiv_papers or doaj
        #[arg(long, default_value = "semantic_scholar")]
        provider: Provider,
    },

    /// Suggest titles for a partial query
    Suggest {
        /// Partial query (at least 3 characters)
        query: String,

        #[arg(long, default_value = "semantic_scholar")]
        provider: Provider,
    },

    /// Download the references of a paper
    References {
        /// Seed paper ID
        paper_id: String,

        /// Expansion depth: 1 (direct) or 2 (references of references)
        #[arg(long, default_value = "1")]
        depth: ReferenceDepth,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// Print a finished view, failing the process when the request failed.
fn emit<T>(
    state: &ViewState<T>,
    format: ResponseFormat,
    noun: &str,
    markdown: impl FnOnce(&[T]) -> String,
    json: impl FnOnce(&[T]) -> serde_json::Value,
) -> anyhow::Result<()> {
    if let Some(message) = state.error() {
        if format.is_json() {
            println!("{}", serde_json::json!({ "error": message }));
        }
        anyhow::bail!("{message}");
    }

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&json(state.items()))?);
    } else {
        println!("{}", formatters::format_view_markdown(state, noun, markdown));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), api_url = %cli.api_url, "Starting");

    let config = Config::new(&cli.api_url)?;
    let client = ScholarClient::new(config)?;
    let format = cli.format;

    match cli.command {
        Command::Search { query, year, provider } => {
            tracing::debug!(provider = provider.name(), %query, "Submitting search");
            let session = SearchSession::new(client);
            session.submit(&query, year.as_deref(), provider).await;
            emit(
                &session.state().await,
                format,
                "papers",
                formatters::format_papers_markdown,
                formatters::papers_json,
            )?;
        }
        Command::Suggest { query, provider } => {
            let suggestions = actions::fetch_suggestions(&client, &query, provider)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_user_message()))?;

            if format.is_json() {
                println!("{}", serde_json::json!({ "suggestions": suggestions }));
            } else if suggestions.is_empty() {
                println!("No suggestions.");
            } else {
                for suggestion in suggestions {
                    println!("- {suggestion}");
                }
            }
        }
        Command::References { paper_id, depth } => {
            let explorer = ReferenceExplorer::new(client);
            explorer.select(&paper_id).await;
            explorer.set_depth(depth).await;
            explorer.load().await;

            let seed = explorer.paper_id().await;
            emit(
                &explorer.state().await,
                format,
                "references",
                |nodes| formatters::format_references_markdown(&seed, nodes),
                |nodes| formatters::references_json(&seed, depth, nodes),
            )?;
        }
    }

    Ok(())
}
