//! # TedGo
//!
//! Interactive chat agent for a blockchain node. Transfers that cannot be
//! delivered are kept locally and resent on request.

use std::sync::Arc;

use tedgo_agent::{run_session, spawn_line_reader, AgentConfig, Dispatcher};
use tedgo_sdk::HttpNodeClient;
use tedgo_state::{FileInteractionLog, JsonFileStore};
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Run one interactive session against the configured node.
async fn run_agent(config: AgentConfig) -> anyhow::Result<()> {
    info!(
        node = %config.node_url,
        pending = %config.pending_file.display(),
        history = %config.history_file.display(),
        "TedGo starting"
    );

    let client = Arc::new(HttpNodeClient::new(&config.node_url, config.timeouts)?);
    let store = Arc::new(JsonFileStore::new(&config.pending_file));
    let log = Arc::new(FileInteractionLog::new(&config.history_file));

    let mut dispatcher = Dispatcher::new(client, store, log.clone(), &config);

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))?;

    let mut stdout = std::io::stdout();
    run_session(
        &mut dispatcher,
        log.as_ref(),
        lines,
        &mut stdout,
        config.history_startup,
        interrupt,
    )
    .await;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so the chat on stdout stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = AgentConfig::from_env();
    let session_id = Uuid::new_v4();

    run_agent(config)
        .instrument(info_span!("session", id = %session_id))
        .await
}
