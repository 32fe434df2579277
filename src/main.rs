//! Planner Chat - terminal client for an interrupt-driven planning workflow
//!
//! Keeps the client-side conversation state: an ordered transcript, a single
//! in-flight turn, and at most one interrupt awaiting an answer.

mod config;
mod conversation;
mod interrupt;
mod repl;
mod transport;

use config::ClientConfig;
use conversation::ConversationStore;
use repl::Repl;
use tokio::io::BufReader;
use transport::{HttpWorkflowClient, LoggingClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let json = std::env::var("PLANNER_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "planner_chat=info".into());

    // Logs go to stderr; stdout carries the conversation
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = ClientConfig::from_env();
    tracing::info!(
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        "Starting planner chat"
    );

    let client = LoggingClient::new(HttpWorkflowClient::new(&config.base_url, config.timeout)?);
    let store = ConversationStore::new();
    tracing::info!(session = %store.session_id(), "Session created");

    let mut repl = Repl::new(client, store);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl.run(stdin, &mut stdout).await?;

    Ok(())
}
