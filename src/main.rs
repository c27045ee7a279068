//! aichat - terminal chat client
//!
//! Reads one message per line from stdin and prints the conversation as it
//! changes. Logs go to stderr as JSON.

use aichat::{ConversationEvent, Gateway, LlmConfig, Orchestrator, Phase, Role};
use futures::StreamExt;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aichat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = LlmConfig::from_env();
    if !config.has_credential() {
        tracing::warn!("OPENAI_API_KEY not set. Replies will fall back to the unavailable notice.");
    }

    let gateway = Gateway::from_config(&config)?;
    let orchestrator = Arc::new(Orchestrator::new(gateway));

    let mut events = Box::pin(orchestrator.events());
    let renderer = tokio::spawn(async move {
        let mut shown = 0;
        while let Some(event) = events.next().await {
            match event {
                ConversationEvent::StateChanged(state) => {
                    for msg in state.messages().iter().skip(shown) {
                        let who = match msg.role() {
                            Role::User => "you",
                            Role::Assistant => "assistant",
                            Role::System => "system",
                        };
                        println!("{who}> {}", msg.content());
                    }
                    shown = state.messages().len();
                    if state.phase() == Phase::Sending {
                        println!("...");
                    }
                }
                ConversationEvent::Error(error) => {
                    eprintln!("[{}] {}", error.kind, error.detail);
                }
            }
        }
    });

    tracing::info!(model = %config.model, "aichat ready, type a message and press enter");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        orchestrator.send_message(line).await;
    }

    // Dropping the orchestrator closes the event stream
    drop(orchestrator);
    renderer.await?;

    Ok(())
}
