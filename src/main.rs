//! projkilmat - revise programming topics with a local Ollama model.

use anyhow::{Context, Result};
use clap::Parser;
use projkilmat::agent::AgentFactory;
use projkilmat::cli::Cli;
use projkilmat::llm::LlmGateway;
use projkilmat::ui::ConsoleUi;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli);

    let config = cli.agent_config().context("Invalid configuration")?;
    let factory = AgentFactory::new();

    if cli.list_models {
        let gateway = factory.create_gateway(&config)?;
        let models = gateway
            .get_available_models()
            .await
            .with_context(|| format!("Could not list models from {}", config.ollama_host()))?;
        for model in models {
            println!("{}", model);
        }
        return Ok(());
    }

    let agent = factory
        .create_agent(&config)?
        .with_completion_config(cli.completion_config());
    let stdin = io::stdin();
    let mut ui = ConsoleUi::new(agent, stdin.lock(), io::stdout()).with_streaming(cli.stream);

    match cli.topic.as_deref() {
        Some(topic) => ui.process_topic(topic).await?,
        None => ui.start().await?,
    }

    info!("Session finished");
    Ok(())
}

fn init_tracing(cli: &Cli) {
    // --verbose overrides RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new(cli.log_directive())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive()))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
