use crate::agent::LlmRevisionExpert;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::llm::gateways::{OllamaConfig, OllamaGateway};
use crate::llm::LlmBroker;
use std::sync::Arc;
use tracing::info;

/// Builds [`LlmRevisionExpert`] instances wired to an Ollama backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgentFactory;

impl AgentFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create the Ollama gateway described by `config`.
    pub fn create_gateway(&self, config: &AgentConfig) -> Result<OllamaGateway> {
        OllamaGateway::with_config(OllamaConfig {
            host: config.ollama_host().to_string(),
            timeout: Some(config.timeout()),
        })
    }

    /// Create a revision agent talking to the model named in `config`.
    pub fn create_agent(&self, config: &AgentConfig) -> Result<LlmRevisionExpert> {
        info!(
            "Connecting to Ollama at {} with model {} (timeout {:?})",
            config.ollama_host(),
            config.model_name(),
            config.timeout()
        );

        let gateway = self.create_gateway(config)?;
        let broker = LlmBroker::new(config.model_name(), Arc::new(gateway));

        Ok(LlmRevisionExpert::new(broker))
    }
}
