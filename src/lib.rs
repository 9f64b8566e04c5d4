//! projkilmat: a console revision agent backed by a local Ollama model.
//!
//! The agent explains a programming topic and then writes a multiple-choice question
//! (QCM) about it. [`config::AgentConfig`] describes the model endpoint,
//! [`agent::AgentFactory`] wires the agent to Ollama and [`ui::ConsoleUi`] drives the
//! interactive session.

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod ui;

pub use error::{ProjkilmatError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agent::{AgentFactory, LlmRevisionExpert, RevisionExpert};
    pub use crate::config::AgentConfig;
    pub use crate::error::{ProjkilmatError, Result};
    pub use crate::llm::gateways::OllamaGateway;
    pub use crate::llm::{CompletionConfig, LlmBroker, LlmGateway, LlmMessage, MessageRole};
    pub use crate::ui::ConsoleUi;
}
