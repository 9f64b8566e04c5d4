//! Command-line arguments.
//!
//! Every option can also come from the environment (a `.env` file is loaded first by the
//! binary); an explicit flag always wins.

use crate::config::{normalize_base_url, AgentConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::Result;
use crate::llm::CompletionConfig;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "projkilmat")]
#[command(
    author,
    version,
    about = "Revise programming topics with a local Ollama model",
    long_about = "Asks a local Ollama model to explain a topic, then to write a \
                  multiple-choice question (QCM) about it. Without --topic, topics are \
                  read interactively until 'quitter' is typed."
)]
pub struct Cli {
    /// Ollama base URL
    #[arg(long, short = 'u', env = "OLLAMA_HOST", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model name, as listed by `ollama list`
    #[arg(long, short = 'm', env = "OLLAMA_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum time to wait for one model answer, in seconds
    #[arg(
        long,
        short = 't',
        env = "PROJKILMAT_TIMEOUT_SECS",
        default_value = "120",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Sampling temperature; the model's own default when omitted
    #[arg(long, env = "PROJKILMAT_TEMPERATURE", value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// Revise a single topic and exit instead of starting the interactive session
    #[arg(long)]
    pub topic: Option<String>,

    /// Print answers while they are being generated
    #[arg(long)]
    pub stream: bool,

    /// List the models available on the Ollama server and exit
    #[arg(long, conflicts_with = "topic")]
    pub list_models: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Build the validated agent configuration these arguments describe.
    pub fn agent_config(&self) -> Result<AgentConfig> {
        AgentConfig::builder()
            .base_url(normalize_base_url(&self.base_url))
            .model_name(&self.model)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }

    /// Sampling options to send with every request.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            temperature: self.temperature,
            ..Default::default()
        }
    }

    /// Log filter directive matching the verbosity flag.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "projkilmat=debug"
        } else {
            "warn"
        }
    }
}

fn parse_temperature(s: &str) -> std::result::Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err("temperature must be between 0.0 and 2.0".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::try_parse_from([
            "projkilmat",
            "--base-url",
            "http://ollama:11434/",
            "--model",
            "mistral",
            "--timeout-secs",
            "30",
            "--topic",
            "les closures",
            "--stream",
        ])
        .unwrap();

        assert_eq!(cli.topic.as_deref(), Some("les closures"));
        assert!(cli.stream);
        assert!(!cli.list_models);

        let config = cli.agent_config().unwrap();
        assert_eq!(config.base_url(), "http://ollama:11434/");
        assert_eq!(config.model_name(), "mistral");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["projkilmat", "-u", "http://h:1", "-m", "phi3", "-t", "5", "-v"])
                .unwrap();

        assert_eq!(cli.base_url, "http://h:1");
        assert_eq!(cli.model, "phi3");
        assert_eq!(cli.timeout_secs, 5);
        assert_eq!(cli.log_directive(), "projkilmat=debug");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["projkilmat", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn test_list_models_conflicts_with_topic() {
        let result = Cli::try_parse_from(["projkilmat", "--list-models", "--topic", "Rust"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_model_fails_validation() {
        let cli = Cli::try_parse_from(["projkilmat", "--model", "  "]).unwrap();
        assert!(cli.agent_config().is_err());
    }

    #[test]
    fn test_temperature() {
        let cli = Cli::try_parse_from(["projkilmat", "--temperature", "0.3"]).unwrap();
        assert_eq!(cli.completion_config().temperature, Some(0.3));

        assert!(Cli::try_parse_from(["projkilmat", "--temperature", "3.5"]).is_err());
        assert!(Cli::try_parse_from(["projkilmat", "--temperature", "warm"]).is_err());
    }

    #[test]
    fn test_host_without_scheme_accepted() {
        let cli = Cli::try_parse_from(["projkilmat", "-u", "0.0.0.0:11434"]).unwrap();
        let config = cli.agent_config().unwrap();

        assert_eq!(config.ollama_host(), "http://0.0.0.0:11434");
    }
}
