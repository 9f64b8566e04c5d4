use crate::config::normalize_base_url;
use crate::error::{ProjkilmatError, Result};
use crate::llm::gateway::{CompletionConfig, ContentStream, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for connecting to Ollama server
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub host: String,
    pub timeout: Option<Duration>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            timeout: None,
        }
    }
}

/// Gateway for Ollama local LLM service
///
/// Talks to the `/api/chat` and `/api/tags` endpoints of an Ollama server. One
/// HTTP client is built per gateway and reused for every request.
pub struct OllamaGateway {
    client: Client,
    config: OllamaConfig,
}

impl OllamaGateway {
    /// Create a new Ollama gateway with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a new Ollama gateway with custom configuration
    pub fn with_config(mut config: OllamaConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;
        config.host = normalize_base_url(&config.host).trim_end_matches('/').to_string();

        Ok(Self { client, config })
    }

    /// Create gateway with custom host
    pub fn with_host(host: impl Into<String>) -> Result<Self> {
        Self::with_config(OllamaConfig {
            host: host.into(),
            ..Default::default()
        })
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    async fn post_chat(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
        stream: bool,
    ) -> Result<Response> {
        let body = build_chat_body(model, messages, config, stream)?;

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.host))
            .json(&body)
            .send()
            .await?;

        ensure_success(response, "Ollama API error").await
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to Ollama for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let response = self.post_chat(model, messages, config, false).await?;
        let response_body: Value = response.json().await?;

        if let Some(error) = response_body["error"].as_str() {
            return Err(ProjkilmatError::GatewayError(error.to_string()));
        }

        let content = response_body["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ProjkilmatError::GatewayError("No content in response".to_string()))?;

        Ok(LlmGatewayResponse {
            content: Some(content),
            done_reason: response_body["done_reason"].as_str().map(String::from),
        })
    }

    fn complete_stream<'a>(
        &'a self,
        model: &'a str,
        messages: &'a [LlmMessage],
        config: &'a CompletionConfig,
    ) -> ContentStream<'a> {
        Box::pin(async_stream::stream! {
            info!("Starting Ollama streaming completion");
            debug!("Model: {}, Message count: {}", model, messages.len());

            let response = match self.post_chat(model, messages, config, true).await {
                Ok(r) => r,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            // Lines are split on raw bytes so a multi-byte character cut across
            // two network chunks is decoded whole.
            let mut stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk_result) = stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(e.into());
                        return;
                    }
                };
                buffer.extend_from_slice(&bytes);

                while let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
                    match parse_stream_line(&String::from_utf8_lossy(&line)) {
                        Ok(StreamLine::Content(content)) => yield Ok(content),
                        Ok(StreamLine::Done) => return,
                        Ok(StreamLine::Skip) => {}
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }

            // The final object is not always newline-terminated
            if !buffer.is_empty() {
                match parse_stream_line(&String::from_utf8_lossy(&buffer)) {
                    Ok(StreamLine::Content(content)) => yield Ok(content),
                    Ok(_) => {}
                    Err(e) => yield Err(e),
                }
            }
        })
    }

    async fn get_available_models(&self) -> Result<Vec<String>> {
        debug!("Fetching available Ollama models");

        let response = self.client.get(format!("{}/api/tags", self.config.host)).send().await?;
        let response = ensure_success(response, "Failed to get models").await?;

        let body: Value = response.json().await?;

        let models = body["models"]
            .as_array()
            .ok_or_else(|| ProjkilmatError::GatewayError("Invalid response format".to_string()))?
            .iter()
            .filter_map(|m| m["name"].as_str().map(String::from))
            .collect::<Vec<_>>();

        Ok(models)
    }
}

/// One decoded line of an Ollama streaming response
#[derive(Debug, PartialEq)]
enum StreamLine {
    Content(String),
    Done,
    Skip,
}

fn parse_stream_line(line: &str) -> Result<StreamLine> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(StreamLine::Skip);
    }

    let json: Value = match serde_json::from_str(line) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to parse streaming chunk: {}", e);
            return Ok(StreamLine::Skip);
        }
    };

    if let Some(error) = json["error"].as_str() {
        return Err(ProjkilmatError::GatewayError(error.to_string()));
    }

    if let Some(content) = json["message"]["content"].as_str() {
        if !content.is_empty() {
            return Ok(StreamLine::Content(content.to_string()));
        }
    }

    if json["done"].as_bool().unwrap_or(false) {
        return Ok(StreamLine::Done);
    }

    Ok(StreamLine::Skip)
}

fn build_chat_body(
    model: &str,
    messages: &[LlmMessage],
    config: &CompletionConfig,
    stream: bool,
) -> Result<Value> {
    let mut body = serde_json::json!({
        "model": model,
        "messages": serde_json::to_value(messages)?,
        "stream": stream
    });

    if let Some(options) = config.to_ollama_options() {
        body["options"] = options;
    }

    Ok(body)
}

async fn ensure_success(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<Value>(&detail) {
        Ok(json) if json["error"].is_string() => {
            format!("{}: {} ({})", context, status, json["error"].as_str().unwrap_or_default())
        }
        _ if detail.trim().is_empty() => format!("{}: {}", context, status),
        _ => format!("{}: {} ({})", context, status, detail.trim()),
    };

    Err(ProjkilmatError::GatewayError(message))
}
