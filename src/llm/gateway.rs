use crate::error::Result;
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use async_trait::async_trait;
use futures::stream::Stream;
use serde_json::Value;
use std::pin::Pin;

/// Boxed stream of content chunks produced by a streaming completion.
pub type ContentStream<'a> = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'a>>;

/// Configuration for LLM completion
///
/// Every field is optional; unset fields are left out of the request so the
/// model's own defaults apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionConfig {
    pub temperature: Option<f32>,
    pub num_ctx: Option<usize>,
    pub num_predict: Option<i32>,
}

impl CompletionConfig {
    /// Render the set options as an Ollama `options` object, or `None` when nothing is set.
    pub fn to_ollama_options(&self) -> Option<Value> {
        let mut options = serde_json::Map::new();

        if let Some(temperature) = self.temperature {
            options.insert("temperature".to_string(), serde_json::json!(temperature));
        }
        if let Some(num_ctx) = self.num_ctx {
            options.insert("num_ctx".to_string(), serde_json::json!(num_ctx));
        }
        if let Some(num_predict) = self.num_predict {
            if num_predict != 0 {
                options.insert("num_predict".to_string(), serde_json::json!(num_predict));
            }
        }

        if options.is_empty() {
            None
        } else {
            Some(Value::Object(options))
        }
    }
}

/// Abstract interface for the model backend
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Complete an LLM request with text response
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse>;

    /// Complete an LLM request, yielding content chunks as they arrive
    fn complete_stream<'a>(
        &'a self,
        model: &'a str,
        messages: &'a [LlmMessage],
        config: &'a CompletionConfig,
    ) -> ContentStream<'a>;

    /// Get list of available models
    async fn get_available_models(&self) -> Result<Vec<String>>;
}
