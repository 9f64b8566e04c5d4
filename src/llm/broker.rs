use crate::error::Result;
use crate::llm::gateway::{CompletionConfig, ContentStream, LlmGateway};
use crate::llm::models::LlmMessage;
use futures::stream::StreamExt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Main interface for LLM interactions
///
/// Binds a model name to a gateway so callers only deal with messages.
#[derive(Clone)]
pub struct LlmBroker {
    model: String,
    gateway: Arc<dyn LlmGateway>,
}

impl LlmBroker {
    /// Create a new LLM broker
    pub fn new(model: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text response from LLM
    pub async fn generate(
        &self,
        messages: &[LlmMessage],
        config: Option<CompletionConfig>,
    ) -> Result<String> {
        let config = config.unwrap_or_default();

        let response = self.gateway.complete(&self.model, messages, &config).await?;

        if let Some(reason) = response.done_reason.as_deref() {
            if reason == "length" {
                warn!("Response from {} was cut at the token limit", self.model);
            } else {
                debug!("Generation finished: {}", reason);
            }
        }

        Ok(response.content.unwrap_or_default())
    }

    /// Generate streaming text response from LLM
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures::stream::StreamExt;
    ///
    /// let broker = LlmBroker::new("gemma3:1b", gateway);
    /// let messages = vec![LlmMessage::user("Explique les traits")];
    ///
    /// let mut stream = broker.generate_stream(&messages, None);
    /// while let Some(result) = stream.next().await {
    ///     print!("{}", result?);
    /// }
    /// ```
    pub fn generate_stream<'a>(
        &'a self,
        messages: &'a [LlmMessage],
        config: Option<CompletionConfig>,
    ) -> ContentStream<'a> {
        let config = config.unwrap_or_default();

        Box::pin(async_stream::stream! {
            let mut stream = self.gateway.complete_stream(&self.model, messages, &config);

            while let Some(chunk) = stream.next().await {
                let failed = chunk.is_err();
                yield chunk;
                if failed {
                    return;
                }
            }
        })
    }

    /// Collect a streamed response, handing each chunk to `on_chunk` as it arrives.
    pub async fn generate_streaming_with<F>(
        &self,
        messages: &[LlmMessage],
        config: Option<CompletionConfig>,
        mut on_chunk: F,
    ) -> Result<String>
    where
        F: FnMut(&str) -> Result<()> + Send,
    {
        let mut stream = self.generate_stream(messages, config);
        let mut full = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            on_chunk(&chunk)?;
            full.push_str(&chunk);
        }

        Ok(full)
    }
}
