pub mod broker;
pub mod gateway;
pub mod gateways;
pub mod models;
pub mod prompt;

pub use broker::LlmBroker;
pub use gateway::{CompletionConfig, ContentStream, LlmGateway};
pub use models::{LlmGatewayResponse, LlmMessage, MessageRole};
pub use prompt::PromptTemplate;
