use crate::agent::qcm::parse_qcm_answer;
use crate::error::{ProjkilmatError, Result};
use crate::llm::{CompletionConfig, LlmBroker, LlmMessage, PromptTemplate};
use async_trait::async_trait;
use tracing::{debug, info, warn};

pub const EXPLAIN_SYSTEM_PROMPT: &str = "Tu es un expert en programmation, pédagogue et précis. \
    Ton objectif est d'expliquer des concepts techniques de manière simple et concise à un étudiant.";

pub const EXPLAIN_USER_TEMPLATE: &str = "Explique le concept suivant : {{topic}}";

pub const QCM_SYSTEM_PROMPT: &str = "Tu es un créateur de quiz expérimenté. \
    Ton objectif est de créer une question à choix multiples (QCM) pertinente \
    avec 4 options (A, B, C, D) et une seule bonne réponse.";

pub const QCM_USER_TEMPLATE: &str = "Génère un QCM sur le sujet suivant : {{topic}}. \
    Indique clairement la bonne réponse à la fin, sur une ligne séparée, après la mention 'Réponse : '.";

/// Callback receiving streamed text as it is generated.
pub type ChunkSink<'a> = &'a mut (dyn FnMut(&str) -> Result<()> + Send);

/// The revision agent's capabilities.
///
/// Each call is independent: the agent keeps no conversation history between topics.
#[async_trait]
pub trait RevisionExpert: Send + Sync {
    /// Explain a technical concept simply and concisely.
    async fn explain(&self, topic: &str) -> Result<String>;

    /// Write one multiple-choice question (four options, one correct answer) on a topic.
    async fn create_qcm(&self, topic: &str) -> Result<String>;

    /// Like [`explain`](Self::explain), handing text to `sink` while it is produced.
    ///
    /// The default waits for the full answer and hands it over in one piece.
    async fn explain_streaming(&self, topic: &str, sink: ChunkSink<'_>) -> Result<String> {
        let text = self.explain(topic).await?;
        sink(&text)?;
        Ok(text)
    }

    /// Like [`create_qcm`](Self::create_qcm), handing text to `sink` while it is produced.
    async fn create_qcm_streaming(&self, topic: &str, sink: ChunkSink<'_>) -> Result<String> {
        let text = self.create_qcm(topic).await?;
        sink(&text)?;
        Ok(text)
    }
}

/// System prompt and user template of one agent capability.
#[derive(Debug, Clone)]
struct Instruction {
    system: &'static str,
    user: PromptTemplate,
}

impl Instruction {
    fn new(system: &'static str, user: &'static str) -> Self {
        Self {
            system,
            user: PromptTemplate::new(user),
        }
    }

    fn messages(&self, topic: &str) -> Result<Vec<LlmMessage>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ProjkilmatError::PromptError("topic must not be blank".to_string()));
        }

        Ok(vec![
            LlmMessage::system(self.system),
            LlmMessage::user(self.user.render_one("topic", topic)?),
        ])
    }
}

/// [`RevisionExpert`] backed by a language model.
pub struct LlmRevisionExpert {
    broker: LlmBroker,
    completion: CompletionConfig,
    explain: Instruction,
    qcm: Instruction,
}

impl LlmRevisionExpert {
    pub fn new(broker: LlmBroker) -> Self {
        Self {
            broker,
            completion: CompletionConfig::default(),
            explain: Instruction::new(EXPLAIN_SYSTEM_PROMPT, EXPLAIN_USER_TEMPLATE),
            qcm: Instruction::new(QCM_SYSTEM_PROMPT, QCM_USER_TEMPLATE),
        }
    }

    /// Use specific sampling options instead of the model defaults.
    pub fn with_completion_config(mut self, completion: CompletionConfig) -> Self {
        self.completion = completion;
        self
    }

    pub fn broker(&self) -> &LlmBroker {
        &self.broker
    }

    fn log_qcm_answer(qcm: &str) {
        match parse_qcm_answer(qcm) {
            Some(answer) => debug!("QCM correct answer: {}", answer),
            None => warn!("QCM does not state its answer after 'Réponse :'"),
        }
    }
}

#[async_trait]
impl RevisionExpert for LlmRevisionExpert {
    async fn explain(&self, topic: &str) -> Result<String> {
        info!("Explaining topic: {}", topic.trim());
        let messages = self.explain.messages(topic)?;
        self.broker.generate(&messages, Some(self.completion.clone())).await
    }

    async fn create_qcm(&self, topic: &str) -> Result<String> {
        info!("Creating QCM for topic: {}", topic.trim());
        let messages = self.qcm.messages(topic)?;
        let qcm = self.broker.generate(&messages, Some(self.completion.clone())).await?;
        Self::log_qcm_answer(&qcm);
        Ok(qcm)
    }

    async fn explain_streaming(&self, topic: &str, sink: ChunkSink<'_>) -> Result<String> {
        info!("Explaining topic (streaming): {}", topic.trim());
        let messages = self.explain.messages(topic)?;
        self.broker
            .generate_streaming_with(&messages, Some(self.completion.clone()), |chunk| sink(chunk))
            .await
    }

    async fn create_qcm_streaming(&self, topic: &str, sink: ChunkSink<'_>) -> Result<String> {
        info!("Creating QCM for topic (streaming): {}", topic.trim());
        let messages = self.qcm.messages(topic)?;
        let qcm = self
            .broker
            .generate_streaming_with(&messages, Some(self.completion.clone()), |chunk| sink(chunk))
            .await?;
        Self::log_qcm_answer(&qcm);
        Ok(qcm)
    }
}
