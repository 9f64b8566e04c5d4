//! The revision agent: prompts, model wiring and QCM answer extraction.

pub mod factory;
pub mod qcm;
pub mod revision_expert;

pub use factory::AgentFactory;
pub use qcm::parse_qcm_answer;
pub use revision_expert::{ChunkSink, LlmRevisionExpert, RevisionExpert};
