//! Shared types for the AIght Ball oracle service.
//!
//! Everything the daemon and its tests need to describe a reading request
//! end to end: the sanitized question, the canonical reading with its
//! field-level repair pass, the oracle prompts, the generation capability
//! seam, and the daemon configuration.

pub mod config;
pub mod llm_client;
pub mod prompts;
pub mod question;
pub mod reading;

pub use config::OracleConfig;
pub use llm_client::{FakeGenerateClient, GenerateClient, OpenAiClient, ProviderError};
pub use prompts::{build_user_prompt, SYSTEM_PROMPT};
pub use question::{Question, MAX_QUESTION_CHARS};
pub use reading::{Diagnostic, Reading, ReadingResponse, NEUTRAL_LONG};
