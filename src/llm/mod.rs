//! LLM completion collaborator.
//!
//! # Data Flow
//! ```text
//! POST /generate, POST /greet
//!     → prompts.rs (defaults, greeting template)
//!     → provider.rs (CompletionService trait object from AppState)
//!     → openai.rs (chat completions over HTTP)
//! ```

pub mod error;
pub mod openai;
pub mod prompts;
pub mod provider;

pub use error::LlmError;
pub use openai::OpenAiClient;
pub use provider::{create_completion_service, CompletionService};
