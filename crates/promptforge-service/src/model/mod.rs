pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use mock::MockModel;

/// Sampling knobs sent with every generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub candidate_count: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            candidate_count: 1,
        }
    }
}

/// One stateless generation call: no conversation id, no history.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub system_instruction: String,
    pub user_message: String,
    pub sampling: SamplingParams,
}

/// Failure reported by a model provider, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Non-success HTTP status. `code` is the provider's status string
    /// (e.g. `RESOURCE_EXHAUSTED`), `reason` the first error detail reason.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        reason: Option<String>,
        message: String,
    },

    #[error("candidate was blocked: {reason}")]
    Blocked { reason: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to parse response: {0}")]
    Decode(String),
}

/// Boundary to a hosted generative model.
///
/// Implementations own the wire format. They return `Ok(None)` when the
/// provider answered without any text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, ProviderError>;
}
