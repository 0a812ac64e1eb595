mod classify;
mod credential;
mod enhancer;
pub mod model;

pub use classify::classify;
pub use credential::{Credential, DEFAULT_API_KEY_VAR};
pub use enhancer::{Enhancer, EnhancerSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use model::{GenerateRequest, GenerativeModel, ProviderError, SamplingParams};
