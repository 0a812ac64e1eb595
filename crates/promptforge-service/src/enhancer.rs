use std::sync::{Arc, OnceLock};

use promptforge_core::EnhanceError;
use promptforge_prompts::assemble_prompt;
use tracing::{error, info};

use crate::model::{GeminiClient, GenerateRequest, GenerativeModel, SamplingParams};
use crate::{classify, Credential};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone)]
pub struct EnhancerSettings {
    pub model: String,
    pub base_url: String,
    pub sampling: SamplingParams,
}

impl Default for EnhancerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            sampling: SamplingParams::default(),
        }
    }
}

/// Turns a raw idea into a polished LLM prompt with one model call.
///
/// The model client is built on the first call whose credential resolves
/// and reused afterwards. No retries, no caching; callers keep at most
/// one request in flight.
pub struct Enhancer {
    settings: EnhancerSettings,
    credential: Credential,
    client: OnceLock<Arc<dyn GenerativeModel>>,
}

impl Enhancer {
    pub fn new(settings: EnhancerSettings, credential: Credential) -> Self {
        Self {
            settings,
            credential,
            client: OnceLock::new(),
        }
    }

    /// Use a prebuilt model instead of the Gemini client. The credential
    /// is still required before every call.
    pub fn with_model(
        settings: EnhancerSettings,
        credential: Credential,
        model: Arc<dyn GenerativeModel>,
    ) -> Self {
        let client = OnceLock::new();
        let _ = client.set(model);
        Self {
            settings,
            credential,
            client,
        }
    }

    pub fn settings(&self) -> &EnhancerSettings {
        &self.settings
    }

    fn client(&self) -> Result<Arc<dyn GenerativeModel>, EnhanceError> {
        let key = self.credential.resolve()?;
        let client = self.client.get_or_init(|| {
            info!(
                "creating gemini client ({}, key from {})",
                self.settings.base_url,
                self.credential.var()
            );
            let model: Arc<dyn GenerativeModel> =
                Arc::new(GeminiClient::new(key, &self.settings.base_url));
            model
        });
        Ok(Arc::clone(client))
    }

    pub async fn enhance(&self, raw_message: &str) -> Result<String, EnhanceError> {
        if raw_message.trim().is_empty() {
            return Err(EnhanceError::EmptyInput);
        }

        let client = self.client()?;
        let prompt = assemble_prompt(raw_message);
        let request = GenerateRequest {
            model: self.settings.model.clone(),
            system_instruction: prompt.system_instruction,
            user_message: prompt.user_message,
            sampling: self.settings.sampling,
        };

        info!(
            "enhancing idea ({} chars) via {} model {}",
            raw_message.chars().count(),
            client.name(),
            request.model
        );

        match client.generate(&request).await {
            Ok(Some(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => {
                error!("model returned no text");
                Err(EnhanceError::EmptyResponse)
            }
            Err(e) => {
                error!("model call failed: {e}");
                Err(classify(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModel;
    use crate::ProviderError;

    fn enhancer(mock: Arc<MockModel>) -> Enhancer {
        Enhancer::with_model(
            EnhancerSettings::default(),
            Credential::provided(Some("test-key".into()), "GEMINI_API_KEY"),
            mock,
        )
    }

    #[tokio::test]
    async fn returns_trimmed_text() {
        let mock = Arc::new(MockModel::text("\n  Act as a physicist.  \n"));
        let out = enhancer(mock.clone()).enhance("physics").await.unwrap();
        assert_eq!(out, "Act as a physicist.");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn sends_fixed_instruction_and_template() {
        let mock = Arc::new(MockModel::text("ok"));
        enhancer(mock.clone())
            .enhance("explain quantum entanglement simply")
            .await
            .unwrap();

        let expected = assemble_prompt("explain quantum entanglement simply");
        let req = &mock.requests()[0];
        assert_eq!(req.model, DEFAULT_MODEL);
        assert_eq!(req.system_instruction, expected.system_instruction);
        assert_eq!(req.user_message, expected.user_message);
        assert_eq!(req.sampling, SamplingParams::default());
    }

    #[tokio::test]
    async fn blank_input_never_calls_model() {
        let mock = Arc::new(MockModel::text("ok"));
        let err = enhancer(mock.clone()).enhance(" \n\t").await.unwrap_err();
        assert_eq!(err, EnhanceError::EmptyInput);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn no_text_is_empty_response() {
        for mock in [MockModel::empty(), MockModel::text("   \n")] {
            let mock = Arc::new(mock);
            let err = enhancer(mock).enhance("idea").await.unwrap_err();
            assert_eq!(err, EnhanceError::EmptyResponse);
        }
    }

    #[tokio::test]
    async fn provider_errors_are_classified() {
        let mock = Arc::new(MockModel::failure(ProviderError::Http {
            status: 429,
            code: Some("RESOURCE_EXHAUSTED".into()),
            reason: None,
            message: "RESOURCE_EXHAUSTED: raw provider text".into(),
        }));
        let err = enhancer(mock).enhance("idea").await.unwrap_err();
        assert_eq!(err, EnhanceError::QuotaExceeded);
        assert!(!err.to_string().contains("raw provider text"));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_model_call() {
        let mock = Arc::new(MockModel::text("ok"));
        let enhancer = Enhancer::with_model(
            EnhancerSettings::default(),
            Credential::provided(None, "GEMINI_API_KEY"),
            mock.clone(),
        );
        for _ in 0..2 {
            let err = enhancer.enhance("idea").await.unwrap_err();
            assert!(matches!(err, EnhanceError::MissingCredential { .. }));
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn each_call_is_one_request() {
        let mock = Arc::new(MockModel::text("ok"));
        let enhancer = enhancer(mock.clone());
        enhancer.enhance("one").await.unwrap();
        enhancer.enhance("two").await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }
}
