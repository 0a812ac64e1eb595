use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{GenerateRequest, GenerativeModel, ProviderError};

/// A scripted model for tests. Returns the same reply for every call and
/// records each request it receives.
pub struct MockModel {
    reply: Result<Option<String>, ProviderError>,
    delay: Option<Duration>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockModel {
    /// Reply with the given text.
    pub fn text(text: &str) -> Self {
        Self::with_reply(Ok(Some(text.to_string())))
    }

    /// Reply without any text.
    pub fn empty() -> Self {
        Self::with_reply(Ok(None))
    }

    /// Fail every call with the given error.
    pub fn failure(err: ProviderError) -> Self {
        Self::with_reply(Err(err))
    }

    fn with_reply(reply: Result<Option<String>, ProviderError>) -> Self {
        Self {
            reply,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SamplingParams;

    fn request() -> GenerateRequest {
        GenerateRequest {
            model: "m".into(),
            system_instruction: "s".into(),
            user_message: "u".into(),
            sampling: SamplingParams::default(),
        }
    }

    #[tokio::test]
    async fn text_reply_and_recording() {
        let mock = MockModel::text("hi");
        assert_eq!(mock.generate(&request()).await.unwrap().as_deref(), Some("hi"));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.requests()[0].user_message, "u");
    }

    #[tokio::test]
    async fn failure_reply() {
        let mock = MockModel::failure(ProviderError::Transport("down".into()));
        assert_eq!(
            mock.generate(&request()).await.unwrap_err(),
            ProviderError::Transport("down".into())
        );
    }

    #[test]
    fn name_is_mock() {
        assert_eq!(MockModel::empty().name(), "mock");
    }
}
