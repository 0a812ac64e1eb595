use thiserror::Error;

/// Every way an enhancement can fail. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnhanceError {
    #[error(
        "API key is not configured. Set the {var} environment variable (or pass --api-key) and restart."
    )]
    MissingCredential { var: String },

    #[error("Please enter your idea or message first.")]
    EmptyInput,

    #[error("Received an empty response from the AI. The prompt might be too short or unclear.")]
    EmptyResponse,

    #[error("API quota exceeded. Please check your Google AI Studio account.")]
    QuotaExceeded,

    #[error("The generated content was blocked due to safety settings. Try rephrasing your input.")]
    ContentBlocked,

    #[error("The API key was rejected by the AI service: {0}")]
    RejectedCredential(String),

    #[error("AI service failed: {0}")]
    Service(String),
}

impl EnhanceError {
    /// Missing credentials stay missing until the process is restarted.
    pub fn is_fatal_until_restart(&self) -> bool {
        matches!(self, EnhanceError::MissingCredential { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_variable() {
        let err = EnhanceError::MissingCredential {
            var: "GEMINI_API_KEY".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GEMINI_API_KEY"));
        assert!(msg.contains("restart"));
        assert!(err.is_fatal_until_restart());
    }

    #[test]
    fn quota_message_does_not_leak_provider_text() {
        assert_eq!(
            EnhanceError::QuotaExceeded.to_string(),
            "API quota exceeded. Please check your Google AI Studio account."
        );
    }

    #[test]
    fn service_failure_wraps_underlying_message() {
        let err = EnhanceError::Service("connection reset".into());
        assert_eq!(err.to_string(), "AI service failed: connection reset");
        assert!(!err.is_fatal_until_restart());
    }
}
