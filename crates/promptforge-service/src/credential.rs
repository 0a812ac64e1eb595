use std::sync::OnceLock;

use promptforge_core::EnhanceError;
use tracing::error;

/// Environment variable read for the Gemini API key when none is given explicitly.
pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug)]
enum Source {
    Env,
    Value(Option<String>),
}

/// API key resolved once on first use and memoized for the process lifetime.
///
/// A missing key is memoized too: later calls keep failing until restart.
#[derive(Debug)]
pub struct Credential {
    source: Source,
    var: String,
    resolved: OnceLock<Option<String>>,
}

impl Credential {
    /// Read the key from `var` on first use.
    pub fn from_env(var: impl Into<String>) -> Self {
        Self {
            source: Source::Env,
            var: var.into(),
            resolved: OnceLock::new(),
        }
    }

    /// Use an explicitly supplied key. `var` names the variable mentioned
    /// in the error message when the key is absent.
    pub fn provided(key: Option<String>, var: impl Into<String>) -> Self {
        Self {
            source: Source::Value(key),
            var: var.into(),
            resolved: OnceLock::new(),
        }
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn resolve(&self) -> Result<&str, EnhanceError> {
        let resolved = self.resolved.get_or_init(|| {
            let key = match &self.source {
                Source::Env => std::env::var(&self.var).ok(),
                Source::Value(key) => key.clone(),
            };
            let key = key.filter(|k| !k.trim().is_empty());
            if key.is_none() {
                error!("API key is not configured ({} is unset)", self.var);
            }
            key
        });

        resolved
            .as_deref()
            .ok_or_else(|| EnhanceError::MissingCredential {
                var: self.var.clone(),
            })
    }
}
