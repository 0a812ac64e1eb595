use std::path::PathBuf;

use clap::Parser;
use promptforge_service::{
    Credential, EnhancerSettings, SamplingParams, DEFAULT_API_KEY_VAR, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};

#[derive(Debug, Parser)]
#[command(
    name = "promptforge",
    about = "Turn a rough idea into a polished LLM prompt"
)]
pub struct Config {
    /// Gemini API key. When unset, the variable named by --api-key-env is
    /// read on the first request.
    #[arg(long, env = "PROMPTFORGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[arg(long, default_value = DEFAULT_API_KEY_VAR)]
    pub api_key_env: String,

    /// Gemini model identifier
    #[arg(long, env = "PROMPTFORGE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Gemini models endpoint
    #[arg(long, env = "PROMPTFORGE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log file used while the TUI owns the terminal.
    /// Defaults to promptforge.log in the system temp directory.
    #[arg(long, env = "PROMPTFORGE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enhance this idea once, print the result and exit (no TUI)
    #[arg(long)]
    pub idea: Option<String>,
}

impl Config {
    pub fn credential(&self) -> Credential {
        match &self.api_key {
            Some(key) => Credential::provided(Some(key.clone()), self.api_key_env.as_str()),
            None => Credential::from_env(self.api_key_env.as_str()),
        }
    }

    pub fn settings(&self) -> EnhancerSettings {
        EnhancerSettings {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            sampling: SamplingParams::default(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("promptforge.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["promptforge"]).unwrap();
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert!(config.idea.is_none());
        assert!(config.log_path().ends_with("promptforge.log"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "promptforge",
            "--api-key",
            "abc",
            "--model",
            "gemini-2.5-pro",
            "--base-url",
            "http://127.0.0.1:9/models",
            "--log-file",
            "/tmp/pf.log",
            "--idea",
            "a cat story",
        ])
        .unwrap();

        assert_eq!(config.credential().resolve().unwrap(), "abc");
        let settings = config.settings();
        assert_eq!(settings.model, "gemini-2.5-pro");
        assert_eq!(settings.base_url, "http://127.0.0.1:9/models");
        assert_eq!(settings.sampling, SamplingParams::default());
        assert_eq!(config.log_path(), PathBuf::from("/tmp/pf.log"));
        assert_eq!(config.idea.as_deref(), Some("a cat story"));
    }

    #[test]
    fn test_custom_key_variable() {
        let var = "PROMPTFORGE_TEST_CONFIG_KEY_VAR";
        std::env::remove_var(var);
        let config = Config::try_parse_from(["promptforge", "--api-key-env", var]).unwrap();
        assert_eq!(config.api_key_env, var);
        assert_eq!(config.credential().var(), var);

        // Read through the configured variable regardless of PROMPTFORGE_API_KEY
        let err = Credential::from_env(config.api_key_env.as_str())
            .resolve()
            .unwrap_err();
        assert!(err.to_string().contains(var));
    }
}
