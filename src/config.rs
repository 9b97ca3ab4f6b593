//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};
use crate::mail::SmtpConfig;

/// Timeouts applied to the three external calls. A hung collaborator must
/// never block the session indefinitely.
#[derive(Debug, Clone)]
pub struct Timeouts {
    pub extract: Duration,
    pub send: Duration,
    pub generate: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            extract: Duration::from_secs(5),
            send: Duration::from_secs(30),
            generate: Duration::from_secs(60),
        }
    }
}

impl Timeouts {
    /// Build timeouts from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            extract: secs_var("GUIDE_EXTRACT_TIMEOUT_SECS", defaults.extract),
            send: secs_var("GUIDE_SEND_TIMEOUT_SECS", defaults.send),
            generate: secs_var("GUIDE_GENERATE_TIMEOUT_SECS", defaults.generate),
        }
    }
}

fn secs_var(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// Full guide configuration.
#[derive(Debug, Clone)]
pub struct GuideConfig {
    pub llm: LlmConfig,
    pub smtp: SmtpConfig,
    pub timeouts: Timeouts,
}

impl GuideConfig {
    /// Build config from environment variables.
    ///
    /// Three secrets are required: the generation API key (per backend), the
    /// SMTP sender address, and the SMTP sender credential.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match std::env::var("GUIDE_LLM_BACKEND").as_deref() {
            Err(_) | Ok("gemini") => LlmBackend::Gemini,
            Ok("anthropic") => LlmBackend::Anthropic,
            Ok(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "GUIDE_LLM_BACKEND".to_string(),
                    message: format!("unknown backend: {other}"),
                });
            }
        };

        let key_var = match backend {
            LlmBackend::Gemini => "GEMINI_API_KEY",
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
        };
        let api_key = std::env::var(key_var)
            .map_err(|_| ConfigError::MissingEnvVar(key_var.to_string()))?;

        let model = std::env::var("GUIDE_MODEL").unwrap_or_else(|_| {
            match backend {
                LlmBackend::Gemini => "gemini-1.5-pro",
                LlmBackend::Anthropic => "claude-sonnet-4-20250514",
            }
            .to_string()
        });

        Ok(Self {
            llm: LlmConfig {
                backend,
                api_key: SecretString::from(api_key),
                model,
            },
            smtp: SmtpConfig::from_env()?,
            timeouts: Timeouts::from_env(),
        })
    }
}
