//! Monument information — prompt construction and verbatim passthrough.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::llm::TextGenerator;

/// Descriptive-info seam: a place name in, prose out.
#[async_trait]
pub trait InfoProvider: Send + Sync {
    /// Describe the historical monuments of `location`.
    ///
    /// Callers guarantee `location` is non-empty.
    async fn describe(&self, location: &str) -> Result<String, LlmError>;
}

/// Build the generation prompt for a location.
pub fn monument_prompt(location: &str) -> String {
    format!("Tell me about the top historical monuments in {location} with their significance.")
}

/// Info provider backed by a text generation backend. The backend's response
/// is returned verbatim: no caching, no length limit, no filtering.
pub struct MonumentInfo {
    generator: Arc<dyn TextGenerator>,
}

impl MonumentInfo {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl InfoProvider for MonumentInfo {
    async fn describe(&self, location: &str) -> Result<String, LlmError> {
        let prompt = monument_prompt(location);
        tracing::debug!(location = %location, "Fetching monument info");
        self.generator.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            Ok(format!("echo: {prompt}"))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::RequestFailed {
                provider: "mock".to_string(),
                reason: "down".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "mock"
        }
    }

    #[test]
    fn prompt_embeds_location() {
        let prompt = monument_prompt("Paris");
        assert_eq!(
            prompt,
            "Tell me about the top historical monuments in Paris with their significance."
        );
    }

    #[tokio::test]
    async fn response_passes_through_verbatim() {
        let info = MonumentInfo::new(Arc::new(EchoGenerator));
        let text = info.describe("Agra").await.unwrap();
        assert!(text.contains("Agra"));
        assert!(text.starts_with("echo: "));
    }

    #[tokio::test]
    async fn backend_errors_propagate_to_caller() {
        let info = MonumentInfo::new(Arc::new(FailingGenerator));
        assert!(info.describe("Agra").await.is_err());
    }
}
