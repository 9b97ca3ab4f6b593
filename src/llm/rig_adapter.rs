//! Bridges rig's `CompletionModel` trait to our `TextGenerator` trait.

use async_trait::async_trait;
use rig::completion::{AssistantContent, CompletionModel, Message};

use crate::error::LlmError;
use crate::llm::TextGenerator;

/// Adapter wrapping a rig completion model.
pub struct RigGenerator<M: CompletionModel> {
    model: M,
    model_name: String,
}

impl<M: CompletionModel> RigGenerator<M> {
    pub fn new(model: M, model_name: &str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
        }
    }
}

#[async_trait]
impl<M: CompletionModel> TextGenerator for RigGenerator<M> {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = self
            .model
            .completion_request(Message::user(prompt))
            .build();

        let response =
            self.model
                .completion(request)
                .await
                .map_err(|e| LlmError::RequestFailed {
                    provider: self.model_name.clone(),
                    reason: e.to_string(),
                })?;

        // Concatenate every text part of the response; anything else (tool
        // calls, etc.) is unexpected for a plain prompt.
        let text: String = response
            .choice
            .iter()
            .filter_map(|content| match content {
                AssistantContent::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: self.model_name.clone(),
                reason: "response contained no text".to_string(),
            });
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
