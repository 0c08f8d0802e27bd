use std::future::Future;

use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use arbor_core::AiSettings;

/// The one outbound operation: a single stateless generate call. Abstracted
/// as a trait so tests substitute a fake instead of the hosted service.
pub trait Generator: Send + Sync {
    /// `Ok` carries the service's text (possibly empty — the caller decides
    /// how to surface emptiness); `Err` is any transport or service failure.
    fn generate(
        &self,
        system: &str,
        user_msg: &str,
    ) -> impl Future<Output = Result<String, String>> + Send;
}

fn map_backend(provider: &str) -> Result<LLMBackend, String> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(format!("unknown provider: {other}")),
    }
}

/// Generator backed by the hosted text-generation service configured in
/// [`AiSettings`]. Builds a fresh client per call; only the system prompt
/// and the current user text go over the wire.
pub struct LlmGenerator {
    settings: AiSettings,
}

impl LlmGenerator {
    pub fn new(settings: AiSettings) -> Self {
        LlmGenerator { settings }
    }
}

impl Generator for LlmGenerator {
    fn generate(
        &self,
        system: &str,
        user_msg: &str,
    ) -> impl Future<Output = Result<String, String>> + Send {
        async move {
            let backend = map_backend(&self.settings.provider)?;

            let mut builder = LLMBuilder::new()
                .backend(backend)
                .model(&self.settings.model)
                .system(system);

            if !self.settings.api_key.is_empty() {
                builder = builder.api_key(&self.settings.api_key);
            }

            let llm = builder.build().map_err(|e| format!("build LLM: {e}"))?;

            let messages = vec![ChatMessage::user().content(user_msg).build()];

            let response = llm.chat(&messages).await.map_err(|e| format!("chat: {e}"))?;

            // Empty payload is not an error at this level.
            Ok(response.text().unwrap_or_default())
        }
    }
}
