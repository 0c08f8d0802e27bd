pub mod context;
pub mod engine;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use arbor_core::{ai_configured, AiSettings, TaxonomyNode};
use engine::Generator;

pub use engine::LlmGenerator;

/// Returned without any network attempt when no credential is configured.
pub const MISSING_KEY_MESSAGE: &str =
    "Error: API Key is missing. Please check your environment configuration.";
/// Substituted when the service succeeds but returns an empty payload.
pub const EMPTY_RESPONSE_MESSAGE: &str = "I couldn't generate a response. Please try again.";
/// Substituted (and flagged) when the call fails; never retried.
pub const SERVICE_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error communicating with the AI service.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the append-only chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            text: text.into(),
            is_error: false,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            text: text.into(),
            is_error: false,
        }
    }
}

/// Conversational recommender over a taxonomy.
///
/// Holds the system prompt (built once from the taxonomy's leaves), the AI
/// settings, and a busy flag enforcing at most one in-flight request.
/// Every failure is swallowed into a fixed fallback message — `respond`
/// only errs on local rejections (empty input, already busy), which the UI
/// surfaces without touching the transcript.
pub struct Assistant<G> {
    generator: G,
    settings: AiSettings,
    system_prompt: String,
    busy: AtomicBool,
}

/// Clears the busy flag when the request resolves, success or failure.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<G: Generator> Assistant<G> {
    pub fn new(root: &TaxonomyNode, settings: AiSettings, generator: G) -> Self {
        Assistant {
            generator,
            settings,
            system_prompt: context::system_prompt(root),
            busy: AtomicBool::new(false),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Turn one user utterance into one assistant message.
    ///
    /// Rejects blank input and concurrent submissions locally; otherwise the
    /// outcome is always `Ok` — missing credential, empty payload, and
    /// service failure each map to their fixed message.
    pub async fn respond(&self, user_text: &str) -> Result<ChatMessage, String> {
        let trimmed = user_text.trim();
        if trimmed.is_empty() {
            return Err("message is empty".to_string());
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err("a request is already in flight".to_string());
        }
        let _guard = BusyGuard(&self.busy);

        if !ai_configured(&self.settings) {
            return Ok(ChatMessage::assistant(MISSING_KEY_MESSAGE));
        }

        eprintln!(
            "[arbor-suggest] sending to {} ({})",
            self.settings.provider, self.settings.model
        );

        match self.generator.generate(&self.system_prompt, trimmed).await {
            Ok(text) if !text.trim().is_empty() => Ok(ChatMessage::assistant(text)),
            Ok(_) => Ok(ChatMessage::assistant(EMPTY_RESPONSE_MESSAGE)),
            Err(e) => {
                eprintln!("[arbor-suggest] generate error: {e}");
                Ok(ChatMessage {
                    role: Role::Assistant,
                    text: SERVICE_ERROR_MESSAGE.to_string(),
                    is_error: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn configured() -> AiSettings {
        AiSettings {
            provider: "google".to_string(),
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
        }
    }

    fn unconfigured() -> AiSettings {
        AiSettings {
            provider: "google".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
        }
    }

    /// Counts calls and replies with a canned result.
    struct CountingGenerator {
        calls: AtomicUsize,
        reply: Result<String, String>,
    }

    impl CountingGenerator {
        fn replying(reply: Result<&str, &str>) -> Self {
            CountingGenerator {
                calls: AtomicUsize::new(0),
                reply: reply.map(str::to_string).map_err(str::to_string),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Generator for CountingGenerator {
        fn generate(
            &self,
            _system: &str,
            _user_msg: &str,
        ) -> impl Future<Output = Result<String, String>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.reply.clone();
            async move { reply }
        }
    }

    /// Signals `entered` once called, then blocks until `release`.
    struct HandshakeGenerator {
        entered: Arc<Notify>,
        release: Arc<Notify>,
        calls: AtomicUsize,
    }

    impl Generator for HandshakeGenerator {
        fn generate(
            &self,
            _system: &str,
            _user_msg: &str,
        ) -> impl Future<Output = Result<String, String>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let entered = self.entered.clone();
            let release = self.release.clone();
            async move {
                entered.notify_one();
                release.notified().await;
                Ok("done".to_string())
            }
        }
    }

    fn assistant_with<G: Generator>(settings: AiSettings, generator: G) -> Assistant<G> {
        Assistant::new(arbor_core::builtin_taxonomy(), settings, generator)
    }

    #[tokio::test]
    async fn missing_credential_short_circuits_with_zero_network_calls() {
        let assistant = assistant_with(unconfigured(), CountingGenerator::replying(Ok("hi")));
        let msg = assistant.respond("I want to feel motivated").await.unwrap();
        assert_eq!(msg.text, MISSING_KEY_MESSAGE);
        assert!(!msg.is_error);
        assert_eq!(assistant.generator.calls(), 0);
    }

    #[tokio::test]
    async fn blank_input_is_rejected_locally() {
        let assistant = assistant_with(configured(), CountingGenerator::replying(Ok("hi")));
        assert!(assistant.respond("").await.is_err());
        assert!(assistant.respond("   \n\t ").await.is_err());
        assert_eq!(assistant.generator.calls(), 0);
    }

    #[tokio::test]
    async fn successful_response_is_returned_verbatim() {
        let reply = "Try Dopamine via Accomplishment: finishing a task rewards you.";
        let assistant = assistant_with(configured(), CountingGenerator::replying(Ok(reply)));
        let msg = assistant.respond("I want to feel motivated").await.unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.text, reply);
        assert!(!msg.is_error);
        assert!(msg.text.contains("Dopamine"));
        assert_eq!(assistant.generator.calls(), 1);
    }

    #[tokio::test]
    async fn empty_payload_becomes_fallback_text_without_error_flag() {
        let assistant = assistant_with(configured(), CountingGenerator::replying(Ok("  \n")));
        let msg = assistant.respond("hello").await.unwrap();
        assert_eq!(msg.text, EMPTY_RESPONSE_MESSAGE);
        assert!(!msg.is_error);
    }

    #[tokio::test]
    async fn service_failure_becomes_flagged_fallback() {
        let assistant =
            assistant_with(configured(), CountingGenerator::replying(Err("boom")));
        let msg = assistant.respond("hello").await.unwrap();
        assert_eq!(msg.text, SERVICE_ERROR_MESSAGE);
        assert!(msg.is_error);
        // No automatic retry.
        assert_eq!(assistant.generator.calls(), 1);
    }

    #[tokio::test]
    async fn second_submission_while_pending_is_rejected_without_a_network_call() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let assistant = Arc::new(assistant_with(
            configured(),
            HandshakeGenerator {
                entered: entered.clone(),
                release: release.clone(),
                calls: AtomicUsize::new(0),
            },
        ));

        let first = {
            let assistant = assistant.clone();
            tokio::spawn(async move { assistant.respond("first").await })
        };
        entered.notified().await;

        let second = assistant.respond("second").await;
        assert!(second.is_err());

        release.notify_one();
        let msg = first.await.unwrap().unwrap();
        assert_eq!(msg.text, "done");
        assert_eq!(assistant.generator.calls.load(Ordering::SeqCst), 1);

        // The gate reopens once the first request resolves.
        release.notify_one();
        let entered2 = entered.clone();
        let assistant2 = assistant.clone();
        let third = tokio::spawn(async move { assistant2.respond("third").await });
        entered2.notified().await;
        release.notify_one();
        assert!(third.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn local_rejection_does_not_consume_the_busy_gate() {
        let assistant = assistant_with(configured(), CountingGenerator::replying(Ok("ok")));
        assert!(assistant.respond(" ").await.is_err());
        let msg = assistant.respond("real question").await.unwrap();
        assert_eq!(msg.text, "ok");
    }
}
