// src/services/tutor.rs
use std::fmt::Debug;
use std::sync::Arc;

use super::completion::{ChatMessage, CompletionClient, CompletionError, CompletionRequest};
use super::openai::OpenAiClient;
use crate::config::Config;

pub const NOT_CONFIGURED_REPLY: &str = "Sorry, I can’t generate an answer right now because the \
AI service is not configured. Please check your API key.";

pub const UNAVAILABLE_REPLY: &str =
    "Sorry, the AI service is currently unavailable. Please try again later.";

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 512;

pub fn system_prompt(age: u8) -> String {
    format!(
        "You are an AI tutor helping parents explain artificial intelligence and technology \
         concepts to their child. The child is {} years old. \
         Speak directly to the parent and provide simple, age‑appropriate explanations, \
         analogies and suggestions. Avoid jargon.",
        age
    )
}

/// Turns a parent's question into a reply they can show, whatever happens upstream.
pub struct Tutor {
    client: Option<Arc<dyn CompletionClient>>,
}

impl Debug for Tutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tutor")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl Tutor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client: Some(client) }
    }

    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        match &config.api_key {
            Some(key) => {
                let client =
                    OpenAiClient::new(key.clone(), config.base_url.clone(), config.model.clone())?;
                Ok(Self::new(Arc::new(client)))
            }
            None => Ok(Self::unconfigured()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn get_response(&self, message: &str, age: u8) -> String {
        let Some(client) = &self.client else {
            return NOT_CONFIGURED_REPLY.to_string();
        };

        let request = CompletionRequest {
            messages: vec![
                ChatMessage::system(system_prompt(age)),
                ChatMessage::user(message),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        match client.complete(&request).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::error!(error = %e, "error communicating with completion service");
                UNAVAILABLE_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::services::completion::Role;
    use crate::state::AppState;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::io;
    use std::sync::Mutex;
    use tower::util::ServiceExt;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl CompletionClient for Recorder {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                Err(CompletionError::Status {
                    status: 500,
                    body: "boom: internal trace".into(),
                })
            } else {
                Ok("\n  AI is like a smart helper.  \n".to_string())
            }
        }
    }

    #[tokio::test]
    async fn unconfigured_returns_fixed_text() {
        let tutor = Tutor::unconfigured();
        assert!(!tutor.is_configured());
        assert_eq!(tutor.get_response("What is AI?", 7).await, NOT_CONFIGURED_REPLY);
    }

    #[tokio::test]
    async fn builds_two_turn_exchange_and_trims() {
        let recorder = Arc::new(Recorder::default());
        let tutor = Tutor::new(recorder.clone());

        let reply = tutor.get_response("What is AI?", 7).await;
        assert_eq!(reply, "AI is like a smart helper.");

        let requests = recorder.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.temperature, TEMPERATURE);
        assert_eq!(req.max_tokens, MAX_TOKENS);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert!(req.messages[0].content.contains("The child is 7 years old."));
        assert_eq!(req.messages[1], ChatMessage::user("What is AI?"));
    }

    #[tokio::test]
    async fn failure_becomes_unavailable_text() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let tutor = Tutor::new(recorder);

        let reply = tutor.get_response("What is AI?", 7).await;
        assert_eq!(reply, UNAVAILABLE_REPLY);
        assert!(!reply.contains("boom"));
    }

    #[tokio::test]
    async fn upstream_failure_is_logged_as_error() {
        let (logs, _guard) = capture_logs();
        let tutor = Tutor::new(Arc::new(Recorder {
            fail: true,
            ..Default::default()
        }));

        let reply = tutor.get_response("What is AI?", 7).await;
        assert_eq!(reply, UNAVAILABLE_REPLY);

        let output = logs.contents();
        assert!(output.contains("ERROR"), "no error line in: {output}");
        assert!(output.contains("boom: internal trace"), "detail missing in: {output}");
    }

    #[tokio::test]
    async fn rejected_request_logs_no_error() {
        let (logs, _guard) = capture_logs();
        let recorder = Arc::new(Recorder::default());
        let app = create_router().with_state(Arc::new(AppState::new(Tutor::new(recorder.clone()))));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "Explain ML", "age": 25}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(recorder.requests.lock().unwrap().is_empty());
        let output = logs.contents();
        assert!(!output.contains("ERROR"), "unexpected error line in: {output}");
    }

    #[test]
    fn from_config_follows_key_presence() {
        let mut config = Config {
            api_key: None,
            port: 5000,
            base_url: "http://localhost:1/v1".into(),
            model: "gpt-3.5-turbo".into(),
        };
        assert!(!Tutor::from_config(&config).unwrap().is_configured());

        config.api_key = Some("sk-test".into());
        assert!(Tutor::from_config(&config).unwrap().is_configured());
    }

    #[test]
    fn prompt_mentions_parent_and_age() {
        let prompt = system_prompt(12);
        assert!(prompt.contains("12 years old"));
        assert!(prompt.contains("Speak directly to the parent"));
        assert!(prompt.contains("Avoid jargon"));
    }
}
