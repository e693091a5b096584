use std::fmt;

use crate::config::LlmSettings;

use super::client::ChatCompletionsClient;
use super::types::{ChatRequest, LlmClient, Prompt};
use super::LlmError;

/// Leading text of every degraded answer.
pub const SENTINEL_PREFIX: &str = "AI Service Unavailable:";

/// Outcome of one model call. Both variants render as text, so callers
/// always have a string to hand back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelResponse {
    Answer(String),
    Unavailable(String),
}

impl ModelResponse {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ModelResponse::Unavailable(_))
    }

    pub fn into_text(self) -> String {
        match self {
            ModelResponse::Answer(text) => text,
            ModelResponse::Unavailable(detail) => format!("{SENTINEL_PREFIX} {detail}"),
        }
    }
}

impl fmt::Display for ModelResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelResponse::Answer(text) => f.write_str(text),
            ModelResponse::Unavailable(detail) => write!(f, "{SENTINEL_PREFIX} {detail}"),
        }
    }
}

/// Single-call wrapper around a chat-completion model. Never fails: transport
/// and parse errors come back as [`ModelResponse::Unavailable`]. One attempt
/// per call, no retries.
pub struct ModelGateway {
    client: Box<dyn LlmClient>,
    model: String,
    temperature: f32,
}

impl ModelGateway {
    pub fn new(client: Box<dyn LlmClient>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }

    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        if settings.api_key.is_none() {
            tracing::warn!("GROQ_API_KEY not set, model calls will return degraded answers");
        }
        let client = ChatCompletionsClient::from_settings(settings)?;
        Ok(Self::new(
            Box::new(client),
            settings.model.clone(),
            settings.temperature,
        ))
    }

    pub fn default_model(&self) -> &str {
        &self.model
    }

    pub fn default_temperature(&self) -> f32 {
        self.temperature
    }

    pub fn request(
        &self,
        prompt: impl Into<Prompt>,
        model: &str,
        temperature: f32,
    ) -> ModelResponse {
        let request = ChatRequest {
            model: model.to_string(),
            messages: prompt.into().into_messages(),
            temperature,
        };

        match self.client.chat(&request) {
            Ok(content) => {
                let answer = content.trim().to_string();
                tracing::debug!(model, chars = answer.chars().count(), "Model answered");
                ModelResponse::Answer(answer)
            }
            Err(e) => {
                tracing::warn!(model, error = %e, "Model call failed, returning degraded answer");
                ModelResponse::Unavailable(e.to_string())
            }
        }
    }

    pub fn complete(&self, prompt: impl Into<Prompt>, model: &str, temperature: f32) -> String {
        self.request(prompt, model, temperature).into_text()
    }

    /// [`complete`](Self::complete) with the configured model and temperature.
    pub fn complete_default(&self, prompt: impl Into<Prompt>) -> String {
        self.complete(prompt, &self.model, self.temperature)
    }
}

/// Scripted model doubles shared by the gateway and orchestrator tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::super::types::{ChatRequest, LlmClient};
    use super::super::LlmError;

    /// Returns queued answers in order and records every request.
    /// An exhausted queue answers with an error.
    #[derive(Clone, Default)]
    pub struct ScriptedLlmClient {
        answers: Arc<Mutex<VecDeque<Result<String, String>>>>,
        requests: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl ScriptedLlmClient {
        pub fn new(answers: &[&str]) -> Self {
            let client = Self::default();
            for answer in answers {
                client.push_answer(answer);
            }
            client
        }

        pub fn push_answer(&self, answer: &str) {
            self.answers
                .lock()
                .unwrap()
                .push_back(Ok(answer.to_string()));
        }

        pub fn push_failure(&self, detail: &str) {
            self.answers
                .lock()
                .unwrap()
                .push_back(Err(detail.to_string()));
        }

        pub fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl LlmClient for ScriptedLlmClient {
        fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.answers.lock().unwrap().pop_front() {
                Some(Ok(answer)) => Ok(answer),
                Some(Err(detail)) => Err(LlmError::HttpClient(detail)),
                None => Err(LlmError::EmptyChoices),
            }
        }
    }
}
