//! Chat-completion transport and the three prompts the assistant issues.
//!
//! Every call is single-shot: no retries, no streaming.

use std::fmt::Debug;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::profile::{CompanyConnection, ProfileSignal};
use super::prompts;
use crate::config::{ConfigError, GenerationConfig};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("completion response contained no choices")]
    EmptyContent,
}

/// Sends one system + user message pair and returns the reply text.
pub trait CompletionBackend: Debug {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI-compatible chat completions over a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct OpenAiCompletions {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletions {
    pub fn from_config(config: &GenerationConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ConfigError::MissingGenerationKey)?;

        Ok(Self {
            http: Client::new(),
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
        })
    }
}

impl CompletionBackend for OpenAiCompletions {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json()?;
        debug!(model = %self.model, choices = reply.choices.len(), "completion received");

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyContent)
    }
}

/// Issues the analysis, extraction, and drafting prompts against a backend.
#[derive(Debug)]
pub struct CoverLetterWriter {
    backend: Box<dyn CompletionBackend>,
}

impl CoverLetterWriter {
    pub fn new(backend: Box<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn analyze_job_description(&self, job_description: &str) -> Result<String, GenerationError> {
        self.backend.complete(
            prompts::ANALYST_SYSTEM,
            &prompts::analysis_prompt(job_description),
        )
    }

    /// Asks the model for the hiring company's name. The reply is trimmed and
    /// otherwise used as-is.
    pub fn extract_company_name(&self, job_description: &str) -> Result<String, GenerationError> {
        let reply = self.backend.complete(
            prompts::EXTRACTOR_SYSTEM,
            &prompts::company_name_prompt(job_description),
        )?;
        Ok(reply.trim().to_string())
    }

    pub fn generate_cover_letter(
        &self,
        job_description: &str,
        resume: &str,
        prior_letter: &str,
        profile: Option<&ProfileSignal>,
        connections: Option<&[CompanyConnection]>,
    ) -> Result<String, GenerationError> {
        let prompt =
            prompts::cover_letter_prompt(job_description, resume, prior_letter, profile, connections);
        self.backend.complete(prompts::WRITER_SYSTEM, &prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct ScriptedBackend {
        reply: String,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl CompletionBackend for ScriptedBackend {
        fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
            self.calls
                .lock()
                .expect("calls mutex")
                .push((system.to_string(), prompt.to_string()));
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn extract_company_name_trims_reply() {
        let writer = CoverLetterWriter::new(Box::new(ScriptedBackend {
            reply: "  Acme Corp\n".to_string(),
            ..ScriptedBackend::default()
        }));

        let name = writer
            .extract_company_name("Backend Engineer at Acme Corp")
            .expect("extraction succeeds");
        assert_eq!(name, "Acme Corp");
    }

    #[test]
    fn analysis_reply_is_returned_unmodified() {
        let writer = CoverLetterWriter::new(Box::new(ScriptedBackend {
            reply: "  no sections at all  ".to_string(),
            ..ScriptedBackend::default()
        }));

        let analysis = writer
            .analyze_job_description("Data Engineer")
            .expect("analysis succeeds");
        assert_eq!(analysis, "  no sections at all  ");
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = GenerationConfig {
            api_key: None,
            model: "gpt-4".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
        };
        assert_eq!(
            OpenAiCompletions::from_config(&config).unwrap_err(),
            ConfigError::MissingGenerationKey
        );
    }

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let config = GenerationConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4".to_string(),
            api_base: "http://localhost:8080/v1/".to_string(),
        };
        let backend = OpenAiCompletions::from_config(&config).expect("key present");
        assert_eq!(backend.endpoint, "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn request_serializes_system_then_user() {
        let request = ChatRequest {
            model: "gpt-4",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
        };
        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
    }
}
