//! Generic OpenAI-compatible chat client
//!
//! Supports any provider using OpenAI's chat completions format (Together, DeepSeek, etc.)

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use brainatom_core::{
    BrainError, ChatRequest, ChatResponse, ChatTransport, Message, ProviderError, ResponseFormat,
    Usage,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Request body for chat completions endpoint
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub response_format: ResponseFormat,
    pub stream: bool,
}

/// Non-streaming response from chat completions. Only the fields read here are
/// modelled; serde skips the rest (`model`, `finish_reason`, `total_tokens`, ...).
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<CompletionUsage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CompletionUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PromptTokensDetails {
    #[serde(default)]
    pub cached_tokens: Option<u64>,
}

impl From<CompletionUsage> for Usage {
    fn from(usage: CompletionUsage) -> Self {
        Usage {
            prompt_tokens: usage.prompt_tokens.unwrap_or(0),
            completion_tokens: usage.completion_tokens.unwrap_or(0),
            cached_tokens: usage
                .prompt_tokens_details
                .and_then(|details| details.cached_tokens)
                .unwrap_or(0),
        }
    }
}

/// OpenAI-style error response
#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiError {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
}

#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
    base_url: Url,
    api_key: SecretString,
    default_model: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn builder() -> OpenAiCompatibleBuilder {
        OpenAiCompatibleBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_default_model(&mut self, model: impl Into<String>) {
        self.default_model = Some(model.into());
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    fn to_wire(&self, request: ChatRequest) -> ChatCompletionRequest {
        let ChatRequest {
            model,
            messages,
            response_format,
        } = request;
        let model = match (&self.default_model, model.is_empty()) {
            (Some(default_model), true) => default_model.clone(),
            _ => model,
        };
        ChatCompletionRequest {
            model,
            messages,
            response_format,
            stream: false,
        }
    }
}

#[async_trait::async_trait]
impl ChatTransport for OpenAiCompatibleClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = self.to_wire(request);

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(Box::new(err)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ProviderError::Transport(Box::new(err)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAiError>(&text)
                .map(|err| err.error.message)
                .unwrap_or(text);
            tracing::warn!(
                status = status.as_u16(),
                model = %body.model,
                "chat completion request rejected"
            );
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|err| ProviderError::Decode(err.to_string()))?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            usage: completion.usage.map(Usage::from).unwrap_or_default(),
            exid: completion.id,
        })
    }
}

pub struct OpenAiCompatibleBuilder {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
    default_model: Option<String>,
    timeout: Duration,
}

impl Default for OpenAiCompatibleBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            default_model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OpenAiCompatibleBuilder {
    pub fn base_url(mut self, value: impl AsRef<str>) -> Result<Self, BrainError> {
        let value = value.as_ref();
        let url = Url::parse(value).map_err(|err| {
            BrainError::InvalidConfig(format!("invalid base_url '{value}': {err}"))
        })?;
        self.base_url = Some(url);
        Ok(self)
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(value.into()));
        self
    }

    pub fn api_key_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.api_key = Some(SecretString::new(value));
        }
        self
    }

    pub fn default_model(mut self, value: impl Into<String>) -> Self {
        self.default_model = Some(value.into());
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    pub fn build(self) -> Result<OpenAiCompatibleClient, BrainError> {
        let base_url = self
            .base_url
            .ok_or_else(|| BrainError::InvalidConfig("base_url is required".to_string()))?;
        let api_key = self
            .api_key
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| BrainError::InvalidConfig("api_key is required".to_string()))?;

        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| BrainError::InvalidConfig(err.to_string()))?;

        Ok(OpenAiCompatibleClient {
            http,
            base_url,
            api_key,
            default_model: self.default_model,
        })
    }
}
