// provider adapters - anthropic for the architect pass, groq for the engineer pass
// each call takes the api key as an argument so the manager can rotate keys per call

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

/// What an upstream provider hands back: the generated text plus token usage
/// when the provider reports it.
pub struct Completion {
    pub text: String,
    pub tokens_used: Option<u32>,
}

/// One upstream LLM endpoint. Implementations map their wire format into a
/// plain `Completion`; key rotation and failover live in the manager.
#[async_trait]
pub trait Provider: Send + Sync {
    fn id(&self) -> &str;

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<Completion, Error>;
}

// --- anthropic (messages api) ---

pub struct AnthropicProvider {
    client: reqwest::Client,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: MessagesUsage,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Deserialize)]
struct MessagesUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
        }
    }
}

impl Default for AnthropicProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn id(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<Completion, Error> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = response.text().await?;
            return Err(Error::Provider {
                provider: "anthropic".to_string(),
                message,
            });
        }

        let response: MessagesResponse = response.json().await?;
        let text = response
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();
        let tokens = response.usage.input_tokens + response.usage.output_tokens;

        Ok(Completion {
            text,
            tokens_used: Some(tokens),
        })
    }
}

// --- groq (openai-compatible chat completions) ---

pub struct GroqProvider {
    client: reqwest::Client,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

impl GroqProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 8000,
            temperature: 0.7,
        }
    }
}

impl Default for GroqProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for GroqProvider {
    fn id(&self) -> &str {
        "groq"
    }

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<Completion, Error> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post("https://api.groq.com/openai/v1/chat/completions")
            .header("Authorization", format!("Bearer {api_key}"))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = response.text().await?;
            return Err(Error::Provider {
                provider: "groq".to_string(),
                message,
            });
        }

        let response: ChatResponse = response.json().await?;
        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(Completion {
            text,
            tokens_used: response.usage.map(|u| u.total_tokens),
        })
    }
}
