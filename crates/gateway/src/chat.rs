use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GatewayError;
use crate::CompletionGateway;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct ChatClient {
    config: GatewayConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<MessageContent>,
}

// Providers return either a plain string or a list of typed parts.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

impl ChatClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl CompletionGateway for ChatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status {
                status: response.status(),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        extract_text(parsed)
    }
}

/// Pull concatenated text out of a chat response. The only contract we hold
/// the provider to is "first choice contains extractable text".
fn extract_text(response: ChatResponse) -> Result<String, GatewayError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(GatewayError::NoContent)?;

    match choice.message.content {
        Some(MessageContent::Text(text)) => Ok(text),
        Some(MessageContent::Parts(parts)) => {
            let joined: String = parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect();
            if joined.is_empty() {
                Err(GatewayError::NoContent)
            } else {
                Ok(joined)
            }
        }
        None => Err(GatewayError::NoContent),
    }
}
