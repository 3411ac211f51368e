use super::{LLMProvider, Message, non_blank};
use crate::core::error::ProviderError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Chat Completions API (`/chat/completions`) with bearer auth
#[derive(Clone)]
pub struct OpenAIProvider {
    client: HttpClient,
}

impl OpenAIProvider {
    pub fn new(http: Client, base_url: String, api_key: String) -> Self {
        Self {
            client: HttpClient::new(
                http,
                base_url,
                Some(("Authorization".to_string(), format!("Bearer {}", api_key))),
                None,
            ),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn get_response(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<String, ProviderError> {
        let payload = ChatCompletionRequest {
            model,
            messages: non_blank(messages)
                .map(|m| ChatCompletionMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
        };

        let parsed: ChatCompletionResponse =
            self.client.post("chat/completions", &payload).await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in API response".to_string()))
    }
}
