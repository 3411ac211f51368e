use crate::core::error::ProviderError;
use crate::providers::base_client::HttpClient;
use crate::providers::{LLMProvider, Message, Role, non_blank};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[derive(Clone)]
pub struct AnthropicProvider {
    client: HttpClient,
}

impl AnthropicProvider {
    pub fn new(http: Client, base_url: String, api_key: String) -> Self {
        let mut extra_headers = HashMap::new();
        extra_headers.insert(
            "anthropic-version".to_string(),
            ANTHROPIC_VERSION.to_string(),
        );
        Self {
            client: HttpClient::new(
                http,
                base_url,
                Some(("x-api-key".to_string(), api_key)),
                Some(extra_headers),
            ),
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn get_response(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<String, ProviderError> {
        // The Messages API takes the system prompt out of band.
        let system_prompt = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str());

        let turns: Vec<AnthropicMessage> = non_blank(messages)
            .filter(|m| m.role != Role::System)
            .map(|m| AnthropicMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        let payload = AnthropicRequest {
            model,
            max_tokens: MAX_TOKENS,
            messages: turns,
            system: system_prompt,
        };

        let parsed: AnthropicResponse = self.client.post("messages", &payload).await?;

        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::InvalidResponse("Empty response from Anthropic".to_string()))
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}
