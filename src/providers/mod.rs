use crate::core::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send `messages` to `model` and return the assistant's text reply.
    async fn get_response(&self, model: &str, messages: &[Message])
    -> Result<String, ProviderError>;
}

/// Remote APIs reject blank turns, so they are dropped before dispatch.
pub fn non_blank(messages: &[Message]) -> impl Iterator<Item = &Message> {
    messages.iter().filter(|m| !m.content.trim().is_empty())
}

pub mod anthropic;
pub mod base_client;
pub mod catalog;
pub mod gateway;
pub mod openai;
