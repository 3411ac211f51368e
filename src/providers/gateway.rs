use crate::config::{Config, Provider};
use crate::core::error::{ProviderError, RelayError};
use crate::providers::{
    LLMProvider, Message, anthropic::AnthropicProvider, openai::OpenAIProvider,
};
use futures::future::try_join_all;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

/// Routes a request to the provider named by the client.
#[derive(Clone, Default)]
pub struct ProviderGateway {
    providers: HashMap<Provider, Arc<dyn LLMProvider>>,
}

impl ProviderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one client per provider that has an API key. Providers without
    /// a key stay unregistered and fail at call time.
    pub fn from_config(config: &Config) -> Result<Self, RelayError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RelayError::Config(format!("HTTP client: {}", e)))?;

        let mut gateway = Self::new();
        for provider in Provider::ALL {
            let Some(api_key) = config.api_key(provider) else {
                tracing::warn!(
                    provider = provider.name(),
                    "No API key configured, requests to this provider will fail"
                );
                continue;
            };

            let base_url = config.base_url(provider);
            let api_key = api_key.to_string();
            let client: Arc<dyn LLMProvider> = match provider {
                Provider::OpenAI => Arc::new(OpenAIProvider::new(http.clone(), base_url, api_key)),
                Provider::Anthropic => {
                    Arc::new(AnthropicProvider::new(http.clone(), base_url, api_key))
                }
            };
            gateway.register(provider, client);
        }

        Ok(gateway)
    }

    pub fn register(&mut self, provider: Provider, client: Arc<dyn LLMProvider>) {
        self.providers.insert(provider, client);
    }

    pub async fn generate(
        &self,
        provider: &str,
        model: &str,
        messages: &[Message],
    ) -> Result<String, ProviderError> {
        let kind = Provider::from_str(provider)
            .ok_or_else(|| ProviderError::UnknownProvider(provider.to_string()))?;
        let client = self
            .providers
            .get(&kind)
            .ok_or_else(|| ProviderError::MissingApiKey(kind.name().to_string()))?;

        client.get_response(model, messages).await
    }

    /// Ask every `(provider, model)` pair the same thing concurrently.
    /// Replies come back in the order of `targets`.
    pub async fn compare(
        &self,
        targets: &[(String, String)],
        messages: &[Message],
    ) -> Result<Vec<String>, ProviderError> {
        try_join_all(
            targets
                .iter()
                .map(|(provider, model)| self.generate(provider, model, messages)),
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Canned provider that records every message list it receives.
    #[derive(Default)]
    pub struct StubProvider {
        pub reply: Option<String>,
        pub delay: Option<Duration>,
        pub calls: Mutex<Vec<(String, Vec<Message>)>>,
    }

    impl StubProvider {
        pub fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                ..Default::default()
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Echoes the last user turn after `delay`.
        pub fn echoing(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay: Some(delay),
                ..Default::default()
            })
        }

        pub fn calls(&self) -> Vec<(String, Vec<Message>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMProvider for StubProvider {
        async fn get_response(
            &self,
            model: &str,
            messages: &[Message],
        ) -> Result<String, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), messages.to_vec()));

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
                let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
                return Ok(format!("echo: {last}"));
            }

            self.reply
                .clone()
                .ok_or_else(|| ProviderError::Network("connection reset".to_string()))
        }
    }
}
