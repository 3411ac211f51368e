use crate::core::error::ProviderError;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// JSON-over-HTTP client shared by the provider implementations.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth_header: Option<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        client: Client,
        base_url: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client,
            base_url,
            auth_header,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    /// POST `payload` to `{base_url}/{path}` and decode the JSON reply.
    ///
    /// Non-2xx statuses are turned into the matching [`ProviderError`] kind
    /// with the response body as message.
    pub async fn post<T, R>(&self, path: &str, payload: &T) -> Result<R, ProviderError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);

        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json");

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }

        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status, body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
