use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::errors::ProviderError;
use super::RemoteTransliterator;

/// Aksharamukha public transliteration API client
#[derive(Debug, Clone)]
pub struct Aksharamukha {
    /// HTTP client for API requests
    client: Client,
    /// Full API URL, e.g. `https://aksharamukha-plugin.appspot.com/api/public`
    endpoint: String,
}

impl Aksharamukha {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RemoteTransliterator for Aksharamukha {
    fn name(&self) -> &str {
        "aksharamukha"
    }

    async fn transliterate(&self, source_scheme: &str, target_scheme: &str, text: &str) -> Result<String, ProviderError> {
        debug!("Aksharamukha request: {} -> {}, {} chars", source_scheme, target_scheme, text.len());

        let response = self.client.post(&self.endpoint)
            .form(&[("source", source_scheme), ("target", target_scheme), ("text", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }

        let body = response.text().await?;
        if body.is_empty() {
            return Err(ProviderError::ParseError("Empty Aksharamukha response".to_string()));
        }

        Ok(body)
    }
}
