use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use super::{RemoteTranslator, TranslationRequest, TranslationResponse};

/// MyMemory client, the translation-only fallback service
#[derive(Debug, Clone)]
pub struct MyMemory {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. `https://api.mymemory.translated.net`
    endpoint: String,
    /// Request ceiling in UTF-16 code units
    max_chars: usize,
    /// Contact address, raises the anonymous daily quota
    email: Option<String>,
}

/// MyMemory `/get` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyMemoryResponse {
    /// Numeric status, sometimes sent as a string
    pub response_status: Value,
    /// Translation payload
    pub response_data: MyMemoryData,
    /// Set once the daily quota is used up
    #[serde(default)]
    pub quota_finished: Option<bool>,
}

/// Translation payload of a MyMemory response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyMemoryData {
    /// The translated text
    pub translated_text: String,
}

impl MyMemoryResponse {
    /// Status code regardless of its JSON representation
    pub fn status_code(&self) -> Option<u16> {
        match &self.response_status {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Translated text, or the reason this response cannot be used
    pub fn into_translation(self) -> Result<String, ProviderError> {
        if self.quota_finished == Some(true) {
            return Err(ProviderError::QuotaExhausted("MyMemory daily quota exhausted".to_string()));
        }
        match self.status_code() {
            Some(200) => Ok(self.response_data.translated_text),
            Some(code) => Err(ProviderError::ApiError {
                status_code: code,
                message: self.response_data.translated_text,
            }),
            None => Err(ProviderError::ParseError(format!("Unexpected MyMemory status: {}", self.response_status))),
        }
    }
}

impl MyMemory {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, max_chars: usize, timeout_secs: u64, email: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            max_chars,
            email: email.filter(|e| !e.trim().is_empty()),
        }
    }

    /// Build the request URL
    pub fn request_url(&self, request: &TranslationRequest) -> Result<Url, ProviderError> {
        let base = format!("{}/get", self.endpoint.trim_end_matches('/'));
        let source = if request.source_language == "auto" {
            "autodetect"
        } else {
            request.source_language.as_str()
        };
        let langpair = format!("{}|{}", source, request.target_language);

        let mut params = vec![("q", request.text.as_str()), ("langpair", langpair.as_str())];
        if let Some(email) = &self.email {
            params.push(("de", email.as_str()));
        }

        Url::parse_with_params(&base, &params)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid MyMemory endpoint '{}': {}", base, e)))
    }
}

#[async_trait]
impl RemoteTranslator for MyMemory {
    fn name(&self) -> &str {
        "mymemory"
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let url = self.request_url(request)?;
        debug!("MyMemory request: {} chars", request.text.len());

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }

        let body = response.json::<MyMemoryResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse MyMemory response: {}", e)))?;

        // No romanization output on this service
        Ok(TranslationResponse {
            translated: body.into_translation()?,
            romanized: None,
        })
    }
}
