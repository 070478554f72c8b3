/*!
 * Google Translate client (public `gtx` endpoint).
 *
 * One GET request returns the translation and, when `dt=rm` is requested, a
 * romanization of the source text. Batches are sent newline-joined.
 */

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode, header, redirect};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use super::{RemoteTranslator, TranslationRequest, TranslationResponse};

/// Google Translate client
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. `https://translate.googleapis.com`
    endpoint: String,
    /// Request ceiling in UTF-16 code units
    max_chars: usize,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, max_chars: usize, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // A redirect means we are being sent to the /sorry block page
                .redirect(redirect::Policy::none())
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            max_chars,
        }
    }

    /// Build the request URL
    pub fn request_url(&self, request: &TranslationRequest) -> Result<Url, ProviderError> {
        let base = format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'));
        let mut params = vec![
            ("client", "gtx"),
            ("sl", request.source_language.as_str()),
            ("tl", request.target_language.as_str()),
            ("q", request.text.as_str()),
            ("dt", "t"),
        ];
        if request.include_romanization {
            params.push(("dt", "rm"));
        }

        Url::parse_with_params(&base, &params)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid Google endpoint '{}': {}", base, e)))
    }
}

/// Map status and content type to the failure they stand for.
///
/// A redirect goes to the `/sorry` block page and a 429 is explicit; both are
/// rate limits. A success that is not JSON is the captcha page, also a rate
/// limit. Other non-2xx statuses are API errors.
pub fn classify_response(status: StatusCode, content_type: &str) -> Result<(), ProviderError> {
    if status.is_redirection() {
        return Err(ProviderError::RateLimitExceeded(format!("redirect to block page ({})", status)));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimitExceeded(format!("HTTP {}", status)));
    }
    if !status.is_success() {
        return Err(ProviderError::ApiError {
            status_code: status.as_u16(),
            message: format!("HTTP {}", status),
        });
    }
    if !content_type.contains("application/json") {
        return Err(ProviderError::RateLimitExceeded(format!("non-JSON response ({})", content_type)));
    }
    Ok(())
}

/// Rebuild translation and romanization from the nested-array response.
///
/// `data[0]` holds one segment per sentence, shaped `["translated", "original", ...]`.
/// With `dt=rm` a final block shaped `[null, null, null, "romanized"]` is appended;
/// it is recognised by its null first element and left out of the translation.
pub fn parse_translation_response(data: &Value, include_romanization: bool) -> Result<TranslationResponse, ProviderError> {
    let segments = data
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::ParseError("Google response has no segment array".to_string()))?;

    let mut romanized = None;
    let mut translation_segments: &[Value] = segments;

    if include_romanization {
        if let Some(last) = segments.last() {
            if last.get(0).is_some_and(Value::is_null) {
                romanized = last
                    .get(3)
                    .and_then(Value::as_str)
                    .or_else(|| last.get(2).and_then(Value::as_str))
                    .map(str::to_string);
                translation_segments = &segments[..segments.len() - 1];
            }
        }
    }

    let translated = translation_segments
        .iter()
        .map(|segment| segment.get(0).and_then(Value::as_str).unwrap_or(""))
        .collect::<String>();

    Ok(TranslationResponse { translated, romanized })
}

#[async_trait]
impl RemoteTranslator for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let url = self.request_url(request)?;
        debug!("Google request: {} chars, romanization={}", request.text.len(), request.include_romanization);

        let response = self.client.get(url)
            .header(header::REFERER, "https://translate.google.com/")
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let content_type = response.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        match classify_response(status, &content_type) {
            Ok(()) => {}
            Err(ProviderError::ApiError { status_code, .. }) => {
                let message = response.text().await
                    .unwrap_or_else(|_| "Failed to get error response text".to_string());
                return Err(ProviderError::ApiError { status_code, message });
            }
            Err(e) => {
                warn!("Google request blocked, treating as rate limit: {}", e);
                return Err(e);
            }
        }

        let data = response.json::<Value>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Google response: {}", e)))?;

        parse_translation_response(&data, request.include_romanization)
    }
}
