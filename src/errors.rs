/*!
 * Error types for the sly-lyrics pipeline.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. None of these errors
 * escape `LyricsPipeline::process`; they travel between tiers and are logged.
 */

use thiserror::Error;

/// Errors that can occur when talking to a remote translation or transliteration service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP or service status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Rate limiting, captcha pages and redirects to a block page
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The daily quota of the service is used up
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    /// A batched response did not keep one output line per input line
    #[error("Line count mismatch: expected {expected} lines, got {actual}")]
    LineCountMismatch {
        /// Lines sent
        expected: usize,
        /// Lines received
        actual: usize,
    },
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by a single romanization tier
#[derive(Error, Debug)]
pub enum RomanizationError {
    /// The tier's remote service failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The tier cannot romanize this input
    #[error("Romanizer unavailable: {0}")]
    Unavailable(String),

    /// A lazily initialized resource failed to load
    #[error("Romanizer initialization failed: {0}")]
    Initialization(String),

    /// The tier has no batch mode
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from romanization
    #[error("Romanization error: {0}")]
    Romanization(#[from] RomanizationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
