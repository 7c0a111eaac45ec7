//! Quotes API client
//!
//! Issues `GET {base}/random[?category=X]` against the external quotes API
//! and maps its loosely-shaped JSON onto the canonical `Quote`.

use reqwest::Client;
use serde_json::{Map, Value};
use std::future::Future;
use thiserror::Error;

use super::{Quote, RANDOM_CATEGORY};

/// Default base URL of the quotes API
pub const DEFAULT_API_BASE: &str = "https://quotes-api.netlify.app/.netlify/functions";

/// Text used when the response carries no quote text
pub const MISSING_TEXT: &str = "No quote available";

/// Author used when the response names no author
pub const MISSING_AUTHOR: &str = "Unknown Author";

/// Field names that may hold the quote text, in priority order
const TEXT_FIELDS: &[&str] = &["quote", "text", "content", "q"];

/// Field names that may hold the author, in priority order
const AUTHOR_FIELDS: &[&str] = &["author", "Author", "by", "a"];

const CATEGORY_FIELDS: &[&str] = &["category"];

/// Errors that can occur when fetching a quote
#[derive(Debug, Error)]
pub enum QuoteError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Response parsed but has an unusable shape
    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),
}

/// Network seam for fetching raw quotes
///
/// Implementations return the decoded JSON body; shape normalization happens
/// in [`normalize_response`].
pub trait QuoteSource: Send + Sync {
    /// Fetches one random quote, optionally restricted to `category`
    fn fetch_random(
        &self,
        category: Option<String>,
    ) -> impl Future<Output = Result<Value, QuoteError>> + Send + '_;
}

/// `QuoteSource` backed by the public quotes API over HTTP
#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    client: Client,
    base_url: String,
}

impl Default for HttpQuoteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpQuoteSource {
    /// Creates a client pointed at the default API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Creates a client pointed at a custom API base
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the request for a random quote
    ///
    /// The `category` query parameter is omitted when no category is given or
    /// when it is the literal `"random"`.
    pub fn build_request(&self, category: Option<&str>) -> Result<reqwest::Request, QuoteError> {
        let mut request = self.client.get(format!("{}/random", self.base_url));
        if let Some(category) = category.filter(|c| *c != RANDOM_CATEGORY) {
            request = request.query(&[("category", category)]);
        }
        Ok(request.build()?)
    }
}

impl QuoteSource for HttpQuoteSource {
    async fn fetch_random(&self, category: Option<String>) -> Result<Value, QuoteError> {
        let request = self.build_request(category.as_deref())?;
        tracing::debug!(url = %request.url(), "Requesting quote");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Maps a quotes API body onto a `Quote`
///
/// Accepts a JSON object or an array whose first element is an object. Each
/// field is looked up through its candidate names and the first non-empty
/// string wins. Missing text and author are replaced by placeholders; a
/// missing category falls back to `requested_category`.
///
/// # Returns
/// * `Ok(Quote)` for any object-shaped body
/// * `Err(QuoteError::MalformedResponse)` otherwise
pub fn normalize_response(body: &Value, requested_category: &str) -> Result<Quote, QuoteError> {
    let object = match body {
        Value::Object(object) => object,
        Value::Array(items) => match items.first() {
            Some(Value::Object(object)) => object,
            Some(_) => {
                return Err(QuoteError::MalformedResponse(
                    "array element is not an object".to_string(),
                ))
            }
            None => return Err(QuoteError::MalformedResponse("empty array".to_string())),
        },
        other => {
            return Err(QuoteError::MalformedResponse(format!(
                "expected object, got {}",
                json_kind(other)
            )))
        }
    };

    Ok(Quote::new(
        first_string(object, TEXT_FIELDS).unwrap_or(MISSING_TEXT),
        first_string(object, AUTHOR_FIELDS).unwrap_or(MISSING_AUTHOR),
        first_string(object, CATEGORY_FIELDS).unwrap_or(requested_category),
    ))
}

/// First candidate field holding a non-empty string
fn first_string<'a>(object: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|name| {
        object
            .get(*name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
