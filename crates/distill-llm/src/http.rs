//! Shared HTTP plumbing for providers.

use distill_core::error::{DistillError, DistillResult, ErrorCode};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Error body shape used by both OpenAI-compatible and Anthropic APIs.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Validate a base URL and return it without a trailing slash.
pub(crate) fn normalize_base_url(base_url: &str) -> DistillResult<String> {
    let url = Url::parse(base_url)
        .map_err(|e| DistillError::Configuration(format!("Invalid base URL {}: {}", base_url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DistillError::Configuration(format!(
            "Base URL must be http or https: {}",
            base_url
        )));
    }
    Ok(base_url.trim_end_matches('/').to_string())
}

/// Build a client with the given default headers. Sensitive headers are marked.
pub(crate) fn build_client(headers: &[(&'static str, String, bool)]) -> DistillResult<Client> {
    let mut map = HeaderMap::new();
    for (name, value, sensitive) in headers {
        let mut value = HeaderValue::from_str(value)
            .map_err(|_| DistillError::Configuration(format!("Invalid {} header value", name)))?;
        value.set_sensitive(*sensitive);
        map.insert(HeaderName::from_static(*name), value);
    }

    Client::builder()
        .default_headers(map)
        .build()
        .map_err(|e| DistillError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// POST a JSON body and return the parsed JSON response.
///
/// Non-success statuses are mapped through [`DistillError::from_http_status`]
/// using the provider's error message when one is present.
pub(crate) async fn post_json<T: serde::Serialize + ?Sized>(
    client: &Client,
    url: &str,
    body: &T,
) -> DistillResult<serde_json::Value> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    let retry_after = retry_after_seconds(response.headers());
    let text = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|e| e.error.message)
            .unwrap_or(text);
        tracing::warn!(status = status.as_u16(), %message, ?retry_after, "Completion request rejected");
        return Err(DistillError::from_http_status(status.as_u16(), &message)
            .with_retry_after(retry_after));
    }

    serde_json::from_str(&text)
        .map_err(|e| DistillError::invalid_response(format!("Response is not JSON: {}", e)))
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn transport_error(e: reqwest::Error) -> DistillError {
    if e.is_timeout() {
        DistillError::Network {
            message: format!("Request timed out: {}", e),
            code: ErrorCode::NetTimeout,
            source: Some(Box::new(e)),
        }
    } else {
        DistillError::network(format!("Request failed: {}", e), e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.groq.com/openai/v1/").unwrap(),
            "https://api.groq.com/openai/v1"
        );
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_seconds(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static(" 12 "));
        assert_eq!(retry_after_seconds(&headers), Some(12));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        assert_eq!(retry_after_seconds(&headers), None);
    }

    #[test]
    fn test_build_client_rejects_bad_header() {
        assert!(build_client(&[("x-api-key", "line\nbreak".to_string(), true)]).is_err());
        assert!(build_client(&[("x-api-key", "ok".to_string(), true)]).is_ok());
    }
}
