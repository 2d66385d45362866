mod llm;
mod query;
mod tables;
mod upload;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::error::{GatewayError, GatewayResult, unsuccessful_message};

/// Typed client for the Doris data platform gateway.
///
/// The client only holds its immutable settings and a pooled
/// `reqwest::Client`, so it is cheap to clone and safe to share between
/// tasks. Every operation is a single HTTP call bounded by the configured
/// timeout; nothing is retried. Dropping an operation's future aborts the
/// request and releases its connection (and, for uploads, the open file).
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Duration,
}

impl GatewayClient {
    /// Builds a client without touching the network.
    ///
    /// Only a malformed base URL is rejected.
    pub fn new(config: ClientConfig) -> GatewayResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let timeout = config.timeout();

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            model: config.model.filter(|m| !m.trim().is_empty()),
            timeout,
        })
    }

    pub fn from_url(base_url: impl Into<String>) -> GatewayResult<Self> {
        Self::new(ClientConfig::new(base_url))
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects URLs that cannot carry path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Starts a request and returns it with a short label for logs and errors.
    fn request(&self, method: Method, segments: &[&str]) -> (String, RequestBuilder) {
        let url = self.endpoint(segments);
        let label = format!("{} {}", method, url.path());
        debug!("Sending {}", label);
        (label, self.http.request(method, url))
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        label: &str,
        request: RequestBuilder,
        expect_success: bool,
    ) -> GatewayResult<T> {
        let response = request.send().await.map_err(|e| {
            error!("{} failed: {}", label, e);
            GatewayError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read response body of {}: {}", label, e);
            GatewayError::Transport(e)
        })?;

        debug!("{} -> {}", label, status);
        decode_response(label, status, &body, expect_success).inspect_err(|e| {
            warn!("{} rejected: {}", label, e);
        })
    }
}

fn parse_base_url(raw: &str) -> GatewayResult<Url> {
    let invalid = |reason: String| GatewayError::InvalidConfig {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }

    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Turns a gateway answer into `T` or the matching error.
///
/// Non-2xx statuses become `Remote` errors. When `expect_success` is set, a
/// 2xx body carrying `"success": false` is also treated as a rejection.
fn decode_response<T: DeserializeOwned>(
    label: &str,
    status: StatusCode,
    body: &str,
    expect_success: bool,
) -> GatewayResult<T> {
    if !status.is_success() {
        return Err(GatewayError::from_error_body(
            status.as_u16(),
            body,
            status.canonical_reason(),
        ));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::protocol(label, format!("invalid JSON body: {}", e)))?;

    if expect_success && value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(GatewayError::Remote {
            status: status.as_u16(),
            message: unsuccessful_message(&value)
                .unwrap_or_else(|| "gateway reported failure".to_string()),
            traceback: value
                .get("traceback")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    serde_json::from_value(value).map_err(|e| GatewayError::protocol(label, e))
}

fn require_non_empty(value: &str, what: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::invalid_input(format!("{} must not be empty", what)));
    }
    Ok(())
}

/// Checks a name that becomes a single URL path segment.
///
/// `.` and `..` would be collapsed by URL normalisation and address a
/// different endpoint.
fn require_path_segment(value: &str, what: &str) -> GatewayResult<()> {
    require_non_empty(value, what)?;
    if value == "." || value == ".." {
        return Err(GatewayError::invalid_input(format!(
            "{} '{}' is not a valid name",
            what, value
        )));
    }
    Ok(())
}
