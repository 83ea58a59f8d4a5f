//! HTTP utilities for OpenStack REST API calls

use crate::error::{Error, Result};
use reqwest::{Client, Method};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("osapi/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull the human-readable message out of an OpenStack fault body.
///
/// Services disagree on the shape: Keystone uses `{"error": {"message"}}`,
/// Neutron `{"NeutronError": {"message"}}`, Nova `{"itemNotFound": {"message"}}`
/// and Ceilometer `{"error_message": {"faultstring"}}`.
fn extract_fault_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let direct = |v: &Value| {
        v.get("message")
            .or_else(|| v.get("faultstring"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    };

    direct(&value).or_else(|| object.values().find_map(direct))
}

/// Map a non-success status onto the error taxonomy
pub(crate) fn error_for_status(status: u16, body: &str, url: &str) -> Error {
    match status {
        404 => Error::NotFound(url.to_string()),
        401 | 403 => Error::Unauthorized {
            status,
            message: extract_fault_message(body)
                .map(|m| sanitize_for_log(&m))
                .unwrap_or_else(|| "access denied".to_string()),
        },
        _ => Error::Http {
            status,
            body: body.to_string(),
        },
    }
}

/// A successful response: status plus raw body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON; `None` for empty bodies (204, 202 acknowledgements)
    pub fn json(&self) -> Result<Option<Value>> {
        if self.body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&self.body)?))
    }
}

/// HTTP client wrapper for OpenStack API calls
#[derive(Clone)]
pub struct OpenStackHttpClient {
    client: Client,
}

impl OpenStackHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client })
    }

    /// The underlying reqwest client (shared with the authenticator)
    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }

    /// Execute one authenticated request.
    ///
    /// Query parameters are appended in the given order. Non-success
    /// statuses come back as errors classified by [`error_for_status`].
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        token: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let request_id = format!("req-{}", uuid::Uuid::new_v4());
        tracing::debug!("{} {} query={:?} request_id={}", method, url, query, request_id);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header("X-Auth-Token", token)
            .header("X-OpenStack-Request-ID", &request_id)
            .header(reqwest::header::ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!(
                "API error: {} {} -> {} - {}",
                method,
                url,
                status,
                sanitize_for_log(&text)
            );
            return Err(error_for_status(status.as_u16(), &text, url));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body: text,
        })
    }
}
