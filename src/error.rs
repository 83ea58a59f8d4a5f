//! Error types
//!
//! One error enum for the whole library. HTTP status codes are mapped onto
//! it in a single place ([`crate::openstack::http`]) so the fallback rules
//! can match on variants instead of inspecting strings.

/// Errors returned by OpenStack API calls
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The backend answered 404 (or the addressed resource is otherwise absent)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The backend answered 401 or 403
    #[error("Authorization failed ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// A required field was missing at the call site; no request was sent
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The HTTP client itself failed (connection refused, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any other non-success status
    #[error("API request failed: {status}")]
    Http { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Valid JSON, but not in the envelope the descriptor expects
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for 404-class failures, the only ones the fallback rules recover from
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// HTTP status carried by this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound(_) => Some(404),
            Error::Unauthorized { status, .. } | Error::Http { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Format an API error for display
/// Security: generic messages avoid echoing response bodies back to the user
pub fn format_api_error(error: &Error) -> String {
    match error {
        Error::NotFound(_) => "Resource not found.".to_string(),
        Error::Unauthorized { status: 401, .. } => {
            "Authentication failed. Check your token or password credentials.".to_string()
        }
        Error::Unauthorized { .. } => {
            "Permission denied. Check the roles assigned to your project.".to_string()
        }
        Error::Validation(msg) => format!("Invalid request: {}", msg),
        Error::Config(msg) => format!("Configuration error: {}", msg),
        Error::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        Error::Decode(_) | Error::UnexpectedShape(_) => {
            "Unexpected response from the service.".to_string()
        }
        Error::Http { status: 400, .. } => "Invalid request. Check your parameters.".to_string(),
        Error::Http { status: 409, .. } => {
            "Resource conflict. The resource may already exist or be in use.".to_string()
        }
        Error::Http { status: 413, .. } | Error::Http { status: 429, .. } => {
            "Rate limit or quota exceeded. Please try again later.".to_string()
        }
        Error::Http { status, .. } if *status >= 500 => {
            "OpenStack service temporarily unavailable. Please try again.".to_string()
        }
        Error::Http { status, .. } => format!("Request failed with status {}.", status),
    }
}
