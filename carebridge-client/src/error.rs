use reqwest::StatusCode;
use thiserror::Error;

/// Shown whenever a request never reached the server.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Try again later.";

/// Shown instead of raw credential decoding failures.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// A single form field that failed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// The standard "is required" message for an empty field.
    #[must_use]
    pub fn required(field: &'static str) -> Self {
        Self::new(field, format!("{} is required", humanize(field)))
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|error| error.field)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything that can go wrong between the client and the CareBridge API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never reached the server (offline, DNS, refused connection).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Http {
        status: StatusCode,
        message: Option<String>,
    },

    /// The stored or supplied credential cannot be read.
    #[error("credential could not be decoded: {0}")]
    Decode(String),

    /// Required form fields are empty; nothing was sent.
    #[error("invalid input: {}", describe_fields(.fields))]
    Validation { fields: Vec<FieldError> },

    /// There is no credential for an operation that needs one.
    #[error("no active session; log in first")]
    NotAuthenticated,

    /// A success response carried a body that is not the expected JSON.
    #[error("unexpected response body: {0}")]
    InvalidResponse(String),

    /// A request URL could not be built from the API base.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Persisting or removing the credential failed.
    #[error("credential storage failed: {0}")]
    Storage(String),
}

impl ClientError {
    /// Text suitable for an inline error next to the action that failed.
    ///
    /// Server-supplied messages are passed through verbatim; anything else
    /// falls back to `fallback` or a fixed generic message.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Decode(_) | Self::NotAuthenticated => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Validation { fields } => match fields.as_slice() {
                [single] => single.message.clone(),
                _ => "Please fill in all required fields.".to_string(),
            },
            _ => fallback.to_string(),
        }
    }

    /// HTTP status of a server failure.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
