use serde::{Deserialize, Serialize};

/// Error body returned by the CareBridge API.
///
/// Different endpoints name the human readable field differently
/// (`message`, `error`, `msg`, or `detail`), so every spelling is accepted.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Message field used by most endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Message field used by the auth endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Message field used by the donation endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Message field used by validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    /// Creates an error body carrying only `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Parse a raw response body, returning `None` when it is not a JSON object.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// The first non-blank message the server supplied.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        [&self.message, &self.error, &self.msg, &self.detail]
            .into_iter()
            .filter_map(Option::as_deref)
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.server_message().unwrap_or("unknown error"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_new() {
        let error = ErrorResponse::new("Charity not found");
        assert_eq!(error.server_message(), Some("Charity not found"));
        assert_eq!(error.to_string(), "Charity not found");
    }

    #[test]
    fn test_each_field_spelling_is_read() {
        for body in [
            r#"{"message":"boom"}"#,
            r#"{"error":"boom"}"#,
            r#"{"msg":"boom"}"#,
            r#"{"detail":"boom"}"#,
        ] {
            let parsed = ErrorResponse::parse(body).unwrap();
            assert_eq!(parsed.server_message(), Some("boom"), "body: {body}");
        }
    }

    #[test]
    fn test_blank_messages_are_skipped() {
        let parsed = ErrorResponse::parse(r#"{"message":"  ","error":"Invalid role"}"#).unwrap();
        assert_eq!(parsed.server_message(), Some("Invalid role"));
    }

    #[test]
    fn test_non_json_body() {
        assert!(ErrorResponse::parse("<html>Bad Gateway</html>").is_none());
        assert!(ErrorResponse::parse("").is_none());
    }

    #[test]
    fn test_json_without_message() {
        let parsed = ErrorResponse::parse(r#"{"status":"fail"}"#).unwrap();
        assert_eq!(parsed.server_message(), None);
        assert_eq!(parsed.to_string(), "unknown error");
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let json = serde_json::to_string(&ErrorResponse::new("Nope")).unwrap();
        assert_eq!(json, r#"{"message":"Nope"}"#);
    }
}
