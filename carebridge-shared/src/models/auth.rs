use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Role;

/// Minimum password length accepted by the signup form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
    pub role: Role,
}

impl RegisterRequest {
    /// Check the request the way the signup form does before submitting.
    ///
    /// Returns `(field, message)` pairs; an empty vector means the request may
    /// be sent.
    #[must_use]
    pub fn validate(&self) -> Vec<(&'static str, String)> {
        let mut problems = Vec::new();
        if self.username.trim().is_empty() {
            problems.push(("username", "Username is required".to_string()));
        }
        if self.email.trim().is_empty() {
            problems.push(("email", "Email is required".to_string()));
        } else if !looks_like_email(self.email.trim()) {
            problems.push(("email", "Invalid email".to_string()));
        }
        if self.password.is_empty() {
            problems.push(("password", "Password is required".to_string()));
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            problems.push((
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.confirm_password.is_empty() {
            problems.push((
                "confirm_password",
                "Confirm Password is required".to_string(),
            ));
        } else if self.confirm_password != self.password {
            problems.push(("confirm_password", "Passwords must match".to_string()));
        }
        problems
    }
}

pub(crate) fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !value.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// Any auth endpoint response that may hand back a fresh credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokenResponse {
    #[serde(default, alias = "token", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request body for `POST /auth/select-role`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectRoleRequest {
    pub role: Role,
}

/// Response of `POST /auth/select-role`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectRoleResponse {
    /// Page the backend wants the user sent to, if it has an opinion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, alias = "token", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Claims read from the payload segment of a bearer credential.
///
/// The signature is never checked on the client; these values drive
/// navigation only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl Claims {
    /// Subject rendered as text, whether the issuer used a string or a number.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        match self.sub.as_ref()? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Expiry instant, when the issuer set one.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
    }

    /// Whether the credential's `exp` lies at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry <= now)
    }
}

/// Charity profile edited from the charity settings page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharitySettings {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}
