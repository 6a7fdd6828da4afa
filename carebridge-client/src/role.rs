//! Reading the role claim out of a bearer credential.
//!
//! The signature is deliberately not verified: the role only picks which
//! dashboard to show. Authorization is enforced by the API on every request.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use shared::models::{Claims, Role};

use crate::{error::ClientError, token_store::Credential};

/// Decode the claims segment of `credential`.
///
/// # Errors
/// Returns [`ClientError::Decode`] when the credential is not three
/// dot-separated segments or its payload is not base64url-encoded JSON.
pub fn decode_claims(credential: &Credential) -> Result<Claims, ClientError> {
    let mut segments = credential.as_str().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClientError::Decode(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| ClientError::Decode(format!("claims are not base64url: {err}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| ClientError::Decode(format!("claims are not a JSON object: {err}")))
}

/// Resolve the role a credential was issued for.
///
/// # Errors
/// Returns [`ClientError::Decode`] when the claims cannot be read or carry no
/// recognised `role`.
pub fn resolve_role(credential: &Credential) -> Result<Role, ClientError> {
    let claims = decode_claims(credential)?;
    let raw = claims
        .role
        .as_deref()
        .ok_or_else(|| ClientError::Decode("claims carry no role".to_string()))?;
    raw.parse()
        .map_err(|_| ClientError::Decode(format!("unrecognised role {raw:?}")))
}
