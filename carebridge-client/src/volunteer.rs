//! Public volunteer signup. Needs no session.

use serde::de::IgnoredAny;
use shared::models::VolunteerApplication;
use tracing::info;

use crate::{
    error::{ClientError, FieldError},
    http::ApiClient,
};

pub const VOLUNTEER_PATH: &str = "/volunteer";

/// Shown once the application is accepted.
pub const VOLUNTEER_THANKS: &str = "Thank you for signing up! Check your email for confirmation.";

/// Shown when a rejection carries no message of its own.
pub const VOLUNTEER_FAILED: &str = "Something went wrong. Please try again.";

/// Check `application` locally, then submit it.
///
/// Returns the notice to show on success.
///
/// # Errors
/// * [`ClientError::Validation`] when a required field is empty or the
///   e-mail is malformed. Nothing is sent.
/// * See [`ApiClient::request`].
pub async fn sign_up(
    client: &ApiClient,
    application: &VolunteerApplication,
) -> Result<&'static str, ClientError> {
    let mut fields: Vec<FieldError> = application
        .missing_required()
        .into_iter()
        .map(FieldError::required)
        .collect();
    if !application.email.trim().is_empty() && !application.has_valid_email() {
        fields.push(FieldError::new("email", "Invalid email"));
    }
    if !fields.is_empty() {
        return Err(ClientError::Validation { fields });
    }

    client
        .post::<IgnoredAny, _>(VOLUNTEER_PATH, application)
        .await?;
    info!(email = %application.email, "volunteer application submitted");
    Ok(VOLUNTEER_THANKS)
}
