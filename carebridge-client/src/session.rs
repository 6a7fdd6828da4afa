//! Session state and the capability that is allowed to change it.
//!
//! Components receive a read-only [`Session`]. Only [`AuthController`] writes
//! the token store: logging in, signing up, choosing a role, adopting a link
//! credential, and logging out.

use std::sync::Arc;

use shared::models::{
    AuthTokenResponse, Claims, LoginRequest, RegisterRequest, Role, SelectRoleRequest,
    SelectRoleResponse,
};
use tracing::{info, warn};

use crate::{
    error::{ClientError, FieldError},
    http::ApiClient,
    role::{decode_claims, resolve_role},
    token_store::{Credential, TokenStore},
};

/// Read-only view of the current session.
#[derive(Clone, Debug)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// The current credential, if any.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.store.load()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// Role of the current credential, or `None` when signed out.
    ///
    /// # Errors
    /// Returns [`ClientError::Decode`] when a stored credential is unreadable.
    pub fn role(&self) -> Result<Option<Role>, ClientError> {
        self.credential().as_ref().map(resolve_role).transpose()
    }

    /// Claims of the current credential, or `None` when signed out.
    ///
    /// # Errors
    /// Returns [`ClientError::Decode`] when a stored credential is unreadable.
    pub fn claims(&self) -> Result<Option<Claims>, ClientError> {
        self.credential().as_ref().map(decode_claims).transpose()
    }
}

/// The only component allowed to change the stored credential.
#[derive(Clone, Debug)]
pub struct AuthController {
    client: ApiClient,
}

impl AuthController {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// A read-only handle on the same store.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(Arc::clone(self.client.token_store()))
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn store(&self) -> &Arc<dyn TokenStore> {
        self.client.token_store()
    }

    /// Sign in with e-mail and password and keep the issued credential.
    ///
    /// # Errors
    /// * [`ClientError::Validation`] when either field is empty; nothing is sent.
    /// * [`ClientError::InvalidResponse`] when the server returns no token.
    /// * Any [`ApiClient::request`] error.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, ClientError> {
        let mut fields = Vec::new();
        if email.trim().is_empty() {
            fields.push(FieldError::required("email"));
        }
        if password.is_empty() {
            fields.push(FieldError::required("password"));
        }
        if !fields.is_empty() {
            return Err(ClientError::Validation { fields });
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: AuthTokenResponse = self.client.post("/auth/login", &request).await?;
        let credential = response
            .access_token
            .as_deref()
            .and_then(Credential::parse)
            .ok_or_else(|| {
                ClientError::InvalidResponse("login response carried no access token".to_string())
            })?;
        self.store().save(&credential)?;
        info!(email = %request.email, "signed in");
        Ok(credential)
    }

    /// Create an account.
    ///
    /// The request is checked locally first. When the server answers with a
    /// credential it becomes the current session; otherwise the caller should
    /// send the user to the login page.
    ///
    /// # Errors
    /// * [`ClientError::Validation`] when the signup form is incomplete.
    /// * Any [`ApiClient::request`] error.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Option<Credential>, ClientError> {
        let problems = request.validate();
        if !problems.is_empty() {
            return Err(ClientError::Validation {
                fields: problems
                    .into_iter()
                    .map(|(field, message)| FieldError::new(field, message))
                    .collect(),
            });
        }

        let response: Option<AuthTokenResponse> =
            self.client.post("/auth/register", request).await?;
        let credential = response
            .and_then(|body| body.access_token)
            .and_then(Credential::parse);
        if let Some(credential) = &credential {
            self.store().save(credential)?;
        }
        info!(username = %request.username, role = %request.role, "registered account");
        Ok(credential)
    }

    /// Tell the API which role the signed-in user picked.
    ///
    /// Returns the page to navigate to: the server's `redirect` when it sent
    /// one, else the role's landing page. A credential in the response
    /// replaces the current one.
    ///
    /// # Errors
    /// * [`ClientError::NotAuthenticated`] without a current credential.
    /// * Any [`ApiClient::request`] error.
    pub async fn select_role(&self, role: Role) -> Result<String, ClientError> {
        if self.store().load().is_none() {
            return Err(ClientError::NotAuthenticated);
        }

        let response: Option<SelectRoleResponse> = self
            .client
            .post("/auth/select-role", &SelectRoleRequest { role })
            .await?;
        let response = response.unwrap_or_default();

        if let Some(credential) = response.access_token.as_deref().and_then(Credential::parse) {
            self.store().save(&credential)?;
        }
        info!(role = %role, "selected role");
        Ok(response
            .redirect
            .filter(|target| !target.trim().is_empty())
            .unwrap_or_else(|| role.landing_route().path().to_string()))
    }

    /// Make a credential received on an incoming link the current session.
    ///
    /// # Errors
    /// * [`ClientError::Decode`] when `raw` is not a usable credential.
    /// * [`ClientError::Storage`] when it cannot be persisted.
    pub fn adopt(&self, raw: &str) -> Result<Credential, ClientError> {
        let credential = Credential::parse(raw)
            .ok_or_else(|| ClientError::Decode("link credential is empty".to_string()))?;
        self.store().save(&credential)?;
        info!("adopted credential from incoming link");
        Ok(credential)
    }

    /// Forget the current session.
    ///
    /// # Errors
    /// Returns [`ClientError::Storage`] when the credential cannot be removed.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.store().clear()?;
        info!("signed out");
        Ok(())
    }

    /// Drop a credential that failed to decode. Failures are logged, not
    /// returned, since the caller is already routing to the login page.
    pub(crate) fn discard_unreadable(&self) {
        if let Err(err) = self.store().clear() {
            warn!(error = %err, "failed to clear unreadable credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{role::tests::token_with_claims, token_store::MemoryTokenStore};
    use serde_json::json;
    use url::Url;

    fn controller(store: MemoryTokenStore) -> AuthController {
        let client = ApiClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            Arc::new(store),
        )
        .unwrap();
        AuthController::new(client)
    }

    #[test]
    fn session_reports_role_of_stored_credential() {
        let token = token_with_claims(&json!({ "role": "charity" }));
        let auth = controller(MemoryTokenStore::with_raw(token));
        let session = auth.session();
        assert!(session.is_authenticated());
        assert_eq!(session.role().unwrap(), Some(Role::Charity));
    }

    #[test]
    fn signed_out_session_has_no_role() {
        let session = controller(MemoryTokenStore::new()).session();
        assert!(!session.is_authenticated());
        assert_eq!(session.role().unwrap(), None);
        assert!(session.claims().unwrap().is_none());
    }

    #[test]
    fn unreadable_credential_surfaces_decode_error() {
        let session = controller(MemoryTokenStore::with_raw("opaque")).session();
        assert!(matches!(session.role(), Err(ClientError::Decode(_))));
    }

    #[test]
    fn adopt_and_logout() {
        let store = MemoryTokenStore::new();
        let auth = controller(store.clone());

        auth.adopt("link-token").unwrap();
        assert_eq!(store.load().unwrap().as_str(), "link-token");

        auth.logout().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn adopt_rejects_placeholder_values() {
        let store = MemoryTokenStore::new();
        let auth = controller(store.clone());
        assert!(matches!(auth.adopt("undefined"), Err(ClientError::Decode(_))));
        assert!(store.raw().is_none());
    }

    #[tokio::test]
    async fn login_validates_before_sending() {
        let auth = controller(MemoryTokenStore::new());
        let err = auth.login("", "").await.unwrap_err();
        let ClientError::Validation { fields } = err else {
            panic!("expected validation error, got {err:?}");
        };
        let names: Vec<_> = fields.iter().map(|field| field.field).collect();
        assert_eq!(names, ["email", "password"]);
    }

    #[tokio::test]
    async fn select_role_requires_a_session() {
        let auth = controller(MemoryTokenStore::new());
        assert!(matches!(
            auth.select_role(Role::Donor).await,
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn register_validates_before_sending() {
        let auth = controller(MemoryTokenStore::new());
        let request = RegisterRequest {
            username: "donor".to_string(),
            email: "donor@example.org".to_string(),
            password: "short".to_string(),
            confirm_password: "short".to_string(),
            role: Role::Donor,
        };
        let err = auth.register(&request).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { ref fields } if fields[0].field == "password"));
    }
}
