//! Per-page session bootstrap.
//!
//! Every protected page runs [`SessionBootstrap::evaluate`] once before it
//! fetches anything. The outcome decides whether the page renders, goes to the
//! login page, or is sent to the dashboard matching the user's role.

use shared::routes::Route;
use tracing::{debug, info, warn};
use url::Url;

use crate::{error::ClientError, role::resolve_role, session::AuthController};

const LOCAL_ORIGIN: &str = "http://localhost/";

/// The page being opened: its path and any credential handed over in the
/// query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    pub path: String,
    pub link_credential: Option<String>,
}

impl PageLocation {
    /// A location without an incoming link credential.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            link_credential: None,
        }
    }

    /// Parse a full URL (`https://host/dashboard?token=...`) or a bare
    /// `/path?query`, picking out the `link_parameter` query value.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUrl`] when `input` is neither.
    pub fn parse(input: &str, link_parameter: &str) -> Result<Self, ClientError> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(LOCAL_ORIGIN)?.join(input)?,
            Err(err) => return Err(err.into()),
        };
        let link_credential = url
            .query_pairs()
            .find(|(key, _)| key == link_parameter)
            .map(|(_, value)| value.into_owned());
        Ok(Self {
            path: url.path().to_string(),
            link_credential,
        })
    }

    /// The known page at this path, if any.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        Route::from_path(&self.path)
    }
}

/// Where a page load stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Checking,
    Authenticated,
    RedirectLogin,
    RedirectRole(Route),
}

impl BootstrapState {
    /// Only an authenticated page may issue data requests.
    #[must_use]
    pub fn permits_requests(self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Page to navigate to instead of rendering.
    #[must_use]
    pub fn redirect_target(self) -> Option<Route> {
        match self {
            Self::RedirectLogin => Some(Route::Login),
            Self::RedirectRole(route) => Some(route),
            Self::Checking | Self::Authenticated => None,
        }
    }
}

/// One page load's bootstrap. Starts in [`BootstrapState::Checking`].
#[derive(Debug)]
pub struct SessionBootstrap<'a> {
    auth: &'a AuthController,
    location: PageLocation,
    state: BootstrapState,
}

impl<'a> SessionBootstrap<'a> {
    #[must_use]
    pub fn new(auth: &'a AuthController, location: PageLocation) -> Self {
        Self {
            auth,
            location,
            state: BootstrapState::Checking,
        }
    }

    #[must_use]
    pub fn state(&self) -> BootstrapState {
        self.state
    }

    #[must_use]
    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    /// Decide the page's fate. Later calls return the first decision.
    pub fn evaluate(&mut self) -> BootstrapState {
        if self.state == BootstrapState::Checking {
            self.state = self.decide();
            debug!(path = %self.location.path, state = ?self.state, "session bootstrap finished");
        }
        self.state
    }

    fn decide(&self) -> BootstrapState {
        if let Some(raw) = self.location.link_credential.as_deref() {
            match self.auth.adopt(raw) {
                Ok(_) => return BootstrapState::Authenticated,
                Err(ClientError::Decode(_)) => {
                    debug!("ignoring empty link credential");
                }
                Err(err) => {
                    warn!(error = %err, "could not keep link credential");
                    return BootstrapState::RedirectLogin;
                }
            }
        }

        let Some(credential) = self.auth.session().credential() else {
            return BootstrapState::RedirectLogin;
        };

        match resolve_role(&credential) {
            Ok(role) => {
                let landing = role.landing_route();
                match self.location.route() {
                    Some(current) if current.is_entry_point() && current != landing => {
                        info!(role = %role, from = %current, to = %landing, "redirecting to role dashboard");
                        BootstrapState::RedirectRole(landing)
                    }
                    _ => BootstrapState::Authenticated,
                }
            }
            Err(err) => {
                warn!(error = %err, "stored credential is unreadable; signing out");
                self.auth.discard_unreadable();
                BootstrapState::RedirectLogin
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        http::ApiClient,
        role::tests::token_with_claims,
        token_store::{MemoryTokenStore, TokenStore},
    };
    use serde_json::json;

    fn auth(store: &MemoryTokenStore) -> AuthController {
        let client = ApiClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            Arc::new(store.clone()),
        )
        .unwrap();
        AuthController::new(client)
    }

    fn evaluate(store: &MemoryTokenStore, location: PageLocation) -> BootstrapState {
        let auth = auth(store);
        let mut bootstrap = SessionBootstrap::new(&auth, location);
        assert_eq!(bootstrap.state(), BootstrapState::Checking);
        bootstrap.evaluate()
    }

    fn role_token(role: &str) -> String {
        token_with_claims(&json!({ "role": role, "sub": 1 }))
    }

    #[test]
    fn parses_full_urls_and_bare_paths() {
        let location =
            PageLocation::parse("https://carebridge.example/dashboard?token=abc&x=1", "token")
                .unwrap();
        assert_eq!(location.path, "/dashboard");
        assert_eq!(location.link_credential.as_deref(), Some("abc"));
        assert_eq!(location.route(), Some(Route::Dashboard));

        let location = PageLocation::parse("/charity-dashboard/beneficiaries", "token").unwrap();
        assert_eq!(location.route(), Some(Route::Beneficiaries));
        assert_eq!(location.link_credential, None);
    }

    #[test]
    fn no_credential_redirects_to_login() {
        let store = MemoryTokenStore::new();
        let state = evaluate(&store, PageLocation::new("/donor-dashboard"));
        assert_eq!(state, BootstrapState::RedirectLogin);
        assert_eq!(state.redirect_target(), Some(Route::Login));
        assert!(!state.permits_requests());
    }

    #[test]
    fn link_credential_is_adopted_without_redirect() {
        let store = MemoryTokenStore::new();
        let location = PageLocation::parse("/dashboard?token=magic-link", "token").unwrap();
        assert_eq!(evaluate(&store, location), BootstrapState::Authenticated);
        assert_eq!(store.load().unwrap().as_str(), "magic-link");
    }

    #[test]
    fn entry_points_redirect_to_role_dashboard() {
        let store = MemoryTokenStore::with_raw(role_token("charity"));
        assert_eq!(
            evaluate(&store, PageLocation::new("/dashboard")),
            BootstrapState::RedirectRole(Route::CharityDashboard)
        );
        assert_eq!(
            evaluate(&store, PageLocation::new("/donor-dashboard")),
            BootstrapState::RedirectRole(Route::CharityDashboard)
        );
    }

    #[test]
    fn matching_dashboard_renders() {
        let store = MemoryTokenStore::with_raw(role_token("admin"));
        assert_eq!(
            evaluate(&store, PageLocation::new("/admin-dashboard")),
            BootstrapState::Authenticated
        );
    }

    #[test]
    fn sub_pages_never_redirect_by_role() {
        let store = MemoryTokenStore::with_raw(role_token("donor"));
        assert_eq!(
            evaluate(&store, PageLocation::new("/charity-dashboard/beneficiaries")),
            BootstrapState::Authenticated
        );
    }

    #[test]
    fn malformed_credential_is_cleared() {
        let store = MemoryTokenStore::with_raw("not-a-token");
        assert_eq!(
            evaluate(&store, PageLocation::new("/charity-dashboard")),
            BootstrapState::RedirectLogin
        );
        assert!(store.raw().is_none());
    }

    #[test]
    fn evaluation_happens_once() {
        let store = MemoryTokenStore::with_raw(role_token("donor"));
        let auth = auth(&store);
        let mut bootstrap = SessionBootstrap::new(&auth, PageLocation::new("/donor-dashboard"));
        assert_eq!(bootstrap.evaluate(), BootstrapState::Authenticated);
        store.clear().unwrap();
        assert_eq!(bootstrap.evaluate(), BootstrapState::Authenticated);
    }
}
