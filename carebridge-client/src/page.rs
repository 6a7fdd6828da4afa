//! Opening a protected resource page.

use shared::routes::Route;
use tracing::debug;

use crate::{
    bootstrap::{BootstrapState, PageLocation, SessionBootstrap},
    resource::Resource,
    session::AuthController,
    viewmodel::CrudViewModel,
};

/// What opening a page produced.
#[derive(Debug)]
pub enum PageOutcome<R: Resource> {
    /// The session checked out; the view-model has run its first `list()`.
    Rendered(CrudViewModel<R>),
    /// Navigate here instead. No resource request was sent.
    Redirect(Route),
}

impl<R: Resource> PageOutcome<R> {
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Redirect(route) => Some(*route),
            Self::Rendered(_) => None,
        }
    }

    #[must_use]
    pub fn into_view_model(self) -> Option<CrudViewModel<R>> {
        match self {
            Self::Rendered(view_model) => Some(view_model),
            Self::Redirect(_) => None,
        }
    }
}

/// A page that must not fetch anything before the session is settled.
#[derive(Debug)]
pub struct ProtectedPage<'a> {
    auth: &'a AuthController,
}

impl<'a> ProtectedPage<'a> {
    #[must_use]
    pub fn new(auth: &'a AuthController) -> Self {
        Self { auth }
    }

    /// Run the session bootstrap for `location` without mounting anything.
    ///
    /// Pages that load something other than a collection call this before
    /// their first request.
    ///
    /// # Errors
    /// The route to navigate to when the page may not load.
    pub fn enter(&self, location: PageLocation) -> Result<(), Route> {
        let mut bootstrap = SessionBootstrap::new(self.auth, location);
        let state = bootstrap.evaluate();
        if let Some(target) = state.redirect_target() {
            debug!(path = %bootstrap.location().path, %target, "page redirected");
            return Err(target);
        }
        debug_assert_eq!(state, BootstrapState::Authenticated);
        Ok(())
    }

    /// Run the session bootstrap for `location` and, once authenticated,
    /// mount the resource view-model and load it.
    ///
    /// A failed initial load still renders; the error is on the view-model.
    pub async fn open<R: Resource>(&self, location: PageLocation) -> PageOutcome<R> {
        if let Err(target) = self.enter(location) {
            return PageOutcome::Redirect(target);
        }

        let mut view_model = CrudViewModel::<R>::new(self.auth.client().clone());
        if view_model.list().await.is_err() {
            debug!(
                resource = R::DESCRIPTOR.plural,
                "initial load failed; rendering with error"
            );
        }
        PageOutcome::Rendered(view_model)
    }
}
