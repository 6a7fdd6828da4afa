#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(clippy::pedantic)]

//! Client side of the CareBridge donation platform.
//!
//! * [`token_store`] keeps the single bearer credential of a session.
//! * [`http::ApiClient`] sends it with every API request and translates
//!   failures into [`ClientError`].
//! * [`role`] reads the role claim that picks a landing dashboard.
//! * [`bootstrap::SessionBootstrap`] decides, once per page load, whether a
//!   protected page renders or redirects.
//! * [`viewmodel::CrudViewModel`] drives any collection described by a
//!   [`resource::Resource`] implementation.
//! * [`volunteer`] submits the public volunteer signup form.

pub mod bootstrap;
pub mod error;
pub mod http;
pub mod page;
pub mod resource;
pub mod resources;
pub mod role;
pub mod session;
pub mod token_store;
pub mod viewmodel;
pub mod volunteer;

pub use bootstrap::{BootstrapState, PageLocation, SessionBootstrap};
pub use error::{ClientError, FieldError};
pub use http::ApiClient;
pub use page::{PageOutcome, ProtectedPage};
pub use resource::{Card, Resource, ResourceDescriptor};
pub use session::{AuthController, Session};
pub use token_store::{Credential, MemoryTokenStore, TokenStore};
pub use viewmodel::CrudViewModel;

#[cfg(not(target_arch = "wasm32"))]
pub use token_store::FileTokenStore;

#[cfg(target_arch = "wasm32")]
pub use token_store::BrowserTokenStore;
