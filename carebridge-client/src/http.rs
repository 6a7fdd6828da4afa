use std::sync::Arc;

use reqwest::{Client, Method};
use serde::{Serialize, de::DeserializeOwned};
use shared::{config::ClientConfig, models::ErrorResponse};
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::ClientError,
    token_store::{Credential, TokenStore},
};

/// Lightweight API client for the CareBridge backend.
///
/// Every request reads the current credential from the injected
/// [`TokenStore`]; there is no retry, timeout, or response caching.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client against `base_url`.
    ///
    /// # Errors
    /// Returns [`ClientError::Client`] when the HTTP client cannot be built.
    pub fn new(base_url: Url, store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url,
            client: build_http_client()?,
            store,
        })
    }

    /// Create a client for the origin named in `config`.
    ///
    /// # Errors
    /// Returns [`ClientError::Client`] when the HTTP client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ClientError> {
        Self::new(config.api_base_url.clone(), store)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The store this client reads credentials from.
    #[must_use]
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Resolve an API path against the base origin, keeping any base path.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUrl`] when the result is not a valid URL.
    pub fn api_url(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{base}/{}",
            path.trim_start_matches('/')
        ))?)
    }

    /// Send one request and decode its JSON response.
    ///
    /// The current credential, when present, goes out as
    /// `Authorization: Bearer <token>`; without one the request is still sent
    /// and the server decides. An empty success body decodes as JSON `null`.
    ///
    /// # Errors
    /// * [`ClientError::Network`] when the server could not be reached.
    /// * [`ClientError::Http`] for any non-success status, carrying the
    ///   server's message when the body has one.
    /// * [`ClientError::InvalidResponse`] when a success body does not decode
    ///   as `T`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.api_url(path)?;
        let credential = self.store.load();
        let builder = self.prepare(method.clone(), url, credential.as_ref(), body);

        debug!(
            method = %method,
            path,
            authenticated = credential.is_some(),
            "sending API request"
        );

        let response = builder.send().await.map_err(|err| {
            warn!(method = %method, path, error = %err, "API request did not reach the server");
            ClientError::Network(err)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::Network)?;

        if !status.is_success() {
            let message = ErrorResponse::parse(&String::from_utf8_lossy(&bytes))
                .and_then(|body| body.server_message().map(str::to_owned));
            warn!(
                method = %method,
                path,
                status = status.as_u16(),
                server_message = message.as_deref().unwrap_or(""),
                "API request failed"
            );
            return Err(ClientError::Http { status, message });
        }

        decode_body(&bytes)
    }

    fn prepare<B>(
        &self,
        method: Method,
        url: Url,
        credential: Option<&Credential>,
        body: Option<&B>,
    ) -> reqwest::RequestBuilder
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.client.request(method, url);
        if let Some(credential) = credential {
            builder = builder.bearer_auth(credential.as_str());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }
        builder
    }

    /// `GET path`.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client() -> Result<Client, ClientError> {
    Client::builder()
        .cookie_store(true)
        .user_agent(concat!("carebridge-client/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ClientError::Client)
}

#[cfg(target_arch = "wasm32")]
fn build_http_client() -> Result<Client, ClientError> {
    Client::builder().build().map_err(ClientError::Client)
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ClientError> {
    let decoded = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(bytes)
    };
    decoded.map_err(|err| ClientError::InvalidResponse(err.to_string()))
}
