//! Loopback mock of the CareBridge API for integration tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{
        StatusCode,
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use client::{ApiClient, AuthController, MemoryTokenStore};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Password the mock accepts on `/auth/login`.
pub const PASSWORD: &str = "correct horse";

/// Cookie the mock sets on a successful login.
pub const SESSION_COOKIE: &str = "cb_session=7f3a9c";

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub cookie: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<&'static str, Vec<Value>>,
    next_id: i64,
    requests: Vec<Recorded>,
    bodies: Vec<(String, Value)>,
    failure: Option<(StatusCode, Value)>,
    settings: Value,
    login_token: Option<String>,
    role_redirect: Option<String>,
}

/// Shared handle on the mock's state.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Bind a loopback listener and serve the mock on it.
    pub async fn start() -> (Self, Url) {
        let backend = Self::default();
        {
            let mut inner = backend.lock();
            inner.next_id = 1;
            inner.settings = json!({
                "name": "Hope Foundation",
                "description": "School supplies",
                "email": "hello@hope.example",
                "logo": null
            });
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (backend, Url::parse(&format!("http://{addr}")).unwrap())
    }

    pub fn seed(&self, collection: &'static str, records: Vec<Value>) {
        self.lock().collections.insert(collection, records);
    }

    pub fn set_next_id(&self, id: i64) {
        self.lock().next_id = id;
    }

    pub fn set_login_token(&self, token: impl Into<String>) {
        self.lock().login_token = Some(token.into());
    }

    pub fn set_role_redirect(&self, target: impl Into<String>) {
        self.lock().role_redirect = Some(target.into());
    }

    /// Answer the next request with `status` and `body`, whatever it is.
    pub fn fail_next(&self, status: StatusCode, body: Value) {
        self.lock().failure = Some((status, body));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// JSON bodies received, keyed by path.
    pub fn bodies(&self) -> Vec<(String, Value)> {
        self.lock().bodies.clone()
    }

    pub fn records(&self, collection: &'static str) -> Vec<Value> {
        self.lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn remember(&self, path: String, body: &Value) {
        self.lock().bodies.push((path, body.clone()));
    }

    fn list(&self, collection: &'static str) -> Json<Value> {
        Json(Value::Array(self.records(collection)))
    }

    fn create(&self, collection: &'static str, path: String, body: Value) -> Response {
        self.remember(path, &body);
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let mut record = body;
        if let Value::Object(fields) = &mut record {
            fields.insert("id".to_string(), json!(id));
        }
        inner.collections.entry(collection).or_default().push(record);
        (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
    }

    fn update(&self, collection: &'static str, id: i64, body: Value) -> Response {
        self.remember(format!("/{collection}/{id}"), &body);
        let mut inner = self.lock();
        let records = inner.collections.entry(collection).or_default();
        let Some(existing) = records.iter_mut().find(|record| record["id"] == json!(id)) else {
            return not_found();
        };
        if let (Value::Object(target), Value::Object(changes)) = (existing, body) {
            target.extend(changes);
        }
        Json(json!({ "message": "updated" })).into_response()
    }

    fn remove(&self, collection: &'static str, id: i64) -> Response {
        let mut inner = self.lock();
        let records = inner.collections.entry(collection).or_default();
        let before = records.len();
        records.retain(|record| record["id"] != json!(id));
        if records.len() == before {
            return not_found();
        }
        StatusCode::NO_CONTENT.into_response()
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// Build an unsigned token carrying `role`.
pub fn token_for(role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "role": role, "sub": 42 }).to_string());
    format!("{header}.{payload}.sig")
}

/// A controller talking to `base` with its own in-memory store.
pub fn controller(base: &Url, store: &MemoryTokenStore) -> AuthController {
    let client = ApiClient::new(base.clone(), Arc::new(store.clone())).unwrap();
    AuthController::new(client)
}

/// Base URL of a port nothing listens on.
pub async fn closed_port() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}

async fn record(State(backend): State<MockBackend>, request: Request, next: Next) -> Response {
    let failure = {
        let mut inner = backend.lock();
        inner.requests.push(Recorded {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            authorization: request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
            cookie: request
                .headers()
                .get(COOKIE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
        });
        inner.failure.take()
    };
    if let Some((status, body)) = failure {
        return (status, Json(body)).into_response();
    }
    next.run(request).await
}

fn collection_routes(name: &'static str) -> Router<MockBackend> {
    Router::new()
        .route(
            &format!("/{name}"),
            get(move |State(backend): State<MockBackend>| async move { backend.list(name) }).post(
                move |State(backend): State<MockBackend>, Json(body): Json<Value>| async move {
                    backend.create(name, format!("/{name}"), body)
                },
            ),
        )
        .route(
            &format!("/{name}/{{id}}"),
            put(
                move |State(backend): State<MockBackend>,
                      Path(id): Path<i64>,
                      Json(body): Json<Value>| async move {
                    backend.update(name, id, body)
                },
            )
            .delete(
                move |State(backend): State<MockBackend>, Path(id): Path<i64>| async move {
                    backend.remove(name, id)
                },
            ),
        )
}

async fn login(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    backend.remember("/auth/login".to_string(), &body);
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid email or password" })),
        )
            .into_response();
    }
    let token = backend
        .lock()
        .login_token
        .clone()
        .unwrap_or_else(|| token_for("donor"));
    (
        [(SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
        Json(json!({ "access_token": token })),
    )
        .into_response()
}

async fn register(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    backend.remember("/auth/register".to_string(), &body);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response()
}

async fn select_role(
    State(backend): State<MockBackend>,
    headers: axum::http::HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.remember("/auth/select-role".to_string(), &body);
    if !headers.contains_key(AUTHORIZATION) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "Missing Authorization Header" })),
        )
            .into_response();
    }
    match backend.lock().role_redirect.clone() {
        Some(redirect) => Json(json!({ "redirect": redirect })).into_response(),
        None => Json(json!({})).into_response(),
    }
}

async fn volunteer(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    backend.remember("/volunteer".to_string(), &body);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Volunteer signup successful" })),
    )
        .into_response()
}

async fn settings(State(backend): State<MockBackend>) -> Json<Value> {
    Json(backend.lock().settings.clone())
}

async fn patch_settings(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Json<Value> {
    backend.remember("/api/charity-settings".to_string(), &body);
    let mut inner = backend.lock();
    if let (Value::Object(target), Value::Object(changes)) = (&mut inner.settings, body) {
        target.extend(changes);
    }
    Json(inner.settings.clone())
}

fn router(backend: MockBackend) -> Router {
    let mut router = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/select-role", post(select_role))
        .route("/volunteer", post(volunteer))
        .route("/api/charity-settings", get(settings).patch(patch_settings))
        .route(
            "/charities/create",
            post(
                |State(backend): State<MockBackend>, Json(body): Json<Value>| async move {
                    backend.create("charities", "/charities/create".to_string(), body)
                },
            ),
        );
    for name in ["beneficiaries", "stories", "donations", "charities"] {
        router = router.merge(collection_routes(name));
    }
    router
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}
