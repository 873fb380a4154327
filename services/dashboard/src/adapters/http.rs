//! services/dashboard/src/adapters/http.rs
//!
//! This module contains the REST adapter, the concrete implementation of the
//! `AdminApi` port from the `core` crate. It handles all traffic to the admin
//! backend using `reqwest`.

use admin_dashboard_core::auth::AuthState;
use admin_dashboard_core::domain::{
    Credentials, Product, ProductDraft, Registration, Role, Session, User, UserStatus,
};
use admin_dashboard_core::ports::{AdminApi, PortError, PortResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::config::Config;

// Keys a backend may wrap its error object in.
const ERROR_ENVELOPES: [&str; 2] = ["error", "data"];

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `AdminApi` port over JSON/HTTP.
#[derive(Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: Url,
    session: watch::Receiver<AuthState>,
}

impl HttpAdminApi {
    /// Creates a new `HttpAdminApi`. The bearer token is read from `session` on every
    /// request, so logins and logouts take effect immediately.
    pub fn new(config: &Config, session: watch::Receiver<AuthState>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config.api_base_url.clone(), session))
    }

    pub fn with_client(client: Client, base_url: Url, session: watch::Receiver<AuthState>) -> Self {
        Self {
            client,
            base_url,
            session,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> PortResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortError::Network(format!("Invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues one request and returns the raw body of a 2xx response. Any other
    /// status comes back as a normalized `PortError::Server`.
    #[instrument(skip(self, body), fields(path = %segments.join("/")))]
    async fn send_raw<B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> PortResult<Bytes>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(segments)?;
        // Copy the token out: the watch guard must not live across an await.
        let token = self.session.borrow().token().map(str::to_owned);

        let mut request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), len = bytes.len(), "Response received");

        if !status.is_success() {
            let error = normalize_error(status.as_u16(), &bytes);
            warn!(error = %error, "Request failed");
            return Err(error);
        }
        Ok(bytes)
    }

    /// Decodes a 2xx body into `T`. An empty body decodes as JSON `null`.
    async fn send<T, B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> PortResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let bytes = self.send_raw(method, segments, body).await?;
        let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes[..] };
        serde_json::from_slice(bytes).map_err(|e| PortError::Decode(e.to_string()))
    }

    /// For endpoints whose success body carries nothing the caller needs. The body
    /// is not parsed, so plain-text acknowledgements are accepted.
    async fn send_discarding<B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> PortResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let bytes = self.send_raw(method, segments, body).await?;
        debug!(ignored = bytes.len(), "Success body discarded");
        Ok(())
    }
}

fn map_transport_error(e: reqwest::Error) -> PortError {
    if e.is_timeout() {
        PortError::Timeout
    } else if e.is_decode() {
        PortError::Decode(e.to_string())
    } else {
        PortError::Network(e.to_string())
    }
}

/// Turns a non-2xx body into `PortError::Server`. Accepts `{message, errors}` at the
/// top level or nested under one of the envelope keys.
fn normalize_error(status: u16, body: &[u8]) -> PortError {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let candidate = parsed.as_ref().and_then(|value| {
        std::iter::once(value)
            .chain(ERROR_ENVELOPES.iter().filter_map(|key| value.get(*key)))
            .find(|v| v.get("message").is_some_and(Value::is_string))
    });

    let message = candidate
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let field_errors = candidate
        .and_then(|v| v.get("errors"))
        .and_then(Value::as_object)
        .map(|errors| {
            errors
                .iter()
                .map(|(field, messages)| (field.clone(), field_messages(messages)))
                .collect()
        })
        .unwrap_or_else(BTreeMap::new);

    PortError::Server {
        status,
        message,
        field_errors,
    }
}

fn field_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

//=========================================================================================
// `AdminApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn login(&self, credentials: &Credentials) -> PortResult<Session> {
        self.send(Method::POST, &["auth", "login"], Some(credentials))
            .await
    }

    async fn register(&self, registration: &Registration) -> PortResult<()> {
        self.send_discarding(Method::POST, &["auth", "register"], Some(registration))
            .await
    }

    async fn logout(&self) -> PortResult<()> {
        self.send_discarding::<Value>(Method::POST, &["auth", "logout"], None)
            .await
    }

    async fn list_products(&self) -> PortResult<Vec<Product>> {
        self.send::<_, Value>(Method::GET, &["products"], None).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> PortResult<Product> {
        self.send(Method::POST, &["products"], Some(draft)).await
    }

    async fn update_product(&self, id: &str, draft: &ProductDraft) -> PortResult<Product> {
        self.send(Method::PUT, &["products", id], Some(draft)).await
    }

    async fn delete_product(&self, id: &str) -> PortResult<()> {
        self.send_discarding::<Value>(Method::DELETE, &["products", id], None)
            .await
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        self.send::<_, Value>(Method::GET, &["users"], None).await
    }

    async fn update_user_status(&self, id: &str, status: UserStatus) -> PortResult<User> {
        let body = json!({ "status": status });
        self.send(Method::PATCH, &["users", id, "status"], Some(&body))
            .await
    }

    async fn update_user_role(&self, id: &str, role: Role) -> PortResult<User> {
        let body = json!({ "role": role });
        self.send(Method::PATCH, &["users", id, "role"], Some(&body))
            .await
    }
}
