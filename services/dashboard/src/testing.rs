//! services/dashboard/src/testing.rs
//!
//! A scripted in-memory `AdminApi` for store tests. Replies are queued per
//! operation; a gated reply stays pending until the test releases it.

use admin_dashboard_core::domain::{
    Credentials, Product, ProductDraft, Registration, Role, Session, User, UserStatus,
};
use admin_dashboard_core::ports::{AdminApi, PortError, PortResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

enum Reply {
    Ready(PortResult<Value>),
    Gated(oneshot::Receiver<PortResult<Value>>),
}

#[derive(Default)]
pub struct FakeApi {
    replies: Mutex<HashMap<&'static str, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn reply(&self, op: &'static str, result: PortResult<Value>) {
        self.push(op, Reply::Ready(result));
    }

    /// Queues a reply that resolves only once the returned sender fires.
    pub fn gate(&self, op: &'static str) -> oneshot::Sender<PortResult<Value>> {
        let (tx, rx) = oneshot::channel();
        self.push(op, Reply::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, op: &'static str, reply: Reply) {
        self.replies.lock().unwrap().entry(op).or_default().push_back(reply);
    }

    async fn answer<T: DeserializeOwned>(&self, op: &'static str, call: String) -> PortResult<T> {
        self.calls.lock().unwrap().push(call);
        let next = self.replies.lock().unwrap().get_mut(op).and_then(VecDeque::pop_front);
        let value = match next {
            Some(Reply::Ready(result)) => result?,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(PortError::Network("gate dropped".into())))?,
            None => return Err(PortError::Network(format!("no reply scripted for {}", op))),
        };
        serde_json::from_value(value).map_err(|e| PortError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> PortResult<Session> {
        self.answer("login", format!("login {}", credentials.email)).await
    }

    async fn register(&self, registration: &Registration) -> PortResult<()> {
        self.answer("register", format!("register {}", registration.email)).await
    }

    async fn logout(&self) -> PortResult<()> {
        self.answer("logout", "logout".into()).await
    }

    async fn list_products(&self) -> PortResult<Vec<Product>> {
        self.answer("list_products", "list_products".into()).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> PortResult<Product> {
        self.answer("create_product", format!("create_product {}", draft.name)).await
    }

    async fn update_product(&self, id: &str, _draft: &ProductDraft) -> PortResult<Product> {
        self.answer("update_product", format!("update_product {}", id)).await
    }

    async fn delete_product(&self, id: &str) -> PortResult<()> {
        self.answer("delete_product", format!("delete_product {}", id)).await
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        self.answer("list_users", "list_users".into()).await
    }

    async fn update_user_status(&self, id: &str, status: UserStatus) -> PortResult<User> {
        self.answer("update_user_status", format!("update_user_status {} {}", id, status))
            .await
    }

    async fn update_user_role(&self, id: &str, role: Role) -> PortResult<User> {
        self.answer("update_user_role", format!("update_user_role {} {}", id, role)).await
    }
}

pub fn session_json(token: &str) -> Value {
    json!({
        "user": { "id": "op-1", "name": "Operator", "email": "op@example.com" },
        "token": token
    })
}

pub fn product_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Marble",
        "price": 120,
        "stock": 3,
        "category": "busts",
        "imageUrl": "",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

pub fn user_json(id: &str, role: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("User {}", id),
        "email": format!("{}@example.com", id),
        "role": role,
        "status": status,
        "createdAt": "2024-01-01T00:00:00Z"
    })
}
