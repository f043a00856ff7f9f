//! Test utilities for driving the client against scripted responses.

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

enum Reply {
    Respond(u16, serde_json::Value),
    Fail(String),
}

/// A scripted transport.
///
/// Returns queued replies in order and records every request it executes,
/// so tests can assert on exactly what would have gone over the wire.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Create a transport with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and JSON body.
    pub async fn respond_with(&self, status: u16, body: serde_json::Value) {
        self.replies.lock().await.push_back(Reply::Respond(status, body));
    }

    /// Queue a transport-level failure.
    pub async fn fail_with(&self, message: &str) {
        self.replies.lock().await.push_back(Reply::Fail(message.to_string()));
    }

    /// All requests executed so far, in order.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests executed so far.
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().await.push(request);

        match self.replies.lock().await.pop_front() {
            Some(Reply::Respond(status, body)) => {
                let body = serde_json::to_vec(&body)
                    .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
                Ok(ApiResponse {
                    status,
                    body: Bytes::from(body),
                })
            }
            Some(Reply::Fail(message)) => Err(TransportError::ConnectionFailed(message)),
            None => Err(TransportError::ConnectionFailed(
                "no scripted reply left in mock transport".to_string(),
            )),
        }
    }
}

/// Wire-shaped JSON for one report record, as the server returns it.
///
/// Nullable columns are null; pass a reporter id to attach a filing user.
#[must_use]
pub fn person_json(id: i64, reporter_id: Option<i64>) -> serde_json::Value {
    let reporter = reporter_id.map_or(serde_json::Value::Null, |user_id| {
        serde_json::json!({
            "id": user_id,
            "username": format!("user{user_id}"),
            "email": format!("user{user_id}@example.com"),
            "phone": null,
            "created_at": "2024-01-01T00:00:00",
        })
    });

    serde_json::json!({
        "id": id,
        "full_name": format!("Person {id}"),
        "age": null,
        "gender": null,
        "height": null,
        "weight": null,
        "hair_color": null,
        "eye_color": null,
        "last_seen_location": null,
        "last_seen_date": null,
        "description": null,
        "status": "missing",
        "reporter": reporter,
        "photos": [],
        "relatives": [],
        "created_at": "2024-03-01T12:00:00",
        "updated_at": "2024-03-01T12:00:00",
    })
}

/// Wire-shaped JSON for one listing page.
#[must_use]
pub fn page_json(
    records: &[serde_json::Value],
    total: u64,
    pages: u32,
    current_page: u32,
) -> serde_json::Value {
    serde_json::json!({
        "data": records,
        "total": total,
        "pages": pages,
        "current_page": current_page,
    })
}
