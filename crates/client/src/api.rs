//! Client surface for the registry API.
//!
//! Every call funnels through one dispatch that classifies failures into
//! the application error taxonomy. A rejected credential (HTTP 401) is the
//! only signal that invalidates the session; no component ever inspects
//! error message text to decide behavior.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::models::{AuthSession, Gender, MissingPersonRecord, ReportPage, ReportStatus, Reporter};
use crate::query::FilterCriteria;
use crate::transport::{ApiRequest, ApiResponse, Transport};
use reunite_common::{AppError, AppResult, SessionGuard};

/// Registration request.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterInput {
    /// Desired username.
    #[validate(length(min = 3, max = 80))]
    pub username: String,
    /// Contact email.
    #[validate(email)]
    pub email: String,
    /// Password.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

/// Login request.
#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Partial update for an existing report.
///
/// `None` omits the field (no change), `Some(None)` sends null to clear
/// it, `Some(Some(value))` sets a new value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportUpdate {
    /// New full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// New age.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Option<u32>>,
    /// New gender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Option<Gender>>,
    /// New height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Option<String>>,
    /// New weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Option<String>>,
    /// New hair color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<Option<String>>,
    /// New eye color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<Option<String>>,
    /// New last-seen location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_location: Option<Option<String>>,
    /// New last-seen date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_date: Option<NaiveDateTime>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// New lifecycle status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
}

/// Envelope around a saved record, as returned by create and update.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SavedReportEnvelope {
    pub(crate) data: MissingPersonRecord,
}

/// Client for the registry API.
///
/// Owns the transport and the session guard; callers never observe the
/// credential itself.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    guard: Arc<SessionGuard>,
}

impl ApiClient {
    /// Create a client over the given transport and session guard.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, guard: Arc<SessionGuard>) -> Self {
        Self { transport, guard }
    }

    /// The session guard backing this client.
    #[must_use]
    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Register a new account and sign in with it.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthSession> {
        input.validate()?;

        let request = ApiRequest::post("/auth/register").with_json(serde_json::to_value(&input)?);
        let response = self.dispatch(request).await?;
        let session: AuthSession = response.json()?;

        self.guard.set_session(session.access_token.clone()).await?;
        info!(username = %session.user.username, "Registered and signed in");
        Ok(session)
    }

    /// Sign in to an existing account.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthSession> {
        let request = ApiRequest::post("/auth/login").with_json(serde_json::to_value(&input)?);
        let response = self.dispatch(request).await?;
        let session: AuthSession = response.json()?;

        self.guard.set_session(session.access_token.clone()).await?;
        info!(username = %session.user.username, "Signed in");
        Ok(session)
    }

    /// Sign out, destroying the local session.
    pub async fn logout(&self) {
        self.guard.invalidate().await;
    }

    /// Fetch the profile of the signed-in user.
    pub async fn current_user(&self) -> AppResult<Reporter> {
        let response = self.dispatch(ApiRequest::get("/auth/me")).await?;
        Ok(response.json()?)
    }

    /// Fetch one page of reports matching the given criteria.
    pub async fn list_reports(&self, criteria: &FilterCriteria) -> AppResult<ReportPage> {
        let request = ApiRequest::get("/missing-persons").with_query(criteria.to_query_pairs());
        let response = self.dispatch(request).await?;
        Ok(response.json()?)
    }

    /// Fetch a single report by id.
    pub async fn get_report(&self, id: i64) -> AppResult<MissingPersonRecord> {
        let response = self.dispatch(ApiRequest::get(format!("/missing-persons/{id}"))).await?;
        Ok(response.json()?)
    }

    /// Apply a partial update to a report. Reporter-only on the server.
    pub async fn update_report(
        &self,
        id: i64,
        update: ReportUpdate,
    ) -> AppResult<MissingPersonRecord> {
        let request = ApiRequest::put(format!("/missing-persons/{id}"))
            .with_json(serde_json::to_value(&update)?);
        let response = self.dispatch(request).await?;
        let envelope: SavedReportEnvelope = response.json()?;
        Ok(envelope.data)
    }

    /// Delete a report. Reporter-only on the server.
    ///
    /// A failure surfaces one blocking message and changes no local state.
    pub async fn delete_report(&self, id: i64) -> AppResult<()> {
        self.dispatch(ApiRequest::delete(format!("/missing-persons/{id}"))).await?;
        info!(report_id = id, "Report deleted");
        Ok(())
    }

    /// Execute a request and classify any failure.
    ///
    /// Status mapping: 401 invalidates the session and yields an auth
    /// error; 404 yields not-found; any other 4xx yields a validation
    /// error carrying the server message verbatim; everything else is a
    /// network error.
    pub(crate) async fn dispatch(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();

        let response = self.transport.execute(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        let status = response.status;
        let message = error_message(&response);

        let err = match status {
            401 => AppError::Auth(message.unwrap_or_else(|| "Authentication required".to_string())),
            404 => {
                AppError::NotFound(message.unwrap_or_else(|| "Resource not found".to_string()))
            }
            400..=499 => AppError::Validation(
                message.unwrap_or_else(|| format!("Request rejected with status {status}")),
            ),
            _ => AppError::Network(
                message.unwrap_or_else(|| format!("Server failed with status {status}")),
            ),
        };

        if err.is_auth() {
            warn!(method = %method, path = %path, "Server rejected the session credential");
            self.guard.invalidate().await;
        } else if status >= 500 {
            error!(method = %method, path = %path, status = status, "Server error");
        } else {
            debug!(method = %method, path = %path, status = status, code = err.error_code(), "Request rejected");
        }

        Err(err)
    }
}

/// Extract the server-supplied error message from a failure body.
///
/// The server is inconsistent about the key it uses, so the known ones are
/// tried in order of preference.
fn error_message(response: &ApiResponse) -> Option<String> {
    let value: serde_json::Value = response.json().ok()?;
    for key in ["msg", "error", "message"] {
        if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
            return Some(text.to_string());
        }
    }
    None
}
