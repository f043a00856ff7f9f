//! The submission pipeline.
//!
//! Drives a draft through validation, serialization, and a single
//! transport invocation, recording the outcome as an explicit state.
//! There are no automatic retries and no partial submissions: a failed
//! attempt is terminal, and retrying means submitting again explicitly.

use tracing::{debug, info};
use validator::Validate;

use crate::api::{ApiClient, SavedReportEnvelope};
use crate::draft::{DraftReport, RelativeDraft};
use crate::models::MissingPersonRecord;
use crate::transport::{ApiRequest, MultipartPayload};
use reunite_common::{AppError, AppResult};

/// Observable state of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitState {
    /// Not yet started.
    Idle,
    /// Checking the draft and session before any I/O.
    Validating,
    /// Building the transport payload.
    Serializing,
    /// Awaiting the single transport invocation.
    Sending,
    /// The server confirmed the record.
    Succeeded(MissingPersonRecord),
    /// The attempt failed. Terminal for this attempt; the draft remains
    /// editable for an explicit retry.
    Failed(AppError),
}

/// A draft moving through the submission pipeline.
///
/// Holding the draft by value makes double-submission impossible while an
/// attempt is in flight: `submit` takes `&mut self`.
#[derive(Debug)]
pub struct Submission {
    draft: DraftReport,
    state: SubmitState,
}

impl Submission {
    /// Wrap a draft for submission.
    #[must_use]
    pub const fn new(draft: DraftReport) -> Self {
        Self {
            draft,
            state: SubmitState::Idle,
        }
    }

    /// Current pipeline state.
    #[must_use]
    pub const fn state(&self) -> &SubmitState {
        &self.state
    }

    /// The wrapped draft.
    #[must_use]
    pub const fn draft(&self) -> &DraftReport {
        &self.draft
    }

    /// Mutable access to the draft, for edits between attempts.
    pub fn draft_mut(&mut self) -> &mut DraftReport {
        &mut self.draft
    }

    /// Run the pipeline: validate, serialize, send once.
    ///
    /// On success the server-confirmed record is returned and the local
    /// photo bytes are discarded, since ownership of the stored images
    /// has passed to the backend. A submission that already succeeded
    /// refuses to run again.
    pub async fn submit(&mut self, client: &ApiClient) -> AppResult<MissingPersonRecord> {
        if matches!(self.state, SubmitState::Succeeded(_)) {
            return Err(AppError::Validation("Report already submitted".to_string()));
        }

        self.state = SubmitState::Validating;

        if let Err(err) = self.draft.validate() {
            return Err(self.fail(err.into()));
        }

        if !client.guard().has_credential().await {
            return Err(self.fail(AppError::Auth(
                "Sign in to report a missing person".to_string(),
            )));
        }

        self.state = SubmitState::Serializing;
        let payload = match build_payload(&self.draft) {
            Ok(payload) => payload,
            Err(err) => return Err(self.fail(err)),
        };

        self.state = SubmitState::Sending;
        debug!(
            full_name = %self.draft.full_name,
            photos = payload.files.len(),
            "Submitting report"
        );

        let outcome = match client
            .dispatch(ApiRequest::post("/missing-persons").with_multipart(payload))
            .await
        {
            Ok(response) => response
                .json::<SavedReportEnvelope>()
                .map(|envelope| envelope.data)
                .map_err(AppError::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(record) => {
                self.draft.clear_photos();
                info!(report_id = record.id, "Report submitted");
                self.state = SubmitState::Succeeded(record.clone());
                Ok(record)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: AppError) -> AppError {
        self.state = SubmitState::Failed(err.clone());
        err
    }
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build the multipart payload for a draft.
///
/// Pure over the draft: optional scalars are included only when present
/// and non-blank (omitted entirely, never sent as empty strings), filled
/// relatives are encoded as one `relatives` JSON array part (always
/// present, `[]` when none are filled), and photos become repeated binary
/// parts under the shared `photos` field in append order.
pub fn build_payload(draft: &DraftReport) -> AppResult<MultipartPayload> {
    let mut payload = MultipartPayload::default();

    payload.text("full_name", draft.full_name.trim());

    if let Some(age) = draft.age {
        payload.text("age", age.to_string());
    }
    if let Some(gender) = draft.gender {
        payload.text("gender", gender.to_string());
    }
    if let Some(height) = draft.height {
        payload.text("height", height.to_string());
    }
    if let Some(weight) = draft.weight {
        payload.text("weight", weight.to_string());
    }
    if let Some(hair_color) = filled(draft.hair_color.as_deref()) {
        payload.text("hair_color", hair_color);
    }
    if let Some(eye_color) = filled(draft.eye_color.as_deref()) {
        payload.text("eye_color", eye_color);
    }
    if let Some(location) = filled(draft.last_seen_location.as_deref()) {
        payload.text("last_seen_location", location);
    }
    if let Some(date) = draft.last_seen_date {
        payload.text("last_seen_date", date.format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    if let Some(description) = filled(draft.description.as_deref()) {
        payload.text("description", description);
    }

    let relatives: Vec<&RelativeDraft> =
        draft.relatives().iter().filter(|r| r.is_filled()).collect();
    let relatives_json = serde_json::to_string(&relatives)
        .map_err(|e| AppError::Validation(format!("Relatives could not be encoded: {e}")))?;
    payload.text("relatives", relatives_json);

    for photo in draft.photos() {
        payload.file(
            "photos",
            photo.file_name.clone(),
            photo.content_type.clone(),
            photo.data.clone(),
        );
    }

    Ok(payload)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::draft::PhotoAttachment;
    use crate::models::Gender;
    use crate::test_utils::MockTransport;
    use bytes::Bytes;
    use reunite_common::{MemorySessionStore, SessionGuard};
    use serde_json::json;
    use std::sync::Arc;

    async fn client_with(transport: Arc<MockTransport>) -> ApiClient {
        let guard = Arc::new(
            SessionGuard::new(Box::new(MemorySessionStore::new())).await.unwrap(),
        );
        ApiClient::new(transport, guard)
    }

    fn named_draft() -> DraftReport {
        let mut draft = DraftReport::new();
        draft.full_name = "Jane Doe".to_string();
        draft
    }

    fn saved_response(id: i64) -> serde_json::Value {
        json!({
            "message": "Missing person added successfully",
            "data": {
                "id": id,
                "full_name": "Jane Doe",
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
                "reporter": null,
                "photos": [],
                "relatives": [],
                "created_at": "2024-03-02T12:00:00",
                "updated_at": "2024-03-02T12:00:00"
            }
        })
    }

    #[test]
    fn test_blank_optionals_are_omitted() {
        let mut draft = named_draft();
        draft.age = None;
        draft.hair_color = Some(String::new());
        draft.description = Some("   ".to_string());
        draft.last_seen_location = Some("Riverside Park".to_string());

        let payload = build_payload(&draft).unwrap();
        assert_eq!(payload.field("full_name"), Some("Jane Doe"));
        assert_eq!(payload.field("age"), None);
        assert_eq!(payload.field("hair_color"), None);
        assert_eq!(payload.field("description"), None);
        assert_eq!(payload.field("last_seen_location"), Some("Riverside Park"));
    }

    #[test]
    fn test_present_scalars_are_encoded() {
        let mut draft = named_draft();
        draft.age = Some(34);
        draft.gender = Some(Gender::Female);
        draft.height = Some(170.0);
        draft.weight = Some(62.5);
        draft.last_seen_date =
            Some(chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap().and_hms_opt(0, 0, 0).unwrap());

        let payload = build_payload(&draft).unwrap();
        assert_eq!(payload.field("age"), Some("34"));
        assert_eq!(payload.field("gender"), Some("Female"));
        assert_eq!(payload.field("height"), Some("170"));
        assert_eq!(payload.field("weight"), Some("62.5"));
        assert_eq!(payload.field("last_seen_date"), Some("2024-03-02T00:00:00"));
    }

    #[test]
    fn test_unfilled_relatives_are_dropped() {
        let mut draft = named_draft();
        draft.relative_mut(0).unwrap().name = "Amy".to_string();
        draft.relative_mut(0).unwrap().relationship = "sister".to_string();
        let blank = draft.add_relative();
        blank.phone = "555-0100".to_string();

        let payload = build_payload(&draft).unwrap();
        let relatives: Vec<serde_json::Value> =
            serde_json::from_str(payload.field("relatives").unwrap()).unwrap();
        assert_eq!(relatives.len(), 1);
        assert_eq!(relatives[0]["name"], "Amy");
        assert_eq!(relatives[0]["relationship"], "sister");
    }

    #[test]
    fn test_relatives_part_present_even_when_empty() {
        let draft = named_draft();
        let payload = build_payload(&draft).unwrap();
        assert_eq!(payload.field("relatives"), Some("[]"));
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let mut draft = named_draft();
        draft.relative_mut(0).unwrap().name = "Amy".to_string();
        draft.add_relative();

        let first = build_payload(&draft).unwrap();
        let second = build_payload(&draft).unwrap();
        assert_eq!(first.field("relatives"), second.field("relatives"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_photos_keep_append_order_under_shared_field() {
        let mut draft = named_draft();
        for name in ["a.jpg", "b.png", "c.jpg"] {
            let content_type = if name.ends_with(".png") { "image/png" } else { "image/jpeg" };
            draft.add_photo(PhotoAttachment::new(name, content_type, Bytes::from_static(b"x")));
        }

        let payload = build_payload(&draft).unwrap();
        let names: Vec<_> = payload.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["a.jpg", "b.png", "c.jpg"]);
        assert!(payload.files.iter().all(|f| f.field == "photos"));
    }

    #[tokio::test]
    async fn test_submit_without_credential_fails_before_transport() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(Arc::clone(&transport)).await;

        let mut submission = Submission::new(named_draft());
        let err = submission.submit(&client).await.unwrap_err();

        assert!(err.is_auth());
        assert_eq!(transport.request_count().await, 0);
        assert!(matches!(submission.state(), SubmitState::Failed(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_submit_blank_name_fails_before_transport() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(Arc::clone(&transport)).await;
        client.guard().set_session("tok".to_string()).await.unwrap();

        let mut submission = Submission::new(DraftReport::new());
        let err = submission.submit(&client).await.unwrap_err();

        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(transport.request_count().await, 0);
        assert!(matches!(submission.state(), SubmitState::Failed(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_successful_submit_carries_confirmed_identity() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_with(201, saved_response(42)).await;

        let client = client_with(Arc::clone(&transport)).await;
        client.guard().set_session("tok".to_string()).await.unwrap();

        let mut draft = named_draft();
        draft.add_photo(PhotoAttachment::new("a.jpg", "image/jpeg", Bytes::from_static(b"a")));
        let mut submission = Submission::new(draft);

        let record = submission.submit(&client).await.unwrap();
        assert_eq!(record.id, 42);

        // Credential untouched, photo bytes released.
        assert_eq!(client.guard().bearer().await, Some("tok".to_string()));
        assert!(submission.draft().photos().is_empty());
        match submission.state() {
            SubmitState::Succeeded(saved) => assert_eq!(saved.id, 42),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_completed_submission_refuses_rerun() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_with(201, saved_response(42)).await;

        let client = client_with(Arc::clone(&transport)).await;
        client.guard().set_session("tok".to_string()).await.unwrap();

        let mut submission = Submission::new(named_draft());
        submission.submit(&client).await.unwrap();

        let err = submission.submit(&client).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(transport.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_rejected_credential_invalidates_session() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_with(401, json!({"msg": "Token has expired"})).await;

        let client = client_with(Arc::clone(&transport)).await;
        client.guard().set_session("stale".to_string()).await.unwrap();

        let mut submission = Submission::new(named_draft());
        let err = submission.submit(&client).await.unwrap_err();

        assert_eq!(err, AppError::Auth("Token has expired".to_string()));
        assert!(!client.guard().has_credential().await);
    }

    #[tokio::test]
    async fn test_failed_attempt_can_be_retried() {
        let transport = Arc::new(MockTransport::new());
        transport.fail_with("connection refused").await;
        transport.respond_with(201, saved_response(7)).await;

        let client = client_with(Arc::clone(&transport)).await;
        client.guard().set_session("tok".to_string()).await.unwrap();

        let mut submission = Submission::new(named_draft());

        let err = submission.submit(&client).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(submission.state(), SubmitState::Failed(AppError::Network(_))));

        let record = submission.submit(&client).await.unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(transport.request_count().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_conflict_is_validation_kind() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond_with(
                409,
                json!({
                    "message": "Person already added. Detected duplicate entry.",
                    "existing_id": 12
                }),
            )
            .await;

        let client = client_with(Arc::clone(&transport)).await;
        client.guard().set_session("tok".to_string()).await.unwrap();

        let mut submission = Submission::new(named_draft());
        let err = submission.submit(&client).await.unwrap_err();

        assert_eq!(
            err,
            AppError::Validation("Person already added. Detected duplicate entry.".to_string())
        );
        assert!(client.guard().has_credential().await);
    }
}
