//! Client core for the reunite missing-person registry.
//!
//! This crate implements everything between user intent and the registry
//! server:
//!
//! - **Drafts**: [`DraftReport`] with photo and relative sub-collections
//! - **Submission**: [`Submission`] pipeline from a draft to a confirmed record
//! - **Queries**: [`QueryController`] issuing one fetch per criteria change
//! - **Partitioning**: [`partition_reports`] grouping one fetch for display
//! - **Transport**: the [`Transport`] seam with an HTTP implementation
//!
//! All server interaction goes through [`ApiClient`], which classifies
//! failures into the four [`reunite_common::AppError`] kinds and tears
//! down the session credential when the server rejects it.

pub mod api;
pub mod draft;
pub mod models;
pub mod partition;
pub mod query;
pub mod submit;
pub mod test_utils;
pub mod transport;

pub use api::{ApiClient, LoginInput, RegisterInput, ReportUpdate};
pub use draft::{DraftReport, PhotoAttachment, RelativeDraft};
pub use models::{
    AuthSession, Gender, MissingPersonRecord, PhotoRecord, RelativeRecord, ReportPage,
    ReportStatus, Reporter,
};
pub use partition::{
    DASHBOARD_PAGE_SIZE, PartitionedReports, RECENT_REPORTS_CAP, partition_reports,
};
pub use query::{FilterCriteria, FilterPatch, QueryController};
pub use submit::{Submission, SubmitState, build_payload};
pub use transport::{
    ApiRequest, ApiResponse, FilePart, HttpTransport, Method, MultipartPayload, RequestBody,
    Transport, TransportError,
};
