//! Search criteria and the query controller.
//!
//! The controller owns the current criteria and the latest result set.
//! Every criteria change triggers exactly one fetch, and each new result
//! set replaces the prior one wholesale: nothing is cached, merged, or
//! re-sorted client-side.

use tracing::debug;

use crate::api::ApiClient;
use crate::models::{Gender, MissingPersonRecord, ReportPage, ReportStatus};
use reunite_common::AppResult;

/// Search criteria for the report listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free-text search over names, locations, and descriptions.
    pub search: Option<String>,
    /// Restrict results to one gender.
    pub gender: Option<Gender>,
    /// Lifecycle status to list.
    pub status: ReportStatus,
    /// Page to fetch, 1-based.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: None,
            gender: None,
            status: ReportStatus::Missing,
            page: 1,
            per_page: 20,
        }
    }
}

impl FilterCriteria {
    /// Encode the criteria as query pairs for the listing endpoint.
    ///
    /// A blank search is omitted entirely; status and paging are always
    /// explicit.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("status".to_string(), self.status.to_string())];

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender".to_string(), gender.to_string()));
        }

        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("per_page".to_string(), self.per_page.to_string()));
        pairs
    }
}

/// A change to the current criteria.
///
/// `None` leaves a field unchanged, `Some(None)` clears it,
/// `Some(Some(value))` sets it.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    /// Free-text search.
    pub search: Option<Option<String>>,
    /// Gender restriction.
    pub gender: Option<Option<Gender>>,
    /// Status to list.
    pub status: Option<ReportStatus>,
    /// Page to fetch.
    pub page: Option<u32>,
}

/// Issues one fetch per criteria change and keeps the latest results.
pub struct QueryController {
    criteria: FilterCriteria,
    last: Option<ReportPage>,
}

impl QueryController {
    /// Create a controller with the given starting criteria. No fetch
    /// happens until the first [`refresh`](Self::refresh) or
    /// [`set_filter`](Self::set_filter).
    #[must_use]
    pub const fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            last: None,
        }
    }

    /// The current criteria.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Records from the most recent fetch, in server order.
    #[must_use]
    pub fn results(&self) -> &[MissingPersonRecord] {
        self.last.as_ref().map_or(&[], |page| &page.data)
    }

    /// Pagination envelope of the most recent fetch.
    #[must_use]
    pub const fn last_page(&self) -> Option<&ReportPage> {
        self.last.as_ref()
    }

    /// Apply a change to the criteria and run exactly one fetch for it.
    ///
    /// A filter change restarts paging at page 1 unless the patch sets a
    /// page explicitly.
    pub async fn set_filter(
        &mut self,
        client: &ApiClient,
        patch: FilterPatch,
    ) -> AppResult<&[MissingPersonRecord]> {
        let filter_changed =
            patch.search.is_some() || patch.gender.is_some() || patch.status.is_some();

        if let Some(search) = patch.search {
            self.criteria.search = search;
        }
        if let Some(gender) = patch.gender {
            self.criteria.gender = gender;
        }
        if let Some(status) = patch.status {
            self.criteria.status = status;
        }
        if let Some(page) = patch.page {
            self.criteria.page = page;
        } else if filter_changed {
            self.criteria.page = 1;
        }

        self.refresh(client).await
    }

    /// Re-run the current criteria.
    ///
    /// On success the new result set replaces the prior one wholesale; on
    /// failure the prior results are kept. In-flight fetches are never
    /// cancelled, so racing refreshes may finish out of order and the
    /// slower response wins.
    pub async fn refresh(&mut self, client: &ApiClient) -> AppResult<&[MissingPersonRecord]> {
        debug!(
            status = %self.criteria.status,
            page = self.criteria.page,
            "Fetching reports"
        );

        let page = client.list_reports(&self.criteria).await?;
        self.last = Some(page);
        Ok(self.results())
    }
}
