//! Display grouping for fetched reports.

use crate::models::MissingPersonRecord;

/// How many records the recent strip shows.
pub const RECENT_REPORTS_CAP: usize = 6;

/// Page size the dashboard fetches.
pub const DASHBOARD_PAGE_SIZE: u32 = 10;

/// One fetch result grouped for display.
///
/// Both groups borrow from the same fetch; records filed by the current
/// user appear in both when they fall inside the recent cap.
#[derive(Debug, PartialEq)]
pub struct PartitionedReports<'a> {
    /// Reports filed by the current user, in server order.
    pub mine: Vec<&'a MissingPersonRecord>,
    /// Leading records of the fetch regardless of who filed them.
    pub recent: &'a [MissingPersonRecord],
}

/// Group one fetch result into the current user's reports and a capped
/// recent slice.
///
/// Purely a projection: no second query, no re-sorting. A record whose
/// reporter is gone never counts as the current user's.
#[must_use]
pub fn partition_reports(
    records: &[MissingPersonRecord],
    current_user_id: i64,
    recent_cap: usize,
) -> PartitionedReports<'_> {
    let mine = records
        .iter()
        .filter(|record| {
            record
                .reporter
                .as_ref()
                .is_some_and(|reporter| reporter.id == current_user_id)
        })
        .collect();

    let recent = &records[..records.len().min(recent_cap)];

    PartitionedReports { mine, recent }
}
