//! Date-bucketed aggregation for the dashboard statistics views.

use chrono::{DateTime, Datelike, Duration, Utc};

use super::records::ReconciledVisitor;

/// Counts produced by [`aggregate`]: three independent views over one pass
/// of the reconciled records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorStatistics {
    /// Visits in the current week (Monday start), bucketed by day of week
    /// with Monday at index 0 and Sunday at index 6.
    pub weekly: [u64; 7],
    /// Visits in `selected_year`, bucketed by month (January at index 0).
    pub monthly: [u64; 12],
    /// Total visits in `selected_year`. Always the sum of `monthly`, never
    /// a separately fetched count, so the displayed total always equals
    /// the sum of the displayed per-month bars.
    pub total_for_year: u64,
    /// Visits whose month and year equal `reference_now`'s.
    pub current_month: u64,
    /// The year the monthly view was computed for.
    pub selected_year: i32,
}

/// Buckets reconciled records by day-of-week, by month of `selected_year`,
/// and by calendar-month-to-date.
///
/// Each record is bucketed by its resolved visit instant (visit date, with
/// fallback to the creation instant). Records with no resolvable instant
/// are skipped in every view, not counted as zero in every bucket. All
/// calendar boundaries are evaluated in UTC.
#[must_use]
pub fn aggregate(
    records: &[ReconciledVisitor],
    reference_now: DateTime<Utc>,
    selected_year: i32,
) -> VisitorStatistics {
    let mut weekly = [0u64; 7];
    let mut monthly = [0u64; 12];
    let mut current_month = 0u64;

    let today = reference_now.date_naive();
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let week_start = week_start.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    // End of the reference day, expressed as an exclusive next-midnight bound.
    let week_end = (today + Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();

    for record in records {
        let Some(instant) = record.resolved_visit_instant() else {
            continue;
        };

        if instant >= week_start && instant < week_end {
            // The source convention numbers days from Sunday=0; shift to a
            // Monday=0 layout: Sunday lands in the last bucket.
            let dow = instant.weekday().num_days_from_sunday();
            let index = if dow == 0 { 6 } else { (dow - 1) as usize };
            if let Some(slot) = weekly.get_mut(index) {
                *slot += 1;
            }
        }

        if instant.year() == selected_year
            && let Some(slot) = monthly.get_mut(instant.month0() as usize)
        {
            *slot += 1;
        }

        if instant.year() == reference_now.year() && instant.month() == reference_now.month() {
            current_month += 1;
        }
    }

    VisitorStatistics {
        weekly,
        monthly,
        total_for_year: monthly.iter().sum(),
        current_month,
        selected_year,
    }
}
