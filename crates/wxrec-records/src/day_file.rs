//! Records from the day summary store
//!
//! The trailing month's rain is never compared against the monthly record
//! here; only a month transition flushes it. The log-file scan does flush
//! it, so the two paths can disagree on `highMonthlyRain` for the current
//! month.

use crate::fold::{self, DayRows, MonthFlush, ScopeFolder};
use crate::{RecordsError, RecordsResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};
use wxrec_core::{DailySummaryRecord, DateRange, DaySummaryStore, RecordSet, ScanSettings, Scope};

/// Aggregate one scope from day rows ordered by date
#[instrument(skip(rows, settings), fields(rows = rows.len()))]
pub fn aggregate(
    scope: Scope,
    range: DateRange,
    rows: &[DailySummaryRecord],
    settings: &ScanSettings,
) -> RecordsResult<RecordSet> {
    if rows.is_empty() {
        debug!("No day summaries for {}", scope);
        return Err(RecordsError::NoData(scope));
    }

    let mut folder = ScopeFolder::new(scope, range, settings);
    fold::fold_source(&mut DayRows::new(rows), std::slice::from_mut(&mut folder))?;
    if folder.days() == 0 {
        return Err(RecordsError::NoData(scope));
    }

    info!("Aggregated {} days for {}", folder.days(), scope);
    Ok(folder.finish(MonthFlush::OnTransition))
}

/// Query the store for `range` and aggregate the result
#[instrument(skip(store, settings))]
pub async fn aggregate_from_store<S>(
    store: &S,
    scope: Scope,
    range: DateRange,
    settings: &ScanSettings,
) -> RecordsResult<RecordSet>
where
    S: DaySummaryStore + ?Sized,
{
    let rows = store.day_summaries(range).await?;
    aggregate(scope, range, &rows, settings)
}

/// Aggregate every scope in one pass over `rows`
#[instrument(skip(rows, settings), fields(rows = rows.len()))]
pub fn aggregate_all(
    rows: &[DailySummaryRecord],
    records_began: NaiveDate,
    today: NaiveDate,
    settings: &ScanSettings,
) -> RecordsResult<BTreeMap<Scope, RecordSet>> {
    if rows.is_empty() {
        return Err(RecordsError::NoData(Scope::AllTime));
    }

    let mut folders = fold::folders_for(&Scope::all(), records_began, today, settings);
    let days = fold::fold_source(&mut DayRows::new(rows), &mut folders)?;
    let sets = fold::finish_all(folders, MonthFlush::OnTransition);
    if sets.is_empty() {
        return Err(RecordsError::NoData(Scope::AllTime));
    }

    info!("Aggregated {} scopes from {} day summaries", sets.len(), days);
    Ok(sets)
}

/// Fetch `records_began..=today` from the store and aggregate every scope
pub async fn aggregate_all_from_store<S>(
    store: &S,
    records_began: NaiveDate,
    today: NaiveDate,
    settings: &ScanSettings,
) -> RecordsResult<BTreeMap<Scope, RecordSet>>
where
    S: DaySummaryStore + ?Sized,
{
    let rows = store
        .day_summaries(DateRange::new(records_began, today))
        .await?;
    aggregate_all(&rows, records_began, today, settings)
}
