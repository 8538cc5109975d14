use anyhow::Result;

use crate::{DailySummaryRecord, DateRange};

/// Read access to the day summary store.
///
/// Rows must come back ordered by date ascending.
#[async_trait::async_trait]
pub trait DaySummaryStore: Send + Sync {
    async fn day_summaries(&self, range: DateRange) -> Result<Vec<DailySummaryRecord>>;
}

/// In-memory store, handy for tests and for replaying exported day files
#[async_trait::async_trait]
impl DaySummaryStore for Vec<DailySummaryRecord> {
    async fn day_summaries(&self, range: DateRange) -> Result<Vec<DailySummaryRecord>> {
        let mut rows: Vec<_> = self
            .iter()
            .filter(|row| range.contains(row.date))
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.date);
        Ok(rows)
    }
}
