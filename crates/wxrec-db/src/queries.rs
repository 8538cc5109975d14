//! Queries against the `dayfile` table

use crate::schema::DayFileRow;
use crate::{DbClient, DbResult};
use chrono::NaiveDate;
use sqlx::Row;
use tracing::{debug, instrument};
use wxrec_core::{DailySummaryRecord, DateRange, DaySummaryStore};

const DAY_RANGE_QUERY: &str = r#"
    SELECT * FROM dayfile
    WHERE log_date >= ? AND log_date <= ?
    ORDER BY log_date ASC
"#;

impl DbClient {
    /// Day rows within an inclusive date range, oldest first
    #[instrument(skip(self))]
    pub async fn get_day_rows(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<DayFileRow>> {
        let rows = sqlx::query_as::<_, DayFileRow>(DAY_RANGE_QUERY)
            .bind(start)
            .bind(end)
            .fetch_all(self.pool())
            .await?;

        debug!("Retrieved {} day rows between {} and {}", rows.len(), start, end);
        Ok(rows)
    }

    pub async fn get_day_summaries(&self, range: DateRange) -> DbResult<Vec<DailySummaryRecord>> {
        let rows = self.get_day_rows(range.start, range.end).await?;
        Ok(rows.into_iter().map(DailySummaryRecord::from).collect())
    }

    /// Earliest day in the table, if any
    #[instrument(skip(self))]
    pub async fn first_day(&self) -> DbResult<Option<NaiveDate>> {
        let row = sqlx::query("SELECT MIN(log_date) AS first FROM dayfile")
            .fetch_one(self.pool())
            .await?;

        Ok(row.try_get("first")?)
    }

    #[instrument(skip(self))]
    pub async fn count_days(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM dayfile")
            .fetch_one(self.pool())
            .await?;

        Ok(row.try_get("count")?)
    }
}

#[async_trait::async_trait]
impl DaySummaryStore for DbClient {
    async fn day_summaries(&self, range: DateRange) -> anyhow::Result<Vec<DailySummaryRecord>> {
        Ok(self.get_day_summaries(range).await?)
    }
}
