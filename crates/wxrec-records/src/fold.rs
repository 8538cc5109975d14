//! Shared day fold used by both the day-file and log-file scans
//!
//! Both data paths reduce to an ordered stream of [`DailySummaryRecord`]s.
//! A [`ScopeFolder`] turns that stream into one scope's [`RecordSet`]; a
//! single pass can drive several folders at once.

use crate::spell::SpellTracker;
use crate::RecordsResult;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use wxrec_core::{
    midnight, DailySummaryRecord, DateRange, Metric, RecordSet, ScanSettings, Scope,
};

/// Ordered source of meteorological days
pub trait DaySource {
    fn next_day(&mut self) -> RecordsResult<Option<DailySummaryRecord>>;
}

/// Day rows already held in memory, in date order
pub struct DayRows<'a> {
    rows: std::slice::Iter<'a, DailySummaryRecord>,
}

impl<'a> DayRows<'a> {
    pub fn new(rows: &'a [DailySummaryRecord]) -> Self {
        Self { rows: rows.iter() }
    }
}

impl DaySource for DayRows<'_> {
    fn next_day(&mut self) -> RecordsResult<Option<DailySummaryRecord>> {
        Ok(self.rows.next().cloned())
    }
}

/// What happens to the monthly rain accumulator when the scan ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFlush {
    /// Only flushed when a later month starts; the last month is dropped
    OnTransition,
    /// The still-open month is compared as well
    IncludeTrailing,
}

/// Per-scope fold state
#[derive(Debug, Clone)]
pub struct ScopeFolder {
    scope: Scope,
    range: DateRange,
    records: RecordSet,
    spells: SpellTracker,
    month: Option<(i32, u32)>,
    month_rain: f64,
    last_date: Option<NaiveDate>,
    days: usize,
}

impl ScopeFolder {
    pub fn new(scope: Scope, range: DateRange, settings: &ScanSettings) -> Self {
        Self {
            scope,
            range,
            records: RecordSet::new(),
            spells: SpellTracker::new(settings.wet_day),
            month: None,
            month_rain: 0.0,
            last_date: None,
            days: 0,
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Days folded so far
    pub fn days(&self) -> usize {
        self.days
    }

    pub fn admits(&self, date: NaiveDate) -> bool {
        self.range.contains(date) && self.scope.admits(date)
    }

    pub fn fold(&mut self, day: &DailySummaryRecord) {
        if !self.admits(day.date) {
            return;
        }

        // Calendar-month scopes skip eleven months at a time; a spell must
        // not run from one January into the next.
        if self.scope.calendar_month().is_some() {
            if let Some(last) = self.last_date {
                if day.date != last + Duration::days(1) {
                    self.spells.break_run();
                }
            }
        }
        self.days += 1;

        for (metric, value) in day.extremes() {
            if let Some(value) = value {
                self.records.offer(metric, value.val, value.ts);
            }
        }

        if let Some(low) = day.low_temp {
            self.records.offer(Metric::HighMinTemp, low.val, low.ts);
        }
        if let Some(high) = day.high_temp {
            self.records.offer(Metric::LowMaxTemp, high.val, high.ts);
        }
        if let (Some(high), Some(low)) = (day.high_temp, day.low_temp) {
            let range = high.val - low.val;
            self.records.offer(Metric::HighDailyTempRange, range, day.midnight());
            self.records.offer(Metric::LowDailyTempRange, range, day.midnight());
        }
        if let Some(run) = day.wind_run {
            self.records.offer(Metric::HighWindRun, run, day.midnight());
        }
        if let Some(total) = day.total_rain {
            self.records.offer(Metric::HighDailyRain, total, day.midnight());
        }

        let rain = day.total_rain.unwrap_or(0.0);
        let key = (day.date.year(), day.date.month());
        match self.month {
            Some(current) if current != key => {
                self.flush_month(current);
                self.month = Some(key);
                self.month_rain = 0.0;
            }
            None => self.month = Some(key),
            _ => {}
        }
        self.month_rain += rain;

        self.spells.observe(day.date, rain);
        self.last_date = Some(day.date);
    }

    fn flush_month(&mut self, (year, month): (i32, u32)) {
        if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
            self.records
                .offer(Metric::HighMonthlyRain, self.month_rain, midnight(first));
        }
    }

    pub fn finish(mut self, flush: MonthFlush) -> RecordSet {
        if flush == MonthFlush::IncludeTrailing {
            if let Some(current) = self.month {
                self.flush_month(current);
            }
        }

        let spells = self.spells.finish();
        if let Some(dry) = spells.longest_dry {
            self.records
                .offer(Metric::LongestDryPeriod, f64::from(dry.length), midnight(dry.start));
        }
        if let Some(wet) = spells.longest_wet {
            self.records
                .offer(Metric::LongestWetPeriod, f64::from(wet.length), midnight(wet.start));
        }
        self.records
    }
}

/// Drive every folder from one pass over `source`. Returns the day count.
pub fn fold_source<S>(source: &mut S, folders: &mut [ScopeFolder]) -> RecordsResult<usize>
where
    S: DaySource + ?Sized,
{
    let mut days = 0;
    while let Some(day) = source.next_day()? {
        days += 1;
        for folder in folders.iter_mut() {
            folder.fold(&day);
        }
    }
    Ok(days)
}

/// One folder per scope, ranges resolved against `records_began..=today`
pub fn folders_for(
    scopes: &[Scope],
    records_began: NaiveDate,
    today: NaiveDate,
    settings: &ScanSettings,
) -> Vec<ScopeFolder> {
    scopes
        .iter()
        .map(|scope| ScopeFolder::new(*scope, scope.range(records_began, today), settings))
        .collect()
}

/// Finish every folder that saw at least one day
pub fn finish_all(folders: Vec<ScopeFolder>, flush: MonthFlush) -> BTreeMap<Scope, RecordSet> {
    folders
        .into_iter()
        .filter(|folder| folder.days() > 0)
        .map(|folder| (folder.scope(), folder.finish(flush)))
        .collect()
}
