//! Records straight from the monthly interval logs
//!
//! Rows are rolled into meteorological days by [`LogDaySource`] and then go
//! through the same fold as day summaries. Daily rain is the largest
//! rain-today value seen in the day; the rolling-hour window is fed with
//! rain accumulated over the whole scan so the station's daily counter
//! reset does not look like negative rain. Wind run only counts steps of
//! up to an hour between consecutive rows; a longer step is a hole in the
//! logs and adds nothing.

use crate::fold::{self, DaySource, MonthFlush, ScopeFolder};
use crate::window::RollingHourWindow;
use crate::{RecordsError, RecordsResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};
use wxrec_core::{
    DailySummaryRecord, Extreme, IntervalRecord, RecordSet, ScanSettings, Scope, Timestamp,
};
use wxrec_logs::{months_between, parse_line, LogFileLocator};

/// Longest gap between rows that still counts towards wind run
const MAX_WIND_STEP_SECS: i64 = 3600;

/// Accumulates one meteorological day from interval rows
#[derive(Debug, Clone)]
struct DayBuilder {
    summary: DailySummaryRecord,
    wind_run: f64,
    rain: f64,
}

impl DayBuilder {
    fn new(date: NaiveDate) -> Self {
        Self {
            summary: DailySummaryRecord::new(date),
            wind_run: 0.0,
            rain: 0.0,
        }
    }

    fn date(&self) -> NaiveDate {
        self.summary.date
    }

    fn add(&mut self, row: &IntervalRecord, hours: f64, hourly_rain: f64) {
        use Extreme::{High, Low};

        let ts = row.ts;
        let s = &mut self.summary;
        High.offer(&mut s.high_temp, row.temperature, ts);
        Low.offer(&mut s.low_temp, row.temperature, ts);
        High.offer(&mut s.high_dew_point, row.dew_point, ts);
        Low.offer(&mut s.low_dew_point, row.dew_point, ts);
        High.offer(&mut s.high_humidity, row.humidity, ts);
        Low.offer(&mut s.low_humidity, row.humidity, ts);
        High.offer(&mut s.high_pressure, row.pressure, ts);
        Low.offer(&mut s.low_pressure, row.pressure, ts);
        High.offer(&mut s.high_gust, row.gust, ts);
        High.offer(&mut s.high_wind_speed, row.wind_avg, ts);
        High.offer(&mut s.high_rain_rate, row.rain_rate, ts);
        High.offer(&mut s.high_hourly_rain, hourly_rain, ts);

        if let Some(v) = row.apparent_temp {
            High.offer(&mut s.high_apparent_temp, v, ts);
            Low.offer(&mut s.low_apparent_temp, v, ts);
        }
        if let Some(v) = row.feels_like {
            High.offer(&mut s.high_feels_like, v, ts);
            Low.offer(&mut s.low_feels_like, v, ts);
        }
        if let Some(v) = row.humidex {
            High.offer(&mut s.high_humidex, v, ts);
        }
        if let Some(v) = row.heat_index {
            High.offer(&mut s.high_heat_index, v, ts);
        }
        if let Some(v) = row.wind_chill {
            Low.offer(&mut s.low_wind_chill, v, ts);
        }

        self.wind_run += row.wind_avg * hours;
        self.rain = self.rain.max(row.rain_today);
    }

    fn finish(mut self) -> DailySummaryRecord {
        self.summary.total_rain = Some(self.rain);
        self.summary.wind_run = Some(self.wind_run);
        self.summary
    }
}

struct OpenLog {
    path: PathBuf,
    reader: BufReader<File>,
    line_number: usize,
}

/// Day source over the monthly log files between two instants
pub struct LogDaySource<'a, L: ?Sized> {
    locator: &'a L,
    months: std::vec::IntoIter<NaiveDate>,
    open: Option<OpenLog>,
    start: Timestamp,
    now: Timestamp,
    settings: ScanSettings,
    day: Option<DayBuilder>,
    window: RollingHourWindow,
    rain_before_today: f64,
    last_ts: Option<Timestamp>,
    rows: usize,
    rejected: usize,
}

impl<'a, L> LogDaySource<'a, L>
where
    L: LogFileLocator + ?Sized,
{
    pub fn new(locator: &'a L, start: Timestamp, now: Timestamp, settings: ScanSettings) -> Self {
        Self {
            locator,
            months: months_between(start.date(), now.date()).into_iter(),
            open: None,
            start,
            now,
            settings,
            day: None,
            window: RollingHourWindow::new(),
            rain_before_today: 0.0,
            last_ts: None,
            rows: 0,
            rejected: 0,
        }
    }

    /// Rows folded so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Malformed lines skipped so far
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Next in-range row, moving through the monthly files as needed
    fn next_row(&mut self) -> RecordsResult<Option<IntervalRecord>> {
        loop {
            if self.open.is_none() {
                let Some(month) = self.months.next() else {
                    return Ok(None);
                };
                self.open = self.open_month(month)?;
                if self.open.is_none() {
                    self.last_ts = None;
                }
                continue;
            }
            let Some(log) = self.open.as_mut() else {
                continue;
            };

            let mut raw = Vec::new();
            match log.reader.read_until(b'\n', &mut raw) {
                Ok(0) => {
                    debug!("Finished {} after {} lines", log.path.display(), log.line_number);
                    self.open = None;
                    continue;
                }
                Ok(_) => {}
                Err(source) => {
                    return Err(RecordsError::Io {
                        path: log.path.clone(),
                        source,
                    })
                }
            }
            log.line_number += 1;

            let Ok(line) = String::from_utf8(raw) else {
                warn!(
                    "Skipping undecodable log line {}:{}",
                    log.path.display(),
                    log.line_number
                );
                self.rejected += 1;
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }

            match parse_line(&line, &log.path, log.line_number) {
                Ok(row) if row.ts < self.start || row.ts > self.now => continue,
                Ok(row) => return Ok(Some(row)),
                Err(e) => {
                    warn!("Skipping malformed log line: {}", e);
                    self.rejected += 1;
                }
            }
        }
    }

    fn open_month(&self, month: NaiveDate) -> RecordsResult<Option<OpenLog>> {
        let path = self.locator.locate(month);
        match File::open(&path) {
            Ok(file) => {
                debug!("Reading {}", path.display());
                Ok(Some(OpenLog {
                    path,
                    reader: BufReader::new(file),
                    line_number: 0,
                }))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Log file {} not found, skipping month", path.display());
                Ok(None)
            }
            Err(source) => Err(RecordsError::Io { path, source }),
        }
    }

    fn fold_row(&mut self, row: &IntervalRecord, date: NaiveDate) {
        let hours = self
            .last_ts
            .map(|prev| (row.ts - prev).num_seconds())
            .filter(|secs| (0..=MAX_WIND_STEP_SECS).contains(secs))
            .map_or(0.0, |secs| secs as f64 / 3600.0);
        self.last_ts = Some(row.ts);

        self.window.append(row.ts, self.rain_before_today + row.rain_today);
        self.window.evict(row.ts);
        let hourly = self.window.current_delta();

        self.day
            .get_or_insert_with(|| DayBuilder::new(date))
            .add(row, hours, hourly);
        self.rows += 1;
    }
}

impl<L> DaySource for LogDaySource<'_, L>
where
    L: LogFileLocator + ?Sized,
{
    fn next_day(&mut self) -> RecordsResult<Option<DailySummaryRecord>> {
        while let Some(row) = self.next_row()? {
            let date = self.settings.met_date(row.ts);
            let boundary = self.day.as_ref().map_or(false, |day| day.date() != date);
            let finished = if boundary { self.day.take() } else { None };
            if let Some(done) = &finished {
                self.rain_before_today += done.rain;
            }
            self.fold_row(&row, date);
            if let Some(done) = finished {
                return Ok(Some(done.finish()));
            }
        }
        Ok(self.day.take().map(DayBuilder::finish))
    }
}

/// Aggregate one scope from the logs. `start` is the first meteorological
/// day the scan may read (normally when records began).
#[instrument(skip(locator, settings))]
pub fn aggregate<L>(
    scope: Scope,
    start: NaiveDate,
    now: Timestamp,
    locator: &L,
    settings: &ScanSettings,
) -> RecordsResult<RecordSet>
where
    L: LogFileLocator + ?Sized,
{
    let range = scope.range(start, settings.met_date(now));
    let mut folder = ScopeFolder::new(scope, range, settings);
    let mut source = LogDaySource::new(locator, settings.day_start(range.start), now, *settings);
    fold::fold_source(&mut source, std::slice::from_mut(&mut folder))?;

    if folder.days() == 0 {
        return Err(RecordsError::NoData(scope));
    }
    info!(
        "Aggregated {} days ({} rows, {} rejected) for {}",
        folder.days(),
        source.rows(),
        source.rejected(),
        scope
    );
    Ok(folder.finish(MonthFlush::IncludeTrailing))
}

/// Aggregate every scope in one pass over the logs
#[instrument(skip(locator, settings))]
pub fn aggregate_all<L>(
    start: NaiveDate,
    now: Timestamp,
    locator: &L,
    settings: &ScanSettings,
) -> RecordsResult<BTreeMap<Scope, RecordSet>>
where
    L: LogFileLocator + ?Sized,
{
    let today = settings.met_date(now);
    let mut folders = fold::folders_for(&Scope::all(), start, today, settings);
    let mut source = LogDaySource::new(locator, settings.day_start(start), now, *settings);
    let days = fold::fold_source(&mut source, &mut folders)?;

    let sets = fold::finish_all(folders, MonthFlush::IncludeTrailing);
    if sets.is_empty() {
        return Err(RecordsError::NoData(Scope::AllTime));
    }
    info!(
        "Aggregated {} scopes from {} days ({} rows, {} rejected)",
        sets.len(),
        days,
        source.rows(),
        source.rejected()
    );
    Ok(sets)
}

/// Rebuild day summaries from the logs, e.g. to repair a day file
pub fn day_summaries<L>(
    start: NaiveDate,
    now: Timestamp,
    locator: &L,
    settings: &ScanSettings,
) -> RecordsResult<Vec<DailySummaryRecord>>
where
    L: LogFileLocator + ?Sized,
{
    let mut source = LogDaySource::new(locator, settings.day_start(start), now, *settings);
    let mut days = Vec::new();
    while let Some(day) = source.next_day()? {
        days.push(day);
    }
    Ok(days)
}
