//! Day-file and log-file scans over the same history

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use wxrec_core::{
    midnight, DailySummaryRecord, Metric, RecordValue, ScanSettings, Scope, Timestamp, UnitSystem,
};
use wxrec_logs::MonthlyLogLocator;
use wxrec_records::{day_file, log_file};

const DAYS: i64 = 75;
const SLOTS: i64 = 48;

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn settings() -> ScanSettings {
    ScanSettings::new(UnitSystem::Metric, 9).unwrap()
}

/// Deterministic pseudo-weather, one row per half hour from 09:00
fn write_history(dir: &Path) -> Timestamp {
    let settings = settings();
    let mut files: BTreeMap<String, String> = BTreeMap::new();
    let mut last = settings.day_start(first_day());

    for day in 0..DAYS {
        let date = first_day() + Duration::days(day);
        let wet = day % 5 == 1 || day % 11 == 3;
        for slot in 0..SLOTS {
            let ts = settings.day_start(date) + Duration::minutes(30 * slot);
            let temp = ((day * 7 + slot * 13) % 23) as f64 * 0.5 - 3.0;
            let hum = 50 + (day * 3 + slot) % 45;
            let wind = ((day + slot * 5) % 17) as f64 * 0.5;
            let gust = wind + ((slot * 3) % 7) as f64;
            let rain_today = if wet { (slot / 6) as f64 * 0.4 } else { 0.0 };
            let rate = if wet && slot % 6 == 0 { 2.4 } else { 0.0 };
            let pressure = 1000.0 + ((day * 11 + slot) % 37) as f64 * 0.7;

            let name = MonthlyLogLocator::file_name(ts.date());
            let body = files.entry(name).or_default();
            writeln!(
                body,
                "{},{},{:.1},{},{:.1},{:.1},{:.1},200,{:.1},{:.1},{:.1},0.0,20.0,45,{:.1},{:.1},{:.1},0,0,0,0,{:.1},0,0,200,0,0,{:.1},{:.1}",
                ts.format("%d/%m/%y"),
                ts.format("%H:%M"),
                temp,
                hum,
                temp - 4.0,
                wind,
                gust,
                rate,
                rain_today,
                pressure,
                gust,
                temp - wind * 0.3,
                temp + 0.5,
                temp - 1.0,
                temp - 0.8,
                temp + 1.2,
            )
            .unwrap();
            last = ts;
        }
    }

    for (name, body) in files {
        fs::write(dir.join(name), body).unwrap();
    }
    last
}

#[test]
fn rebuilt_day_file_reproduces_log_records() {
    let dir = tempfile::tempdir().unwrap();
    let now = write_history(dir.path());
    let locator = MonthlyLogLocator::new(dir.path());
    let settings = settings();

    let from_logs = log_file::aggregate_all(first_day(), now, &locator, &settings).unwrap();
    let rows = log_file::day_summaries(first_day(), now, &locator, &settings).unwrap();
    assert_eq!(rows.len() as i64, DAYS);

    let today = settings.met_date(now);
    let from_days = day_file::aggregate_all(&rows, first_day(), today, &settings).unwrap();

    assert_eq!(
        from_logs.keys().collect::<Vec<_>>(),
        from_days.keys().collect::<Vec<_>>()
    );
    for (scope, log_set) in &from_logs {
        let day_set = &from_days[scope];
        for metric in Metric::all() {
            if metric == Metric::HighMonthlyRain {
                continue;
            }
            assert_eq!(
                log_set.get(metric),
                day_set.get(metric),
                "{} differs for {}",
                metric.name(),
                scope
            );
        }
    }

    // The log path also closes March; the day path never sees it
    let march = midnight(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    let log_monthly = from_logs[&Scope::ThisMonth].get(Metric::HighMonthlyRain);
    assert_eq!(log_monthly.map(|v| v.ts), Some(march));
    assert!(from_days[&Scope::ThisMonth].get(Metric::HighMonthlyRain).is_none());
}

#[test]
fn high_temp_is_an_upper_bound_with_earliest_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let now = write_history(dir.path());
    let locator = MonthlyLogLocator::new(dir.path());
    let settings = settings();

    let rows = log_file::day_summaries(first_day(), now, &locator, &settings).unwrap();
    let set = log_file::aggregate(Scope::AllTime, first_day(), now, &locator, &settings).unwrap();
    let high = set.get(Metric::HighTemp).copied().unwrap();

    let highs: Vec<RecordValue> = rows.iter().filter_map(|r| r.high_temp).collect();
    assert!(highs.iter().all(|h| h.val <= high.val));
    let earliest = highs
        .iter()
        .filter(|h| h.val == high.val)
        .map(|h| h.ts)
        .min()
        .unwrap();
    assert_eq!(high.ts, earliest);
}

#[test]
fn rescans_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let now = write_history(dir.path());
    let locator = MonthlyLogLocator::new(dir.path());
    let settings = settings();

    let first = log_file::aggregate_all(first_day(), now, &locator, &settings).unwrap();
    let second = log_file::aggregate_all(first_day(), now, &locator, &settings).unwrap();
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first[&Scope::AllTime]).unwrap();
    let second_json = serde_json::to_string(&second[&Scope::AllTime]).unwrap();
    assert_eq!(first_json, second_json);
}

/// Three meteorological days (09:00 rollover) straddling the Jan/Feb file
/// boundary. Columns up to pressure, then the comfort indices at their
/// ordinals: wind chill 15, heat index 16, apparent 21, feels like 27,
/// humidex 28.
const JAN_LOG: &str = "\
30/01/24,23:30,5.0,80,2.0,2.0,6.0,180,0.0,0.0,1010.0,0,20,50,0,4.0,5.0,0,0,0,0,3.0,0,0,180,0,0,3.5,5.5
31/01/24,00:00,3.0,85,1.0,4.0,9.0,180,0.0,0.0,1008.0,0,20,50,0,1.0,3.0,0,0,0,0,1.0,0,0,180,0,0,1.5,3.5
31/01/24,08:30,1.0,90,0.0,1.0,9.0,180,0.0,0.0,1009.0,0,20,50,0,0.5,1.0,0,0,0,0,-1.0,0,0,180,0,0,-0.5,1.5
31/01/24,09:00,8.0,70,3.0,6.0,12.0,180,0.0,0.0,1005.0,0,20,50,0,6.0,8.0,0,0,0,0,6.0,0,0,180,0,0,6.5,9.0
31/01/24,23:30,4.0,88,2.5,3.0,7.0,180,3.0,1.0,1001.0,0,20,50,0,2.0,4.0,0,0,0,0,2.0,0,0,180,0,0,2.5,5.0
";

const FEB_LOG: &str = "\
01/02/24,00:00,3.5,95,3.0,8.0,15.0,180,6.0,1.5,999.5,0,20,50,0,0.0,3.5,0,0,0,0,0.5,0,0,180,0,0,1.0,4.5
01/02/24,00:30,3.0,97,2.5,8.0,14.0,180,4.0,2.0,999.5,0,20,50,0,-0.5,3.0,0,0,0,0,0.0,0,0,180,0,0,0.5,4.0
01/02/24,08:30,2.0,93,1.5,2.0,5.0,180,0.0,2.0,1002.0,0,20,50,0,1.0,2.0,0,0,0,0,1.0,0,0,180,0,0,1.5,3.0
01/02/24,09:00,4.0,85,1.0,1.0,2.0,180,0.0,0.0,1003.0,0,20,50,0,3.5,4.0,0,0,0,0,2.5,0,0,180,0,0,3.0,4.5
01/02/24,09:30,6.0,75,1.5,3.0,4.0,180,0.5,0.25,1004.0,0,20,50,0,5.0,6.0,0,0,0,0,4.5,0,0,180,0,0,5.0,6.5
";

fn at(m: u32, d: u32, h: u32, min: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(2024, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn v(val: f64, ts: Timestamp) -> Option<RecordValue> {
    Some(RecordValue::new(val, ts))
}

/// The same three days worked out by hand
fn expected_days() -> Vec<DailySummaryRecord> {
    let (r1, r2, r3) = (at(1, 30, 23, 30), at(1, 31, 0, 0), at(1, 31, 8, 30));
    let jan30 = DailySummaryRecord {
        date: NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
        high_temp: v(5.0, r1),
        low_temp: v(1.0, r3),
        high_dew_point: v(2.0, r1),
        low_dew_point: v(0.0, r3),
        high_apparent_temp: v(3.0, r1),
        low_apparent_temp: v(-1.0, r3),
        high_feels_like: v(3.5, r1),
        low_feels_like: v(-0.5, r3),
        high_humidex: v(5.5, r1),
        high_heat_index: v(5.0, r1),
        low_wind_chill: v(0.5, r3),
        high_humidity: v(90.0, r3),
        low_humidity: v(80.0, r1),
        high_pressure: v(1010.0, r1),
        low_pressure: v(1008.0, r2),
        // 9.0 twice; the first one holds
        high_gust: v(9.0, r2),
        high_wind_speed: v(4.0, r2),
        high_rain_rate: v(0.0, r1),
        high_hourly_rain: v(0.0, r1),
        total_rain: Some(0.0),
        // 0.5h at 4.0; the 8.5h hole before 08:30 adds nothing
        wind_run: Some(2.0),
    };

    let (r4, r5, r6, r7, r8) = (
        at(1, 31, 9, 0),
        at(1, 31, 23, 30),
        at(2, 1, 0, 0),
        at(2, 1, 0, 30),
        at(2, 1, 8, 30),
    );
    let jan31 = DailySummaryRecord {
        date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        high_temp: v(8.0, r4),
        low_temp: v(2.0, r8),
        high_dew_point: v(3.0, r4),
        low_dew_point: v(1.5, r8),
        high_apparent_temp: v(6.0, r4),
        low_apparent_temp: v(0.0, r7),
        high_feels_like: v(6.5, r4),
        low_feels_like: v(0.5, r7),
        high_humidex: v(9.0, r4),
        high_heat_index: v(8.0, r4),
        low_wind_chill: v(-0.5, r7),
        high_humidity: v(97.0, r7),
        low_humidity: v(70.0, r4),
        high_pressure: v(1005.0, r4),
        low_pressure: v(999.5, r6),
        high_gust: v(15.0, r6),
        high_wind_speed: v(8.0, r6),
        high_rain_rate: v(6.0, r6),
        // 1.0 at 23:30 -> 2.0 at 00:30, across the file boundary
        high_hourly_rain: v(1.0, r7),
        total_rain: Some(2.0),
        // 08:30 -> 09:00 at 6.0, then two half hours at 8.0
        wind_run: Some(11.0),
    };

    let (r9, r10) = (at(2, 1, 9, 0), at(2, 1, 9, 30));
    let feb1 = DailySummaryRecord {
        date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        high_temp: v(6.0, r10),
        low_temp: v(4.0, r9),
        high_dew_point: v(1.5, r10),
        low_dew_point: v(1.0, r9),
        high_apparent_temp: v(4.5, r10),
        low_apparent_temp: v(2.5, r9),
        high_feels_like: v(5.0, r10),
        low_feels_like: v(3.0, r9),
        high_humidex: v(6.5, r10),
        high_heat_index: v(6.0, r10),
        low_wind_chill: v(3.5, r9),
        high_humidity: v(85.0, r9),
        low_humidity: v(75.0, r10),
        high_pressure: v(1004.0, r10),
        low_pressure: v(1003.0, r9),
        high_gust: v(4.0, r10),
        high_wind_speed: v(3.0, r10),
        high_rain_rate: v(0.5, r10),
        // counter reset at 09:00 does not hide the 0.25 since 08:30
        high_hourly_rain: v(0.25, r10),
        total_rain: Some(0.25),
        wind_run: Some(2.0),
    };

    vec![jan30, jan31, feb1]
}

#[test]
fn hand_written_day_file_matches_logs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Jan24log.txt"), JAN_LOG).unwrap();
    fs::write(dir.path().join("Feb24log.txt"), FEB_LOG).unwrap();
    let locator = MonthlyLogLocator::new(dir.path());
    let settings = settings();
    let began = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
    let now = at(2, 1, 10, 0);
    let today = settings.met_date(now);

    let days = expected_days();
    assert_eq!(log_file::day_summaries(began, now, &locator, &settings).unwrap(), days);

    let from_logs = log_file::aggregate_all(began, now, &locator, &settings).unwrap();
    let from_days = day_file::aggregate_all(&days, began, today, &settings).unwrap();
    assert_eq!(
        from_logs.keys().collect::<Vec<_>>(),
        vec![&Scope::AllTime, &Scope::ThisYear, &Scope::ThisMonth, &Scope::Month(1), &Scope::Month(2)]
    );
    assert_eq!(
        from_logs.keys().collect::<Vec<_>>(),
        from_days.keys().collect::<Vec<_>>()
    );

    for (scope, log_set) in &from_logs {
        for metric in Metric::all().filter(|m| *m != Metric::HighMonthlyRain) {
            assert_eq!(
                log_set.get(metric),
                from_days[scope].get(metric),
                "{} differs for {}",
                metric.name(),
                scope
            );
        }
    }

    let all = &from_days[&Scope::AllTime];
    let jan31 = midnight(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    assert_eq!(all.get(Metric::HighWindRun), Some(&RecordValue::new(11.0, jan31)));
    assert_eq!(all.get(Metric::LongestWetPeriod), Some(&RecordValue::new(2.0, jan31)));
    assert_eq!(all.get(Metric::HighHourlyRain), Some(&RecordValue::new(1.0, at(2, 1, 0, 30))));
    // January closed on the transition to February on both paths
    assert_eq!(
        all.get(Metric::HighMonthlyRain),
        Some(&RecordValue::new(2.0, midnight(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())))
    );
}
