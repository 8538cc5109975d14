//! Row types for the `dayfile` table
//!
//! One row per meteorological day. Each extreme is a value column plus a
//! `_time` column holding when it occurred; either may be NULL.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wxrec_core::{DailySummaryRecord, RecordValue};

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct DayFileRow {
    pub log_date: NaiveDate,

    pub high_temp: Option<f64>,
    pub high_temp_time: Option<NaiveDateTime>,
    pub low_temp: Option<f64>,
    pub low_temp_time: Option<NaiveDateTime>,
    pub high_dew_point: Option<f64>,
    pub high_dew_point_time: Option<NaiveDateTime>,
    pub low_dew_point: Option<f64>,
    pub low_dew_point_time: Option<NaiveDateTime>,
    pub high_apparent_temp: Option<f64>,
    pub high_apparent_temp_time: Option<NaiveDateTime>,
    pub low_apparent_temp: Option<f64>,
    pub low_apparent_temp_time: Option<NaiveDateTime>,
    pub high_feels_like: Option<f64>,
    pub high_feels_like_time: Option<NaiveDateTime>,
    pub low_feels_like: Option<f64>,
    pub low_feels_like_time: Option<NaiveDateTime>,
    pub high_humidex: Option<f64>,
    pub high_humidex_time: Option<NaiveDateTime>,
    pub high_heat_index: Option<f64>,
    pub high_heat_index_time: Option<NaiveDateTime>,
    pub low_wind_chill: Option<f64>,
    pub low_wind_chill_time: Option<NaiveDateTime>,

    pub high_humidity: Option<f64>,
    pub high_humidity_time: Option<NaiveDateTime>,
    pub low_humidity: Option<f64>,
    pub low_humidity_time: Option<NaiveDateTime>,
    pub high_pressure: Option<f64>,
    pub high_pressure_time: Option<NaiveDateTime>,
    pub low_pressure: Option<f64>,
    pub low_pressure_time: Option<NaiveDateTime>,

    pub high_gust: Option<f64>,
    pub high_gust_time: Option<NaiveDateTime>,
    pub high_wind_speed: Option<f64>,
    pub high_wind_speed_time: Option<NaiveDateTime>,
    pub high_rain_rate: Option<f64>,
    pub high_rain_rate_time: Option<NaiveDateTime>,
    pub high_hourly_rain: Option<f64>,
    pub high_hourly_rain_time: Option<NaiveDateTime>,

    pub total_rain: Option<f64>,
    pub wind_run: Option<f64>,
}

/// A value only counts when its time is recorded too
fn pair(val: Option<f64>, ts: Option<NaiveDateTime>) -> Option<RecordValue> {
    match (val, ts) {
        (Some(val), Some(ts)) => Some(RecordValue::new(val, ts)),
        _ => None,
    }
}

impl From<DayFileRow> for DailySummaryRecord {
    fn from(row: DayFileRow) -> Self {
        Self {
            date: row.log_date,
            high_temp: pair(row.high_temp, row.high_temp_time),
            low_temp: pair(row.low_temp, row.low_temp_time),
            high_dew_point: pair(row.high_dew_point, row.high_dew_point_time),
            low_dew_point: pair(row.low_dew_point, row.low_dew_point_time),
            high_apparent_temp: pair(row.high_apparent_temp, row.high_apparent_temp_time),
            low_apparent_temp: pair(row.low_apparent_temp, row.low_apparent_temp_time),
            high_feels_like: pair(row.high_feels_like, row.high_feels_like_time),
            low_feels_like: pair(row.low_feels_like, row.low_feels_like_time),
            high_humidex: pair(row.high_humidex, row.high_humidex_time),
            high_heat_index: pair(row.high_heat_index, row.high_heat_index_time),
            low_wind_chill: pair(row.low_wind_chill, row.low_wind_chill_time),
            high_humidity: pair(row.high_humidity, row.high_humidity_time),
            low_humidity: pair(row.low_humidity, row.low_humidity_time),
            high_pressure: pair(row.high_pressure, row.high_pressure_time),
            low_pressure: pair(row.low_pressure, row.low_pressure_time),
            high_gust: pair(row.high_gust, row.high_gust_time),
            high_wind_speed: pair(row.high_wind_speed, row.high_wind_speed_time),
            high_rain_rate: pair(row.high_rain_rate, row.high_rain_rate_time),
            high_hourly_rain: pair(row.high_hourly_rain, row.high_hourly_rain_time),
            total_rain: row.total_rain,
            wind_run: row.wind_run,
        }
    }
}

pub mod tables {
    pub const DAY_FILE: &str = "dayfile";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 14).unwrap()
    }

    #[test]
    fn test_row_into_summary() {
        let hot = date().and_hms_opt(15, 42, 0).unwrap();
        let row = DayFileRow {
            log_date: date(),
            high_temp: Some(31.2),
            high_temp_time: Some(hot),
            total_rain: Some(0.4),
            ..Default::default()
        };

        let summary = DailySummaryRecord::from(row);
        assert_eq!(summary.date, date());
        assert_eq!(summary.high_temp, Some(RecordValue::new(31.2, hot)));
        assert_eq!(summary.total_rain, Some(0.4));
        assert!(summary.low_temp.is_none());
        assert!(summary.wind_run.is_none());
    }

    #[test]
    fn test_value_without_time_is_dropped() {
        let row = DayFileRow {
            log_date: date(),
            high_gust: Some(48.0),
            ..Default::default()
        };
        assert!(DailySummaryRecord::from(row).high_gust.is_none());
    }
}
