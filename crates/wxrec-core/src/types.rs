//! Core data types for weather observations and record values

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::records::Metric;

/// Station-local timestamp (logs and day summaries carry no zone)
pub type Timestamp = NaiveDateTime;

/// Midnight at the start of `date`
pub fn midnight(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN)
}

/// A record holder: the value and when it was observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordValue {
    #[serde(rename = "value")]
    pub val: f64,

    #[serde(rename = "timestamp")]
    pub ts: Timestamp,
}

impl RecordValue {
    pub fn new(val: f64, ts: Timestamp) -> Self {
        Self { val, ts }
    }
}

/// Which direction counts as "better" for a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extreme {
    High,
    Low,
}

impl Extreme {
    /// Strict comparison; equal values never beat the holder
    pub fn beats(self, candidate: f64, current: f64) -> bool {
        match self {
            Extreme::High => candidate > current,
            Extreme::Low => candidate < current,
        }
    }

    /// Offer an observation to an optional holder.
    ///
    /// An empty holder takes any real value. Returns true when the holder
    /// changed.
    pub fn offer(self, slot: &mut Option<RecordValue>, val: f64, ts: Timestamp) -> bool {
        if val.is_nan() {
            return false;
        }
        match slot {
            Some(current) if !self.beats(val, current.val) => false,
            _ => {
                *slot = Some(RecordValue::new(val, ts));
                true
            }
        }
    }
}

/// One parsed line of a monthly interval log
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalRecord {
    pub ts: Timestamp,
    pub temperature: f64,
    pub humidity: f64,
    pub dew_point: f64,
    pub wind_avg: f64,
    pub gust: f64,
    pub rain_rate: f64,

    /// Rain since the last rollover, reset by the station each day
    pub rain_today: f64,
    pub pressure: f64,

    // Comfort indices, absent on older logs
    pub wind_chill: Option<f64>,
    pub heat_index: Option<f64>,
    pub apparent_temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidex: Option<f64>,
}

/// One row of the day summary store, dated by meteorological day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummaryRecord {
    pub date: NaiveDate,

    pub high_temp: Option<RecordValue>,
    pub low_temp: Option<RecordValue>,
    pub high_dew_point: Option<RecordValue>,
    pub low_dew_point: Option<RecordValue>,
    pub high_apparent_temp: Option<RecordValue>,
    pub low_apparent_temp: Option<RecordValue>,
    pub high_feels_like: Option<RecordValue>,
    pub low_feels_like: Option<RecordValue>,
    pub high_humidex: Option<RecordValue>,
    pub high_heat_index: Option<RecordValue>,
    pub low_wind_chill: Option<RecordValue>,
    pub high_humidity: Option<RecordValue>,
    pub low_humidity: Option<RecordValue>,
    pub high_pressure: Option<RecordValue>,
    pub low_pressure: Option<RecordValue>,
    pub high_gust: Option<RecordValue>,
    pub high_wind_speed: Option<RecordValue>,
    pub high_rain_rate: Option<RecordValue>,
    pub high_hourly_rain: Option<RecordValue>,

    pub total_rain: Option<f64>,
    pub wind_run: Option<f64>,
}

impl DailySummaryRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }

    /// Midnight of the day, used to stamp day-level records
    pub fn midnight(&self) -> Timestamp {
        midnight(self.date)
    }

    /// Value/time pairs that map one-to-one onto a record metric
    pub fn extremes(&self) -> [(Metric, Option<RecordValue>); 19] {
        [
            (Metric::HighTemp, self.high_temp),
            (Metric::LowTemp, self.low_temp),
            (Metric::HighDewPoint, self.high_dew_point),
            (Metric::LowDewPoint, self.low_dew_point),
            (Metric::HighApparentTemp, self.high_apparent_temp),
            (Metric::LowApparentTemp, self.low_apparent_temp),
            (Metric::HighFeelsLike, self.high_feels_like),
            (Metric::LowFeelsLike, self.low_feels_like),
            (Metric::HighHumidex, self.high_humidex),
            (Metric::HighHeatIndex, self.high_heat_index),
            (Metric::LowWindChill, self.low_wind_chill),
            (Metric::HighHumidity, self.high_humidity),
            (Metric::LowHumidity, self.low_humidity),
            (Metric::HighPressure, self.high_pressure),
            (Metric::LowPressure, self.low_pressure),
            (Metric::HighWindGust, self.high_gust),
            (Metric::HighWindSpeed, self.high_wind_speed),
            (Metric::HighRainRate, self.high_rain_rate),
            (Metric::HighHourlyRain, self.high_hourly_rain),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_offer_high_keeps_first_on_tie() {
        let mut slot = None;
        assert!(Extreme::High.offer(&mut slot, 10.0, at(1, 0)));
        assert!(!Extreme::High.offer(&mut slot, 10.0, at(2, 0)));
        assert_eq!(slot.unwrap().ts, at(1, 0));

        assert!(Extreme::High.offer(&mut slot, 10.5, at(3, 0)));
        assert_eq!(slot.unwrap().val, 10.5);
    }

    #[test]
    fn test_offer_low_polarity() {
        let mut slot = None;
        Extreme::Low.offer(&mut slot, -2.0, at(1, 0));
        assert!(!Extreme::Low.offer(&mut slot, 5.0, at(2, 0)));
        assert!(Extreme::Low.offer(&mut slot, -3.0, at(3, 0)));
        assert_eq!(slot.unwrap().val, -3.0);
    }

    #[test]
    fn test_offer_rejects_nan() {
        let mut slot = None;
        assert!(!Extreme::High.offer(&mut slot, f64::NAN, at(1, 0)));
        assert!(slot.is_none());
    }

    #[test]
    fn test_empty_slot_accepts_values_near_old_sentinels() {
        // -999 used to mean "no record" in older tooling
        let mut slot = None;
        assert!(Extreme::High.offer(&mut slot, -999.0, at(1, 0)));
        assert_eq!(slot.unwrap().val, -999.0);
    }

    #[test]
    fn test_record_value_serde_names() {
        let v = RecordValue::new(12.5, at(6, 30));
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"value":12.5,"timestamp":"2024-01-01T06:30:00"}"#);
    }
}
