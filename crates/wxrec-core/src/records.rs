//! Tracked record metrics and the per-scope record set

use crate::types::{Extreme, RecordValue, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Every metric a record set can hold
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Metric {
    HighTemp,
    LowTemp,
    HighDewPoint,
    LowDewPoint,
    HighApparentTemp,
    LowApparentTemp,
    HighFeelsLike,
    LowFeelsLike,
    HighHumidex,
    HighHeatIndex,
    LowWindChill,
    HighMinTemp,
    LowMaxTemp,
    HighDailyTempRange,
    LowDailyTempRange,
    HighHumidity,
    LowHumidity,
    HighPressure,
    LowPressure,
    HighWindGust,
    HighWindSpeed,
    HighWindRun,
    HighRainRate,
    HighHourlyRain,
    HighDailyRain,
    HighMonthlyRain,
    LongestDryPeriod,
    LongestWetPeriod,
}

impl Metric {
    pub fn extreme(self) -> Extreme {
        match self {
            Metric::LowTemp
            | Metric::LowDewPoint
            | Metric::LowApparentTemp
            | Metric::LowFeelsLike
            | Metric::LowWindChill
            | Metric::LowMaxTemp
            | Metric::LowDailyTempRange
            | Metric::LowHumidity
            | Metric::LowPressure => Extreme::Low,
            _ => Extreme::High,
        }
    }

    /// Flat output key, e.g. `highTemp`
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn all() -> impl Iterator<Item = Metric> {
        Metric::iter()
    }
}

/// Records for one scope. A metric is absent until something is observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    values: BTreeMap<Metric, RecordValue>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> Option<&RecordValue> {
        self.values.get(&metric)
    }

    /// Replace the holder if `val` is strictly better. Returns true on change.
    pub fn offer(&mut self, metric: Metric, val: f64, ts: Timestamp) -> bool {
        let mut slot = self.values.get(&metric).copied();
        let changed = metric.extreme().offer(&mut slot, val, ts);
        if let (true, Some(value)) = (changed, slot) {
            self.values.insert(metric, value);
        }
        changed
    }

    /// Unchecked overwrite, used for trusted manual corrections
    pub fn set(&mut self, metric: Metric, val: f64, ts: Timestamp) {
        self.values.insert(metric, RecordValue::new(val, ts));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &RecordValue)> {
        self.values.iter().map(|(metric, value)| (*metric, value))
    }

    /// Flat metric-name -> {value, timestamp} view for the reporting layer
    pub fn flatten(&self) -> BTreeMap<&'static str, RecordValue> {
        self.iter().map(|(metric, value)| (metric.name(), *value)).collect()
    }
}
