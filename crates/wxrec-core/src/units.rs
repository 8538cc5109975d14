//! Unit systems and the unit-aware scan settings
//!
//! Rain thresholds are held in thousandths of the station rain unit so the
//! wet/dry decision is an integer comparison.

use crate::records::Metric;
use crate::types::Timestamp;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unit conversion and settings errors
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown unit system: {0}")]
    UnknownUnitSystem(String),

    #[error("Invalid rollover hour: {0} (expected 0-23)")]
    InvalidRolloverHour(u32),

    #[error("Invalid rain day threshold: {0}")]
    InvalidThreshold(f64),
}

/// Station unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// C, hPa, km/h, mm
    #[default]
    Metric,
    /// F, inHg, mph, in
    Imperial,
}

impl UnitSystem {
    /// Default wet-day threshold in station rain units
    pub fn default_rain_threshold(self) -> f64 {
        match self {
            UnitSystem::Metric => 0.2,
            UnitSystem::Imperial => 0.01,
        }
    }

    /// Decimal places the report layer shows for a metric
    pub fn decimals(self, metric: Metric) -> usize {
        use Metric::*;
        match (self, metric) {
            (_, LongestDryPeriod | LongestWetPeriod | HighHumidity | LowHumidity) => 0,
            (UnitSystem::Imperial, HighPressure | LowPressure) => 2,
            (
                UnitSystem::Imperial,
                HighRainRate | HighHourlyRain | HighDailyRain | HighMonthlyRain,
            ) => 2,
            _ => 1,
        }
    }

    pub fn format_value(self, metric: Metric, val: f64) -> String {
        format!("{:.*}", self.decimals(metric), val)
    }
}

impl FromStr for UnitSystem {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            other => Err(UnitError::UnknownUnitSystem(other.to_string())),
        }
    }
}

/// Classification of one day's rainfall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKind {
    Dry,
    Wet,
}

/// Wet iff `round(rain * 1000) >= threshold_thousandths`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WetDayRule {
    threshold_thousandths: i64,
}

impl WetDayRule {
    /// Build from a threshold expressed in station rain units
    pub fn from_threshold(threshold: f64) -> Result<Self, UnitError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(UnitError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold_thousandths: scale(threshold),
        })
    }

    pub fn for_units(units: UnitSystem) -> Self {
        Self {
            threshold_thousandths: scale(units.default_rain_threshold()),
        }
    }

    pub fn threshold_thousandths(&self) -> i64 {
        self.threshold_thousandths
    }

    pub fn classify(&self, rain: f64) -> DayKind {
        if scale(rain) >= self.threshold_thousandths {
            DayKind::Wet
        } else {
            DayKind::Dry
        }
    }
}

fn scale(rain: f64) -> i64 {
    (rain * 1000.0).round() as i64
}

/// Settings every scan needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSettings {
    pub units: UnitSystem,

    /// Hour the meteorological day starts (0 = midnight, 9 = 9am)
    pub rollover_hour: u32,
    pub wet_day: WetDayRule,
}

impl ScanSettings {
    pub fn new(units: UnitSystem, rollover_hour: u32) -> Result<Self, UnitError> {
        if rollover_hour > 23 {
            return Err(UnitError::InvalidRolloverHour(rollover_hour));
        }
        Ok(Self {
            units,
            rollover_hour,
            wet_day: WetDayRule::for_units(units),
        })
    }

    pub fn with_wet_day(mut self, wet_day: WetDayRule) -> Self {
        self.wet_day = wet_day;
        self
    }

    /// Offset added to a timestamp before taking its calendar date
    pub fn rollover_offset(&self) -> Duration {
        Duration::hours(-i64::from(self.rollover_hour))
    }

    /// Meteorological date a reading belongs to
    pub fn met_date(&self, ts: Timestamp) -> NaiveDate {
        (ts + self.rollover_offset()).date()
    }

    /// First instant of a meteorological day
    pub fn day_start(&self, date: NaiveDate) -> Timestamp {
        crate::types::midnight(date) - self.rollover_offset()
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            units: UnitSystem::Metric,
            rollover_hour: 0,
            wet_day: WetDayRule::for_units(UnitSystem::Metric),
        }
    }
}
