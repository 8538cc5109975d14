//! TOML configuration for the records tools
//!
//! Every section is optional; accessors fill in defaults.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use wxrec_core::{ScanSettings, UnitError, UnitSystem, WetDayRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub units: Option<UnitSystem>,
    pub rollover_hour: Option<u32>,
    pub records_began: Option<NaiveDate>,
    /// In station rain units; defaults by unit system
    pub rain_day_threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    pub data_dir: Option<PathBuf>,
}

/// Either a full `url`, or the parts to build one from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub station: Option<StationConfig>,
    pub logs: Option<LogsConfig>,
    pub database: Option<DatabaseConfig>,
    pub records: Option<RecordsConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid station settings: {0}")]
    Units(#[from] UnitError),
}

impl AppConfig {
    /// Load configuration from WXREC_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WXREC_CONFIG").unwrap_or_else(|_| "wxrec.toml".to_string());
        if Path::new(&path).exists() {
            Self::load_from(&path)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    }

    pub fn units(&self) -> UnitSystem {
        self.station
            .as_ref()
            .and_then(|s| s.units)
            .unwrap_or_default()
    }

    /// Meteorological day start hour (default 0, midnight)
    pub fn rollover_hour(&self) -> u32 {
        self.station
            .as_ref()
            .and_then(|s| s.rollover_hour)
            .unwrap_or(0)
    }

    /// First day the scans may read (default 2000-01-01)
    pub fn records_began(&self) -> NaiveDate {
        self.station
            .as_ref()
            .and_then(|s| s.records_began)
            .or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1))
            .unwrap_or_default()
    }

    /// Validated scan settings; the rain threshold overrides the unit default
    pub fn scan_settings(&self) -> Result<ScanSettings, ConfigError> {
        let settings = ScanSettings::new(self.units(), self.rollover_hour())?;
        match self.station.as_ref().and_then(|s| s.rain_day_threshold) {
            Some(threshold) => Ok(settings.with_wet_day(WetDayRule::from_threshold(threshold)?)),
            None => Ok(settings),
        }
    }

    /// Monthly log directory (default `data`)
    pub fn data_dir(&self) -> PathBuf {
        self.logs
            .as_ref()
            .and_then(|l| l.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database.as_ref().and_then(|d| d.url.as_deref())
    }

    pub fn database(&self) -> Option<&DatabaseConfig> {
        self.database.as_ref()
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.records.as_ref().and_then(|r| r.snapshot.as_deref())
    }
}
