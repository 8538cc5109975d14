//! Subcommand bodies

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wxrec_config::{AppConfig, DatabaseConfig};
use wxrec_core::{RecordSet, ScanSettings, Scope, UnitSystem};
use wxrec_db::{DbClient, DbConnectionBuilder};
use wxrec_logs::MonthlyLogLocator;
use wxrec_records::{day_file, log_file, RecordStore};

use crate::args::Source;

/// One record as the report layer shows it
#[derive(Debug, Serialize, PartialEq)]
pub struct ReportEntry {
    pub value: String,
    pub timestamp: String,
}

pub type Report = BTreeMap<String, BTreeMap<&'static str, ReportEntry>>;

/// Scope -> metric name -> formatted value, precision by unit system
pub fn report(units: UnitSystem, sets: &BTreeMap<Scope, RecordSet>) -> Report {
    sets.iter()
        .map(|(scope, set)| {
            let entries = set
                .iter()
                .map(|(metric, value)| {
                    let entry = ReportEntry {
                        value: units.format_value(metric, value.val),
                        timestamp: value.ts.format("%Y-%m-%d %H:%M").to_string(),
                    };
                    (metric.name(), entry)
                })
                .collect();
            (scope.to_string(), entries)
        })
        .collect()
}

fn print_report(units: UnitSystem, sets: &BTreeMap<Scope, RecordSet>) -> Result<()> {
    let json = serde_json::to_string_pretty(&report(units, sets))?;
    println!("{}", json);
    Ok(())
}

fn snapshot_path(config: &AppConfig) -> PathBuf {
    config
        .snapshot_path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("records.json"))
}

/// Existing snapshot, or an empty store when none has been written yet
fn open_store(path: &Path) -> Result<RecordStore> {
    if path.exists() {
        RecordStore::load_json(path)
            .with_context(|| format!("Failed to load records from {}", path.display()))
    } else {
        warn!("No records snapshot at {}, starting empty", path.display());
        Ok(RecordStore::new())
    }
}

pub async fn rebuild(
    config: &AppConfig,
    source: Source,
    scope: Option<Scope>,
    now: Option<NaiveDateTime>,
    save: bool,
) -> Result<()> {
    let settings = config.scan_settings().context("Invalid station settings")?;
    let began = config.records_began();
    let now = now.unwrap_or_else(|| Local::now().naive_local());
    info!("Rebuilding records from {:?} as of {}", source, now);

    let sets = match source {
        Source::Logs => {
            let locator = MonthlyLogLocator::new(config.data_dir());
            tokio::task::spawn_blocking(move || scan_logs(&locator, scope, began, now, &settings))
                .await
                .context("Log scan task failed")??
        }
        Source::Db => {
            let client = connect(config).await?;
            client.ping().await.context("Database ping failed")?;
            let sets = scan_store(&client, scope, began, &settings, now).await;
            client.close().await;
            sets?
        }
    };

    print_report(settings.units, &sets)?;

    if save {
        let path = snapshot_path(config);
        let store = open_store(&path)?;
        store.replace_all(sets).await;
        store
            .save_json(&path)
            .await
            .with_context(|| format!("Failed to save records to {}", path.display()))?;
        info!("Saved records to {}", path.display());
    }
    Ok(())
}

/// Connection parts from `[database]`; `None` without a database name
fn connection_builder(db: &DatabaseConfig) -> Option<DbConnectionBuilder> {
    let mut builder = DbConnectionBuilder::new(db.name.as_deref()?);
    if let Some(host) = &db.host {
        builder = builder.host(host);
    }
    if let Some(port) = db.port {
        builder = builder.port(port);
    }
    if let Some(user) = &db.user {
        builder = builder.username(user);
    }
    if let Some(password) = &db.password {
        builder = builder.password(password);
    }
    Some(builder)
}

async fn connect(config: &AppConfig) -> Result<DbClient> {
    if let Some(url) = config.database_url() {
        return DbClient::new(url)
            .await
            .context("Failed to connect to database");
    }
    let builder = config
        .database()
        .and_then(connection_builder)
        .context("No [database] url or name configured")?;
    info!("Connecting to {}", builder.describe());
    DbClient::connect(builder)
        .await
        .context("Failed to connect to database")
}

fn scan_logs(
    locator: &MonthlyLogLocator,
    scope: Option<Scope>,
    began: chrono::NaiveDate,
    now: NaiveDateTime,
    settings: &ScanSettings,
) -> Result<BTreeMap<Scope, RecordSet>> {
    let sets = match scope {
        Some(scope) => {
            let set = log_file::aggregate(scope, began, now, locator, settings)?;
            BTreeMap::from([(scope, set)])
        }
        None => log_file::aggregate_all(began, now, locator, settings)?,
    };
    Ok(sets)
}

async fn scan_store(
    client: &DbClient,
    scope: Option<Scope>,
    began: chrono::NaiveDate,
    settings: &ScanSettings,
    now: NaiveDateTime,
) -> Result<BTreeMap<Scope, RecordSet>> {
    let today = settings.met_date(now);
    let began = match client.first_day().await? {
        Some(first) if first > began => first,
        _ => began,
    };
    let sets = match scope {
        Some(scope) => {
            let range = scope.range(began, today);
            let set = day_file::aggregate_from_store(client, scope, range, settings).await?;
            BTreeMap::from([(scope, set)])
        }
        None => day_file::aggregate_all_from_store(client, began, today, settings).await?,
    };
    Ok(sets)
}

pub async fn show(config: &AppConfig, scope: Option<Scope>) -> Result<()> {
    let store = open_store(&snapshot_path(config))?;
    let mut sets = store.snapshot().await;
    if let Some(scope) = scope {
        sets.retain(|s, _| *s == scope);
    }
    print_report(config.units(), &sets)
}

pub async fn edit(
    config: &AppConfig,
    scope: Scope,
    metric: &str,
    value: f64,
    timestamp: NaiveDateTime,
) -> Result<()> {
    let path = snapshot_path(config);
    let store = open_store(&path)?;
    store.set_field(scope, metric, value, timestamp).await?;
    store
        .save_json(&path)
        .await
        .with_context(|| format!("Failed to save records to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wxrec_core::Metric;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 19)
            .unwrap()
            .and_hms_opt(h, 5, 0)
            .unwrap()
    }

    #[test]
    fn report_uses_unit_precision() {
        let mut set = RecordSet::new();
        set.offer(Metric::HighPressure, 30.123, at(10));
        set.offer(Metric::LongestDryPeriod, 12.0, at(0));
        let sets = BTreeMap::from([(Scope::Month(7), set)]);

        let report = report(UnitSystem::Imperial, &sets);
        let july = &report["7"];
        assert_eq!(july["highPressure"].value, "30.12");
        assert_eq!(july["highPressure"].timestamp, "2024-07-19 10:05");
        assert_eq!(july["longestDryPeriod"].value, "12");
    }

    fn config_in(dir: &Path) -> AppConfig {
        let text = format!(
            "[logs]\ndata_dir = {:?}\n[records]\nsnapshot = {:?}\n",
            dir.display().to_string(),
            dir.join("records.json").display().to_string()
        );
        toml::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn rebuild_from_logs_and_save() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Jul24log.txt"),
            "19/07/24,10:05,31.5,40,15.0,3.0,7.0,0,0.0,0.0,1015.0\n\
             19/07/24,16:05,33.0,35,14.0,4.0,9.0,0,0.0,0.0,1013.0\n",
        )
        .unwrap();
        let mut config = config_in(dir.path());
        config.station = Some(toml::from_str("records_began = \"2024-07-01\"").unwrap());

        rebuild(&config, Source::Logs, None, Some(at(20)), true).await.unwrap();

        let store = RecordStore::load_json(dir.path().join("records.json")).unwrap();
        let set = store.get_scope(Scope::AllTime).await;
        assert_eq!(set.get(Metric::HighTemp).unwrap().val, 33.0);
        assert_eq!(set.get(Metric::HighWindGust).unwrap().ts, at(16));
    }

    #[tokio::test]
    async fn edit_creates_and_updates_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        edit(&config, Scope::AllTime, "highTemp", 35.5, at(15)).await.unwrap();
        edit(&config, Scope::AllTime, "lowTemp", -8.0, at(6)).await.unwrap();

        let store = RecordStore::load_json(dir.path().join("records.json")).unwrap();
        assert_eq!(store.get_scope(Scope::AllTime).await.len(), 2);

        let err = edit(&config, Scope::AllTime, "snowDepth", 1.0, at(6)).await.unwrap_err();
        assert!(err.to_string().contains("snowDepth"));
    }

    #[test]
    fn connection_from_database_parts() {
        let db: DatabaseConfig =
            toml::from_str("host = \"db.lan\"\nport = 3307\nname = \"cumulus\"\nuser = \"reader\"\n")
                .unwrap();
        let builder = connection_builder(&db).unwrap();
        assert_eq!(builder.describe(), "reader@db.lan:3307/cumulus");

        let nameless: DatabaseConfig = toml::from_str("host = \"db.lan\"\n").unwrap();
        assert!(connection_builder(&nameless).is_none());
    }

    #[tokio::test]
    async fn db_source_needs_a_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let err = rebuild(&config, Source::Db, None, Some(at(12)), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("[database]"));
    }
}
