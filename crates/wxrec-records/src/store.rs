//! In-memory record tables with manual correction

use crate::{RecordsError, RecordsResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use wxrec_core::{Metric, RecordSet, RecordValue, Scope, Timestamp};

/// Current records for every scope.
///
/// One mutex guards all scopes and is only held across in-memory work;
/// snapshot file I/O happens outside it.
#[derive(Debug, Default)]
pub struct RecordStore {
    scopes: Mutex<HashMap<Scope, RecordSet>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sets(sets: BTreeMap<Scope, RecordSet>) -> Self {
        Self {
            scopes: Mutex::new(sets.into_iter().collect()),
        }
    }

    /// Snapshot of one scope; empty if nothing is held yet
    pub async fn get_scope(&self, scope: Scope) -> RecordSet {
        let scopes = self.scopes.lock().await;
        scopes.get(&scope).cloned().unwrap_or_default()
    }

    /// Overwrite one record as given. No check that the value is still the
    /// genuine extreme; persisting the change is up to the caller.
    #[instrument(skip(self))]
    pub async fn set_field(
        &self,
        scope: Scope,
        metric_name: &str,
        val: f64,
        ts: Timestamp,
    ) -> RecordsResult<()> {
        let metric = Metric::from_str(metric_name)
            .map_err(|_| RecordsError::UnknownMetric(metric_name.to_string()))?;

        let mut scopes = self.scopes.lock().await;
        scopes.entry(scope).or_default().set(metric, val, ts);
        info!("Record {} for {} set to {} at {}", metric_name, scope, val, ts);
        Ok(())
    }

    /// Adopt a freshly aggregated set wholesale
    pub async fn replace_scope(&self, scope: Scope, set: RecordSet) {
        let mut scopes = self.scopes.lock().await;
        scopes.insert(scope, set);
    }

    /// Adopt the result of a multi-scope scan
    pub async fn replace_all(&self, sets: BTreeMap<Scope, RecordSet>) {
        let mut scopes = self.scopes.lock().await;
        debug!("Replacing {} scopes", sets.len());
        scopes.extend(sets);
    }

    /// Flat metric-name -> {value, timestamp} view of one scope
    pub async fn flatten(&self, scope: Scope) -> BTreeMap<&'static str, RecordValue> {
        self.get_scope(scope).await.flatten()
    }

    pub async fn snapshot(&self) -> BTreeMap<Scope, RecordSet> {
        let scopes = self.scopes.lock().await;
        scopes
            .iter()
            .map(|(scope, set)| (*scope, set.clone()))
            .collect()
    }

    /// Load a store written by [`save_json`](Self::save_json)
    pub fn load_json<P: AsRef<Path>>(path: P) -> RecordsResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RecordsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, RecordSet> = serde_json::from_str(&text)?;

        let mut sets = BTreeMap::new();
        for (key, set) in raw {
            let scope = Scope::from_str(&key).map_err(|_| RecordsError::UnknownScope(key))?;
            sets.insert(scope, set);
        }
        debug!("Loaded {} scopes from {}", sets.len(), path.display());
        Ok(Self::from_sets(sets))
    }

    pub async fn save_json<P: AsRef<Path>>(&self, path: P) -> RecordsResult<()> {
        let path = path.as_ref();
        let raw: BTreeMap<String, RecordSet> = self
            .snapshot()
            .await
            .into_iter()
            .map(|(scope, set)| (scope.to_string(), set))
            .collect();
        let json = serde_json::to_string_pretty(&raw)?;
        fs::write(path, json).map_err(|source| RecordsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved {} scopes to {}", raw.len(), path.display());
        Ok(())
    }
}
