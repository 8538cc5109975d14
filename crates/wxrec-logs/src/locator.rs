//! Month -> log file mapping

use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

/// Resolves the log file holding a calendar month's readings
pub trait LogFileLocator {
    fn locate(&self, month: NaiveDate) -> PathBuf;
}

impl<F> LogFileLocator for F
where
    F: Fn(NaiveDate) -> PathBuf,
{
    fn locate(&self, month: NaiveDate) -> PathBuf {
        self(month)
    }
}

/// Default layout: `<data_dir>/Jan24log.txt`
#[derive(Debug, Clone)]
pub struct MonthlyLogLocator {
    data_dir: PathBuf,
}

impl MonthlyLogLocator {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn file_name(month: NaiveDate) -> String {
        format!("{}log.txt", month.format("%b%y"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl LogFileLocator for MonthlyLogLocator {
    fn locate(&self, month: NaiveDate) -> PathBuf {
        self.data_dir.join(Self::file_name(month))
    }
}

/// First day of every month from `start`'s month through `end`'s month
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut cursor = match start.with_day(1) {
        Some(first) => first,
        None => return months,
    };
    while cursor <= end {
        months.push(cursor);
        cursor = match next_month(cursor) {
            Some(next) => next,
            None => break,
        };
    }
    months
}

fn next_month(first: NaiveDate) -> Option<NaiveDate> {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
}
