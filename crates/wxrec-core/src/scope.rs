//! Record scopes and the date ranges they cover

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Which record table a set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    AllTime,
    ThisYear,
    ThisMonth,
    /// Calendar month 1-12 across every year
    Month(u32),
}

impl Scope {
    /// All fifteen scopes in reporting order
    pub fn all() -> Vec<Scope> {
        let mut scopes = vec![Scope::AllTime, Scope::ThisYear, Scope::ThisMonth];
        scopes.extend((1..=12).map(Scope::Month));
        scopes
    }

    pub fn calendar_month(self) -> Option<u32> {
        match self {
            Scope::Month(m) => Some(m),
            _ => None,
        }
    }

    /// Days this scope reads, given when records began and the current
    /// meteorological date
    pub fn range(self, records_began: NaiveDate, today: NaiveDate) -> DateRange {
        let start = match self {
            Scope::AllTime | Scope::Month(_) => records_began,
            Scope::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            Scope::ThisMonth => today.with_day(1).unwrap_or(today),
        };
        DateRange::new(start.max(records_began), today)
    }

    /// Whether a day inside the range belongs to this scope
    pub fn admits(self, date: NaiveDate) -> bool {
        match self {
            Scope::Month(m) => date.month() == m,
            _ => true,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::AllTime => write!(f, "alltime"),
            Scope::ThisYear => write!(f, "year"),
            Scope::ThisMonth => write!(f, "month"),
            Scope::Month(m) => write!(f, "{}", m),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown scope: {0}")]
pub struct ScopeParseError(pub String);

impl FromStr for Scope {
    type Err = ScopeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alltime" => Ok(Scope::AllTime),
            "year" | "thisyear" => Ok(Scope::ThisYear),
            "month" | "thismonth" => Ok(Scope::ThisMonth),
            other => match other.parse::<u32>() {
                Ok(m) if (1..=12).contains(&m) => Ok(Scope::Month(m)),
                _ => Err(ScopeParseError(s.to_string())),
            },
        }
    }
}

/// Inclusive range of meteorological dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Smallest range covering both
    pub fn union(self, other: DateRange) -> DateRange {
        DateRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}
