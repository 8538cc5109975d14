//! Interval log line parser
//!
//! Column order is owned by the acquisition subsystem; only the ordinals
//! the records engine reads are named here.

use crate::{LogParseError, ParseErrorKind, ParseResult};
use chrono::{NaiveDate, NaiveTime};
use std::path::Path;
use wxrec_core::IntervalRecord;

pub mod columns {
    pub const DATE: usize = 0;
    pub const TIME: usize = 1;
    pub const TEMPERATURE: usize = 2;
    pub const HUMIDITY: usize = 3;
    pub const DEW_POINT: usize = 4;
    pub const WIND_AVG: usize = 5;
    pub const GUST: usize = 6;
    pub const RAIN_RATE: usize = 8;
    pub const RAIN_TODAY: usize = 9;
    pub const PRESSURE: usize = 10;
    pub const WIND_CHILL: usize = 15;
    pub const HEAT_INDEX: usize = 16;
    pub const APPARENT_TEMP: usize = 21;
    pub const FEELS_LIKE: usize = 27;
    pub const HUMIDEX: usize = 28;

    /// Everything up to and including pressure must be present
    pub const REQUIRED: usize = PRESSURE + 1;
}

/// Parse one log line. `line_number` is 1-based and only used for errors.
pub fn parse_line(line: &str, path: &Path, line_number: usize) -> ParseResult<IntervalRecord> {
    let fail = |kind| LogParseError {
        path: path.to_path_buf(),
        line: line_number,
        kind,
    };

    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    if fields.len() < columns::REQUIRED {
        return Err(fail(ParseErrorKind::TooFewFields {
            expected: columns::REQUIRED,
            found: fields.len(),
        }));
    }

    let date = parse_date(fields[columns::DATE])
        .ok_or_else(|| fail(ParseErrorKind::BadDate(fields[columns::DATE].to_string())))?;
    let time = parse_time(fields[columns::TIME])
        .ok_or_else(|| fail(ParseErrorKind::BadTime(fields[columns::TIME].to_string())))?;

    let required = |column: usize| -> ParseResult<f64> {
        fields[column].parse::<f64>().map_err(|_| {
            fail(ParseErrorKind::BadNumber {
                column,
                value: fields[column].to_string(),
            })
        })
    };
    let optional = |column: usize| -> ParseResult<Option<f64>> {
        match fields.get(column) {
            None => Ok(None),
            Some(value) if value.is_empty() || *value == "-" => Ok(None),
            Some(value) => value.parse::<f64>().map(Some).map_err(|_| {
                fail(ParseErrorKind::BadNumber {
                    column,
                    value: value.to_string(),
                })
            }),
        }
    };

    Ok(IntervalRecord {
        ts: date.and_time(time),
        temperature: required(columns::TEMPERATURE)?,
        humidity: required(columns::HUMIDITY)?,
        dew_point: required(columns::DEW_POINT)?,
        wind_avg: required(columns::WIND_AVG)?,
        gust: required(columns::GUST)?,
        rain_rate: required(columns::RAIN_RATE)?,
        rain_today: required(columns::RAIN_TODAY)?,
        pressure: required(columns::PRESSURE)?,
        wind_chill: optional(columns::WIND_CHILL)?,
        heat_index: optional(columns::HEAT_INDEX)?,
        apparent_temp: optional(columns::APPARENT_TEMP)?,
        feels_like: optional(columns::FEELS_LIKE)?,
        humidex: optional(columns::HUMIDEX)?,
    })
}

/// `dd/mm/yy`; the separator follows the station locale
fn parse_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split(&['/', '-', '.'][..]);
    let day = parts.next()?.parse::<u32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let year = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let year = if year < 100 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}
