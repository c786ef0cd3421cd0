//! CSV parser for bike-share trip tables.
//!
//! Columns are located by header name so that cities carrying extra or fewer
//! optional columns share one code path. The optional columns present in the
//! header become the dataset's [`Capabilities`].

use std::io::Read;

use chrono::NaiveDateTime;
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::error::{DataSourceError, RecordParseError, Result};
use crate::records::{Capabilities, City, Dataset, TripRecord};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// What to do with a row that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Fail the load on the first malformed row.
    #[default]
    Abort,
    /// Leave malformed rows out of the dataset and report them in
    /// [`LoadReport::skipped`].
    Skip,
}

/// A loaded dataset together with the rows that were skipped on the way.
#[derive(Debug)]
pub struct LoadReport {
    pub dataset: Dataset,
    pub skipped: Vec<RecordParseError>,
}

/// Header positions of the columns the parser understands.
#[derive(Debug)]
struct Columns {
    trip_id: Option<usize>,
    start_time: usize,
    end_time: Option<usize>,
    duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> std::result::Result<Self, DataSourceError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| {
            find(name).ok_or(DataSourceError::MissingColumn { column: name })
        };

        // Exported dataframes carry their row index as a leading unnamed column.
        let trip_id = match headers.get(0).map(str::trim) {
            Some("") | Some("Unnamed: 0") => Some(0),
            _ => None,
        };

        Ok(Columns {
            trip_id,
            start_time: require(START_TIME)?,
            end_time: find(END_TIME),
            duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            has_gender: self.gender.is_some(),
            has_birth_year: self.birth_year.is_some(),
        }
    }

    fn parse_row(&self, row: &StringRecord) -> std::result::Result<TripRecord, RecordParseError> {
        let line = row.position().map_or(0, |p| p.line());
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();
        let optional_cell = |idx: Option<usize>| idx.map(cell).filter(|v| !v.is_empty());

        let start_time = parse_timestamp(cell(self.start_time))
            .ok_or_else(|| bad(line, START_TIME, cell(self.start_time), "unrecognized timestamp"))?;
        let duration = parse_duration(cell(self.duration))
            .map_err(|reason| bad(line, TRIP_DURATION, cell(self.duration), reason))?;
        let start_station = required_text(line, START_STATION, cell(self.start_station))?;
        let end_station = required_text(line, END_STATION, cell(self.end_station))?;

        let mut record = TripRecord::new(start_time, duration, start_station, end_station);

        if let Some(id) = optional_cell(self.trip_id) {
            record = record.with_trip_id(id);
        }
        if let Some(raw) = optional_cell(self.end_time) {
            let end_time = parse_timestamp(raw)
                .ok_or_else(|| bad(line, END_TIME, raw, "unrecognized timestamp"))?;
            record = record.with_end_time(end_time);
        }
        if let Some(user_type) = optional_cell(Some(self.user_type)) {
            record = record.with_user_type(user_type);
        }
        if let Some(gender) = optional_cell(self.gender) {
            record = record.with_gender(gender);
        }
        if let Some(raw) = optional_cell(self.birth_year) {
            let year = parse_birth_year(raw)
                .map_err(|reason| bad(line, BIRTH_YEAR, raw, reason))?;
            record = record.with_birth_year(year);
        }

        Ok(record)
    }
}

/// Parses a trip table for `city` from any reader.
///
/// # Errors
///
/// Returns [`DataSourceError`] when the header cannot be read or lacks a
/// required column, and the first [`RecordParseError`] under
/// [`ParsePolicy::Abort`].
pub fn parse_trips<R: Read>(reader: R, city: City, policy: ParsePolicy) -> Result<LoadReport> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().map_err(DataSourceError::Header)?.clone();
    let columns = Columns::resolve(&headers)?;
    let capabilities = columns.capabilities();
    debug!(%city, ?columns, ?capabilities, "Resolved trip columns");

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for result in rdr.records() {
        let parsed = match result {
            Ok(row) => columns.parse_row(&row),
            Err(e) => Err(RecordParseError {
                line: e.position().map_or(0, |p| p.line()),
                column: "row",
                value: String::new(),
                reason: e.to_string(),
            }),
        };

        match parsed {
            Ok(record) => records.push(record),
            Err(err) if policy == ParsePolicy::Skip => {
                warn!(error = %err, "Skipping malformed trip row");
                skipped.push(err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    let negative = records.iter().filter(|r| r.duration_seconds < 0.0).count();
    if negative > 0 {
        warn!(%city, negative, "Trips with negative duration included in dataset");
    }

    info!(
        %city,
        records = records.len(),
        skipped = skipped.len(),
        "Trip data parsed"
    );

    Ok(LoadReport {
        dataset: Dataset::new(city, capabilities, records),
        skipped,
    })
}

/// Reads only the header row and reports which optional columns it carries.
pub fn read_capabilities<R: Read>(reader: R) -> Result<Capabilities> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().map_err(DataSourceError::Header)?;
    Ok(Columns::resolve(headers)?.capabilities())
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn parse_duration(raw: &str) -> std::result::Result<f64, &'static str> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err("duration must be finite"),
        Err(_) => Err("not a number"),
    }
}

/// Birth years arrive either as integers or as integral floats (`1992.0`).
fn parse_birth_year(raw: &str) -> std::result::Result<i32, &'static str> {
    let value: f64 = raw.parse().map_err(|_| "not a number")?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err("not a whole year");
    }
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err("year out of range");
    }
    Ok(value as i32)
}

fn required_text(
    line: u64,
    column: &'static str,
    raw: &str,
) -> std::result::Result<String, RecordParseError> {
    if raw.is_empty() {
        return Err(bad(line, column, raw, "value is required"));
    }
    Ok(raw.to_string())
}

fn bad(line: u64, column: &'static str, value: &str, reason: &str) -> RecordParseError {
    RecordParseError {
        line,
        column,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
