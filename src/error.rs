//! Error taxonomy for loading, filtering and aggregating trip data.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for the library. Each category is a distinct variant so
/// callers can re-prompt, skip or abort as appropriate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    RecordParse(#[from] RecordParseError),

    #[error("cannot compute {statistic} over an empty dataset")]
    EmptyDataset { statistic: &'static str },

    #[error(transparent)]
    InvalidFilter(#[from] InvalidFilterError),
}

impl Error {
    pub(crate) fn empty(statistic: &'static str) -> Self {
        Error::EmptyDataset { statistic }
    }
}

/// The city's source could not be resolved or read as a trip table.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("unknown city: {0:?}")]
    UnknownCity(String),

    #[error("failed to open trip data at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read trip data header: {0}")]
    Header(#[source] csv::Error),

    #[error("trip data is missing required column {column:?}")]
    MissingColumn { column: &'static str },
}

/// A single malformed row, with enough context to find it in the source.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: invalid {column} value {value:?}: {reason}")]
pub struct RecordParseError {
    pub line: u64,
    pub column: &'static str,
    pub value: String,
    pub reason: String,
}

/// Which half of a time filter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Month,
    Weekday,
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterField::Month => f.write_str("month"),
            FilterField::Weekday => f.write_str("weekday"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field} filter {value:?}, expected \"all\" or a full {field} name")]
pub struct InvalidFilterError {
    pub field: FilterField,
    pub value: String,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_message_names_field() {
        let err = Error::from(InvalidFilterError {
            field: FilterField::Weekday,
            value: "Funday".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "invalid weekday filter \"Funday\", expected \"all\" or a full weekday name"
        );
    }

    #[test]
    fn test_record_parse_message_has_line() {
        let err = RecordParseError {
            line: 7,
            column: "Start Time",
            value: "yesterday".to_string(),
            reason: "unrecognized timestamp".to_string(),
        };
        assert!(err.to_string().starts_with("line 7: invalid Start Time"));
    }

    #[test]
    fn test_empty_dataset_is_distinct() {
        let err = Error::empty("mean trip duration");
        assert!(matches!(err, Error::EmptyDataset { statistic } if statistic == "mean trip duration"));
    }
}
