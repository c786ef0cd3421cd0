//! Result types produced by the aggregators.

use chrono::Weekday;
use indexmap::IndexMap;
use serde::Serialize;

use crate::filter::TimeFilter;
use crate::records::{Capabilities, City, serialize_weekday};

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub most_common_month: u32,
    pub most_common_month_name: &'static str,
    #[serde(serialize_with = "serialize_weekday")]
    pub most_common_weekday: Weekday,
    pub most_common_hour: u32,
}

/// A start/end station combination and the number of trips that took it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
    pub trips: usize,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub most_common_start: String,
    pub most_common_end: String,
    pub most_common_pair: StationPair,
}

/// Total and average trip duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trip_count: usize,
    pub total_seconds: f64,
    pub mean_seconds: f64,
}

/// Birth-year extremes and mode. `earliest_year` is the numerically smallest
/// year (oldest rider), `most_recent_year` the largest (youngest rider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest_year: i32,
    pub most_recent_year: i32,
    pub most_common_year: i32,
}

/// Rider breakdown. Optional parts are absent, not empty, when the city's
/// source does not carry the column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub type_counts: IndexMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_counts: Option<IndexMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_years: Option<BirthYearStats>,
}

/// Every statistic for one filtered dataset, as handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityReport {
    pub city: City,
    pub filter: TimeFilter,
    pub trips: usize,
    pub capabilities: Capabilities,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}
