//! Descriptive statistics over a filtered trip dataset.
//!
//! Each aggregator reads a [`Dataset`](crate::records::Dataset) and returns
//! an independent result type from [`types`]. Modes break ties in favour of
//! the value seen first, so results are reproducible run to run.

pub mod duration;
pub mod report;
pub mod stations;
pub mod time;
pub mod types;
pub mod users;
pub mod utility;

pub use types::{
    BirthYearStats, CityReport, DurationStats, StationPair, StationStats, TimeStats, UserStats,
};
