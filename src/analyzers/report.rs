use tracing::info;

use crate::analyzers::types::{CityReport, DurationStats, StationStats, TimeStats, UserStats};
use crate::error::Result;
use crate::filter::TimeFilter;
use crate::records::Dataset;

impl CityReport {
    /// Runs every aggregator over an already filtered dataset.
    pub fn build(dataset: &Dataset, filter: TimeFilter) -> Result<Self> {
        let report = CityReport {
            city: dataset.city(),
            filter,
            trips: dataset.len(),
            capabilities: dataset.capabilities(),
            time: TimeStats::from_dataset(dataset)?,
            stations: StationStats::from_dataset(dataset)?,
            durations: DurationStats::from_dataset(dataset)?,
            users: UserStats::from_dataset(dataset),
        };

        info!(city = %report.city, filter = %report.filter, trips = report.trips, "Report built");
        Ok(report)
    }
}
