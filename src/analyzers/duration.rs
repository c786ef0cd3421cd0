use crate::analyzers::types::DurationStats;
use crate::analyzers::utility::sum;
use crate::error::{Error, Result};
use crate::records::Dataset;

const SECONDS_PER_HOUR: f64 = 3600.0;

impl DurationStats {
    /// Total and mean trip duration. Negative durations are summed as-is.
    #[tracing::instrument(skip_all, fields(city = %dataset.city(), trips = dataset.len()))]
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(Error::empty("mean trip duration"));
        }

        let trip_count = dataset.len();
        let total_seconds = sum(dataset.iter().map(|r| r.duration_seconds));

        Ok(DurationStats {
            trip_count,
            total_seconds,
            mean_seconds: total_seconds / trip_count as f64,
        })
    }

    pub fn total_hours(&self) -> f64 {
        self.total_seconds / SECONDS_PER_HOUR
    }

    pub fn mean_hours(&self) -> f64 {
        self.mean_seconds / SECONDS_PER_HOUR
    }
}
