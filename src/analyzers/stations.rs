use crate::analyzers::types::{StationPair, StationStats};
use crate::analyzers::utility::mode;
use crate::error::{Error, Result};
use crate::records::Dataset;

impl StationStats {
    /// Most common start station, end station, and start/end combination.
    #[tracing::instrument(skip_all, fields(city = %dataset.city(), trips = dataset.len()))]
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let (start, _) = mode(dataset.iter().map(|r| r.start_station.as_str()))
            .ok_or_else(|| Error::empty("most common start station"))?;
        let (end, _) = mode(dataset.iter().map(|r| r.end_station.as_str()))
            .ok_or_else(|| Error::empty("most common end station"))?;
        let ((pair_start, pair_end), trips) = mode(
            dataset
                .iter()
                .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
        )
        .ok_or_else(|| Error::empty("most common station pair"))?;

        Ok(StationStats {
            most_common_start: start.to_string(),
            most_common_end: end.to_string(),
            most_common_pair: StationPair {
                start: pair_start.to_string(),
                end: pair_end.to_string(),
                trips,
            },
        })
    }
}
