use crate::analyzers::types::TimeStats;
use crate::analyzers::utility::mode;
use crate::error::{Error, Result};
use crate::filter::month_name;
use crate::records::Dataset;

impl TimeStats {
    /// Mode of the month, weekday and start hour of every trip.
    #[tracing::instrument(skip_all, fields(city = %dataset.city(), trips = dataset.len()))]
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let (month, _) = mode(dataset.iter().map(|r| r.month()))
            .ok_or_else(|| Error::empty("most common month"))?;
        let (weekday, _) = mode(dataset.iter().map(|r| r.weekday()))
            .ok_or_else(|| Error::empty("most common weekday"))?;
        let (hour, _) = mode(dataset.iter().map(|r| r.hour()))
            .ok_or_else(|| Error::empty("most common hour"))?;

        Ok(TimeStats {
            most_common_month: month,
            most_common_month_name: month_name(month).unwrap_or_default(),
            most_common_weekday: weekday,
            most_common_hour: hour,
        })
    }
}
