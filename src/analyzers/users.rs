use indexmap::IndexMap;
use tracing::debug;

use crate::analyzers::types::{BirthYearStats, UserStats};
use crate::analyzers::utility::{mode, ranked, tally};
use crate::error::{Error, Result};
use crate::records::Dataset;

impl UserStats {
    /// User-type counts, plus gender counts and birth-year statistics for
    /// cities whose source carries those columns. Valid on an empty dataset.
    ///
    /// `birth_years` is left out when none of the selected trips has a birth
    /// year, even if the city's source has the column.
    #[tracing::instrument(skip_all, fields(city = %dataset.city(), trips = dataset.len()))]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let type_counts = count_values(dataset.iter().filter_map(|r| r.user_type.as_deref()));

        let capabilities = dataset.capabilities();
        let gender_counts = capabilities
            .has_gender
            .then(|| count_values(dataset.iter().filter_map(|r| r.gender.as_deref())));

        let birth_years = if capabilities.has_birth_year {
            BirthYearStats::from_dataset(dataset).ok()
        } else {
            None
        };

        debug!(
            user_types = type_counts.len(),
            genders = gender_counts.as_ref().map(|g| g.len()),
            birth_years = birth_years.is_some(),
            "User stats computed"
        );

        UserStats {
            type_counts,
            gender_counts,
            birth_years,
        }
    }
}

impl BirthYearStats {
    /// Min, max and mode over the trips that carry a birth year.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyDataset`] when no trip in the dataset has a birth year.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let years = || dataset.iter().filter_map(|r| r.birth_year);

        let (most_common_year, _) = mode(years()).ok_or_else(|| Error::empty("birth year"))?;
        let earliest_year = years().min().unwrap_or(most_common_year);
        let most_recent_year = years().max().unwrap_or(most_common_year);

        Ok(BirthYearStats {
            earliest_year,
            most_recent_year,
            most_common_year,
        })
    }
}

fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> IndexMap<String, usize> {
    ranked(tally(values))
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}
