//! Month / weekday restriction of a dataset.

use std::fmt;

use chrono::{Month, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::error::{FilterField, InvalidFilterError};
use crate::records::{Dataset, weekday_name};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Restriction applied to a dataset before aggregation. `None` on either
/// side means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeFilter {
    #[serde(serialize_with = "serialize_month")]
    pub month: Option<Month>,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Option<Weekday>,
}

impl TimeFilter {
    /// Filter that keeps every record.
    pub fn all() -> Self {
        TimeFilter::default()
    }

    /// Builds a filter from user-supplied names. Each side accepts `all` or a
    /// full English name, in any case.
    pub fn parse(month: &str, weekday: &str) -> Result<Self, InvalidFilterError> {
        Ok(TimeFilter {
            month: parse_month(month)?,
            weekday: parse_weekday(weekday)?,
        })
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }

    /// Returns a new dataset holding the records matching both halves of the
    /// filter, in their original order. The input is left untouched.
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        if self.month.is_none() && self.weekday.is_none() {
            return dataset.clone();
        }

        let month = self.month.map(|m| m.number_from_month());
        let filtered = dataset.retain_view(|record| {
            month.is_none_or(|m| record.month() == m)
                && self.weekday.is_none_or(|d| record.weekday() == d)
        });

        debug!(
            city = %dataset.city(),
            filter = %self,
            before = dataset.len(),
            after = filtered.len(),
            "Applied time filter"
        );
        filtered
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.month.map_or("all", |m| m.name());
        let weekday = self.weekday.map_or("all", weekday_name);
        write!(f, "month={month} weekday={weekday}")
    }
}

/// English name of a 1-based month number.
pub fn month_name(number: u32) -> Option<&'static str> {
    let idx = usize::try_from(number.checked_sub(1)?).ok()?;
    MONTHS.get(idx).map(|m| m.name())
}

fn parse_month(raw: &str) -> Result<Option<Month>, InvalidFilterError> {
    let wanted = raw.trim();
    if wanted.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    MONTHS
        .iter()
        .find(|m| m.name().eq_ignore_ascii_case(wanted))
        .copied()
        .map(Some)
        .ok_or_else(|| InvalidFilterError {
            field: FilterField::Month,
            value: raw.to_string(),
        })
}

fn parse_weekday(raw: &str) -> Result<Option<Weekday>, InvalidFilterError> {
    let wanted = raw.trim();
    if wanted.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    WEEKDAYS
        .iter()
        .find(|d| weekday_name(**d).eq_ignore_ascii_case(wanted))
        .copied()
        .map(Some)
        .ok_or_else(|| InvalidFilterError {
            field: FilterField::Weekday,
            value: raw.to_string(),
        })
}

fn serialize_month<S: serde::Serializer>(month: &Option<Month>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(month.map_or("all", |m| m.name()))
}

fn serialize_weekday<S: serde::Serializer>(
    weekday: &Option<Weekday>,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday.map_or("all", weekday_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::at;
    use crate::records::{Capabilities, City, TripRecord};

    /// Ten trips, five in January then five in February, interleaved.
    fn two_months() -> Dataset {
        let records = (0..10)
            .map(|i| {
                let month = if i % 2 == 0 { 1 } else { 2 };
                TripRecord::new(at(month, 1 + i, 8), 60.0, "A", "B").with_trip_id(i.to_string())
            })
            .collect();
        Dataset::new(City::Chicago, Capabilities::default(), records)
    }

    fn ids(dataset: &Dataset) -> Vec<String> {
        dataset
            .iter()
            .filter_map(|r| r.trip_id.clone())
            .collect()
    }

    #[test]
    fn test_parse_case_insensitive() {
        let filter = TimeFilter::parse("FEBRUARY", " monday ").unwrap();
        assert_eq!(filter.month, Some(Month::February));
        assert_eq!(filter.weekday, Some(Weekday::Mon));

        assert_eq!(TimeFilter::parse("All", "ALL").unwrap(), TimeFilter::all());
        assert_eq!(
            TimeFilter::parse("december", "all").unwrap().month,
            Some(Month::December)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        let err = TimeFilter::parse("Febuary", "all").unwrap_err();
        assert_eq!(err.field, FilterField::Month);
        assert_eq!(err.value, "Febuary");

        let err = TimeFilter::parse("all", "mon").unwrap_err();
        assert_eq!(err.field, FilterField::Weekday);
    }

    #[test]
    fn test_all_is_identity() {
        let dataset = two_months();
        assert_eq!(TimeFilter::all().apply(&dataset), dataset);
    }

    #[test]
    fn test_month_keeps_order() {
        let dataset = two_months();
        let february = TimeFilter::all().with_month(Month::February).apply(&dataset);

        assert_eq!(ids(&february), vec!["1", "3", "5", "7", "9"]);
        assert!(february.iter().all(|r| r.month() == 2));
        // input is still whole
        assert_eq!(dataset.len(), 10);
    }

    #[test]
    fn test_month_and_weekday_compose() {
        let dataset = two_months();
        // 2017-02-06 is the only Monday among the February trips (days 2,4,6,8,10).
        let filter = TimeFilter::parse("february", "monday").unwrap();
        let result = filter.apply(&dataset);
        assert_eq!(ids(&result), vec!["5"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let dataset = two_months();
        let june = TimeFilter::all().with_month(Month::June).apply(&dataset);
        assert!(june.is_empty());
        assert_eq!(june.city(), City::Chicago);
    }

    #[test]
    fn test_apply_is_idempotent_subset() {
        let dataset = two_months();
        let filter = TimeFilter::all().with_weekday(Weekday::Sat);
        let once = filter.apply(&dataset);
        let twice = filter.apply(&once);

        assert_eq!(once, twice);
        assert!(once.iter().all(|r| dataset.records().contains(r)));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_display() {
        let filter = TimeFilter::all().with_month(Month::March);
        assert_eq!(filter.to_string(), "month=March weekday=all");
    }
}
