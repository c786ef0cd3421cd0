//! Trip records and the in-memory dataset they are loaded into.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Serialize, Serializer};

use crate::error::DataSourceError;

/// Number of raw rows shown per window when paging through a dataset.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Cities with a known trip source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// File name of the city's trip table inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new_york_city" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(DataSourceError::UnknownCity(s.to_string())),
        }
    }
}

/// Optional columns a city's source carries, fixed once at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// One bike-share trip. The first nine fields mirror the source columns and
/// are what raw-row display serializes; the time projections are derived
/// from `start_time` on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub trip_id: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(serialize_with = "serialize_optional_timestamp")]
    pub end_time: Option<NaiveDateTime>,
    pub duration_seconds: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    #[serde(skip)]
    month: u32,
    #[serde(skip)]
    weekday: Weekday,
    #[serde(skip)]
    hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        duration_seconds: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        TripRecord {
            trip_id: None,
            start_time,
            end_time: None,
            duration_seconds,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_trip_id(mut self, trip_id: impl Into<String>) -> Self {
        self.trip_id = Some(trip_id.into());
        self
    }

    pub fn with_end_time(mut self, end_time: NaiveDateTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    /// Month of `start_time`, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Hour of `start_time`, 0-23.
    pub fn hour(&self) -> u32 {
        self.hour
    }
}

/// Ordered trips for a single city.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    city: City,
    capabilities: Capabilities,
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: City, capabilities: Capabilities, records: Vec<TripRecord>) -> Self {
        Dataset {
            city,
            capabilities,
            records,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    /// Narrower dataset of the same city holding the records that satisfy
    /// `keep`, in their original order.
    pub fn retain_view<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&TripRecord) -> bool,
    {
        Dataset {
            city: self.city,
            capabilities: self.capabilities,
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// The literal window `[offset, offset + limit)`, clamped to the dataset.
    pub fn page(&self, offset: usize, limit: usize) -> &[TripRecord] {
        let start = offset.min(self.records.len());
        let end = offset.saturating_add(limit).min(self.records.len());
        &self.records[start..end]
    }

    /// Successive windows of `size` records, starting at `offset`.
    pub fn pages(&self, offset: usize, size: usize) -> Pages<'_> {
        Pages {
            dataset: self,
            offset,
            size,
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Iterator over raw-row display windows. Yields nothing once the offset
/// passes the end, or at all when `size` is zero.
pub struct Pages<'a> {
    dataset: &'a Dataset,
    offset: usize,
    size: usize,
}

impl<'a> Iterator for Pages<'a> {
    type Item = &'a [TripRecord];

    fn next(&mut self) -> Option<Self::Item> {
        if self.size == 0 || self.offset >= self.dataset.len() {
            return None;
        }
        let page = self.dataset.page(self.offset, self.size);
        self.offset = self.offset.saturating_add(self.size);
        Some(page)
    }
}

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub(crate) fn serialize_weekday<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

fn serialize_optional_timestamp<S: Serializer>(
    ts: &Option<NaiveDateTime>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => serialize_timestamp(ts, s),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, month, day)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap()
    }

    pub(crate) fn trip(start: &str, end: &str) -> TripRecord {
        TripRecord::new(at(1, 2, 9), 60.0, start, end)
    }

    fn numbered(n: usize) -> Dataset {
        let records = (0..n)
            .map(|i| trip("A", "B").with_trip_id(i.to_string()))
            .collect();
        Dataset::new(City::Chicago, Capabilities::default(), records)
    }

    #[test]
    fn test_city_from_str_is_case_insensitive() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!(" NEW YORK CITY ".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("nyc".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("washington".parse::<City>().unwrap(), City::Washington);
    }

    #[test]
    fn test_city_from_str_unknown() {
        let err = "boston".parse::<City>().unwrap_err();
        assert!(matches!(err, DataSourceError::UnknownCity(ref c) if c == "boston"));
    }

    #[test]
    fn test_derived_fields() {
        // 2017-01-02 was a Monday
        let record = TripRecord::new(at(1, 2, 17), 300.0, "A", "B");
        assert_eq!(record.month(), 1);
        assert_eq!(record.weekday(), Weekday::Mon);
        assert_eq!(record.hour(), 17);
    }

    #[test]
    fn test_page_windows_without_gaps() {
        let dataset = numbered(8);

        let first = dataset.page(0, 5);
        let second = dataset.page(5, 5);
        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 3);
        assert_eq!(first[4].trip_id.as_deref(), Some("4"));
        assert_eq!(second[0].trip_id.as_deref(), Some("5"));
        assert!(dataset.page(10, 5).is_empty());
    }

    #[test]
    fn test_pages_advance_by_size() {
        let dataset = numbered(8);
        let sizes: Vec<usize> = dataset.pages(0, DEFAULT_PAGE_SIZE).map(|page| page.len()).collect();
        assert_eq!(sizes, vec![5, 3]);
        assert_eq!(dataset.pages(0, 0).count(), 0);
    }

    #[test]
    fn test_pages_with_huge_size() {
        let dataset = numbered(8);
        let mut pages = dataset.pages(1, usize::MAX);
        assert_eq!(pages.next().map(|page| page.len()), Some(7));
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_serialize_first_nine_columns() {
        let record = TripRecord::new(at(3, 4, 8), 120.5, "Canal St", "Clark St")
            .with_trip_id("42")
            .with_user_type("Subscriber")
            .with_birth_year(1990);
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 9);
        assert_eq!(obj["start_time"], "2017-03-04 08:15:00");
        assert!(obj["end_time"].is_null());
        assert_eq!(obj["birth_year"], 1990);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
    }
}
