//! Resolves cities to their trip tables on disk and loads them.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DataSourceError, Result};
use crate::parser::{LoadReport, ParsePolicy, parse_trips, read_capabilities};
use crate::records::{Capabilities, City};

/// Read-only access to the per-city trip tables under one directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
    policy: ParsePolicy,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        RecordStore {
            data_dir: data_dir.into(),
            policy: ParsePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }

    /// Loads every trip for `city`, deriving month, weekday and hour.
    ///
    /// # Errors
    ///
    /// [`DataSourceError`] if the file is missing, unreadable or lacks a
    /// required column; [`RecordParseError`](crate::error::RecordParseError)
    /// for the first malformed row under [`ParsePolicy::Abort`].
    #[tracing::instrument(skip(self, city), fields(city = %city, policy = ?self.policy))]
    pub fn load(&self, city: City) -> Result<LoadReport> {
        let path = self.path_for(city);
        debug!(path = %path.display(), "Opening trip data");
        let reader = open(&path)?;
        parse_trips(reader, city, self.policy)
    }

    /// Like [`RecordStore::load`], taking the city as user input.
    pub fn load_named(&self, city: &str) -> Result<LoadReport> {
        let city: City = city.parse()?;
        self.load(city)
    }

    /// Capability flags of a city's source, from its header alone.
    pub fn capabilities(&self, city: City) -> Result<Capabilities> {
        read_capabilities(open(&self.path_for(city))?)
    }
}

fn open(path: &Path) -> std::result::Result<BufReader<File>, DataSourceError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| DataSourceError::Open {
            path: path.to_path_buf(),
            source,
        })
}
