// Where the responses are kept between two runs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::survey::io_json::parse_records;
use crate::survey::*;

/// An ordered list of responses that only grows.
pub trait RecordStore {
    /// All the responses, in the order they were added.
    fn load(&self) -> SurveyResult<Vec<SurveyRecord>>;

    /// Rewrites the whole content of the store.
    fn replace(&mut self, records: &[SurveyRecord]) -> SurveyResult<()>;

    fn extend(&mut self, records: &[SurveyRecord]) -> SurveyResult<()> {
        let mut all = self.load()?;
        all.extend_from_slice(records);
        self.replace(&all)
    }

    fn append(&mut self, record: &SurveyRecord) -> SurveyResult<()> {
        self.extend(std::slice::from_ref(record))
    }
}

/// Keeps the responses as a JSON array in `<directory>/<key>.json`.
///
/// The file is read and written in full for every change. A missing file is an
/// empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(directory: &Path, key: &str) -> JsonFileStore {
        JsonFileStore {
            path: directory.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> SurveyResult<Vec<SurveyRecord>> {
        if !self.path.exists() {
            debug!("load: {} does not exist yet", self.path_str());
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path).context(ReadingStoreSnafu {
            path: self.path_str(),
        })?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records = parse_records(&contents)?;
        debug!("load: {} responses in {}", records.len(), self.path_str());
        Ok(records)
    }

    fn replace(&mut self, records: &[SurveyRecord]) -> SurveyResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context(WritingStoreSnafu {
                    path: self.path_str(),
                })?;
            }
        }
        let js = serde_json::to_string_pretty(records).context(SerializingJsonSnafu {})?;
        fs::write(&self.path, js).context(WritingStoreSnafu {
            path: self.path_str(),
        })?;
        info!(
            "replace: {} responses written to {}",
            records.len(),
            self.path_str()
        );
        Ok(())
    }
}

/// A store that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SurveyRecord>,
}

impl RecordStore for MemoryStore {
    fn load(&self) -> SurveyResult<Vec<SurveyRecord>> {
        Ok(self.records.clone())
    }

    fn replace(&mut self, records: &[SurveyRecord]) -> SurveyResult<()> {
        self.records = records.to_vec();
        Ok(())
    }

    fn extend(&mut self, records: &[SurveyRecord]) -> SurveyResult<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }
}
