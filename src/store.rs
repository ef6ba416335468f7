//! Plan persistence
//!
//! The questionnaire result is kept as a single JSON blob on disk, overwritten
//! whenever a new plan is generated.

use crate::error::PlanError;
use crate::types::PlanRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default file name for the stored record
pub const DEFAULT_STORE_FILE: &str = "nutri-form.json";

/// File-backed store for the latest plan record
#[derive(Debug, Clone)]
pub struct PlanStore {
    path: PathBuf,
}

impl PlanStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record, `None` if nothing has been saved yet
    pub fn load(&self) -> Result<Option<PlanRecord>, PlanError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PlanError::Io(e)),
        };

        let record = PlanRecord::from_json(&json).map_err(|e| {
            PlanError::Store(format!("corrupt record at {}: {e}", self.path.display()))
        })?;
        tracing::debug!(path = %self.path.display(), "loaded plan record");
        Ok(Some(record))
    }

    /// Replace the stored record
    pub fn save(&self, record: &PlanRecord) -> Result<(), PlanError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = record.to_json()?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "saved plan record");
        Ok(())
    }

    /// Remove the stored record; a missing file is not an error
    pub fn clear(&self) -> Result<(), PlanError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PlanError::Io(e)),
        }
    }
}
