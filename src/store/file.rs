//! File-backed pellet log in append-only JSONL format.
//!
//! Each pellet is one JSON line. The file is the durable event log for
//! single-process deployments; hosted deployments replace this with
//! their own `EventLog` implementation over the storage transport.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::Pellet;
use crate::error::{EngineError, Result};
use crate::store::EventLog;

/// Append-only JSONL pellet log.
#[derive(Debug, Clone)]
pub struct FileEventLog {
    /// Path to the log file.
    path: PathBuf,
}

impl FileEventLog {
    /// Create a new file log at the given path.
    ///
    /// The file is created lazily on first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all events from the log, in append order.
    pub fn read_all(&self) -> Result<Vec<Pellet>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| EngineError::storage(self.path.clone(), e))?;

        let mut events = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let pellet: Pellet = serde_json::from_str(line).map_err(|e| {
                EngineError::serde(format!(
                    "failed to parse pellet on line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            events.push(pellet);
        }

        Ok(events)
    }
}

impl EventLog for FileEventLog {
    fn append(&self, pellet: &Pellet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| EngineError::storage(parent.to_path_buf(), e))?;
        }

        let json = serde_json::to_string(pellet)
            .map_err(|e| EngineError::serde(format!("failed to serialize pellet: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| EngineError::storage(self.path.clone(), e))?;

        writeln!(file, "{}", json).map_err(|e| EngineError::storage(self.path.clone(), e))?;

        Ok(())
    }

    fn events_for_user(&self, user_id: &str) -> Result<Vec<Pellet>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|p| p.creator_id == user_id)
            .collect())
    }

    fn events_for_plate(&self, plate: &str) -> Result<Vec<Pellet>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|p| p.plate == plate)
            .collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }
}
