//! JSON file-backed history store

use super::history::HistoryStore;
use crate::session::SessionRecord;
use crate::{InterviewError, Result};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

type Document = BTreeMap<String, Vec<SessionRecord>>;

/// One writer lock per history file, shared by every store in the process
static PATH_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let locks = PATH_LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
    Arc::clone(locks.lock().entry(key).or_default())
}

/// Persists every key in one JSON document
///
/// Each write rewrites the document through its own temporary file and a
/// rename, so a crash never leaves a half-written history behind. Every store
/// opened on the same path in this process shares one writer lock; other
/// processes are not coordinated.
#[derive(Debug)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock = lock_for(&path);
        Self { path, lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            persistence_error(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            persistence_error(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, document: &Document) -> Result<()> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| {
            persistence_error(format!("Failed to create {}: {}", parent.display(), e))
        })?;

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| persistence_error(format!("Failed to serialize history: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| {
            persistence_error(format!("Failed to create temp file in {}: {}", parent.display(), e))
        })?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| {
                persistence_error(format!("Failed to write {}: {}", tmp.path().display(), e))
            })?;
        tmp.persist(&self.path).map_err(|e| {
            warn!("Could not replace {}: {}", self.path.display(), e.error);
            persistence_error(format!("Failed to replace {}: {}", self.path.display(), e.error))
        })?;

        debug!("Saved history document to {}", self.path.display());
        Ok(())
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn get(&self, key: &str) -> Result<Vec<SessionRecord>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key).unwrap_or_default())
    }

    fn append(&self, key: &str, record: SessionRecord) -> Result<()> {
        let _guard = self.lock.lock();
        let mut document = self.load()?;
        document.entry(key.to_string()).or_default().push(record);
        self.save(&document)
    }

    fn set(&self, key: &str, records: Vec<SessionRecord>) -> Result<()> {
        let _guard = self.lock.lock();
        let mut document = self.load()?;
        document.insert(key.to_string(), records);
        self.save(&document)
    }
}

fn persistence_error(message: String) -> InterviewError {
    InterviewError::PersistenceFailed(message)
}
