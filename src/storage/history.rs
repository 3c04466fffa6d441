use crate::session::SessionRecord;
use crate::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Key under which a user's completed sessions are stored
pub fn history_key(user_id: &str) -> String {
    format!("interview_history_{}", user_id)
}

/// Append-only log of completed sessions, keyed by user
///
/// Writers are assumed to be single per key; concurrent appends to the same
/// key are resolved by the implementation, last writer wins at worst.
pub trait HistoryStore: Send + Sync {
    /// All records stored under `key`, oldest first
    fn get(&self, key: &str) -> Result<Vec<SessionRecord>>;

    /// Add one record to the end of `key`'s list
    fn append(&self, key: &str, record: SessionRecord) -> Result<()>;

    /// Replace `key`'s list
    fn set(&self, key: &str, records: Vec<SessionRecord>) -> Result<()>;
}

/// In-memory store, cheap to clone and share
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    entries: Arc<RwLock<HashMap<String, Vec<SessionRecord>>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all keys
    pub fn len(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn get(&self, key: &str) -> Result<Vec<SessionRecord>> {
        Ok(self.entries.read().get(key).cloned().unwrap_or_default())
    }

    fn append(&self, key: &str, record: SessionRecord) -> Result<()> {
        self.entries
            .write()
            .entry(key.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    fn set(&self, key: &str, records: Vec<SessionRecord>) -> Result<()> {
        self.entries.write().insert(key.to_string(), records);
        Ok(())
    }
}
