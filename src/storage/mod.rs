//! Persistence collaborators
//!
//! The session core never touches ambient storage; it is handed a
//! [`HistoryStore`] and an [`AccountStore`] explicitly.

mod accounts;
mod file;
mod history;

pub use accounts::{Account, AccountStore, MemoryAccountStore};
pub use file::JsonFileHistoryStore;
pub use history::{history_key, HistoryStore, MemoryHistoryStore};
