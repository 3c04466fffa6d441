use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Account {
    /// Create an account with a fresh identifier
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Offline account keyed by name, so history carries across runs
    pub fn local(name: &str) -> Self {
        let name = name.trim();
        Self {
            id: format!("local-{}", name.to_lowercase()),
            name: name.to_string(),
            email: String::new(),
        }
    }
}

/// Read-only view of the authenticated user
pub trait AccountStore: Send + Sync {
    fn current(&self) -> Option<Account>;
}

/// Holds the signed-in account in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    current: Arc<RwLock<Option<Account>>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(account: Account) -> Self {
        let store = Self::new();
        store.sign_in(account);
        store
    }

    pub fn sign_in(&self, account: Account) {
        *self.current.write() = Some(account);
    }

    pub fn sign_out(&self) {
        *self.current.write() = None;
    }
}

impl AccountStore for MemoryAccountStore {
    fn current(&self) -> Option<Account> {
        self.current.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let store = MemoryAccountStore::new();
        assert!(store.current().is_none());

        let account = Account::new("Grace", "grace@example.com");
        store.sign_in(account.clone());
        assert_eq!(store.current(), Some(account));

        store.sign_out();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_accounts_get_distinct_ids() {
        let a = Account::new("A", "a@example.com");
        let b = Account::new("B", "b@example.com");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_local_account_id_is_stable() {
        assert_eq!(Account::local(" Ada ").id, Account::local("ada").id);
        assert_eq!(Account::local("Ada").name, "Ada");
    }
}
