//! Account lookup seam.

use std::collections::HashMap;
use std::sync::Mutex;

use missive_types::{Account, AccountId};

/// Shared trait implemented by account lookup backends. The host platform
/// owns account management; this seam only resolves owners for token
/// substitution and capability checks.
pub trait AccountDirectory: Send + Sync {
    /// Load an account by id.
    fn load(&self, id: AccountId) -> Option<Account>;
}

/// In-memory account directory.
#[derive(Default)]
pub struct InMemoryAccountDirectory {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account.
    pub fn insert(&self, account: Account) {
        self.accounts.lock().expect("account lock poisoned").insert(account.id, account);
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn load(&self, id: AccountId) -> Option<Account> {
        self.accounts.lock().expect("account lock poisoned").get(&id).cloned()
    }
}
