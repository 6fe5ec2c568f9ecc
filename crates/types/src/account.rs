//! Account model used for ownership and capability checks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::id::AccountId;

/// A principal that owns messages and carries a flattened set of permission
/// strings. Role resolution happens in the host platform; by the time an
/// account reaches this workspace its grants are already flattened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Numeric account identifier.
    pub id: AccountId,
    /// Display name, substituted into `[message:author:name]` tokens.
    pub name: String,
    /// Mail address, substituted into `[message:author:mail]` tokens.
    pub mail: String,
    /// Flattened permission grants.
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl Account {
    /// Build an account with no permission grants.
    pub fn new(id: AccountId, name: impl Into<String>, mail: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            mail: mail.into(),
            permissions: BTreeSet::new(),
        }
    }

    /// Add a permission grant, builder style.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Returns `true` when the account holds the named permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}
