//! Capability checks for message operations.

use std::fmt;

use missive_types::{Account, Message, TemplateId};
use tracing::debug;

/// Blanket grant that bypasses all message access control.
pub const BYPASS_ACCESS_PERMISSION: &str = "bypass message access control";

/// Administrative grant covering every operation on every message.
pub const ADMINISTER_MESSAGES_PERMISSION: &str = "administer messages";

/// An operation a principal may perform on a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    View,
    Update,
    Delete,
}

impl Operation {
    /// String form used inside permission names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission granting `operation` on any message of the given template,
/// regardless of owner (for example `delete any dummy_message message`).
pub fn any_template_permission(operation: Operation, template: &TemplateId) -> String {
    format!("{operation} any {template} message")
}

/// Permission granting `operation` on the principal's own messages of the
/// given template (for example `delete own dummy_message message`).
pub fn own_template_permission(operation: Operation, template: &TemplateId) -> String {
    format!("{operation} own {template} message")
}

/// Stateless capability check: may `account` perform `operation` on
/// `message`? Computed per request; implementations hold no state across
/// invocations.
pub trait MessageAccessHandler: Send + Sync {
    fn access(&self, message: &Message, operation: Operation, account: &Account) -> bool;
}

/// Permission-string access handler implementing the message permission
/// matrix: bypass and administer grants cover everything, per-template
/// grants come in `any` and owner-scoped `own` variants.
#[derive(Debug, Default)]
pub struct PermissionAccessHandler;

impl PermissionAccessHandler {
    pub fn new() -> Self {
        Self
    }
}

impl MessageAccessHandler for PermissionAccessHandler {
    fn access(&self, message: &Message, operation: Operation, account: &Account) -> bool {
        if account.has_permission(BYPASS_ACCESS_PERMISSION) || account.has_permission(ADMINISTER_MESSAGES_PERMISSION) {
            return true;
        }

        if account.has_permission(&any_template_permission(operation, &message.template)) {
            return true;
        }

        if message.owner == account.id && account.has_permission(&own_template_permission(operation, &message.template)) {
            return true;
        }

        debug!(
            message_id = %message.id,
            operation = %operation,
            account_id = %account.id,
            "Access denied"
        );
        false
    }
}
