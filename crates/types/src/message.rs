//! Message instance model and the cached argument map.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::{AccountId, MessageId, TemplateId};

/// Ordered map from full token text (brackets included, for example
/// `[message:author:name]`) to its computed replacement. Order follows the
/// token's first appearance in the template text.
pub type ArgumentMap = IndexMap<String, String>;

/// A persisted message instance generated from a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identifier.
    pub id: MessageId,
    /// Machine name of the template this message was generated from.
    pub template: TemplateId,
    /// Owning account.
    pub owner: AccountId,
    /// Creation timestamp, assigned by the store.
    pub created: DateTime<Utc>,
    /// Cached token replacements, recomputed when the template changes
    /// according to the configured update policy.
    #[serde(default)]
    pub arguments: ArgumentMap,
}

/// Fields supplied by the caller when creating a message; the store assigns
/// the id and creation timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Template the message is generated from.
    pub template: TemplateId,
    /// Owning account.
    pub owner: AccountId,
    /// Pre-computed argument cache, usually filled by the compose pipeline.
    #[serde(default)]
    pub arguments: ArgumentMap,
}

impl NewMessage {
    /// Build a new-message request with an empty argument cache.
    pub fn new(template: impl Into<TemplateId>, owner: AccountId) -> Self {
        Self {
            template: template.into(),
            owner,
            arguments: ArgumentMap::new(),
        }
    }
}
