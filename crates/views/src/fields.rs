//! Row-field renderer plugins and their registry.
//!
//! The host's view-configuration system addresses renderers by stable string
//! identifiers. A renderer is a per-row, per-request decision: given the row
//! and the requesting principal it either emits a rendered field or nothing.

use std::sync::Arc;

use indexmap::IndexMap;
use missive_types::{Account, MessageId};
use tracing::debug;
use url::Url;

/// A displayed result row. Rows reference their message by id; renderers
/// resolve the record themselves and soft-fail when it is gone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResultRow {
    /// Id of the message the row displays.
    pub message_id: MessageId,
}

impl ResultRow {
    /// Build a row for a message id.
    pub fn new(message_id: MessageId) -> Self {
        Self { message_id }
    }
}

/// An actionable link: label plus resolved target URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Link {
    pub text: String,
    pub url: Url,
}

impl Link {
    /// Build a link from a label and target.
    pub fn new(text: impl Into<String>, url: Url) -> Self {
        Self { text: text.into(), url }
    }
}

/// Output of a row-field renderer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RenderedField {
    /// An actionable link.
    Link(Link),
    /// Plain text.
    Text(String),
}

/// A row-field renderer plugin. Stateless across invocations; `None` means
/// the field renders nothing for this row (denied access, unresolvable
/// record), never an error.
pub trait RowFieldRenderer: Send + Sync {
    /// Stable identifier the host's view configuration references.
    fn plugin_id(&self) -> &'static str;

    /// Render the field for one row on behalf of `account`.
    fn render(&self, row: &ResultRow, account: &Account) -> Option<RenderedField>;
}

/// Registry of renderer plugins keyed by their stable identifiers.
#[derive(Default)]
pub struct FieldPluginRegistry {
    renderers: IndexMap<&'static str, Arc<dyn RowFieldRenderer>>,
}

impl FieldPluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer. Registering under an already-used id replaces
    /// the previous renderer.
    pub fn register(&mut self, renderer: Arc<dyn RowFieldRenderer>) {
        let id = renderer.plugin_id();
        if self.renderers.insert(id, renderer).is_some() {
            debug!(plugin_id = id, "Replaced field plugin registration");
        }
    }

    /// Look up a renderer by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn RowFieldRenderer>> {
        self.renderers.get(id).cloned()
    }

    /// Registered plugin ids, in registration order.
    pub fn plugin_ids(&self) -> Vec<&'static str> {
        self.renderers.keys().copied().collect()
    }

    /// Render the named field for a row. Unknown ids render nothing; the
    /// host-facing lookup is total.
    pub fn render(&self, id: &str, row: &ResultRow, account: &Account) -> Option<RenderedField> {
        self.renderers.get(id)?.render(row, account)
    }
}
