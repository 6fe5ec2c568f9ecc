//! The `delete_button` row-field plugin.

use std::sync::Arc;

use missive_store::MessageStore;
use missive_types::Account;
use tracing::debug;

use crate::access::{MessageAccessHandler, Operation};
use crate::fields::{Link, RenderedField, ResultRow, RowFieldRenderer};
use crate::routes::{RouteProvider, MESSAGE_DELETE_FORM_ROUTE};

/// Stable identifier the host's view configuration references.
pub const DELETE_BUTTON_PLUGIN_ID: &str = "delete_button";

/// Renders a "Delete" link targeting the message's delete confirmation form,
/// for principals granted the `delete` operation on the row's message. Rows
/// whose message cannot be resolved render nothing.
pub struct DeleteButton {
    messages: Arc<dyn MessageStore>,
    access: Arc<dyn MessageAccessHandler>,
    routes: Arc<RouteProvider>,
}

impl DeleteButton {
    /// Build the plugin over the provided seams.
    pub fn new(messages: Arc<dyn MessageStore>, access: Arc<dyn MessageAccessHandler>, routes: Arc<RouteProvider>) -> Self {
        Self { messages, access, routes }
    }
}

impl RowFieldRenderer for DeleteButton {
    fn plugin_id(&self) -> &'static str {
        DELETE_BUTTON_PLUGIN_ID
    }

    fn render(&self, row: &ResultRow, account: &Account) -> Option<RenderedField> {
        let message = match self.messages.load(row.message_id) {
            Ok(Some(message)) => message,
            Ok(None) => {
                debug!(message_id = %row.message_id, "Row references a missing message; rendering nothing");
                return None;
            }
            Err(error) => {
                debug!(message_id = %row.message_id, error = %error, "Message load failed; rendering nothing");
                return None;
            }
        };

        if !self.access.access(&message, Operation::Delete, account) {
            return None;
        }

        let url = match self.routes.url_for(MESSAGE_DELETE_FORM_ROUTE, &message.id) {
            Ok(url) => url,
            Err(error) => {
                debug!(message_id = %message.id, error = %error, "Route resolution failed; rendering nothing");
                return None;
            }
        };

        Some(RenderedField::Link(Link::new("Delete", url)))
    }
}
