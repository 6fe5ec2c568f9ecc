//! The `message_text` row-field plugin.

use std::sync::Arc;

use missive_engine::render_text;
use missive_store::{MessageStore, TemplateStore};
use missive_types::Account;
use tracing::debug;

use crate::fields::{RenderedField, ResultRow, RowFieldRenderer};

/// Stable identifier the host's view configuration references.
pub const MESSAGE_TEXT_PLUGIN_ID: &str = "message_text";

/// Renders the message's body: the template's text rows with the cached
/// arguments substituted in, joined by newlines. Unresolvable rows render
/// nothing.
pub struct MessageText {
    messages: Arc<dyn MessageStore>,
    templates: Arc<dyn TemplateStore>,
}

impl MessageText {
    /// Build the plugin over the provided seams.
    pub fn new(messages: Arc<dyn MessageStore>, templates: Arc<dyn TemplateStore>) -> Self {
        Self { messages, templates }
    }
}

impl RowFieldRenderer for MessageText {
    fn plugin_id(&self) -> &'static str {
        MESSAGE_TEXT_PLUGIN_ID
    }

    fn render(&self, row: &ResultRow, _account: &Account) -> Option<RenderedField> {
        let message = match self.messages.load(row.message_id) {
            Ok(Some(message)) => message,
            Ok(None) | Err(_) => {
                debug!(message_id = %row.message_id, "Row references a missing message; rendering nothing");
                return None;
            }
        };

        let Some(template) = self.templates.load(&message.template) else {
            debug!(message_id = %message.id, template = %message.template, "Template missing; rendering nothing");
            return None;
        };

        Some(RenderedField::Text(render_text(&template, &message.arguments).join("\n")))
    }
}
