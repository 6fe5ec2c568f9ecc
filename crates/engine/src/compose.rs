//! Message creation pipeline.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use missive_store::{AccountDirectory, MessageStore, TemplateStore};
use missive_types::{AccountId, Message, NewMessage, TemplateId};
use tracing::debug;

use crate::arguments::compute_arguments;

/// Creates message instances: resolves the template, persists the record,
/// and fills the cached argument map from the template's current text.
pub struct MessageComposer {
    messages: Arc<dyn MessageStore>,
    templates: Arc<dyn TemplateStore>,
    accounts: Arc<dyn AccountDirectory>,
}

impl MessageComposer {
    /// Build a composer over the provided storage seams.
    pub fn new(messages: Arc<dyn MessageStore>, templates: Arc<dyn TemplateStore>, accounts: Arc<dyn AccountDirectory>) -> Self {
        Self {
            messages,
            templates,
            accounts,
        }
    }

    /// Create a message from `template` owned by `owner`.
    ///
    /// The argument cache is computed against the template revision current
    /// at creation time; later template edits reach this message through the
    /// refresh workflow.
    pub fn compose(&self, template: &TemplateId, owner: AccountId) -> Result<Message> {
        let Some(template) = self.templates.load(template) else {
            bail!("unknown message template '{template}'");
        };

        let mut message = self
            .messages
            .create(NewMessage::new(template.id.clone(), owner))
            .with_context(|| format!("failed to create message from template '{}'", template.id))?;

        let account = self.accounts.load(owner);
        message.arguments = compute_arguments(&template, &message, account.as_ref());
        self.messages
            .save(&message)
            .with_context(|| format!("failed to save arguments for message {}", message.id))?;

        debug!(
            message_id = %message.id,
            template = %message.template,
            argument_count = message.arguments.len(),
            "Composed message"
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use missive_store::{InMemoryAccountDirectory, InMemoryMessageStore, InMemoryTemplateStore};
    use missive_types::{Account, MessageTemplate};

    fn composer_with_template() -> (MessageComposer, Arc<InMemoryMessageStore>) {
        let messages = Arc::new(InMemoryMessageStore::new());
        let templates = Arc::new(InMemoryTemplateStore::with_templates(vec![MessageTemplate::new(
            "dummy_message",
            "Dummy test",
            vec!["Created by [message:author:name].".to_string()],
        )]));
        let accounts = Arc::new(InMemoryAccountDirectory::new());
        accounts.insert(Account::new(AccountId(1), "maya", "maya@example.com"));

        let composer = MessageComposer::new(messages.clone(), templates, accounts);
        (composer, messages)
    }

    #[test]
    fn compose_persists_message_with_arguments() {
        let (composer, messages) = composer_with_template();
        let message = composer.compose(&TemplateId::new("dummy_message"), AccountId(1)).expect("compose");

        assert_eq!(message.arguments.get("[message:author:name]").map(String::as_str), Some("maya"));

        let stored = messages.load(message.id).expect("load").expect("message present");
        assert_eq!(stored.arguments, message.arguments);
    }

    #[test]
    fn compose_fails_for_unknown_template() {
        let (composer, _messages) = composer_with_template();
        let error = composer
            .compose(&TemplateId::new("missing"), AccountId(1))
            .expect_err("unknown template");
        assert!(error.to_string().contains("unknown message template"));
    }

    #[test]
    fn compose_with_unknown_owner_keeps_author_tokens_raw() {
        let (composer, _messages) = composer_with_template();
        let message = composer.compose(&TemplateId::new("dummy_message"), AccountId(99)).expect("compose");
        assert_eq!(
            message.arguments.get("[message:author:name]").map(String::as_str),
            Some("[message:author:name]")
        );
    }
}
