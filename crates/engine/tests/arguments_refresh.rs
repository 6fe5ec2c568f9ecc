//! Queue-driven argument refresh scenarios.
//!
//! Each test configures a refresh policy, edits a template, drains the queue
//! worker, and compares the dependent message's cached arguments against a
//! snapshot taken before the edit.

use std::sync::Arc;

use missive_engine::{compute_arguments, ArgumentsWorker, MessageComposer, TemplateReconciler};
use missive_store::{
    InMemoryAccountDirectory, InMemoryMessageStore, InMemoryQueue, InMemoryTemplateStore, MessageStore, SettingsStore,
    TemplateStore, SETTINGS_NAMESPACE, UPDATE_TOKENS_BATCH_SIZE, UPDATE_TOKENS_ENABLED, UPDATE_TOKENS_HOW_TO_ACT,
};
use missive_types::{Account, AccountId, Message, MessageTemplate, TemplateId, UpdatePolicy};

struct Harness {
    messages: Arc<InMemoryMessageStore>,
    templates: Arc<InMemoryTemplateStore>,
    queue: Arc<InMemoryQueue>,
    settings: Arc<SettingsStore>,
    composer: MessageComposer,
    reconciler: TemplateReconciler,
    worker: ArgumentsWorker,
}

impl Harness {
    fn new() -> Self {
        let messages = Arc::new(InMemoryMessageStore::new());
        let templates = Arc::new(InMemoryTemplateStore::with_templates(vec![MessageTemplate::new(
            "dummy_message",
            "Dummy test",
            vec!["This is a dummy message from [message:author:name] <[message:author:mail]>.".to_string()],
        )]));
        let accounts = Arc::new(InMemoryAccountDirectory::new());
        accounts.insert(Account::new(AccountId(1), "maya", "maya@example.com"));
        let queue = Arc::new(InMemoryQueue::new());
        let settings = Arc::new(SettingsStore::ephemeral());
        settings
            .set(SETTINGS_NAMESPACE, UPDATE_TOKENS_ENABLED, true)
            .expect("enable refresh");
        settings
            .set(SETTINGS_NAMESPACE, UPDATE_TOKENS_HOW_TO_ACT, UpdatePolicy::WhenItem)
            .expect("set policy");

        Self {
            messages: messages.clone(),
            templates: templates.clone(),
            queue: queue.clone(),
            settings: settings.clone(),
            composer: MessageComposer::new(messages.clone(), templates.clone(), accounts.clone()),
            reconciler: TemplateReconciler::new(templates.clone(), messages.clone(), queue, settings),
            worker: ArgumentsWorker::new(messages, templates, accounts),
        }
    }

    fn set_policy(&self, policy: UpdatePolicy) {
        self.settings
            .set(SETTINGS_NAMESPACE, UPDATE_TOKENS_HOW_TO_ACT, policy)
            .expect("set policy");
    }

    fn compose(&self) -> Message {
        self.composer
            .compose(&TemplateId::new("dummy_message"), AccountId(1))
            .expect("compose message")
    }

    fn template(&self) -> MessageTemplate {
        self.templates.load(&TemplateId::new("dummy_message")).expect("template present")
    }

    fn reload(&self, message: &Message) -> Message {
        self.messages.load(message.id).expect("load").expect("message present")
    }
}

#[test]
fn removing_a_token_updates_arguments_under_when_removed() {
    let harness = Harness::new();
    let message = harness.compose();
    let original_arguments = message.arguments.clone();

    harness.set_policy(UpdatePolicy::WhenRemoved);
    let batches = harness
        .reconciler
        .save_template(harness.template().with_text(vec!["[message:author:name].".to_string()]))
        .expect("save template");
    assert_eq!(batches, 1);

    let processed = harness.worker.drain(harness.queue.as_ref()).expect("drain queue");
    assert_eq!(processed, 1);
    assert!(harness.queue.is_empty());

    let reloaded = harness.reload(&message);
    assert_ne!(reloaded.arguments, original_arguments);
    assert!(!reloaded.arguments.contains_key("[message:author:mail]"));
    assert_eq!(reloaded.arguments.get("[message:author:name]").map(String::as_str), Some("maya"));
}

#[test]
fn invalid_placeholder_syntax_never_triggers_a_refresh() {
    let harness = Harness::new();

    // Shrink the template to a single token first, then create the message
    // whose snapshot the scenario compares against.
    harness
        .reconciler
        .save_template(harness.template().with_text(vec!["[message:author:name].".to_string()]))
        .expect("save template");
    harness.worker.drain(harness.queue.as_ref()).expect("drain queue");

    let message = harness.compose();
    let original_arguments = message.arguments.clone();

    // `@{...}` is not token syntax; under `update_when_added` the edit only
    // removes a token, so nothing is enqueued and the cache goes stale.
    harness.set_policy(UpdatePolicy::WhenAdded);
    let batches = harness
        .reconciler
        .save_template(harness.template().with_text(vec!["@{message:author:name}.".to_string()]))
        .expect("save template");
    assert_eq!(batches, 0);
    assert!(harness.queue.is_empty());

    let processed = harness.worker.drain(harness.queue.as_ref()).expect("drain queue");
    assert_eq!(processed, 0);
    assert_eq!(harness.reload(&message).arguments, original_arguments);
}

#[test]
fn adding_a_token_is_ignored_under_when_removed() {
    let harness = Harness::new();
    let message = harness.compose();
    let original_arguments = message.arguments.clone();

    harness.set_policy(UpdatePolicy::WhenRemoved);
    let mut text = harness.template().text;
    text.push("Created on [message:created].".to_string());
    let batches = harness
        .reconciler
        .save_template(harness.template().with_text(text))
        .expect("save template");
    assert_eq!(batches, 0);

    harness.worker.drain(harness.queue.as_ref()).expect("drain queue");
    assert_eq!(harness.reload(&message).arguments, original_arguments);
}

#[test]
fn unchanged_token_set_enqueues_nothing() {
    let harness = Harness::new();
    let message = harness.compose();
    let original_arguments = message.arguments.clone();

    // Prose-only edits keep the token set identical; no policy fires.
    let batches = harness
        .reconciler
        .save_template(
            harness
                .template()
                .with_text(vec!["Reworded entirely, still from [message:author:name] <[message:author:mail]>.".to_string()]),
        )
        .expect("save template");
    assert_eq!(batches, 0);
    assert!(harness.queue.is_empty());
    assert_eq!(harness.reload(&message).arguments, original_arguments);
}

#[test]
fn batches_honor_configured_size_and_refresh_every_message() {
    let harness = Harness::new();
    harness
        .settings
        .set(SETTINGS_NAMESPACE, UPDATE_TOKENS_BATCH_SIZE, 2u32)
        .expect("set batch size");

    let messages: Vec<Message> = (0..5).map(|_| harness.compose()).collect();

    let new_template = harness.template().with_text(vec!["[message:author:name].".to_string()]);
    let batches = harness.reconciler.save_template(new_template.clone()).expect("save template");
    assert_eq!(batches, 3);

    let processed = harness.worker.drain(harness.queue.as_ref()).expect("drain queue");
    assert_eq!(processed, 3);

    // Invariant: after the queue drains, every touched message's cache
    // equals a fresh computation against the current template.
    let account = Account::new(AccountId(1), "maya", "maya@example.com");
    for message in &messages {
        let reloaded = harness.reload(message);
        assert_eq!(reloaded.arguments, compute_arguments(&new_template, &reloaded, Some(&account)));
    }
}

#[test]
fn missing_messages_are_skipped_not_fatal() {
    let harness = Harness::new();
    let kept = harness.compose();
    let deleted = harness.compose();

    harness.set_policy(UpdatePolicy::WhenRemoved);
    let batches = harness
        .reconciler
        .save_template(harness.template().with_text(vec!["[message:author:name].".to_string()]))
        .expect("save template");
    assert_eq!(batches, 1);

    // The batch references both ids; deleting one before the worker runs
    // must not fail the whole batch.
    assert!(harness.messages.delete(deleted.id).expect("delete message"));

    let processed = harness.worker.drain(harness.queue.as_ref()).expect("drain queue");
    assert_eq!(processed, 1);
    assert!(!harness.reload(&kept).arguments.contains_key("[message:author:mail]"));
}
