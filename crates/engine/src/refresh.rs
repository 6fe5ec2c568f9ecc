//! Template-save reconciliation: planning, enqueueing, and the queue worker.
//!
//! Saving a template diffs its token set against the previous revision and,
//! when the configured policy matches the change, enqueues batches of
//! dependent message ids. The worker claims batches off the queue and
//! recomputes each listed message's cached arguments against the template's
//! current text, deleting the item on success and releasing it for
//! redelivery on failure.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use missive_store::{
    AccountDirectory, MessageStore, Queue, SettingsStore, TemplateStore, SETTINGS_NAMESPACE, UPDATE_TOKENS_BATCH_SIZE,
    UPDATE_TOKENS_ENABLED, UPDATE_TOKENS_HOW_TO_ACT,
};
use missive_types::{MessageId, MessageTemplate, TemplateId, UpdatePolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::arguments::compute_arguments;
use crate::tokens::{diff_token_sets, template_tokens, TokenDiff};

/// Default number of message ids per enqueued batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Queue payload: one batch of messages to refresh against a template.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RefreshBatch {
    /// Template whose current text drives the recomputation.
    pub template: TemplateId,
    /// Messages to refresh.
    pub messages: Vec<MessageId>,
}

/// Effective refresh configuration, read from the settings store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshSettings {
    /// Whether template saves enqueue refresh work at all.
    pub enabled: bool,
    /// Which template edits trigger a refresh.
    pub policy: UpdatePolicy,
    /// Maximum message ids per enqueued batch.
    pub batch_size: usize,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            policy: UpdatePolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl RefreshSettings {
    /// Read the effective configuration, falling back to defaults for
    /// missing or mistyped values.
    pub fn from_store(settings: &SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            enabled: settings
                .get_as::<bool>(SETTINGS_NAMESPACE, UPDATE_TOKENS_ENABLED)
                .unwrap_or(defaults.enabled),
            policy: settings
                .get_as::<UpdatePolicy>(SETTINGS_NAMESPACE, UPDATE_TOKENS_HOW_TO_ACT)
                .unwrap_or(defaults.policy),
            batch_size: settings
                .get_as::<u32>(SETTINGS_NAMESPACE, UPDATE_TOKENS_BATCH_SIZE)
                .map(|size| size as usize)
                .filter(|size| *size > 0)
                .unwrap_or(defaults.batch_size),
        }
    }
}

/// Decide whether a token-set change triggers a refresh under `policy`.
fn policy_matches(policy: UpdatePolicy, diff: &TokenDiff) -> bool {
    match policy {
        UpdatePolicy::WhenAdded => !diff.added.is_empty(),
        UpdatePolicy::WhenRemoved => !diff.removed.is_empty(),
        UpdatePolicy::WhenItem => !diff.is_empty(),
    }
}

/// Plan the refresh batches for a template edit.
///
/// Returns no batches when refresh is disabled or the policy does not match
/// the change; otherwise chunks `ids` into `batch_size` groups, preserving
/// order.
pub fn plan_refresh(template: &TemplateId, diff: &TokenDiff, settings: &RefreshSettings, ids: &[MessageId]) -> Vec<RefreshBatch> {
    if !settings.enabled || !policy_matches(settings.policy, diff) {
        return Vec::new();
    }

    ids.chunks(settings.batch_size.max(1))
        .map(|chunk| RefreshBatch {
            template: template.clone(),
            messages: chunk.to_vec(),
        })
        .collect()
}

/// Persists template revisions and enqueues the resulting refresh work.
pub struct TemplateReconciler {
    templates: Arc<dyn TemplateStore>,
    messages: Arc<dyn MessageStore>,
    queue: Arc<dyn Queue>,
    settings: Arc<SettingsStore>,
}

impl TemplateReconciler {
    /// Build a reconciler over the provided seams.
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        messages: Arc<dyn MessageStore>,
        queue: Arc<dyn Queue>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            templates,
            messages,
            queue,
            settings,
        }
    }

    /// Persist a template revision, diff its token set against the previous
    /// one, and enqueue refresh batches per the configured policy. Returns
    /// the number of batches enqueued.
    pub fn save_template(&self, template: MessageTemplate) -> Result<usize> {
        let template_id = template.id.clone();
        let new_tokens = template_tokens(&template);
        let previous = self.templates.save(template);

        let old_tokens = previous.as_ref().map(template_tokens).unwrap_or_default();
        let diff = diff_token_sets(&old_tokens, &new_tokens);
        if diff.is_empty() {
            debug!(template = %template_id, "Template saved without token changes");
            return Ok(0);
        }

        let settings = RefreshSettings::from_store(&self.settings);
        let ids = self
            .messages
            .ids_for_template(&template_id)
            .with_context(|| format!("failed to list messages for template '{template_id}'"))?;

        let batches = plan_refresh(&template_id, &diff, &settings, &ids);
        for batch in &batches {
            let payload = serde_json::to_value(batch).context("failed to encode refresh batch")?;
            self.queue.create_item(payload);
        }

        info!(
            template = %template_id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            message_count = ids.len(),
            batch_count = batches.len(),
            "Template saved"
        );
        Ok(batches.len())
    }
}

/// Queue worker recomputing cached arguments for refresh batches.
pub struct ArgumentsWorker {
    messages: Arc<dyn MessageStore>,
    templates: Arc<dyn TemplateStore>,
    accounts: Arc<dyn AccountDirectory>,
}

impl ArgumentsWorker {
    /// Build a worker over the provided seams.
    pub fn new(messages: Arc<dyn MessageStore>, templates: Arc<dyn TemplateStore>, accounts: Arc<dyn AccountDirectory>) -> Self {
        Self {
            messages,
            templates,
            accounts,
        }
    }

    /// Recompute and save arguments for every message in the batch against
    /// the template's current text. Messages that no longer resolve are
    /// skipped, mirroring the renderer's soft-fail posture. Returns the
    /// number of messages whose cached arguments changed.
    pub fn process(&self, batch: &RefreshBatch) -> Result<usize> {
        let Some(template) = self.templates.load(&batch.template) else {
            bail!("refresh batch references unknown template '{}'", batch.template);
        };

        let mut updated = 0;
        for id in &batch.messages {
            let Some(mut message) = self
                .messages
                .load(*id)
                .with_context(|| format!("failed to load message {id}"))?
            else {
                warn!(message_id = %id, template = %batch.template, "Skipping refresh for missing message");
                continue;
            };

            let account = self.accounts.load(message.owner);
            let arguments = compute_arguments(&template, &message, account.as_ref());
            if arguments != message.arguments {
                message.arguments = arguments;
                self.messages
                    .save(&message)
                    .with_context(|| format!("failed to save refreshed arguments for message {id}"))?;
                updated += 1;
            }
        }

        debug!(template = %batch.template, batch_size = batch.messages.len(), updated, "Processed refresh batch");
        Ok(updated)
    }

    /// Claim and process items until the queue yields nothing claimable.
    /// Successful items are deleted; a failing item is released for
    /// redelivery before the error propagates. Returns the number of batches
    /// processed.
    pub fn drain(&self, queue: &dyn Queue) -> Result<usize> {
        let mut processed = 0;
        while let Some(item) = queue.claim_item() {
            let batch: RefreshBatch = match serde_json::from_value(item.data.clone()) {
                Ok(batch) => batch,
                Err(error) => {
                    // An undecodable payload can never succeed; drop it
                    // instead of redelivering forever.
                    warn!(item_id = item.item_id, error = %error, "Discarding malformed queue item");
                    queue.delete_item(&item);
                    continue;
                }
            };

            match self.process(&batch) {
                Ok(_) => {
                    queue.delete_item(&item);
                    processed += 1;
                }
                Err(error) => {
                    warn!(item_id = item.item_id, error = %error, "Refresh batch failed; releasing for redelivery");
                    queue.release_item(&item);
                    return Err(error);
                }
            }
        }
        Ok(processed)
    }
}
