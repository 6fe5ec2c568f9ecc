//! Message instance persistence.
//!
//! The `MessageStore` trait is the seam to the host platform's entity
//! storage. Two reference implementations are provided: an in-memory store
//! for tests and embedding, and a JSON-backed store mirroring the settings
//! file ergonomics (config directory fallback, environment override,
//! warn-and-default on unparseable files).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use missive_types::{Message, MessageId, NewMessage, TemplateId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreError;
use crate::paths::{default_store_path, expand_tilde_path};

/// Environment variable controlling the message file location.
pub const MESSAGES_PATH_ENV: &str = "MISSIVE_MESSAGES_PATH";

/// Default filename for the persisted message store.
pub const MESSAGES_FILE_NAME: &str = "messages.json";

/// Shared trait implemented by message persistence backends.
pub trait MessageStore: Send + Sync {
    /// Persist a new message, assigning the next identifier and the creation
    /// timestamp.
    fn create(&self, new_message: NewMessage) -> Result<Message, StoreError>;

    /// Load a message by id. A missing id is `Ok(None)`, not an error.
    fn load(&self, id: MessageId) -> Result<Option<Message>, StoreError>;

    /// Persist changes to an existing message.
    fn save(&self, message: &Message) -> Result<(), StoreError>;

    /// Delete a message, returning `true` when a record was removed.
    fn delete(&self, id: MessageId) -> Result<bool, StoreError>;

    /// Ids of every message generated from the given template, ascending.
    fn ids_for_template(&self, template: &TemplateId) -> Result<Vec<MessageId>, StoreError>;
}

#[derive(Default, Serialize, Deserialize)]
struct MessageFile {
    next_id: u64,
    entries: Vec<Message>,
}

impl MessageFile {
    fn create(&mut self, new_message: NewMessage) -> Message {
        self.next_id += 1;
        let message = Message {
            id: MessageId(self.next_id),
            template: new_message.template,
            owner: new_message.owner,
            created: Utc::now(),
            arguments: new_message.arguments,
        };
        self.entries.push(message.clone());
        message
    }

    fn load(&self, id: MessageId) -> Option<Message> {
        self.entries.iter().find(|message| message.id == id).cloned()
    }

    fn save(&mut self, message: &Message) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|entry| entry.id == message.id) {
            *existing = message.clone();
            return true;
        }
        false
    }

    fn delete(&mut self, id: MessageId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|message| message.id != id);
        self.entries.len() != before
    }

    fn ids_for_template(&self, template: &TemplateId) -> Vec<MessageId> {
        let mut ids: Vec<MessageId> = self
            .entries
            .iter()
            .filter(|message| message.template == *template)
            .map(|message| message.id)
            .collect();
        ids.sort();
        ids
    }
}

/// In-memory message store used for tests and embedding.
#[derive(Default)]
pub struct InMemoryMessageStore {
    entries: Mutex<MessageFile>,
}

impl InMemoryMessageStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn create(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        let mut entries = self.entries.lock().expect("message lock poisoned");
        Ok(entries.create(new_message))
    }

    fn load(&self, id: MessageId) -> Result<Option<Message>, StoreError> {
        let entries = self.entries.lock().expect("message lock poisoned");
        Ok(entries.load(id))
    }

    fn save(&self, message: &Message) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("message lock poisoned");
        if !entries.save(message) {
            warn!(message_id = %message.id, "Saved a message the store had never seen; inserting");
            entries.entries.push(message.clone());
        }
        Ok(())
    }

    fn delete(&self, id: MessageId) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().expect("message lock poisoned");
        Ok(entries.delete(id))
    }

    fn ids_for_template(&self, template: &TemplateId) -> Result<Vec<MessageId>, StoreError> {
        let entries = self.entries.lock().expect("message lock poisoned");
        Ok(entries.ids_for_template(template))
    }
}

/// JSON-backed message store persisted on disk.
pub struct JsonMessageStore {
    path: PathBuf,
    entries: Mutex<MessageFile>,
}

impl JsonMessageStore {
    /// Create a store at the provided path (or the default path when omitted).
    pub fn new<P: Into<Option<PathBuf>>>(path: P) -> Result<Self, StoreError> {
        let resolved_path = match path.into() {
            Some(path) => expand_tilde_path(path),
            None => default_store_path(MESSAGES_PATH_ENV, MESSAGES_FILE_NAME),
        };

        let file = load_message_file(&resolved_path)?;
        Ok(Self {
            path: resolved_path,
            entries: Mutex::new(file),
        })
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_locked(&self, file: &MessageFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl MessageStore for JsonMessageStore {
    fn create(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        let mut entries = self.entries.lock().expect("message lock poisoned");
        let message = entries.create(new_message);
        self.save_locked(&entries)?;
        Ok(message)
    }

    fn load(&self, id: MessageId) -> Result<Option<Message>, StoreError> {
        let entries = self.entries.lock().expect("message lock poisoned");
        Ok(entries.load(id))
    }

    fn save(&self, message: &Message) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("message lock poisoned");
        if !entries.save(message) {
            warn!(message_id = %message.id, "Saved a message the store had never seen; inserting");
            entries.entries.push(message.clone());
        }
        self.save_locked(&entries)
    }

    fn delete(&self, id: MessageId) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().expect("message lock poisoned");
        let removed = entries.delete(id);
        if removed {
            self.save_locked(&entries)?;
        }
        Ok(removed)
    }

    fn ids_for_template(&self, template: &TemplateId) -> Result<Vec<MessageId>, StoreError> {
        let entries = self.entries.lock().expect("message lock poisoned");
        Ok(entries.ids_for_template(template))
    }
}

fn load_message_file(path: &Path) -> Result<MessageFile, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<MessageFile>(&content) {
            Ok(file) => Ok(file),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Failed to parse message file; starting empty");
                Ok(MessageFile::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(MessageFile::default()),
        Err(error) => Err(StoreError::Io(error)),
    }
}
