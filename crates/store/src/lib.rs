//! # Missive Store
//!
//! Storage seams between the Missive library and its host platform. The real
//! entity storage, configuration storage, and durable queue are assumed to be
//! host infrastructure; this crate defines the narrow traits the rest of the
//! workspace consumes, plus lightweight reference implementations (in-memory
//! everywhere, JSON-file-backed where persistence is useful for local runs
//! and tests).
//!
//! ## Modules
//!
//! - **`messages`**: message instance storage (`MessageStore`)
//! - **`templates`**: template storage and YAML seeding (`TemplateStore`)
//! - **`accounts`**: account lookup (`AccountDirectory`)
//! - **`settings`**: namespaced JSON key/value configuration (`SettingsStore`)
//! - **`queue`**: claim/release work queue with lease-based redelivery (`Queue`)

pub mod accounts;
pub mod error;
mod paths;
pub mod messages;
pub mod queue;
pub mod settings;
pub mod templates;

pub use accounts::{AccountDirectory, InMemoryAccountDirectory};
pub use error::StoreError;
pub use messages::{InMemoryMessageStore, JsonMessageStore, MessageStore};
pub use queue::{ClaimedItem, InMemoryQueue, Queue};
pub use settings::{SettingsStore, SETTINGS_NAMESPACE, UPDATE_TOKENS_BATCH_SIZE, UPDATE_TOKENS_ENABLED, UPDATE_TOKENS_HOW_TO_ACT};
pub use templates::{templates_from_yaml, InMemoryTemplateStore, TemplateStore};
