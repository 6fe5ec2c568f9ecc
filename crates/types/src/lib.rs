//! # Missive Types
//!
//! Shared type definitions for the Missive workspace: entity identifiers,
//! accounts, message templates, message instances, and the token update
//! policy. These types carry no behavior beyond construction, parsing, and
//! serde round-tripping; storage and computation live in the `missive-store`
//! and `missive-engine` crates.

pub mod account;
pub mod id;
pub mod message;
pub mod policy;
pub mod template;

pub use account::Account;
pub use id::{AccountId, MessageId, TemplateId};
pub use message::{ArgumentMap, Message, NewMessage};
pub use policy::{ParseUpdatePolicyError, UpdatePolicy};
pub use template::MessageTemplate;
