//! # Missive Views
//!
//! Presentation-layer plumbing for administrative message listings: a
//! registry of row-field renderer plugins keyed by stable string
//! identifiers, the capability checks that gate row actions, and named-route
//! URL resolution. The host's view-configuration system looks plugins up by
//! id (`delete_button`, `message_text`) and renders whatever they emit.

pub mod access;
pub mod delete_button;
pub mod fields;
pub mod message_text;
pub mod routes;

pub use access::{
    any_template_permission, own_template_permission, MessageAccessHandler, Operation, PermissionAccessHandler,
    ADMINISTER_MESSAGES_PERMISSION, BYPASS_ACCESS_PERMISSION,
};
pub use delete_button::{DeleteButton, DELETE_BUTTON_PLUGIN_ID};
pub use fields::{FieldPluginRegistry, Link, RenderedField, ResultRow, RowFieldRenderer};
pub use message_text::{MessageText, MESSAGE_TEXT_PLUGIN_ID};
pub use routes::{RouteError, RouteProvider, MESSAGE_CANONICAL_ROUTE, MESSAGE_DELETE_FORM_ROUTE, MESSAGE_EDIT_FORM_ROUTE};
