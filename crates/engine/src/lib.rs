//! # Missive Engine
//!
//! The Missive engine computes and maintains the cached token arguments on
//! message instances. It scans template text for `[group:path]` tokens,
//! resolves each token against the message, its template, and its owner
//! account, and keeps the cached values consistent with the template through
//! a queue-driven refresh workflow.
//!
//! ## Architecture
//!
//! - **`tokens`**: token scanning and token-set diffing
//! - **`arguments`**: per-message token resolution and text rendering
//! - **`compose`**: message creation pipeline (compute arguments, persist)
//! - **`refresh`**: refresh planning, enqueueing on template save, and the
//!   worker that drains the queue

pub mod arguments;
pub mod compose;
pub mod refresh;
pub mod tokens;

pub use arguments::{compute_arguments, render_text};
pub use compose::MessageComposer;
pub use refresh::{plan_refresh, ArgumentsWorker, RefreshBatch, RefreshSettings, TemplateReconciler};
pub use tokens::{diff_token_sets, scan_tokens, template_tokens, Token, TokenDiff};
