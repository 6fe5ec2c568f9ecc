//! Message template definitions.

use serde::{Deserialize, Serialize};

use crate::id::TemplateId;

/// A reusable message template: ordered text rows carrying token placeholders
/// such as `[message:author:name]`. Saving a changed revision may trigger
/// argument reconciliation on dependent message instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    /// Machine name of the template.
    pub id: TemplateId,
    /// Human-readable label shown in administrative listings.
    pub label: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered text rows; rendering joins the rows after substitution.
    #[serde(default)]
    pub text: Vec<String>,
}

impl MessageTemplate {
    /// Build a template from its machine name, label, and text rows.
    pub fn new(id: impl Into<TemplateId>, label: impl Into<String>, text: Vec<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            text,
        }
    }

    /// Replace the template's text rows, returning the updated template.
    pub fn with_text(mut self, text: Vec<String>) -> Self {
        self.text = text;
        self
    }
}
