//! Message template storage and YAML seeding.

use std::sync::Mutex;

use indexmap::IndexMap;
use missive_types::{MessageTemplate, TemplateId};
use serde::Deserialize;

use crate::error::StoreError;

/// Shared trait implemented by template storage backends.
pub trait TemplateStore: Send + Sync {
    /// Load a template by machine name.
    fn load(&self, id: &TemplateId) -> Option<MessageTemplate>;

    /// Persist a template revision, returning the previous revision when one
    /// existed. Callers diff the two revisions to decide whether dependent
    /// messages need reprocessing.
    fn save(&self, template: MessageTemplate) -> Option<MessageTemplate>;

    /// All stored templates, in insertion order.
    fn all(&self) -> Vec<MessageTemplate>;
}

/// In-memory template store.
#[derive(Default)]
pub struct InMemoryTemplateStore {
    templates: Mutex<IndexMap<TemplateId, MessageTemplate>>,
}

impl InMemoryTemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the provided templates.
    pub fn with_templates(templates: Vec<MessageTemplate>) -> Self {
        let store = Self::new();
        for template in templates {
            store.save(template);
        }
        store
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn load(&self, id: &TemplateId) -> Option<MessageTemplate> {
        self.templates.lock().expect("template lock poisoned").get(id).cloned()
    }

    fn save(&self, template: MessageTemplate) -> Option<MessageTemplate> {
        let mut templates = self.templates.lock().expect("template lock poisoned");
        templates.insert(template.id.clone(), template)
    }

    fn all(&self) -> Vec<MessageTemplate> {
        self.templates.lock().expect("template lock poisoned").values().cloned().collect()
    }
}

#[derive(Deserialize)]
struct TemplateSeedFile {
    #[serde(default)]
    templates: Vec<MessageTemplate>,
}

/// Parse a YAML seed document into templates.
///
/// Accepts either a bare list of templates or a document with a top-level
/// `templates:` key, so seed files can grow other sections later.
pub fn templates_from_yaml(content: &str) -> Result<Vec<MessageTemplate>, StoreError> {
    if let Ok(templates) = serde_yaml::from_str::<Vec<MessageTemplate>>(content) {
        return Ok(templates);
    }
    let seed: TemplateSeedFile = serde_yaml::from_str(content)?;
    Ok(seed.templates)
}
