//! Document access: forms and render-target lookup.

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::host::location::normalize_hash;
use crate::host::render::RenderTarget;

/// Field values and attributes of a form at the time it was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    /// Declared `action`, e.g. `#post`.
    pub action: Option<String>,
    /// Declared `method`, as written.
    pub method: Option<String>,
    /// Successful controls in document order.
    pub fields: Vec<(String, String)>,
}

impl FormSnapshot {
    /// Form targeting `action`. A missing `#` is added.
    pub fn new(action: &str) -> Self {
        Self {
            action: Some(normalize_hash(action)),
            ..Default::default()
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

/// The parts of the document the router reads.
pub trait Document: Send + Sync {
    /// All forms currently in the document.
    fn forms(&self) -> Vec<FormSnapshot>;

    /// Element with the given id, if it exists and can be rendered into.
    fn element(&self, id: &str) -> Option<Arc<dyn RenderTarget>>;

    /// First form whose `action` equals `action` exactly.
    fn form_for_action(&self, action: &str) -> Option<FormSnapshot> {
        self.forms()
            .into_iter()
            .find(|form| form.action.as_deref() == Some(action))
    }
}

/// In-memory document.
pub struct MemoryDocument {
    elements: DashMap<String, Arc<dyn RenderTarget>>,
    forms: ArcSwap<Vec<FormSnapshot>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            elements: DashMap::new(),
            forms: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Add an element that can be rendered into.
    pub fn with_element(self, id: impl Into<String>, target: Arc<dyn RenderTarget>) -> Self {
        self.elements.insert(id.into(), target);
        self
    }

    /// Replace the set of forms.
    pub fn set_forms(&self, forms: Vec<FormSnapshot>) {
        self.forms.store(Arc::new(forms));
    }

    pub fn add_form(&self, form: FormSnapshot) {
        let mut forms = self.forms.load().as_ref().clone();
        forms.push(form);
        self.forms.store(Arc::new(forms));
    }

    pub fn clear_forms(&self) {
        self.set_forms(Vec::new());
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn forms(&self) -> Vec<FormSnapshot> {
        self.forms.load().as_ref().clone()
    }

    fn element(&self, id: &str) -> Option<Arc<dyn RenderTarget>> {
        self.elements.get(id).map(|e| e.value().clone())
    }
}
