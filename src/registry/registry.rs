use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::InspectError;
use crate::registry::builtins;
use crate::renderer::Scope;
use crate::value::Value;

/// Entries registered by the crate itself sit below any user priority.
pub const BUILTIN_PRIORITY: i32 = -100;
pub const DEFAULT_PRIORITY: i32 = 0;

pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type RenderFn =
    Arc<dyn Fn(&Value, &Scope<'_>) -> Result<Rendering, InspectError> + Send + Sync>;

/// What a customizer wants emitted in place of the built-in rule.
#[derive(Debug, Clone)]
pub enum Rendering {
    /// Emitted verbatim as a single literal: no quoting, no escaping.
    Raw(String),
    /// Rendered with the substitute's own built-in category rule. `label`
    /// prefixes a container's opening delimiter.
    Substitute { label: Option<String>, value: Value },
}

impl Rendering {
    pub fn raw(text: impl Into<String>) -> Self {
        Rendering::Raw(text.into())
    }

    pub fn substitute(value: Value) -> Self {
        Rendering::Substitute { label: None, value }
    }

    pub fn labeled(label: impl Into<String>, value: Value) -> Self {
        Rendering::Substitute {
            label: Some(label.into()),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomizerId(u64);

#[derive(Clone)]
pub struct CustomizerEntry {
    id: CustomizerId,
    name: String,
    priority: i32,
    predicate: Predicate,
    render: RenderFn,
}

impl CustomizerEntry {
    pub fn id(&self) -> CustomizerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn render_fn(&self) -> &RenderFn {
        &self.render
    }

    /// A predicate that panics is treated as not matching.
    pub fn matches(&self, value: &Value) -> bool {
        match catch_unwind(AssertUnwindSafe(|| (self.predicate)(value))) {
            Ok(matched) => matched,
            Err(_) => {
                warn!(customizer = %self.name, "customizer predicate panicked; skipping it");
                false
            }
        }
    }
}

impl fmt::Debug for CustomizerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomizerEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Ordered table of `(predicate, render function, priority)` entries.
///
/// Lookup walks entries by descending priority; among equal priorities the
/// most recent registration is tried first.
#[derive(Debug, Clone)]
pub struct CustomizerRegistry {
    entries: Vec<CustomizerEntry>,
    next_id: u64,
}

impl Default for CustomizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomizerRegistry {
    /// A registry holding the built-in customizers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtins::install(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn register<P, F>(&mut self, predicate: P, render: F, priority: i32) -> CustomizerId
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        F: Fn(&Value, &Scope<'_>) -> Result<Rendering, InspectError> + Send + Sync + 'static,
    {
        let name = format!("customizer#{}", self.next_id);
        self.register_named(name, predicate, render, priority)
    }

    pub fn register_named<P, F>(
        &mut self,
        name: impl Into<String>,
        predicate: P,
        render: F,
        priority: i32,
    ) -> CustomizerId
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        F: Fn(&Value, &Scope<'_>) -> Result<Rendering, InspectError> + Send + Sync + 'static,
    {
        let id = CustomizerId(self.next_id);
        self.next_id += 1;

        let entry = CustomizerEntry {
            id,
            name: name.into(),
            priority,
            predicate: Arc::new(predicate),
            render: Arc::new(render),
        };
        trace!(customizer = %entry.name, priority, "registering customizer");

        // In front of every entry with the same or a lower priority.
        let position = self
            .entries
            .iter()
            .position(|existing| existing.priority <= priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, entry);
        id
    }

    pub fn unregister(&mut self, id: CustomizerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// First entry, in priority order, whose predicate matches `value`.
    pub fn lookup(&self, value: &Value) -> Option<&CustomizerEntry> {
        let found = self.entries.iter().find(|entry| entry.matches(value));
        if let Some(entry) = found {
            trace!(customizer = %entry.name, "customizer matched");
        }
        found
    }

    pub fn entries(&self) -> impl Iterator<Item = &CustomizerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
