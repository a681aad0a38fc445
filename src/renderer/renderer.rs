use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::RenderConfig;
use crate::emitter::{Token, TokenStream};
use crate::registry::{global_registry, CustomizerEntry, CustomizerRegistry, Rendering};
use crate::renderer::traits::*;
use crate::value::{classify, Value};

/// Bounded, cycle-safe renderer for diagnostic output.
///
/// A `Renderer` is cheap to keep around: it holds the configuration and a
/// snapshot of a customizer registry, and every call to
/// [`Renderer::tokenize`] starts from fresh per-call state.
///
/// Panics raised by customizers or [`Inspect`](crate::Inspect) objects are
/// caught and rendered as placeholders, but the process panic hook still
/// runs for each of them. Under the default hook that prints a message to
/// stderr; install a quieter hook with `std::panic::set_hook` if that
/// matters.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    registry: Arc<CustomizerRegistry>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Renderer {
    /// Uses the process-wide registry as it is at construction time.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_registry(config, global_registry())
    }

    pub fn with_registry(config: RenderConfig, registry: Arc<CustomizerRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn registry(&self) -> &CustomizerRegistry {
        &self.registry
    }

    /// A top-level string is passed through unquoted when `string_bypass`
    /// is set. It still counts against the output budget.
    pub fn tokenize(&self, value: &Value) -> TokenStream {
        let mut context = RenderContext::new(&self.config, &self.registry);
        match value {
            Value::Str(text) if self.config.string_bypass() => {
                context.emit(Token::Literal(text.clone()));
            }
            _ => context.render_value(value, 0),
        }
        context.into_stream()
    }

    pub fn render(&self, value: &Value) -> String {
        self.tokenize(value).join()
    }
}

impl RenderContext<'_> {
    /// Renders one node of the value graph at `depth`.
    ///
    /// Checks run in a fixed order: exhausted budget, depth limit,
    /// customizers, then the category's built-in rule.
    pub fn render_value(&mut self, value: &Value, depth: usize) {
        if self.is_exhausted() {
            return;
        }
        if depth >= self.config().max_depth() {
            debug!(depth, "depth limit reached");
            self.emit(Token::Truncated(0));
            return;
        }

        let category = classify(value);
        trace!(%category, depth, "classified value");

        match self.registry().lookup(value) {
            Some(entry) => self.render_customized(entry, value, depth),
            None => self.render_builtin(value, depth, None),
        }
    }

    fn render_customized(&mut self, entry: &CustomizerEntry, value: &Value, depth: usize) {
        // An ancestor is never handed to its customizer again.
        if let Some(identity) = value.identity() {
            if let Some(label) = self.tracker.label_of(identity) {
                debug!(id = label, "back-reference to ancestor container");
                self.emit(Token::BackReference(label));
                return;
            }
        }

        let scope = self.scope(depth);
        let render = entry.render_fn();
        let outcome = catch_unwind(AssertUnwindSafe(|| render(value, &scope)));

        match outcome {
            Ok(Ok(Rendering::Raw(text))) => {
                self.emit(Token::Literal(text));
            }
            Ok(Ok(Rendering::Substitute {
                label,
                value: substitute,
            })) => self.render_substitute(value, &substitute, label, depth),
            Ok(Err(error)) => {
                warn!(customizer = entry.name(), %error, "customizer failed");
                self.render_unrenderable(value);
            }
            Err(_) => {
                warn!(customizer = entry.name(), "customizer panicked");
                self.render_unrenderable(value);
            }
        }
    }

    /// Renders a customizer's substitute with its built-in rule.
    ///
    /// While the substitute's children render, the original value stays on
    /// the ancestor path under the substitute's container id, so a child that
    /// leads back to the original becomes a back-reference.
    fn render_substitute(
        &mut self,
        original: &Value,
        substitute: &Value,
        label: Option<String>,
        depth: usize,
    ) {
        let id = self.peek_container_id();
        let entered = match original.identity() {
            Some(identity)
                if substitute.identity() != Some(identity)
                    && classify(substitute).is_container() =>
            {
                self.tracker.enter(identity, id).then_some(identity)
            }
            _ => None,
        };

        self.render_builtin(substitute, depth, label);

        if let Some(identity) = entered {
            self.tracker.leave(identity);
        }
    }
}
