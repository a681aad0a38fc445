use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::emitter::{ContainerKind, Token};
use crate::renderer::components::ScalarRenderer;
use crate::renderer::traits::*;
use crate::value::{
    classify, ErrorValue, Identity, Inspect, Mapping, Record, Sequence, SequenceKind, SetValue,
    Shared, Value,
};

impl RenderContext<'_> {
    /// Renders `value` with its category's built-in rule, skipping the
    /// customizer lookup. `label` overrides the value's own label.
    pub(crate) fn render_builtin(&mut self, value: &Value, depth: usize, label: Option<String>) {
        if label.is_some() && !classify(value).is_container() && !matches!(value, Value::Error(_)) {
            // A labelled scalar reads as a one-element call: `Label(value)`.
            self.render_container(None, ContainerKind::Tuple, label, |ctx| {
                ctx.render_builtin(value, depth, None);
            });
            return;
        }

        let scalars = ScalarRenderer::new(self.config());
        match value {
            Value::Null => {
                self.emit(Token::Literal(scalars.null()));
            }
            Value::Bool(flag) => {
                self.emit(Token::Literal(scalars.boolean(*flag)));
            }
            Value::Int(number) => {
                self.emit(Token::Literal(number.to_string()));
            }
            Value::UInt(number) => {
                self.emit(Token::Literal(number.to_string()));
            }
            Value::Float(number) => {
                self.emit(Token::Literal(scalars.float(*number)));
            }
            Value::Duration(span) => {
                self.emit(Token::Literal(scalars.duration(*span)));
            }
            Value::Str(text) => {
                let (literal, omitted) = scalars.text(text);
                self.emit_truncated(literal, omitted);
            }
            Value::Bytes(bytes) => {
                let (literal, omitted) = scalars.bytes(bytes);
                self.emit_truncated(literal, omitted);
            }
            Value::Path(path) => {
                self.emit(Token::Literal(scalars.quote(&path.display().to_string())));
            }
            Value::Error(error) => error.render(self, depth, label),
            Value::Record(record) => record.render(self, depth, label),
            Value::Map(map) => map.render(self, depth, label),
            Value::List(sequence) => sequence.render(self, depth, label),
            Value::Set(set) => set.render(self, depth, label),
            Value::Object(object) => object.render(self, depth, label),
        }
    }

    /// Opens a container, renders `body` inside it and closes it again.
    ///
    /// With an identity, the container is tracked for the duration of `body`
    /// and becomes a back-reference when it is already an ancestor. The label
    /// is escaped like string contents.
    pub(crate) fn render_container(
        &mut self,
        identity: Option<Identity>,
        kind: ContainerKind,
        label: Option<String>,
        body: impl FnOnce(&mut Self),
    ) {
        let id = self.peek_container_id();
        if let Some(identity) = identity {
            if !self.tracker.enter(identity, id) {
                let target = self.tracker.label_of(identity).unwrap_or(id);
                debug!(id = target, "back-reference to ancestor container");
                self.emit(Token::BackReference(target));
                return;
            }
        }

        self.take_container_id();
        let label = label.map(|label| ScalarRenderer::new(self.config()).escape(&label));
        if self.emit(Token::OpenContainer { kind, label, id }) {
            body(self);
            self.close(kind);
        }

        if let Some(identity) = identity {
            self.tracker.leave(identity);
        }
    }

    /// Literal followed by a `Truncated` suffix when characters were cut.
    fn emit_truncated(&mut self, literal: String, omitted: usize) {
        if self.emit(Token::Literal(literal)) && omitted > 0 {
            debug!(omitted, "string truncated");
            self.emit(Token::Truncated(omitted));
        }
    }

    fn elide(&mut self, total: usize, shown: usize) {
        if total > shown && !self.is_exhausted() {
            debug!(total, shown, "container width limit reached");
            self.emit(Token::Elided(total - shown));
        }
    }

    /// Renders a mapping key into a single `FieldName`.
    ///
    /// Keys share the budget and ancestor path with the rest of the render.
    /// Back-references from the key to containers outside it put their
    /// anchors on the outer stream. Returns false once the budget is gone.
    fn render_key(&mut self, key: &Value, depth: usize) -> bool {
        if self.is_exhausted() {
            return false;
        }
        let first_id = self.peek_container_id();
        let rendered = self.capture(|ctx| ctx.render_value(key, depth));
        if self.is_exhausted() {
            self.cut();
            return false;
        }

        let outer: Vec<usize> = rendered
            .referenced()
            .iter()
            .copied()
            .filter(|id| *id < first_id)
            .collect();
        let anchors = self.anchor_cost(outer.iter().copied());
        if !self.emit_with(Token::FieldName(rendered.join()), anchors) {
            return false;
        }
        self.mark_referenced(outer);
        true
    }

    /// Placeholder for a leaf whose own inspection failed.
    pub(crate) fn render_unrenderable(&mut self, value: &Value) {
        let type_name = catch_unwind(AssertUnwindSafe(|| value.type_name()))
            .unwrap_or_else(|_| "object".to_string());
        self.emit_unrenderable(&type_name);
    }

    fn emit_unrenderable(&mut self, type_name: &str) {
        warn!(type_name, "value could not be rendered");
        let type_name = ScalarRenderer::new(self.config()).escape(type_name);
        self.emit(Token::Literal(format!("<unrenderable: {type_name}>")));
    }
}

impl Render for Shared<Record> {
    fn render(&self, context: &mut RenderContext<'_>, depth: usize, label: Option<String>) {
        let width = context.config().max_container_width();
        let Ok(record) = self.try_borrow() else {
            context.emit_unrenderable("record");
            return;
        };
        let total = record.fields.len();
        let fields: Vec<(String, Value)> = record.fields.iter().take(width).cloned().collect();
        let label = label.unwrap_or_else(|| record.type_name.clone());
        drop(record);

        context.render_container(
            Some(Identity::of(self)),
            ContainerKind::Record,
            Some(label),
            |ctx| {
                let scalars = ScalarRenderer::new(ctx.config());
                for (name, field) in &fields {
                    if !ctx.emit(Token::FieldName(scalars.escape(name))) {
                        break;
                    }
                    ctx.render_value(field, depth + 1);
                }
                ctx.elide(total, fields.len());
            },
        );
    }
}

impl Render for Shared<Mapping> {
    fn render(&self, context: &mut RenderContext<'_>, depth: usize, label: Option<String>) {
        let width = context.config().max_container_width();
        let Ok(map) = self.try_borrow() else {
            context.emit_unrenderable("map");
            return;
        };
        let total = map.entries.len();
        let entries: Vec<(Value, Value)> = map.entries.iter().take(width).cloned().collect();
        let label = label.or_else(|| map.type_name.clone());
        drop(map);

        context.render_container(Some(Identity::of(self)), ContainerKind::Map, label, |ctx| {
            for (key, entry) in &entries {
                if !ctx.render_key(key, depth) {
                    break;
                }
                ctx.render_value(entry, depth + 1);
            }
            ctx.elide(total, entries.len());
        });
    }
}

impl Render for Shared<Sequence> {
    fn render(&self, context: &mut RenderContext<'_>, depth: usize, label: Option<String>) {
        let width = context.config().max_container_width();
        let Ok(sequence) = self.try_borrow() else {
            context.emit_unrenderable("list");
            return;
        };
        let kind = match sequence.kind {
            SequenceKind::List => ContainerKind::List,
            SequenceKind::Tuple => ContainerKind::Tuple,
        };
        let total = sequence.items.len();
        let items: Vec<Value> = sequence.items.iter().take(width).cloned().collect();
        let label = label.or_else(|| sequence.type_name.clone());
        drop(sequence);

        context.render_container(Some(Identity::of(self)), kind, label, |ctx| {
            render_items(ctx, &items, depth);
            ctx.elide(total, items.len());
        });
    }
}

impl Render for Shared<SetValue> {
    fn render(&self, context: &mut RenderContext<'_>, depth: usize, label: Option<String>) {
        let width = context.config().max_container_width();
        let Ok(set) = self.try_borrow() else {
            context.emit_unrenderable("set");
            return;
        };
        let total = set.items.len();
        let items: Vec<Value> = set.items.iter().take(width).cloned().collect();
        let label = label.or_else(|| set.type_name.clone());
        drop(set);

        context.render_container(Some(Identity::of(self)), ContainerKind::Set, label, |ctx| {
            render_items(ctx, &items, depth);
            ctx.elide(total, items.len());
        });
    }
}

fn render_items(context: &mut RenderContext<'_>, items: &[Value], depth: usize) {
    for item in items {
        if context.is_exhausted() {
            break;
        }
        context.render_value(item, depth + 1);
    }
}

/// `TypeName("message", Cause(...))`, used when no exception customizer is
/// registered.
impl Render for Rc<ErrorValue> {
    fn render(&self, context: &mut RenderContext<'_>, depth: usize, label: Option<String>) {
        let label = label.unwrap_or_else(|| self.type_name.clone());
        context.render_container(None, ContainerKind::Tuple, Some(label), |ctx| {
            let scalars = ScalarRenderer::new(ctx.config());
            let (literal, omitted) = scalars.text(&self.message);
            ctx.emit_truncated(literal, omitted);
            if let Some(cause) = &self.cause {
                if !ctx.is_exhausted() {
                    ctx.render_value(&Value::Error(cause.clone()), depth + 1);
                }
            }
        });
    }
}

/// `TypeName<description>`, or `<TypeName #n>` when the object has no
/// description. `n` counts distinct objects in order of first appearance.
impl Render for Rc<dyn Inspect> {
    fn render(&self, context: &mut RenderContext<'_>, _depth: usize, _label: Option<String>) {
        let object: &dyn Inspect = self.as_ref();
        let inspected = catch_unwind(AssertUnwindSafe(|| {
            (object.type_name().to_string(), object.describe())
        }));

        match inspected {
            Ok((type_name, Ok(Some(description)))) => {
                let scalars = ScalarRenderer::new(context.config());
                let (kept, omitted) = scalars.truncate(&description);
                let literal = format!(
                    "{}<{}>",
                    scalars.escape(&type_name),
                    scalars.escape(&kept)
                );
                context.emit_truncated(literal, omitted);
            }
            Ok((type_name, Ok(None))) => {
                let ordinal = context.object_ordinal(Identity::of(self));
                let type_name = ScalarRenderer::new(context.config()).escape(&type_name);
                context.emit(Token::Literal(format!("<{type_name} #{ordinal}>")));
            }
            Ok((type_name, Err(error))) => {
                warn!(type_name = %type_name, %error, "describe failed");
                context.emit_unrenderable(&type_name);
            }
            Err(_) => {
                warn!("object inspection panicked");
                context.emit_unrenderable("object");
            }
        }
    }
}
