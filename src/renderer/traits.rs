use std::collections::HashMap;
use std::mem;

use tracing::debug;

use crate::config::RenderConfig;
use crate::emitter::{ContainerKind, Token, TokenStream};
use crate::registry::CustomizerRegistry;
use crate::renderer::tracker::IdentityTracker;
use crate::value::Identity;

/// Read-only view of the render position, handed to customizers.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    depth: usize,
    config: &'a RenderConfig,
}

impl<'a> Scope<'a> {
    pub fn new(depth: usize, config: &'a RenderConfig) -> Self {
        Self { depth, config }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    /// Levels left before the depth limit cuts a subtree.
    pub fn remaining_depth(&self) -> usize {
        self.config.max_depth().saturating_sub(self.depth)
    }
}

/// Per-call traversal state: output budget, ancestor path, container ids and
/// the tokens emitted so far.
///
/// Created fresh for every top-level render and dropped at its end.
///
/// The budget is counted in characters of joined text. A token is accepted
/// only if, after it, there is still room for a `...` marker and the closing
/// delimiters of every open container, so the final text never exceeds
/// `max_total_length`.
#[derive(Debug)]
pub struct RenderContext<'a> {
    config: &'a RenderConfig,
    registry: &'a CustomizerRegistry,
    stream: TokenStream,
    used: usize,
    /// Room kept for the streams a capture is nested in.
    held: usize,
    exhausted: bool,
    pub(crate) tracker: IdentityTracker,
    next_container_id: usize,
    object_ordinals: HashMap<Identity, usize>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a RenderConfig, registry: &'a CustomizerRegistry) -> Self {
        Self {
            config,
            registry,
            stream: TokenStream::new(config.layout()),
            used: 0,
            held: 0,
            exhausted: false,
            tracker: IdentityTracker::new(),
            next_container_id: 0,
            object_ordinals: HashMap::new(),
        }
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    pub fn registry(&self) -> &'a CustomizerRegistry {
        self.registry
    }

    pub fn scope(&self, depth: usize) -> Scope<'a> {
        Scope::new(depth, self.config)
    }

    /// Characters still free, not counting the reserve for closing the text.
    pub fn remaining_budget(&self) -> usize {
        self.config
            .max_total_length()
            .saturating_sub(self.used + self.held + self.stream.reserve())
    }

    /// Once set, nothing but the closing tokens of open containers is emitted
    /// for the rest of the render.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Appends `token` if the budget allows it.
    ///
    /// The first token that does not fit is replaced by a single
    /// `Truncated(0)` and the context becomes exhausted.
    pub fn emit(&mut self, token: Token) -> bool {
        self.emit_with(token, 0)
    }

    /// [`RenderContext::emit`], charging `extra` characters on top of the
    /// token's own cost.
    pub(crate) fn emit_with(&mut self, token: Token, extra: usize) -> bool {
        if self.exhausted {
            return false;
        }
        let (cost, reserve) = self.stream.measure(&token);
        let needed = self.used + self.held + cost + extra + reserve;
        if needed > self.config.max_total_length() {
            debug!(
                max_total_length = self.config.max_total_length(),
                "output budget exhausted"
            );
            self.exhausted = true;
            self.cut();
            return false;
        }
        self.used += cost + extra;
        self.stream.push(token);
        true
    }

    /// Writes the `...` marker where the budget ran out. Skipped only when
    /// the limit is too small for even the bare marker.
    pub(crate) fn cut(&mut self) {
        let marker = Token::Truncated(0);
        let cost = self.stream.cost_of(&marker);
        if self.used + self.held + cost <= self.config.max_total_length() {
            self.used += cost;
            self.stream.push(marker);
        }
    }

    /// Closes a container opened with [`RenderContext::emit`]. Never refused;
    /// its cost was reserved when the container opened.
    pub fn close(&mut self, kind: ContainerKind) {
        let token = Token::CloseContainer(kind);
        self.used += self.stream.cost_of(&token);
        self.stream.push(token);
    }

    /// Records back-references made from text joined in a capture.
    pub(crate) fn mark_referenced(&mut self, ids: impl IntoIterator<Item = usize>) {
        self.stream.mark_referenced(ids);
    }

    /// Anchor characters `ids` would add to the current stream.
    pub(crate) fn anchor_cost(&self, ids: impl IntoIterator<Item = usize>) -> usize {
        self.stream.anchor_cost(ids)
    }

    /// The id the next opened container will get.
    pub fn peek_container_id(&self) -> usize {
        self.next_container_id
    }

    pub fn take_container_id(&mut self) -> usize {
        let id = self.next_container_id;
        self.next_container_id += 1;
        id
    }

    /// Ordinal of an opaque object by first appearance in this render.
    pub fn object_ordinal(&mut self, identity: Identity) -> usize {
        let next = self.object_ordinals.len();
        *self.object_ordinals.entry(identity).or_insert(next)
    }

    /// Runs `render` against a fresh one-line stream and returns what it
    /// emitted. Tracker and ids stay shared with the outer render.
    ///
    /// The capture must fit in what the outer stream has left, but nothing
    /// stays charged afterwards: the caller charges the captured text when
    /// it emits it.
    pub fn capture(&mut self, render: impl FnOnce(&mut Self)) -> TokenStream {
        let reserve = self.stream.reserve();
        let used = self.used;
        self.held += reserve;
        let outer = mem::replace(
            &mut self.stream,
            TokenStream::new(self.config.inline_layout()),
        );

        render(self);

        self.held -= reserve;
        self.used = used;
        mem::replace(&mut self.stream, outer)
    }

    pub fn into_stream(self) -> TokenStream {
        self.stream
    }
}

/// Built-in rendering rule for one shape of value.
pub trait Render {
    /// `label`, when set, replaces the value's own container label.
    fn render(&self, context: &mut RenderContext<'_>, depth: usize, label: Option<String>);
}
