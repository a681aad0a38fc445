use std::collections::BTreeSet;
use std::fmt;

use crate::emitter::token::{ContainerKind, Token};

const CUT_MARKER: &str = "...";

/// Whitespace and separators applied by [`TokenStream::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Spaces per nesting level; `None` keeps everything on one line.
    pub indent: Option<usize>,
    /// Left padding added to every output line.
    pub rshift: usize,
    /// Written between container items. Pretty layouts follow it with a
    /// line break.
    pub item_separator: String,
    /// Written between a mapping key and its value. Record fields always
    /// use `=`.
    pub key_separator: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self::compact()
    }
}

impl Layout {
    pub fn compact() -> Self {
        Self {
            indent: None,
            rshift: 0,
            item_separator: ", ".to_string(),
            key_separator: ": ".to_string(),
        }
    }

    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            item_separator: ",".to_string(),
            ..Self::compact()
        }
    }

    pub fn with_rshift(mut self, rshift: usize) -> Self {
        self.rshift = rshift;
        self
    }

    pub fn with_separators(mut self, item: impl Into<String>, key: impl Into<String>) -> Self {
        self.item_separator = item.into();
        self.key_separator = key.into();
        self
    }

    pub fn key_separator(&self, kind: ContainerKind) -> &str {
        match kind {
            ContainerKind::Record => "=",
            _ => &self.key_separator,
        }
    }

    /// Characters of a line break before something at `depth`, padding
    /// included. Zero on one-line layouts.
    fn line_break(&self, depth: usize) -> usize {
        match self.indent {
            Some(indent) => 1 + indent * depth + self.rshift,
            None => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    kind: ContainerKind,
    items: usize,
    awaiting_value: bool,
}

/// Join state after some prefix of a token sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Cursor {
    stack: Vec<Frame>,
    started: bool,
}

impl Cursor {
    /// Appends the text of `token` to `out`, without `rshift` padding.
    /// Open containers listed in `anchors` get their `&id ` prefix.
    fn write(&mut self, token: &Token, layout: &Layout, anchors: &BTreeSet<usize>, out: &mut String) {
        let before = out.len();
        match token {
            Token::Truncated(omitted) if *omitted > 0 => {
                out.push_str(&format!("{CUT_MARKER}(+{omitted})"));
            }
            Token::CloseContainer(kind) => {
                if let Some(frame) = self.stack.pop() {
                    if frame.items > 0 || frame.awaiting_value {
                        newline(layout, out, self.stack.len());
                    }
                }
                out.push_str(kind.close_delim());
                self.finish_item();
            }
            Token::FieldName(name) => {
                self.begin_item(layout, out);
                out.push_str(name);
                if let Some(frame) = self.stack.last_mut() {
                    out.push_str(layout.key_separator(frame.kind));
                    frame.awaiting_value = true;
                }
            }
            Token::OpenContainer { kind, label, id } => {
                self.begin_item(layout, out);
                if anchors.contains(id) {
                    out.push_str(&format!("&{id} "));
                }
                if let Some(label) = label {
                    out.push_str(label);
                }
                out.push_str(kind.open_delim());
                self.stack.push(Frame {
                    kind: *kind,
                    items: 0,
                    awaiting_value: false,
                });
            }
            Token::Literal(text) => {
                self.begin_item(layout, out);
                out.push_str(text);
                self.finish_item();
            }
            Token::BackReference(id) => {
                self.begin_item(layout, out);
                out.push_str(&format!("*{id}"));
                self.finish_item();
            }
            Token::Elided(count) => {
                self.begin_item(layout, out);
                out.push_str(&format!("{CUT_MARKER}({count} more)"));
                self.finish_item();
            }
            Token::Truncated(_) => {
                self.begin_item(layout, out);
                out.push_str(CUT_MARKER);
                self.finish_item();
            }
        }
        if out.len() > before {
            self.started = true;
        }
    }

    fn begin_item(&mut self, layout: &Layout, out: &mut String) {
        let depth = self.stack.len();
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        if frame.awaiting_value {
            frame.awaiting_value = false;
            return;
        }
        if frame.items > 0 {
            out.push_str(&layout.item_separator);
        }
        newline(layout, out, depth);
    }

    fn finish_item(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.items += 1;
        }
    }

    /// Upper bound on the characters a `Truncated(0)` at this point plus
    /// the closing of every open container add to the text.
    ///
    /// Never grows when a container closes, so a reserve taken when a
    /// container opens still covers everything after it.
    fn reserve(&self, layout: &Layout) -> usize {
        let depth = self.stack.len();
        if depth == 0 {
            return if self.started {
                0
            } else {
                layout.rshift + CUT_MARKER.len()
            };
        }
        let marker = layout.item_separator.chars().count()
            + layout.line_break(depth)
            + CUT_MARKER.len();
        let closes: usize = (0..depth).map(|level| layout.line_break(level) + 1).sum();
        marker + closes
    }
}

fn newline(layout: &Layout, out: &mut String, depth: usize) {
    if let Some(indent) = layout.indent {
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(indent * depth));
    }
}

/// Length of the `&id ` anchor printed in front of a referenced container.
fn anchor_len(id: usize) -> usize {
    id.to_string().len() + 2
}

/// Append-only token sequence produced by one render.
///
/// The stream tracks the join state as tokens arrive, so the exact number of
/// characters a token will add to the joined text is known before it is
/// pushed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    layout: Layout,
    referenced: BTreeSet<usize>,
    cursor: Cursor,
}

impl TokenStream {
    pub fn new(layout: Layout) -> Self {
        Self {
            tokens: Vec::new(),
            layout,
            referenced: BTreeSet::new(),
            cursor: Cursor::default(),
        }
    }

    pub fn push(&mut self, token: Token) {
        let mut sink = String::new();
        self.cursor
            .write(&token, &self.layout, &BTreeSet::new(), &mut sink);
        if let Token::BackReference(id) = token {
            self.referenced.insert(id);
        }
        self.tokens.push(token);
    }

    /// Characters `token` adds to the joined text: separators, line breaks,
    /// padding, and the anchor a first back-reference puts on its target.
    pub fn cost_of(&self, token: &Token) -> usize {
        self.measure(token).0
    }

    /// [`TokenStream::cost_of`] together with the reserve that would be left
    /// after pushing `token`.
    pub fn measure(&self, token: &Token) -> (usize, usize) {
        let mut cursor = self.cursor.clone();
        let mut text = String::new();
        cursor.write(token, &self.layout, &BTreeSet::new(), &mut text);

        let mut cost = text.chars().count();
        if self.layout.rshift > 0 && !text.is_empty() {
            let lines = text.matches('\n').count() + usize::from(!self.cursor.started);
            cost += lines * self.layout.rshift;
        }
        if let Token::BackReference(id) = token {
            cost += self.anchor_cost([*id]);
        }
        (cost, cursor.reserve(&self.layout))
    }

    /// Room needed to end the text from here: one `...` marker and the
    /// closing delimiters of every open container.
    pub fn reserve(&self) -> usize {
        self.cursor.reserve(&self.layout)
    }

    /// Characters of the anchors `ids` would add that are not printed yet.
    pub fn anchor_cost(&self, ids: impl IntoIterator<Item = usize>) -> usize {
        ids.into_iter()
            .filter(|id| !self.referenced.contains(id))
            .map(anchor_len)
            .sum()
    }

    /// Containers that get an `&id` anchor when joined.
    pub fn referenced(&self) -> &BTreeSet<usize> {
        &self.referenced
    }

    /// Records back-references that live inside text already joined
    /// elsewhere, such as a mapping key.
    pub fn mark_referenced(&mut self, ids: impl IntoIterator<Item = usize>) {
        self.referenced.extend(ids);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Joins the tokens into text.
    ///
    /// Separators, indentation and anchors are derived from the token kinds
    /// alone, so joining the same stream twice gives identical text.
    pub fn join(&self) -> String {
        let mut out = String::new();
        let mut cursor = Cursor::default();
        for token in &self.tokens {
            cursor.write(token, &self.layout, &self.referenced, &mut out);
        }
        shift_lines(&out, self.layout.rshift)
    }
}

fn shift_lines(text: &str, rshift: usize) -> String {
    if rshift == 0 || text.is_empty() {
        return text.to_string();
    }
    let pad = " ".repeat(rshift);
    text.split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}
