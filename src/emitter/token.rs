/// Shape of an open container, which decides its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Tuple,
    Set,
    Map,
    Record,
}

impl ContainerKind {
    pub fn open_delim(self) -> &'static str {
        match self {
            ContainerKind::List => "[",
            ContainerKind::Tuple | ContainerKind::Record => "(",
            ContainerKind::Set | ContainerKind::Map => "{",
        }
    }

    pub fn close_delim(self) -> &'static str {
        match self {
            ContainerKind::List => "]",
            ContainerKind::Tuple | ContainerKind::Record => ")",
            ContainerKind::Set | ContainerKind::Map => "}",
        }
    }
}

/// One structural rendering decision.
///
/// Tokens hold display text only, never the source value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Fully formatted scalar text.
    Literal(String),
    /// `id` is the container's ordinal within the render; back-references
    /// point at it.
    OpenContainer {
        kind: ContainerKind,
        label: Option<String>,
        id: usize,
    },
    FieldName(String),
    CloseContainer(ContainerKind),
    /// The ancestor container `id` appears again on its own path.
    BackReference(usize),
    /// Count of container elements past the width limit.
    Elided(usize),
    /// With a non-zero count, a suffix on the preceding literal saying how
    /// many characters were cut. With zero, a standalone cut (depth limit or
    /// exhausted budget).
    Truncated(usize),
}
