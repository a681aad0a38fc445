use std::fmt;

use crate::value::types::Value;

/// How a value's shape is rendered.
///
/// Variants are listed in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    NullLike,
    Boolean,
    Number,
    Text,
    BytesLike,
    PathLike,
    ExceptionLike,
    RecordLike,
    MappingLike,
    SequenceLike,
    SetLike,
    Generic,
}

impl Category {
    /// Containers take part in cycle tracking and width limits.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Category::RecordLike | Category::MappingLike | Category::SequenceLike | Category::SetLike
        )
    }

    pub fn is_scalar(self) -> bool {
        !self.is_container() && self != Category::Generic
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::NullLike => "null",
            Category::Boolean => "boolean",
            Category::Number => "number",
            Category::Text => "text",
            Category::BytesLike => "bytes",
            Category::PathLike => "path",
            Category::ExceptionLike => "exception",
            Category::RecordLike => "record",
            Category::MappingLike => "mapping",
            Category::SequenceLike => "sequence",
            Category::SetLike => "set",
            Category::Generic => "generic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total and pure: looks only at the variant, never at contents or user hooks.
pub fn classify(value: &Value) -> Category {
    match value {
        Value::Null => Category::NullLike,
        Value::Bool(_) => Category::Boolean,
        Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::Duration(_) => Category::Number,
        Value::Str(_) => Category::Text,
        Value::Bytes(_) => Category::BytesLike,
        Value::Path(_) => Category::PathLike,
        Value::Error(_) => Category::ExceptionLike,
        Value::Record(_) => Category::RecordLike,
        Value::Map(_) => Category::MappingLike,
        Value::List(_) => Category::SequenceLike,
        Value::Set(_) => Category::SetLike,
        Value::Object(_) => Category::Generic,
    }
}
