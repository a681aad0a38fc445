use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

use crate::emitter::ContainerKind;
use crate::error::InspectError;

/// Interior-mutable shared handle, so containers can reference each other
/// (and themselves) after construction.
pub type Shared<T> = Rc<RefCell<T>>;

/// Opaque identity of a container or object: the address of its allocation.
///
/// Two containers with equal contents have different identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(usize);

impl Identity {
    pub(crate) fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        Identity(Rc::as_ptr(rc) as *const () as usize)
    }
}

/// Inspection hooks for values the engine knows nothing about.
///
/// Every hook may be user code, so the engine calls them only while
/// rendering (never while classifying) and contains any failure to the
/// offending leaf.
pub trait Inspect {
    fn type_name(&self) -> &str;

    /// The well-known container shape this type derives from, if any.
    fn base_kind(&self) -> Option<ContainerKind> {
        None
    }

    /// Base-shaped view used when [`Inspect::base_kind`] is set.
    fn structure(&self) -> Result<Value, InspectError> {
        Err(InspectError::new(format!(
            "{} has no structural view",
            self.type_name()
        )))
    }

    /// Free-form description; `Ok(None)` renders the opaque form.
    fn describe(&self) -> Result<Option<String>, InspectError> {
        Ok(None)
    }
}

/// A record with a fixed, ordered set of named fields.
#[derive(Clone, Default)]
pub struct Record {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

/// Dynamic key to value mapping, kept in insertion order.
#[derive(Clone, Default)]
pub struct Mapping {
    pub type_name: Option<String>,
    pub entries: Vec<(Value, Value)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceKind {
    #[default]
    List,
    Tuple,
}

#[derive(Clone, Default)]
pub struct Sequence {
    pub kind: SequenceKind,
    pub type_name: Option<String>,
    pub items: Vec<Value>,
}

/// Unordered unique elements. Elements are stored (and rendered) in the
/// order they were added.
#[derive(Clone, Default)]
pub struct SetValue {
    pub type_name: Option<String>,
    pub items: Vec<Value>,
}

/// An error or exception: type name, message and an optional chained cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub type_name: String,
    pub message: String,
    pub cause: Option<Rc<ErrorValue>>,
}

impl ErrorValue {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: ErrorValue) -> Self {
        self.cause = Some(Rc::new(cause));
        self
    }

    /// Captures an error and its `source()` chain. Sources are type-erased,
    /// so they are named `Error`.
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(err) = source {
            causes.push(ErrorValue::new("Error", err.to_string()));
            source = err.source();
        }

        let mut chain: Option<Rc<ErrorValue>> = None;
        for mut cause in causes.into_iter().rev() {
            cause.cause = chain;
            chain = Some(Rc::new(cause));
        }

        Self {
            type_name: short_type_name(std::any::type_name::<E>()).to_string(),
            message: error.to_string(),
            cause: chain,
        }
    }
}

/// `alloc::string::String` -> `String`, `my::Wrapper<a::B>` -> `Wrapper`
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A runtime value handed to the renderer.
///
/// Cloning a container variant clones the handle, not the contents.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Duration(Duration),
    Str(String),
    Bytes(Vec<u8>),
    Path(PathBuf),
    Error(Rc<ErrorValue>),
    Record(Shared<Record>),
    Map(Shared<Mapping>),
    List(Shared<Sequence>),
    Set(Shared<SetValue>),
    Object(Rc<dyn Inspect>),
}

impl Value {
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(Sequence {
            kind: SequenceKind::List,
            type_name: None,
            items: items.into_iter().collect(),
        })))
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(Sequence {
            kind: SequenceKind::Tuple,
            type_name: None,
            items: items.into_iter().collect(),
        })))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Rc::new(RefCell::new(SetValue {
            type_name: None,
            items: items.into_iter().collect(),
        })))
    }

    pub fn map<K: Into<Value>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(RefCell::new(Mapping {
            type_name: None,
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })))
    }

    pub fn record<N: Into<String>>(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, Value)>,
    ) -> Self {
        Value::Record(Rc::new(RefCell::new(Record {
            type_name: type_name.into(),
            fields: fields.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        })))
    }

    pub fn error(error: ErrorValue) -> Self {
        Value::Error(Rc::new(error))
    }

    pub fn object<T: Inspect + 'static>(object: T) -> Self {
        Value::Object(Rc::new(object))
    }

    /// Sets the display type name of a mapping, sequence or set.
    pub fn named(self, type_name: impl Into<String>) -> Self {
        let type_name = Some(type_name.into());
        match &self {
            Value::Map(map) => map.borrow_mut().type_name = type_name,
            Value::List(seq) => seq.borrow_mut().type_name = type_name,
            Value::Set(set) => set.borrow_mut().type_name = type_name,
            _ => {}
        }
        self
    }

    /// Appends to a list, tuple or set. Returns false for any other value.
    pub fn push(&self, item: Value) -> bool {
        match self {
            Value::List(seq) => seq.borrow_mut().items.push(item),
            Value::Set(set) => set.borrow_mut().items.push(item),
            _ => return false,
        }
        true
    }

    /// Appends a mapping entry or a record field. Returns false for any
    /// other value.
    pub fn insert(&self, key: impl Into<Value>, value: Value) -> bool {
        match self {
            Value::Map(map) => map.borrow_mut().entries.push((key.into(), value)),
            Value::Record(record) => {
                let name = match key.into() {
                    Value::Str(name) => name,
                    _ => return false,
                };
                record.borrow_mut().fields.push((name, value));
            }
            _ => return false,
        }
        true
    }

    /// Converts anything serde can serialize, through its JSON data model.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Value::from)
    }

    /// Reference identity for containers and objects; `None` for scalars.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Record(rc) => Some(Identity::of(rc)),
            Value::Map(rc) => Some(Identity::of(rc)),
            Value::List(rc) => Some(Identity::of(rc)),
            Value::Set(rc) => Some(Identity::of(rc)),
            Value::Object(rc) => Some(Identity::of(rc)),
            _ => None,
        }
    }

    /// Short display name of the value's type.
    ///
    /// A container that is mutably borrowed elsewhere falls back to its
    /// generic name.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) | Value::UInt(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Duration(_) => "duration".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::Bytes(_) => "bytes".to_string(),
            Value::Path(_) => "path".to_string(),
            Value::Error(err) => err.type_name.clone(),
            Value::Record(record) => record
                .try_borrow()
                .map(|r| r.type_name.clone())
                .unwrap_or_else(|_| "record".to_string()),
            Value::Map(map) => map
                .try_borrow()
                .ok()
                .and_then(|m| m.type_name.clone())
                .unwrap_or_else(|| "map".to_string()),
            Value::List(seq) => match seq.try_borrow() {
                Ok(seq) => seq.type_name.clone().unwrap_or_else(|| match seq.kind {
                    SequenceKind::List => "list".to_string(),
                    SequenceKind::Tuple => "tuple".to_string(),
                }),
                Err(_) => "list".to_string(),
            },
            Value::Set(set) => set
                .try_borrow()
                .ok()
                .and_then(|s| s.type_name.clone())
                .unwrap_or_else(|| "set".to_string()),
            Value::Object(object) => object.type_name().to_string(),
        }
    }
}

// Shallow on purpose: a derived Debug would recurse forever on cyclic values.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::UInt(u) => write!(f, "UInt({u})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Duration(d) => write!(f, "Duration({d:?})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Bytes(b) => write!(f, "Bytes(len={})", b.len()),
            Value::Path(p) => write!(f, "Path({p:?})"),
            Value::Error(e) => write!(f, "Error({}: {:?})", e.type_name, e.message),
            Value::Record(_) | Value::Map(_) | Value::List(_) | Value::Set(_) => {
                let id = self.identity().map(|Identity(addr)| addr).unwrap_or_default();
                write!(f, "{}@{:#x}", self.type_name(), id)
            }
            Value::Object(object) => write!(f, "Object({})", object.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Int(i64::from(u))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UInt(u)
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::UInt(u as u64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<PathBuf> for Value {
    fn from(path: PathBuf) -> Self {
        Value::Path(path)
    }
}

impl From<&Path> for Value {
    fn from(path: &Path) -> Self {
        Value::Path(path.to_path_buf())
    }
}

impl From<ErrorValue> for Value {
    fn from(error: ErrorValue) -> Self {
        Value::error(error)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::list(items.iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::map(map.iter().map(|(k, v)| (k.as_str(), Value::from(v))))
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}
