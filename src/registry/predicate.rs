//! Ready-made predicates for [`CustomizerRegistry::register`](crate::CustomizerRegistry::register).

use crate::registry::Predicate;
use crate::value::{classify, Category, Value};

/// Matches every value the classifier puts in `category`.
pub fn category(category: Category) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    move |value: &Value| classify(value) == category
}

/// Matches values whose [`Value::type_name`] equals `name` exactly.
pub fn type_name(name: impl Into<String>) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    let name = name.into();
    move |value: &Value| value.type_name() == name
}

pub fn any_of(predicates: Vec<Predicate>) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    move |value: &Value| predicates.iter().any(|predicate| predicate(value))
}
