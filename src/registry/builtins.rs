//! Customizers every default registry ships with.

use crate::error::InspectError;
use crate::registry::{predicate, CustomizerRegistry, Rendering, BUILTIN_PRIORITY};
use crate::renderer::Scope;
use crate::value::{Category, ErrorValue, Value};

pub const EXCEPTION: &str = "builtin.exception";
pub const PATH: &str = "builtin.path";
pub const DERIVED_CONTAINER: &str = "builtin.derived_container";

pub(crate) fn install(registry: &mut CustomizerRegistry) {
    registry.register_named(
        EXCEPTION,
        predicate::category(Category::ExceptionLike),
        render_exception,
        BUILTIN_PRIORITY,
    );
    registry.register_named(
        PATH,
        predicate::category(Category::PathLike),
        render_path,
        BUILTIN_PRIORITY,
    );
    registry.register_named(
        DERIVED_CONTAINER,
        is_derived_container,
        render_derived_container,
        BUILTIN_PRIORITY,
    );
}

/// `TypeName(message="...", cause=Cause(...))`; the traceback is never part
/// of an [`ErrorValue`], so it cannot leak into the output.
fn render_exception(value: &Value, _scope: &Scope<'_>) -> Result<Rendering, InspectError> {
    let Value::Error(error) = value else {
        return Err(InspectError::new("exception customizer given a non-error value"));
    };
    Ok(Rendering::substitute(exception_record(error)))
}

fn exception_record(error: &ErrorValue) -> Value {
    let mut fields = vec![("message", Value::from(error.message.as_str()))];
    if let Some(cause) = &error.cause {
        fields.push(("cause", Value::Error(cause.clone())));
    }
    Value::record(error.type_name.as_str(), fields)
}

/// Paths always render with forward slashes, whatever the platform.
fn render_path(value: &Value, _scope: &Scope<'_>) -> Result<Rendering, InspectError> {
    let Value::Path(path) = value else {
        return Err(InspectError::new("path customizer given a non-path value"));
    };
    let posix = path.to_string_lossy().replace('\\', "/");
    Ok(Rendering::substitute(Value::Str(posix)))
}

fn is_derived_container(value: &Value) -> bool {
    matches!(value, Value::Object(object) if object.base_kind().is_some())
}

/// Unknown types deriving from a well-known container render with the
/// base container's structure, labelled with the concrete type name.
fn render_derived_container(value: &Value, _scope: &Scope<'_>) -> Result<Rendering, InspectError> {
    let Value::Object(object) = value else {
        return Err(InspectError::new("derived container customizer given a non-object"));
    };
    let structure = object.structure()?;
    Ok(Rendering::labeled(object.type_name(), structure))
}
