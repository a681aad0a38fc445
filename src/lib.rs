//! # xdumps
//!
//! Bounded, cycle-safe rendering of runtime values for log lines and error
//! reports.
//!
//! ```
//! use xdumps::{render_for_diagnostics, Value};
//!
//! let tags = Value::list(vec![Value::from(1), Value::from(2), Value::from(3)]);
//! let user = Value::record("User", vec![("name", Value::from("Alice\nBob")), ("tags", tags)]);
//! assert_eq!(
//!     render_for_diagnostics(&user, None),
//!     r#"User(name="Alice\nBob", tags=[1, 2, 3])"#
//! );
//! ```
//!
//! Rendering never fails and always terminates: containers that appear on
//! their own ancestor path become back-references, and depth, width and total
//! length limits from [`RenderConfig`] bound the output. The total length
//! limit is a hard cap on the joined text, layout whitespace included.
//!
//! A panicking customizer is rendered as `<unrenderable: Type>`; the panic
//! hook still reports it (see [`Renderer`]).

pub mod config;
pub mod emitter;
pub mod error;
pub mod registry;
pub mod renderer;
pub mod value;

#[cfg(test)]
mod tests;

use serde::Serialize;
use tracing::warn;

pub use config::{Literals, QuoteStyle, RenderConfig, RenderConfigBuilder};
pub use emitter::{ContainerKind, Layout, Token, TokenStream};
pub use error::{ConfigError, InspectError};
pub use registry::{
    global_registry, predicate, register_customizer, reset_customizers, unregister_customizer,
    CustomizerId, CustomizerRegistry, Rendering, BUILTIN_PRIORITY, DEFAULT_PRIORITY,
};
pub use renderer::{Renderer, Scope};
pub use value::{classify, Category, ErrorValue, Identity, Inspect, Value};

/// Renders `value` as bounded diagnostic text.
///
/// Uses the process-wide customizer registry and, without a `config`, the
/// default limits.
pub fn render_for_diagnostics(value: &Value, config: Option<&RenderConfig>) -> String {
    tokenize(value, config).join()
}

/// Same traversal as [`render_for_diagnostics`], stopping before the join.
pub fn tokenize(value: &Value, config: Option<&RenderConfig>) -> TokenStream {
    let config = config.cloned().unwrap_or_default();
    Renderer::new(config).tokenize(value)
}

/// Renders anything serde can serialize, through its JSON data model.
pub fn render_serializable<T: Serialize + ?Sized>(value: &T, config: Option<&RenderConfig>) -> String {
    match Value::from_serialize(value) {
        Ok(value) => render_for_diagnostics(&value, config),
        Err(error) => {
            let type_name = std::any::type_name::<T>();
            warn!(type_name, %error, "value could not be serialized for rendering");
            format!("<unrenderable: {type_name}>")
        }
    }
}
