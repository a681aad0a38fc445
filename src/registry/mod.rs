//! Customizer registry: priority-ordered overrides for the built-in
//! category rules.

pub mod builtins;
pub mod global;
pub mod predicate;
pub mod registry;

pub use global::*;
pub use registry::*;
