//! Process-wide customizer registry.
//!
//! Populate it during startup. Each render takes an [`Arc`] snapshot when it
//! starts, so a registration made while renders are running only affects
//! renders that start afterwards.

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::debug;

use crate::error::InspectError;
use crate::registry::{CustomizerId, CustomizerRegistry, Rendering};
use crate::renderer::Scope;
use crate::value::Value;

static GLOBAL: LazyLock<RwLock<Arc<CustomizerRegistry>>> =
    LazyLock::new(|| RwLock::new(Arc::new(CustomizerRegistry::new())));

/// Current snapshot of the process-wide registry.
pub fn global_registry() -> Arc<CustomizerRegistry> {
    let guard = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
}

pub fn register_customizer<P, F>(predicate: P, render: F, priority: i32) -> CustomizerId
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
    F: Fn(&Value, &Scope<'_>) -> Result<Rendering, InspectError> + Send + Sync + 'static,
{
    let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    let id = Arc::make_mut(&mut guard).register(predicate, render, priority);
    debug!(?id, priority, "registered global customizer");
    id
}

pub fn unregister_customizer(id: CustomizerId) -> bool {
    let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    Arc::make_mut(&mut guard).unregister(id)
}

/// Drops every user registration, leaving only the built-ins.
pub fn reset_customizers() {
    let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    *guard = Arc::new(CustomizerRegistry::new());
    debug!("global customizers reset");
}
