//! Scope identifiers and scope-bound container handles
//!
//! A scope is an explicit logical boundary (one request, one job) under which
//! `Scoped` services are shared. The container never expires scopes on its
//! own: the owner calls [`Container::end_scope`] when the boundary closes.

use crate::constructor::Parameters;
use crate::lazy::{self, Lazy};
use crate::{Container, Injectable, Instance, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "logging")]
use tracing::debug;

/// Unique scope identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope(u64);

impl Scope {
    /// The scope used when no other scope has been entered
    pub const ROOT: Scope = Scope(0);

    /// Generate a new unique scope ID.
    #[inline]
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// A container handle that resolves under a fixed scope.
///
/// Resolution through this handle ignores the container's current scope, so
/// two handles for different scopes can be used side by side.
///
/// # Examples
///
/// ```rust
/// use service_container::{Constructor, Container, Lifecycle};
///
/// struct RequestContext;
///
/// let container = Container::new();
/// container.define(Constructor::named("ctx").build(|_| Ok(RequestContext)));
/// container.bind_self("ctx", Lifecycle::Scoped);
///
/// let first = container.scoped_view(container.begin_scope());
/// let second = container.scoped_view(service_container::Scope::new());
///
/// let a = first.get::<RequestContext>("ctx").unwrap();
/// let b = first.get::<RequestContext>("ctx").unwrap();
/// let c = second.get::<RequestContext>("ctx").unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// assert!(!std::sync::Arc::ptr_eq(&a, &c));
/// ```
#[derive(Clone)]
pub struct ScopedContainer {
    container: Container,
    scope: Scope,
}

impl ScopedContainer {
    pub(crate) fn new(container: Container, scope: Scope) -> Self {
        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            scope_id = scope.id(),
            "Creating scoped container handle"
        );

        Self { container, scope }
    }

    /// Get the scope identifier.
    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Resolve an identifier within this scope.
    pub fn get_any(&self, id: &str) -> Result<Instance> {
        self.container.resolve_in(self.scope, id, &Parameters::new())
    }

    /// Resolve and downcast within this scope.
    pub fn get<T: Injectable>(&self, id: &str) -> Result<Arc<T>> {
        let instance = self.get_any(id)?;
        lazy::unwrap_instance::<T>(id, instance).map_err(|e| e.wrap(id))
    }

    /// Resolve the identifier of `T` within this scope.
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        self.get::<T>(T::service_id())
    }

    /// Resolve with parameter overrides within this scope.
    pub fn make_with_any(&self, id: &str, params: &Parameters) -> Result<Instance> {
        self.container.resolve_in(self.scope, id, params)
    }

    /// Resolve without forcing a lazy proxy.
    pub fn lazy<T: Injectable>(&self, id: &str) -> Result<Lazy<T>> {
        Ok(Lazy::from_instance(self.get_any(id)?))
    }

    #[inline]
    pub fn has(&self, id: &str) -> bool {
        self.container.has(id)
    }

    /// Get the underlying container.
    #[inline]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Drop this scope's cached instances.
    pub fn end(self) -> usize {
        self.container.end_scope(self.scope)
    }
}

impl std::fmt::Debug for ScopedContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedContainer")
            .field("scope", &self.scope)
            .field("container", &self.container)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_ids_unique() {
        let s1 = Scope::new();
        let s2 = Scope::new();
        let s3 = Scope::new();

        assert_ne!(s1.id(), s2.id());
        assert_ne!(s2.id(), s3.id());
        assert!(!s1.is_root());
        assert!(Scope::ROOT.is_root());
    }

    #[test]
    fn test_scope_display() {
        let scope = Scope::new();
        let display = format!("{}", scope);
        assert!(display.starts_with("scope-"));
        assert_eq!(Scope::ROOT.to_string(), "scope-0");
    }
}
