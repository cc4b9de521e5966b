//! Resolution state machine
//!
//! A [`Resolver`] is created for every top-level resolution and carries the
//! resolution stack through the whole call tree. Closures and factories
//! receive it so their nested lookups take part in the same cycle detection.

use crate::binding::{Binding, Concrete};
use crate::constructor::{Arguments, ParamKind, Parameters};
use crate::lazy::{self, Lazy};
use crate::scope::Scope;
use crate::{Container, DiError, Injectable, Instance, Lifecycle, Result};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Maximum number of identifiers on one resolution stack.
pub const MAX_RESOLUTION_DEPTH: usize = 50;

/// Per-call resolution context.
pub struct Resolver<'c> {
    container: &'c Container,
    scope: Scope,
    stack: Vec<String>,
}

impl<'c> Resolver<'c> {
    pub(crate) fn new(container: &'c Container, scope: Scope) -> Self {
        Self {
            container,
            scope,
            stack: Vec::new(),
        }
    }

    /// The container being resolved from
    #[inline]
    pub fn container(&self) -> &'c Container {
        self.container
    }

    /// Scope used for `Scoped` bindings
    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Identifiers currently being resolved, outermost first
    #[inline]
    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    /// Number of identifiers currently being resolved
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Resolve a dependency as part of the current resolution
    pub fn get_any(&mut self, id: &str) -> Result<Instance> {
        self.resolve(id, &Parameters::new())
    }

    /// Resolve and downcast a dependency; lazy proxies are forced
    pub fn get<T: Injectable>(&mut self, id: &str) -> Result<Arc<T>> {
        let instance = self.get_any(id)?;
        lazy::unwrap_instance::<T>(id, instance)
    }

    /// Resolve the identifier of `T`
    pub fn resolve_type<T: Injectable>(&mut self) -> Result<Arc<T>> {
        self.get::<T>(T::service_id())
    }

    /// Resolve with parameter overrides
    pub fn make_with_any(&mut self, id: &str, params: &Parameters) -> Result<Instance> {
        self.resolve(id, params)
    }

    /// Resolve without forcing a lazy proxy
    pub fn lazy<T: Injectable>(&mut self, id: &str) -> Result<Lazy<T>> {
        Ok(Lazy::from_instance(self.get_any(id)?))
    }

    /// Build a defined type from its constructor, ignoring bindings and factories.
    pub fn construct(&mut self, type_id: &str, params: &Parameters) -> Result<Instance> {
        // Factories delegating to the type they are registered under are
        // already guarded by the enclosing frame.
        if self.stack.last().map(String::as_str) == Some(type_id) {
            return self.reflect(type_id, params);
        }
        self.guarded(type_id, |resolver| resolver.reflect(type_id, params))
    }

    pub(crate) fn resolve(&mut self, id: &str, params: &Parameters) -> Result<Instance> {
        let container = self.container;
        let storage = container.storage();

        if let Some(instance) = storage.instance(id) {
            #[cfg(feature = "logging")]
            trace!(
                target: "service_container",
                service = id,
                location = "instances",
                "Service resolved from instance cache"
            );
            return Ok(instance);
        }

        let binding = storage.binding(id);
        let lifecycle = binding
            .as_ref()
            .map(Binding::lifecycle)
            .unwrap_or_default();

        if lifecycle == Lifecycle::Scoped {
            if let Some(instance) = storage.scoped_instance(self.scope, id) {
                #[cfg(feature = "logging")]
                trace!(
                    target: "service_container",
                    service = id,
                    scope_id = self.scope.id(),
                    location = "scoped",
                    "Service resolved from scoped cache"
                );
                return Ok(instance);
            }
        }

        let instance = self.guarded(id, |resolver| resolver.build(id, binding.as_ref(), params))?;

        // Overrides apply to this call only, so the result is never shared.
        if !params.is_empty() {
            return Ok(instance);
        }

        Ok(match lifecycle {
            Lifecycle::Singleton => storage.cache_instance(id, instance),
            Lifecycle::Scoped => storage.cache_scoped(self.scope, id, instance),
            Lifecycle::Transient => instance,
        })
    }

    /// Push `id` for the duration of `f`, enforcing cycle freedom and the depth ceiling.
    fn guarded<F>(&mut self, id: &str, f: F) -> Result<Instance>
    where
        F: FnOnce(&mut Self) -> Result<Instance>,
    {
        if self.stack.iter().any(|entry| entry == id) {
            let mut path = self.stack.clone();
            path.push(id.to_owned());

            #[cfg(feature = "logging")]
            debug!(
                target: "service_container",
                service = id,
                path = %path.join(" -> "),
                "Circular dependency detected"
            );

            return Err(DiError::CircularDependency { path });
        }

        if self.stack.len() >= MAX_RESOLUTION_DEPTH {
            let mut path = self.stack.clone();
            path.push(id.to_owned());
            return Err(DiError::DepthExceeded {
                id: id.to_owned(),
                limit: MAX_RESOLUTION_DEPTH,
                path,
            });
        }

        self.stack.push(id.to_owned());
        let result = f(&mut *self);
        self.stack.pop();
        result
    }

    fn build(&mut self, id: &str, binding: Option<&Binding>, params: &Parameters) -> Result<Instance> {
        let container = self.container;
        if let Some(factory) = container.storage().factory(id) {
            #[cfg(feature = "logging")]
            trace!(
                target: "service_container",
                service = id,
                depth = self.stack.len(),
                "Delegating to registered factory"
            );
            return factory.make(self, params);
        }

        match binding.map(Binding::concrete) {
            Some(Concrete::Closure(closure)) => closure(self, params),
            Some(Concrete::Type(target)) => self.resolve(target, params),
            Some(Concrete::Itself) | None => self.reflect(id, params),
        }
    }

    /// Autowire `type_id` from the constructor table.
    fn reflect(&mut self, type_id: &str, params: &Parameters) -> Result<Instance> {
        let container = self.container;
        let storage = container.storage();
        let constructor = storage
            .constructor(type_id)
            .ok_or_else(|| DiError::not_found(type_id))?;

        if !constructor.is_instantiable() {
            return Err(DiError::NotInstantiable {
                id: type_id.to_owned(),
            });
        }

        #[cfg(feature = "logging")]
        trace!(
            target: "service_container",
            service = type_id,
            params = constructor.param_count(),
            depth = self.stack.len(),
            "Autowiring constructor"
        );

        let mut args = Arguments::new(type_id, constructor.param_count());
        for param in constructor.params() {
            if let Some(value) = params.get(param.name()) {
                args.push(param.name(), Arc::clone(value));
                continue;
            }

            if let ParamKind::Service(dependency) = param.kind() {
                if storage.is_resolvable(dependency) {
                    let value = self.resolve(dependency, &Parameters::new())?;
                    args.push(param.name(), value);
                    continue;
                }
            }

            if let Some(value) = param.default_value() {
                args.push(param.name(), value);
                continue;
            }

            if param.is_optional() {
                continue;
            }

            return Err(DiError::UnresolvableParameter {
                id: type_id.to_owned(),
                parameter: param.name().to_owned(),
            });
        }

        constructor.invoke(&args)
    }
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("scope", &self.scope)
            .field("stack", &self.stack)
            .finish()
    }
}
