//! Binding records held by the container

use crate::constructor::Parameters;
use crate::resolver::Resolver;
use crate::{Injectable, Instance, Lifecycle, Result};
use std::sync::Arc;

/// Type-erased construction closure.
pub type ClosureFn = dyn Fn(&mut Resolver<'_>, &Parameters) -> Result<Instance> + Send + Sync;

/// How an abstract identifier is turned into an instance.
#[derive(Clone)]
pub enum Concrete {
    /// Build the abstract identifier itself from its registered constructor
    Itself,
    /// Resolve another identifier
    Type(String),
    /// Call a closure with the active resolver and the override parameters
    Closure(Arc<ClosureFn>),
}

impl Concrete {
    /// Wrap a typed closure
    pub fn closure<T, F>(f: F) -> Self
    where
        T: Injectable,
        F: Fn(&mut Resolver<'_>, &Parameters) -> Result<T> + Send + Sync + 'static,
    {
        Concrete::Closure(Arc::new(move |resolver, params| {
            f(resolver, params).map(|value| Arc::new(value) as Instance)
        }))
    }

    /// Wrap a closure that already produces a type-erased instance
    pub fn erased<F>(f: F) -> Self
    where
        F: Fn(&mut Resolver<'_>, &Parameters) -> Result<Instance> + Send + Sync + 'static,
    {
        Concrete::Closure(Arc::new(f))
    }

    /// Point at the identifier of `T`
    pub fn of<T: Injectable>() -> Self {
        Concrete::Type(T::service_id().to_owned())
    }
}

impl From<&str> for Concrete {
    fn from(id: &str) -> Self {
        Concrete::Type(id.to_owned())
    }
}

impl From<String> for Concrete {
    fn from(id: String) -> Self {
        Concrete::Type(id)
    }
}

impl std::fmt::Debug for Concrete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Concrete::Itself => f.write_str("Itself"),
            Concrete::Type(id) => f.debug_tuple("Type").field(id).finish(),
            Concrete::Closure(_) => f.write_str("Closure"),
        }
    }
}

/// A registry entry mapping an abstract identifier to a construction strategy.
#[derive(Debug, Clone)]
pub struct Binding {
    pub(crate) abstract_id: String,
    pub(crate) concrete: Concrete,
    pub(crate) lifecycle: Lifecycle,
}

impl Binding {
    /// Create a binding. A concrete identifier equal to the abstract one is
    /// stored as [`Concrete::Itself`].
    pub fn new(abstract_id: impl Into<String>, concrete: Concrete, lifecycle: Lifecycle) -> Self {
        let abstract_id = abstract_id.into();
        let concrete = match concrete {
            Concrete::Type(id) if id == abstract_id => Concrete::Itself,
            other => other,
        };
        Self {
            abstract_id,
            concrete,
            lifecycle,
        }
    }

    pub fn abstract_id(&self) -> &str {
        &self.abstract_id
    }

    pub fn concrete(&self) -> &Concrete {
        &self.concrete
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_reference_normalized() {
        let binding = Binding::new("Cache", "Cache".into(), Lifecycle::Singleton);
        assert!(matches!(binding.concrete(), Concrete::Itself));

        let binding = Binding::new("Cache", "RedisCache".into(), Lifecycle::Singleton);
        assert!(matches!(binding.concrete(), Concrete::Type(id) if id == "RedisCache"));
    }
}
