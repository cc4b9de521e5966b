//! Factories for services that need contextual parameters
//!
//! A factory fully bypasses the constructor table: the container hands it the
//! active resolver and the caller's override parameters and uses whatever it
//! returns. Factories win over bindings and constructors, but never over an
//! already-cached instance.

use crate::constructor::Parameters;
use crate::resolver::Resolver;
use crate::{Injectable, Instance, Result};
use std::marker::PhantomData;
use std::sync::Arc;

/// A factory that creates service instances
pub trait ServiceFactory: Send + Sync + 'static {
    /// Build an instance for the given parameters
    fn make(&self, resolver: &mut Resolver<'_>, params: &Parameters) -> Result<Instance>;
}

/// Adapter turning a typed closure into a [`ServiceFactory`]
pub struct FnFactory<T, F> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> FnFactory<T, F>
where
    T: Injectable,
    F: Fn(&mut Resolver<'_>, &Parameters) -> Result<T> + Send + Sync + 'static,
{
    #[inline]
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<T, F> ServiceFactory for FnFactory<T, F>
where
    T: Injectable,
    F: Fn(&mut Resolver<'_>, &Parameters) -> Result<T> + Send + Sync + 'static,
{
    fn make(&self, resolver: &mut Resolver<'_>, params: &Parameters) -> Result<Instance> {
        (self.f)(resolver, params).map(|value| Arc::new(value) as Instance)
    }
}

/// Factory that builds a defined type from its constructor, skipping bindings.
///
/// Used when a lazy proxy cannot be generated for a heavy service.
pub struct ConstructFactory {
    type_id: String,
}

impl ConstructFactory {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
        }
    }
}

impl ServiceFactory for ConstructFactory {
    fn make(&self, resolver: &mut Resolver<'_>, params: &Parameters) -> Result<Instance> {
        resolver.construct(&self.type_id, params)
    }
}
