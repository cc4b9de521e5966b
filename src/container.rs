//! The service container
//!
//! The `Container` owns the binding registry, the instance caches, the
//! factories and the constructor table, and resolves identifiers against
//! them. Cloning a container is cheap and yields another handle to the same
//! registry.

use crate::binding::{Binding, Concrete};
use crate::constructor::{Autowire, Constructor, Parameters};
use crate::factory::ServiceFactory;
use crate::lazy::{self, Lazy};
use crate::resolver::Resolver;
use crate::scope::{Scope, ScopedContainer};
use crate::storage::ServiceStorage;
use crate::{Injectable, Instance, Lifecycle, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

#[cfg(feature = "logging")]
use tracing::{debug, trace};

struct ContainerInner {
    storage: ServiceStorage,
    /// Raw id of the scope used by `get_any` and friends
    current_scope: AtomicU64,
}

/// Dependency injection container.
///
/// # Examples
///
/// ```rust
/// use service_container::{Constructor, Container};
///
/// struct Clock;
/// struct Scheduler { clock: std::sync::Arc<Clock> }
///
/// let container = Container::new();
/// container.define(Constructor::of::<Clock>().build(|_| Ok(Clock)));
/// container.define(
///     Constructor::of::<Scheduler>()
///         .service::<Clock>("clock")
///         .build(|args| Ok(Scheduler { clock: args.service("clock")? })),
/// );
/// container.singleton_type_of::<Clock>();
///
/// let a = container.resolve::<Scheduler>().unwrap();
/// let b = container.resolve::<Scheduler>().unwrap();
/// assert!(!std::sync::Arc::ptr_eq(&a, &b));
/// assert!(std::sync::Arc::ptr_eq(&a.clock, &b.clock));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

/// Non-owning container handle held by lazy proxies.
#[derive(Clone)]
pub(crate) struct WeakContainer(Weak<ContainerInner>);

impl WeakContainer {
    pub(crate) fn upgrade(&self) -> Option<Container> {
        self.0.upgrade().map(|inner| Container { inner })
    }
}

impl Container {
    /// Create an empty container.
    #[inline]
    pub fn new() -> Self {
        #[cfg(feature = "logging")]
        debug!(target: "service_container", "Creating new service container");

        Self {
            inner: Arc::new(ContainerInner {
                storage: ServiceStorage::new(),
                current_scope: AtomicU64::new(Scope::ROOT.id()),
            }),
        }
    }

    #[inline]
    pub(crate) fn storage(&self) -> &ServiceStorage {
        &self.inner.storage
    }

    pub(crate) fn downgrade(&self) -> WeakContainer {
        WeakContainer(Arc::downgrade(&self.inner))
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Bind an identifier to a concrete target with the given lifecycle.
    ///
    /// Re-binding an identifier overwrites its previous record.
    pub fn register_binding(&self, id: impl Into<String>, concrete: Concrete, lifecycle: Lifecycle) {
        let binding = Binding::new(id, concrete, lifecycle);

        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            service = binding.abstract_id(),
            concrete = ?binding.concrete(),
            lifecycle = lifecycle.as_str(),
            "Registering binding"
        );

        self.storage().insert_binding(binding);
    }

    /// Register a transient binding.
    ///
    /// ```rust
    /// use service_container::{Concrete, Container};
    ///
    /// let container = Container::new();
    /// container.bind("greeting", Concrete::closure(|_, _| Ok(String::from("hello"))));
    /// assert_eq!(*container.get::<String>("greeting").unwrap(), "hello");
    /// ```
    #[inline]
    pub fn bind(&self, id: impl Into<String>, concrete: impl Into<Concrete>) {
        self.register_binding(id, concrete.into(), Lifecycle::Transient);
    }

    /// Register a binding whose instance is shared for the container's lifetime.
    #[inline]
    pub fn singleton(&self, id: impl Into<String>, concrete: impl Into<Concrete>) {
        self.register_binding(id, concrete.into(), Lifecycle::Singleton);
    }

    /// Register a binding whose instance is shared within one scope.
    #[inline]
    pub fn scoped(&self, id: impl Into<String>, concrete: impl Into<Concrete>) {
        self.register_binding(id, concrete.into(), Lifecycle::Scoped);
    }

    /// Bind an identifier to its own constructor.
    #[inline]
    pub fn bind_self(&self, id: impl Into<String>, lifecycle: Lifecycle) {
        self.register_binding(id, Concrete::Itself, lifecycle);
    }

    /// Store a ready-made instance; it is returned by every later resolution.
    pub fn bind_instance<T: Injectable>(&self, id: impl Into<String>, value: T) {
        self.bind_instance_arc(id, Arc::new(value));
    }

    /// Store an already shared instance.
    pub fn bind_instance_arc<T: Injectable>(&self, id: impl Into<String>, value: Arc<T>) {
        let id = id.into();

        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            service = %id,
            instance_type = std::any::type_name::<T>(),
            "Registering instance"
        );

        self.storage().insert_instance(&id, value as Instance);
    }

    /// Register a factory; it wins over bindings and constructors but not
    /// over a cached instance.
    pub fn factory<F: ServiceFactory>(&self, id: impl Into<String>, factory: F) {
        let id = id.into();

        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            service = %id,
            factory = std::any::type_name::<F>(),
            "Registering factory"
        );

        self.storage().insert_factory(&id, Arc::new(factory));
    }

    /// Add a constructor to the type registry.
    ///
    /// A defined type can be autowired but is not bound: `has` stays false.
    pub fn define(&self, constructor: Constructor) {
        #[cfg(feature = "logging")]
        trace!(
            target: "service_container",
            service = constructor.type_id(),
            params = constructor.param_count(),
            instantiable = constructor.is_instantiable(),
            "Defining constructor"
        );

        self.storage().insert_constructor(constructor);
    }

    /// Define `T` from its [`Autowire`] constructor.
    #[inline]
    pub fn register_type<T: Autowire>(&self) {
        self.define(T::constructor());
    }

    /// Define `T` and bind it to itself as a singleton.
    pub fn singleton_type<T: Autowire>(&self) {
        self.register_type::<T>();
        self.bind_self(T::service_id(), Lifecycle::Singleton);
    }

    /// Define `T` and bind it to itself as scoped.
    pub fn scoped_type<T: Autowire>(&self) {
        self.register_type::<T>();
        self.bind_self(T::service_id(), Lifecycle::Scoped);
    }

    /// Define `T` and bind it to itself as transient.
    pub fn transient_type<T: Autowire>(&self) {
        self.register_type::<T>();
        self.bind_self(T::service_id(), Lifecycle::Transient);
    }

    /// Bind the identifier of an already defined `T` to itself as a singleton.
    #[inline]
    pub fn singleton_type_of<T: Injectable>(&self) {
        self.bind_self(T::service_id(), Lifecycle::Singleton);
    }

    /// Bind a typed closure (transient).
    pub fn bind_fn<T, F>(&self, id: impl Into<String>, f: F)
    where
        T: Injectable,
        F: Fn(&mut Resolver<'_>, &Parameters) -> Result<T> + Send + Sync + 'static,
    {
        self.register_binding(id, Concrete::closure(f), Lifecycle::Transient);
    }

    /// Bind a typed closure as a singleton.
    pub fn singleton_fn<T, F>(&self, id: impl Into<String>, f: F)
    where
        T: Injectable,
        F: Fn(&mut Resolver<'_>, &Parameters) -> Result<T> + Send + Sync + 'static,
    {
        self.register_binding(id, Concrete::closure(f), Lifecycle::Singleton);
    }

    /// Bind a typed closure as scoped.
    pub fn scoped_fn<T, F>(&self, id: impl Into<String>, f: F)
    where
        T: Injectable,
        F: Fn(&mut Resolver<'_>, &Parameters) -> Result<T> + Send + Sync + 'static,
    {
        self.register_binding(id, Concrete::closure(f), Lifecycle::Scoped);
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve an identifier to a type-erased instance.
    #[inline]
    pub fn get_any(&self, id: &str) -> Result<Instance> {
        self.resolve_in(self.current_scope(), id, &Parameters::new())
    }

    /// Resolve and downcast an identifier. Lazy proxies are forced.
    ///
    /// ```rust
    /// use service_container::{Container, DiError};
    ///
    /// let container = Container::new();
    /// container.bind_instance("port", 8080u16);
    ///
    /// assert_eq!(*container.get::<u16>("port").unwrap(), 8080);
    /// assert!(container.get::<String>("port").is_err());
    /// assert!(matches!(container.get::<u16>("host"), Err(DiError::NotFound { .. })));
    /// ```
    pub fn get<T: Injectable>(&self, id: &str) -> Result<Arc<T>> {
        let instance = self.get_any(id)?;
        lazy::unwrap_instance::<T>(id, instance).map_err(|e| e.wrap(id))
    }

    /// Resolve the identifier of `T`.
    #[inline]
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        self.get::<T>(T::service_id())
    }

    /// Resolve with constructor parameter overrides.
    ///
    /// The result is built for this call only and never cached.
    #[inline]
    pub fn make_with_any(&self, id: &str, params: &Parameters) -> Result<Instance> {
        self.resolve_in(self.current_scope(), id, params)
    }

    /// Typed [`make_with_any`](Self::make_with_any).
    pub fn make_with<T: Injectable>(&self, id: &str, params: &Parameters) -> Result<Arc<T>> {
        let instance = self.make_with_any(id, params)?;
        lazy::unwrap_instance::<T>(id, instance).map_err(|e| e.wrap(id))
    }

    /// Build a defined type straight from its constructor, ignoring bindings,
    /// factories and caches.
    pub fn construct_any(&self, type_id: &str, params: &Parameters) -> Result<Instance> {
        self.construct_in(self.current_scope(), type_id, params)
    }

    /// Resolve without forcing a lazy proxy.
    pub fn lazy<T: Injectable>(&self, id: &str) -> Result<Lazy<T>> {
        Ok(Lazy::from_instance(self.get_any(id)?))
    }

    pub(crate) fn resolve_in(&self, scope: Scope, id: &str, params: &Parameters) -> Result<Instance> {
        let mut resolver = Resolver::new(self, scope);
        resolver.resolve(id, params).map_err(|e| {
            #[cfg(feature = "logging")]
            debug!(
                target: "service_container",
                service = id,
                scope_id = scope.id(),
                error = %e,
                "Service resolution failed"
            );
            e.wrap(id)
        })
    }

    /// Constructor-only build whose scoped dependencies come from `scope`
    pub(crate) fn construct_in(&self, scope: Scope, type_id: &str, params: &Parameters) -> Result<Instance> {
        let mut resolver = Resolver::new(self, scope);
        resolver
            .construct(type_id, params)
            .map_err(|e| e.wrap(type_id))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the identifier is bound, cached or has a factory.
    ///
    /// Defined-but-unbound types are not included.
    #[inline]
    pub fn has(&self, id: &str) -> bool {
        self.storage().has(id)
    }

    /// [`has`](Self::has) for the identifier of `T`.
    #[inline]
    pub fn contains<T: Injectable>(&self) -> bool {
        self.has(T::service_id())
    }

    /// Whether a constructor is registered for the identifier.
    #[inline]
    pub fn is_defined(&self, id: &str) -> bool {
        self.storage().is_defined(id)
    }

    /// The binding recorded for an identifier.
    #[inline]
    pub fn binding(&self, id: &str) -> Option<Binding> {
        self.storage().binding(id)
    }

    /// The registered constructor for a type identifier.
    #[inline]
    pub fn constructor(&self, id: &str) -> Option<Arc<Constructor>> {
        self.storage().constructor(id)
    }

    /// Lifecycle of the binding registered under `id`.
    #[inline]
    pub fn lifecycle_of(&self, id: &str) -> Option<Lifecycle> {
        self.storage().binding(id).map(|b| b.lifecycle())
    }

    /// Identifiers with a binding.
    pub fn bound_ids(&self) -> Vec<String> {
        self.storage().binding_ids()
    }

    /// Number of bindings, cached instances and factories.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Drop a cached instance so the next resolution builds a new one.
    pub fn forget_instance(&self, id: &str) -> bool {
        let removed = self.storage().remove_instance(id);

        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            service = id,
            removed,
            "Forgetting cached instance"
        );

        removed
    }

    /// Remove every binding, instance, scoped instance and factory.
    ///
    /// The constructor table is kept and the current scope resets to root.
    pub fn flush(&self) {
        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            services = self.len(),
            "Flushing container"
        );

        self.storage().clear();
        self.inner
            .current_scope
            .store(Scope::ROOT.id(), Ordering::Release);
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    /// Scope used by `get_any`, `get` and `make_with`.
    #[inline]
    pub fn current_scope(&self) -> Scope {
        Scope::from_raw(self.inner.current_scope.load(Ordering::Acquire))
    }

    /// Open a new scope and make it current.
    pub fn begin_scope(&self) -> Scope {
        let scope = Scope::new();
        self.enter_scope(scope);
        scope
    }

    /// Make an existing scope current.
    pub fn enter_scope(&self, scope: Scope) {
        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            scope_id = scope.id(),
            "Entering scope"
        );

        self.inner.current_scope.store(scope.id(), Ordering::Release);
    }

    /// Drop the scope's cached instances; returns how many there were.
    ///
    /// If the scope was current, the root scope becomes current again.
    pub fn end_scope(&self, scope: Scope) -> usize {
        let dropped = self.storage().clear_scope(scope);
        let _ = self.inner.current_scope.compare_exchange(
            scope.id(),
            Scope::ROOT.id(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );

        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            scope_id = scope.id(),
            dropped,
            "Ending scope"
        );

        dropped
    }

    /// A handle resolving under `scope` regardless of the current scope.
    #[inline]
    pub fn scoped_view(&self, scope: Scope) -> ScopedContainer {
        ScopedContainer::new(self.clone(), scope)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("current_scope", &self.current_scope())
            .field("storage", self.storage())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiError, ErrorKind, FnFactory};
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug)]
    struct Logger;

    #[derive(Debug)]
    struct Mailer {
        logger: Arc<Logger>,
    }

    fn define_mailer(container: &Container) {
        container.define(Constructor::named("Logger").build(|_| Ok(Logger)));
        container.define(
            Constructor::named("Mailer")
                .service_id("logger", "Logger")
                .build(|args| {
                    Ok(Mailer {
                        logger: args.service("logger")?,
                    })
                }),
        );
    }

    #[test]
    fn test_singleton_identity() {
        let container = Container::new();
        define_mailer(&container);
        container.singleton("Mailer", "Mailer");

        let a = container.get::<Mailer>("Mailer").unwrap();
        let b = container.get::<Mailer>("Mailer").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_transient_distinct() {
        let container = Container::new();
        define_mailer(&container);
        container.bind("Mailer", "Mailer");

        let a = container.get::<Mailer>("Mailer").unwrap();
        let b = container.get::<Mailer>("Mailer").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        // Unbound dependency is autowired transiently as well
        assert!(!Arc::ptr_eq(&a.logger, &b.logger));
    }

    #[test]
    fn test_autowire_unbound_defined_type() {
        let container = Container::new();
        define_mailer(&container);

        assert!(!container.has("Mailer"));
        assert!(container.is_defined("Mailer"));
        assert!(container.get::<Mailer>("Mailer").is_ok());
    }

    #[test]
    fn test_scoped_identity_per_scope() {
        let container = Container::new();
        container.define(Constructor::named("Request").build(|_| Ok(Logger)));
        container.scoped("Request", "Request");

        let first = container.begin_scope();
        let a = container.get::<Logger>("Request").unwrap();
        let b = container.get::<Logger>("Request").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(container.current_scope(), first);

        let second = container.begin_scope();
        let c = container.get::<Logger>("Request").unwrap();
        assert!(!Arc::ptr_eq(&a, &c));

        container.enter_scope(first);
        let d = container.get::<Logger>("Request").unwrap();
        assert!(Arc::ptr_eq(&a, &d));

        assert_eq!(container.end_scope(first), 1);
        assert_eq!(container.current_scope(), Scope::ROOT);
        assert_eq!(container.end_scope(second), 1);
    }

    #[test]
    fn test_circular_dependency_path() {
        let container = Container::new();
        container.define(Constructor::named("A").service_id("b", "B").build(|_| Ok(())));
        container.define(Constructor::named("B").service_id("a", "A").build(|_| Ok(())));

        let err = container.get_any("A").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BindingResolution);
        match &err {
            DiError::CircularDependency { path } => {
                assert_eq!(path, &["A", "B", "A"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.to_string().contains("A -> B -> A"));
    }

    #[test]
    fn test_has_transitions() {
        let container = Container::new();
        assert!(!container.has("cache"));

        container.bind("cache", "RedisCache");
        assert!(container.has("cache"));

        container.flush();
        assert!(!container.has("cache"));

        container.bind_instance("cache", 1u8);
        assert!(container.has("cache"));
        assert!(container.forget_instance("cache"));
        assert!(!container.has("cache"));
    }

    #[test]
    fn test_rebind_keeps_cached_instance() {
        let container = Container::new();
        container.singleton_fn("port", |_, _| Ok(80u16));
        assert_eq!(*container.get::<u16>("port").unwrap(), 80);

        container.bind_fn("port", |_, _| Ok(8080u16));
        assert_eq!(*container.get::<u16>("port").unwrap(), 80);
        assert_eq!(container.lifecycle_of("port"), Some(Lifecycle::Transient));

        container.forget_instance("port");
        assert_eq!(*container.get::<u16>("port").unwrap(), 8080);
        assert_eq!(container.bound_ids(), ["port"]);
    }

    #[test]
    fn test_unbound_not_found() {
        let container = Container::new();
        let err = container.get_any("missing").unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, DiError::NotFound { id } if id == "missing"));
    }

    #[test]
    fn test_binding_to_unknown_target_not_found() {
        let container = Container::new();
        container.bind("cache", "RedisCache");
        let err = container.get_any("cache").unwrap_err();
        assert!(matches!(err, DiError::NotFound { id } if id == "RedisCache"));
    }

    #[test]
    fn test_unresolvable_scalar_named() {
        let container = Container::new();
        container.define(
            Constructor::named("Pool")
                .value("size")
                .build(|args| args.value::<u32>("size")),
        );

        let err = container.get_any("Pool").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BindingResolution);
        assert!(matches!(
            err,
            DiError::UnresolvableParameter { id, parameter } if id == "Pool" && parameter == "size"
        ));
    }

    #[test]
    fn test_interface_not_instantiable() {
        let container = Container::new();
        container.define(Constructor::interface("Store"));
        let err = container.get_any("Store").unwrap_err();
        assert!(matches!(err, DiError::NotInstantiable { id } if id == "Store"));
    }

    #[test]
    fn test_make_with_override_not_reused() {
        let container = Container::new();
        container.define(
            Constructor::named("Pool")
                .value_or("size", 4u32)
                .build(|args| args.value::<u32>("size")),
        );
        container.singleton("Pool", "Pool");

        let custom = container
            .make_with::<u32>("Pool", &Parameters::new().with("size", 32u32))
            .unwrap();
        assert_eq!(*custom, 32);

        let plain = container.get::<u32>("Pool").unwrap();
        assert_eq!(*plain, 4);
        assert!(Arc::ptr_eq(&plain, &container.get::<u32>("Pool").unwrap()));
    }

    #[test]
    fn test_make_with_override_not_reused_transient() {
        let container = Container::new();
        container.define(
            Constructor::named("Pool")
                .value_or("size", 4u32)
                .build(|args| args.value::<u32>("size")),
        );
        container.bind_self("Pool", Lifecycle::Transient);

        let custom = container
            .make_with::<u32>("Pool", &Parameters::new().with("size", 32u32))
            .unwrap();
        assert_eq!(*custom, 32);

        let first = container.get::<u32>("Pool").unwrap();
        let second = container.get::<u32>("Pool").unwrap();
        assert_eq!(*first, 4);
        assert_eq!(*second, 4);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_factory_precedence_over_binding() {
        let container = Container::new();
        container.bind("port", Concrete::closure(|_, _| Ok(80u16)));
        container.factory("port", FnFactory::new(|_, _: &Parameters| Ok(443u16)));

        assert_eq!(*container.get::<u16>("port").unwrap(), 443);
    }

    #[test]
    fn test_instance_precedence_over_factory() {
        let container = Container::new();
        container.factory("port", FnFactory::new(|_, _: &Parameters| Ok(443u16)));
        container.bind_instance("port", 8080u16);

        assert_eq!(*container.get::<u16>("port").unwrap(), 8080);
    }

    #[test]
    fn test_closure_errors_wrapped_once() {
        let container = Container::new();
        container.bind_fn("outer", |resolver, _| resolver.get::<u8>("inner"));
        container.bind_fn("inner", |_, _| -> Result<u8> { Err(DiError::msg("boom")) });

        let err = container.get_any("outer").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Container);
        match &err {
            DiError::Container { id, source } => {
                assert_eq!(id, "outer");
                assert!(matches!(**source, DiError::Custom { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_wrapped() {
        let container = Container::new();
        container.bind_instance("name", String::from("svc"));

        let err = container.get::<u32>("name").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Container);
        assert!(matches!(err.root_cause(), DiError::TypeMismatch { .. }));
    }

    #[test]
    fn test_singleton_fn_called_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let container = Container::new();
        container.singleton_fn("counter", |_, _| Ok(CALLS.fetch_add(1, Ordering::SeqCst)));

        container.get::<usize>("counter").unwrap();
        container.get::<usize>("counter").unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(container.lifecycle_of("counter"), Some(Lifecycle::Singleton));
    }

    #[test]
    fn test_scoped_view_ignores_current_scope() {
        let container = Container::new();
        container.scoped_fn("ctx", |resolver, _| Ok(resolver.scope()));

        let view = container.scoped_view(Scope::new());
        let seen = view.get::<Scope>("ctx").unwrap();
        assert_eq!(*seen, view.scope());
        assert_eq!(*container.get::<Scope>("ctx").unwrap(), Scope::ROOT);
        assert_eq!(view.end(), 1);
    }

    #[test]
    fn test_concurrent_singleton() {
        let container = Container::new();
        container.define(Constructor::named("Logger").build(|_| Ok(Logger)));
        container.singleton("Logger", "Logger");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = container.clone();
                std::thread::spawn(move || c.get::<Logger>("Logger").unwrap())
            })
            .collect();

        let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let first = container.get::<Logger>("Logger").unwrap();
        assert!(resolved.iter().all(|l| Arc::ptr_eq(l, &first)));
    }
}
