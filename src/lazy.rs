//! Deferred construction of expensive services
//!
//! A [`LazyProxy`] stands in for a service whose real construction is
//! deferred until the first access. Consumers reach the real value through an
//! explicit accessor: typed resolution (`Container::get`,
//! `Arguments::service`) forces the proxy, while [`Lazy<T>`] keeps it
//! deferred until [`Lazy::get`] is called.
//!
//! # Example
//!
//! ```rust
//! use service_container::{Constructor, Container, Lifecycle, LazyProxyGenerator};
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! static BUILT: AtomicU32 = AtomicU32::new(0);
//!
//! struct SearchIndex;
//!
//! let container = Container::new();
//! let ctor = Constructor::named("index").build(|_| {
//!     BUILT.fetch_add(1, Ordering::SeqCst);
//!     Ok(SearchIndex)
//! });
//! container.define(ctor.clone());
//! container.singleton("index", LazyProxyGenerator::create(&container, &ctor).unwrap());
//!
//! let index = container.lazy::<SearchIndex>("index").unwrap();
//! assert_eq!(BUILT.load(Ordering::SeqCst), 0);
//!
//! index.get().unwrap();
//! assert_eq!(BUILT.load(Ordering::SeqCst), 1);
//! ```

use crate::binding::Concrete;
use crate::constructor::{Constructor, Parameters};
use crate::{Container, DiError, Injectable, Instance, Result};
use once_cell::sync::OnceCell;
use std::marker::PhantomData;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Type-erased initialiser for a proxy
type InitFn = Arc<dyn Fn() -> Result<Instance> + Send + Sync>;

/// Surrogate holding either nothing yet or the real instance.
pub struct LazyProxy {
    type_id: String,
    cell: OnceCell<Instance>,
    init: InitFn,
}

impl LazyProxy {
    pub fn new<F>(type_id: impl Into<String>, init: F) -> Self
    where
        F: Fn() -> Result<Instance> + Send + Sync + 'static,
    {
        Self {
            type_id: type_id.into(),
            cell: OnceCell::new(),
            init: Arc::new(init),
        }
    }

    /// Identifier of the type the proxy builds
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Get the real instance, building it on first call.
    ///
    /// A failed build is not remembered; the next call tries again.
    pub fn force(&self) -> Result<Instance> {
        if let Some(instance) = self.cell.get() {
            #[cfg(feature = "logging")]
            trace!(
                target: "service_container",
                service = %self.type_id,
                "Lazy proxy already initialized"
            );
            return Ok(Arc::clone(instance));
        }

        self.cell
            .get_or_try_init(|| {
                #[cfg(feature = "logging")]
                debug!(
                    target: "service_container",
                    service = %self.type_id,
                    "Lazy proxy initializing on first access"
                );
                (self.init)()
            })
            .map(Arc::clone)
    }
}

impl std::fmt::Debug for LazyProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyProxy")
            .field("type_id", &self.type_id)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Downcast a resolved instance to `T`, forcing it first if it is a proxy.
pub(crate) fn unwrap_instance<T: Injectable>(id: &str, instance: Instance) -> Result<Arc<T>> {
    let instance = match instance.downcast::<T>() {
        Ok(value) => return Ok(value),
        Err(instance) => instance,
    };

    match instance.downcast::<LazyProxy>() {
        Ok(proxy) => proxy
            .force()?
            .downcast::<T>()
            .map_err(|_| DiError::type_mismatch::<T>(id)),
        Err(_) => Err(DiError::type_mismatch::<T>(id)),
    }
}

enum Slot {
    Ready(Instance),
    Deferred(Arc<LazyProxy>),
}

/// Typed accessor for a possibly deferred service.
pub struct Lazy<T> {
    slot: Slot,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> Lazy<T> {
    pub(crate) fn from_instance(instance: Instance) -> Self {
        let slot = match instance.downcast::<LazyProxy>() {
            Ok(proxy) => Slot::Deferred(proxy),
            Err(instance) => Slot::Ready(instance),
        };
        Self {
            slot,
            _marker: PhantomData,
        }
    }

    /// Get the service, constructing it on first access.
    pub fn get(&self) -> Result<Arc<T>> {
        let (id, instance) = match &self.slot {
            Slot::Ready(instance) => (std::any::type_name::<T>(), Arc::clone(instance)),
            Slot::Deferred(proxy) => (proxy.type_id(), proxy.force()?),
        };
        instance.downcast::<T>().map_err(|_| DiError::type_mismatch::<T>(id))
    }

    /// Whether the real instance exists yet
    pub fn is_initialized(&self) -> bool {
        match &self.slot {
            Slot::Ready(_) => true,
            Slot::Deferred(proxy) => proxy.is_initialized(),
        }
    }
}

impl<T> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        let slot = match &self.slot {
            Slot::Ready(instance) => Slot::Ready(Arc::clone(instance)),
            Slot::Deferred(proxy) => Slot::Deferred(Arc::clone(proxy)),
        };
        Self {
            slot,
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let deferred = matches!(self.slot, Slot::Deferred(_));
        f.debug_struct("Lazy")
            .field("type", &std::any::type_name::<T>())
            .field("deferred", &deferred)
            .finish()
    }
}

/// Builds proxy bindings for heavy services.
pub struct LazyProxyGenerator;

impl LazyProxyGenerator {
    /// Create a binding whose every resolution yields a fresh, unforced proxy.
    ///
    /// The proxy builds the real value from `constructor` on first access,
    /// with the parameters of the resolution that produced it. Only concrete,
    /// unsealed definitions can be proxied.
    pub fn create(container: &Container, constructor: &Constructor) -> Result<Concrete> {
        let type_id = constructor.type_id().to_owned();

        if !constructor.is_instantiable() {
            return Err(DiError::ProxyCreation {
                id: type_id,
                reason: "interface definitions cannot be proxied".into(),
            });
        }
        if constructor.service_meta().sealed {
            return Err(DiError::ProxyCreation {
                id: type_id,
                reason: "type is sealed".into(),
            });
        }

        let handle = container.downgrade();

        #[cfg(feature = "logging")]
        debug!(
            target: "service_container",
            service = %type_id,
            "Generated lazy proxy binding"
        );

        Ok(Concrete::erased(move |resolver, params: &Parameters| {
            let handle = handle.clone();
            let target = type_id.clone();
            let params = params.clone();
            let scope = resolver.scope();
            let proxy = LazyProxy::new(type_id.clone(), move || {
                let container = handle.upgrade().ok_or(DiError::ContainerDropped)?;
                container.construct_in(scope, &target, &params)
            });
            Ok(Arc::new(proxy) as Instance)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Report {
        pages: u32,
    }

    fn heavy(counter: &'static AtomicU32) -> Constructor {
        Constructor::named("report")
            .value_or("pages", 10u32)
            .build(move |args| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Report {
                    pages: args.value("pages")?,
                })
            })
    }

    #[test]
    fn test_proxy_defers_until_first_access() {
        static BUILT: AtomicU32 = AtomicU32::new(0);

        let container = Container::new();
        let ctor = heavy(&BUILT);
        container.define(ctor.clone());
        container.singleton("report", LazyProxyGenerator::create(&container, &ctor).unwrap());

        let lazy = container.lazy::<Report>("report").unwrap();
        assert!(!lazy.is_initialized());
        assert_eq!(BUILT.load(Ordering::SeqCst), 0);

        assert_eq!(lazy.get().unwrap().pages, 10);
        assert!(lazy.is_initialized());
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);

        // Singleton proxy: later typed resolution reuses the built value
        let again = container.get::<Report>("report").unwrap();
        assert!(Arc::ptr_eq(&again, &lazy.get().unwrap()));
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_proxy_failure_matches_direct_failure() {
        let container = Container::new();
        let ctor = Constructor::named("mailer")
            .value("host")
            .build(|args| args.value::<String>("host"));
        container.define(ctor.clone());

        let direct = container.construct_any("mailer", &Parameters::new()).unwrap_err();

        container.bind("mailer", LazyProxyGenerator::create(&container, &ctor).unwrap());
        let lazy = container.lazy::<String>("mailer").unwrap();
        let deferred = lazy.get().unwrap_err();

        assert!(matches!(
            (&direct, &deferred),
            (
                DiError::UnresolvableParameter { parameter: a, .. },
                DiError::UnresolvableParameter { parameter: b, .. },
            ) if a == "host" && b == "host"
        ));
        assert!(!lazy.is_initialized());
    }

    #[test]
    fn test_proxy_carries_resolution_parameters() {
        static BUILT: AtomicU32 = AtomicU32::new(0);

        let container = Container::new();
        let ctor = heavy(&BUILT);
        container.define(ctor.clone());
        container.bind("report", LazyProxyGenerator::create(&container, &ctor).unwrap());

        let report = container
            .make_with::<Report>("report", &Parameters::new().with("pages", 3u32))
            .unwrap();
        assert_eq!(report.pages, 3);
    }

    #[test]
    fn test_sealed_and_interface_rejected() {
        let container = Container::new();
        let sealed = Constructor::named("sealed").sealed().build(|_| Ok(()));
        let iface = Constructor::interface("iface");

        assert!(matches!(
            LazyProxyGenerator::create(&container, &sealed),
            Err(DiError::ProxyCreation { .. })
        ));
        assert!(matches!(
            LazyProxyGenerator::create(&container, &iface),
            Err(DiError::ProxyCreation { .. })
        ));
    }

    #[test]
    fn test_proxy_outliving_container() {
        let container = Container::new();
        let ctor = Constructor::named("unit").build(|_| Ok(()));
        container.define(ctor.clone());
        container.bind("unit", LazyProxyGenerator::create(&container, &ctor).unwrap());

        let lazy = container.lazy::<()>("unit").unwrap();
        drop(container);
        assert!(matches!(lazy.get(), Err(DiError::ContainerDropped)));
    }

    #[test]
    fn test_scoped_proxy_wires_dependencies_from_its_scope() {
        struct Session {
            ctx: Arc<u64>,
        }

        let container = Container::new();
        container.scoped_fn("ctx", |resolver, _| Ok(resolver.scope().id()));
        let ctor = Constructor::named("session")
            .service_id("ctx", "ctx")
            .build(|args| Ok(Session { ctx: args.service("ctx")? }));
        container.define(ctor.clone());
        container.scoped("session", LazyProxyGenerator::create(&container, &ctor).unwrap());

        let view = container.scoped_view(crate::Scope::new());
        let session = view.get::<Session>("session").unwrap();
        let ctx = view.get::<u64>("ctx").unwrap();

        assert_eq!(*session.ctx, view.scope().id());
        assert!(Arc::ptr_eq(&session.ctx, &ctx));
        assert!(container.storage().scoped_instance(crate::Scope::ROOT, "ctx").is_none());
    }

    #[test]
    fn test_ready_lazy() {
        let lazy = Lazy::<u32>::from_instance(Arc::new(7u32));
        assert!(lazy.is_initialized());
        assert_eq!(*lazy.get().unwrap(), 7);

        let wrong = Lazy::<String>::from_instance(Arc::new(7u32));
        assert!(matches!(wrong.get(), Err(DiError::TypeMismatch { .. })));
    }
}
