//! Constructor registration table
//!
//! A [`Constructor`] describes how to build one type: its ordered parameter
//! list, the closure that assembles the value, and the declarative metadata
//! the scanner reads. Registering constructors with the container is what
//! makes an identifier "name a constructible type" for autowiring.
//!
//! # Example
//!
//! ```rust
//! use service_container::{Constructor, Container, Parameters};
//! use std::sync::Arc;
//!
//! struct Config { dsn: String }
//! struct Database { config: Arc<Config>, pool: u32 }
//!
//! let container = Container::new();
//! container.bind_instance(service_container::service_id::<Config>(), Config { dsn: "pg://".into() });
//! container.define(
//!     Constructor::of::<Database>()
//!         .service::<Config>("config")
//!         .value_or("pool", 4u32)
//!         .build(|args| Ok(Database {
//!             config: args.service("config")?,
//!             pool: args.value("pool")?,
//!         })),
//! );
//!
//! let db = container.resolve::<Database>().unwrap();
//! assert_eq!(db.pool, 4);
//!
//! let db = container
//!     .make_with::<Database>(service_container::service_id::<Database>(), &Parameters::new().with("pool", 16u32))
//!     .unwrap();
//! assert_eq!(db.pool, 16);
//! ```

use crate::lazy::{self, Lazy};
use crate::{DiError, Injectable, Instance, Lifecycle, Result};
use ahash::AHashMap;
use std::sync::Arc;

type DefaultFn = Arc<dyn Fn() -> Instance + Send + Sync>;
type BuildFn = Arc<dyn Fn(&Arguments) -> Result<Instance> + Send + Sync>;

/// Caller-supplied overrides for named constructor parameters.
#[derive(Clone, Default)]
pub struct Parameters {
    values: AHashMap<String, Instance>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override and continue the chain
    pub fn with<T: Injectable>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    /// Add an already-shared override and continue the chain
    pub fn with_arc<T: Injectable>(mut self, name: impl Into<String>, value: Arc<T>) -> Self {
        self.values.insert(name.into(), value as Instance);
        self
    }

    pub fn insert<T: Injectable>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Arc::new(value) as Instance);
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// What a constructor parameter expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Another service, resolved through the container by identifier
    Service(String),
    /// A plain value that must come from an override or a default
    Value,
}

/// One constructor parameter, in declaration order.
#[derive(Clone)]
pub struct Param {
    name: String,
    kind: ParamKind,
    default: Option<DefaultFn>,
    optional: bool,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub(crate) fn default_value(&self) -> Option<Instance> {
        self.default.as_ref().map(|f| f())
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_default", &self.default.is_some())
            .field("optional", &self.optional)
            .finish()
    }
}

/// Declarative per-type metadata read by the service scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceMeta {
    /// Types without the marker are never registered by a scan
    pub injectable: bool,
    /// Lifecycle to register with (transient when absent)
    pub lifecycle: Option<Lifecycle>,
    /// Identifier to register under instead of the type identifier
    pub alias: Option<String>,
    /// Sealed types cannot be wrapped in a lazy proxy
    pub sealed: bool,
}

impl ServiceMeta {
    /// Metadata with the injectable marker set
    pub fn injectable() -> Self {
        Self {
            injectable: true,
            ..Self::default()
        }
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }
}

/// Registration-table entry for one type.
#[derive(Clone)]
pub struct Constructor {
    type_id: String,
    params: Vec<Param>,
    build: Option<BuildFn>,
    meta: ServiceMeta,
}

impl Constructor {
    /// Start a constructor for the identifier of `T`
    pub fn of<T: Injectable>() -> Self {
        Self::named(T::service_id())
    }

    /// Start a constructor under an explicit identifier
    pub fn named(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            params: Vec::new(),
            build: None,
            meta: ServiceMeta::default(),
        }
    }

    /// An interface-like definition: known, bindable, but never instantiable
    pub fn interface(type_id: impl Into<String>) -> Self {
        Self::named(type_id)
    }

    /// Interface definition keyed by the name of a (possibly unsized) type,
    /// typically `dyn Trait`
    pub fn interface_of<T: ?Sized + 'static>() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    fn param(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.params.push(Param {
            name: name.into(),
            kind,
            default: None,
            optional: false,
        });
        self
    }

    /// Parameter resolved from the identifier of `T`
    pub fn service<T: Injectable>(self, name: impl Into<String>) -> Self {
        self.param(name, ParamKind::Service(T::service_id().to_owned()))
    }

    /// Parameter resolved from an explicit identifier
    pub fn service_id(self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.param(name, ParamKind::Service(id.into()))
    }

    /// Service parameter that is left out when it cannot be resolved
    pub fn optional_service<T: Injectable>(self, name: impl Into<String>) -> Self {
        self.optional_service_id(name, T::service_id())
    }

    /// Optional service parameter with an explicit identifier
    pub fn optional_service_id(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self = self.service_id(name, id);
        if let Some(param) = self.params.last_mut() {
            param.optional = true;
        }
        self
    }

    /// Required value parameter
    pub fn value(self, name: impl Into<String>) -> Self {
        self.param(name, ParamKind::Value)
    }

    /// Value parameter with a default
    pub fn value_or<T: Injectable + Clone>(self, name: impl Into<String>, default: T) -> Self {
        self.value_or_else(name, move || default.clone())
    }

    /// Value parameter with a computed default
    pub fn value_or_else<T, F>(mut self, name: impl Into<String>, default: F) -> Self
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self = self.param(name, ParamKind::Value);
        if let Some(param) = self.params.last_mut() {
            param.default = Some(Arc::new(move || Arc::new(default()) as Instance));
        }
        self
    }

    /// Attach scanner metadata
    pub fn meta(mut self, meta: ServiceMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Set the injectable marker
    pub fn injectable(mut self) -> Self {
        self.meta.injectable = true;
        self
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.meta.lifecycle = Some(lifecycle);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.meta.alias = Some(alias.into());
        self
    }

    pub fn sealed(mut self) -> Self {
        self.meta.sealed = true;
        self
    }

    /// Finish with the function that assembles the value
    pub fn build<T, F>(mut self, f: F) -> Self
    where
        T: Injectable,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        self.build = Some(Arc::new(move |args| f(args).map(|v| Arc::new(v) as Instance)));
        self
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn service_meta(&self) -> &ServiceMeta {
        &self.meta
    }

    /// Whether the definition can be built (interfaces cannot)
    pub fn is_instantiable(&self) -> bool {
        self.build.is_some()
    }

    pub(crate) fn invoke(&self, args: &Arguments) -> Result<Instance> {
        match &self.build {
            Some(build) => build(args),
            None => Err(DiError::NotInstantiable {
                id: self.type_id.clone(),
            }),
        }
    }
}

impl std::fmt::Debug for Constructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constructor")
            .field("type_id", &self.type_id)
            .field("params", &self.params)
            .field("instantiable", &self.is_instantiable())
            .field("meta", &self.meta)
            .finish()
    }
}

/// Types that describe their own constructor.
///
/// Usually generated with `#[derive(Autowire)]` (feature `derive`).
pub trait Autowire: Injectable + Sized {
    fn constructor() -> Constructor;
}

/// Assembled constructor arguments, in declaration order.
pub struct Arguments {
    type_id: String,
    values: Vec<(String, Instance)>,
}

impl Arguments {
    pub(crate) fn new(type_id: &str, capacity: usize) -> Self {
        Self {
            type_id: type_id.to_owned(),
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: Instance) {
        self.values.push((name.to_owned(), value));
    }

    /// Identifier of the type being built
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// The untyped argument, if it was assembled
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.values
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// The untyped argument
    pub fn raw(&self, name: &str) -> Result<&Instance> {
        self.get(name).ok_or_else(|| DiError::UnresolvableParameter {
            id: self.type_id.clone(),
            parameter: name.to_owned(),
        })
    }

    /// A service argument; lazy proxies are forced
    pub fn service<T: Injectable>(&self, name: &str) -> Result<Arc<T>> {
        lazy::unwrap_instance::<T>(&self.param_label(name), Arc::clone(self.raw(name)?))
    }

    /// An optional service argument
    pub fn optional<T: Injectable>(&self, name: &str) -> Result<Option<Arc<T>>> {
        match self.get(name) {
            Some(value) => lazy::unwrap_instance::<T>(&self.param_label(name), Arc::clone(value)).map(Some),
            None => Ok(None),
        }
    }

    /// A service argument kept deferred
    pub fn lazy<T: Injectable>(&self, name: &str) -> Result<Lazy<T>> {
        Ok(Lazy::from_instance(Arc::clone(self.raw(name)?)))
    }

    /// A value argument, cloned out of its shared slot
    pub fn value<T: Injectable + Clone>(&self, name: &str) -> Result<T> {
        let value = Arc::clone(self.raw(name)?);
        value
            .downcast::<T>()
            .map(|v| (*v).clone())
            .map_err(|_| DiError::type_mismatch::<T>(self.param_label(name)))
    }

    fn param_label(&self, name: &str) -> String {
        format!("{}::{}", self.type_id, name)
    }
}

impl std::fmt::Debug for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arguments")
            .field("type_id", &self.type_id)
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
