//! # service-container - Dependency resolution container for Rust
//!
//! A runtime registry mapping string service identifiers to instances, with
//! lifecycle management, constructor autowiring, cycle detection, lazy
//! construction of expensive services, and directory-scanning registration.
//!
//! ## Features
//!
//! - **Bindings** - Map an identifier to another identifier, a closure, or the
//!   type's own constructor, with a `Transient`, `Singleton` or `Scoped` lifecycle
//! - **Autowiring** - Constructors registered in a table are assembled from
//!   resolvable dependencies, caller overrides and declared defaults
//! - **Cycle detection** - Every resolution carries its own stack; revisiting
//!   an identifier or nesting past 50 levels fails with the full path
//! - **Lazy proxies** - Heavy services are built on first access
//! - **Scanning** - Types found in source directories register themselves from
//!   their declared metadata
//! - **Observable** - Optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use service_container::{Constructor, Container, Lifecycle};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//!
//! container.bind_instance("db", Database { url: "postgres://localhost".into() });
//! container.define(
//!     Constructor::named("users")
//!         .service_id("db", "db")
//!         .build(|args| Ok(UserService { db: args.service("db")? })),
//! );
//! container.bind_self("users", Lifecycle::Singleton);
//!
//! let users = container.get::<UserService>("users").unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! assert!(Arc::ptr_eq(&users, &container.get::<UserService>("users").unwrap()));
//! ```
//!
//! ## Scopes
//!
//! ```rust
//! use service_container::{Container, Scope};
//!
//! struct RequestContext;
//!
//! let container = Container::new();
//! container.scoped_fn("request", |_, _| Ok(RequestContext));
//!
//! let scope = container.begin_scope();
//! let a = container.get::<RequestContext>("request").unwrap();
//! let b = container.get::<RequestContext>("request").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//!
//! container.end_scope(scope);
//! assert_eq!(container.current_scope(), Scope::ROOT);
//! ```

// Generated code names this crate by its absolute path
extern crate self as service_container;

mod binding;
mod constructor;
mod container;
mod error;
mod factory;
mod lazy;
#[cfg(feature = "logging")]
pub mod logging;
mod provider;
mod resolver;
mod scanner;
mod scope;
mod storage;

pub use binding::*;
pub use constructor::*;
pub use container::*;
pub use error::*;
pub use factory::*;
pub use lazy::{Lazy, LazyProxy, LazyProxyGenerator};
pub use provider::*;
pub use resolver::*;
pub use scanner::*;
pub use scope::*;

#[cfg(feature = "derive")]
pub use service_container_derive::Autowire;

// Re-export tracing macros for convenience when logging feature is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Arguments, Autowire, Concrete, Constructor, Container, DiError, Injectable, Lazy,
        Lifecycle, Parameters, Resolver, Result, Scope, ScopedContainer,
    };
    pub use std::sync::Arc;
}
