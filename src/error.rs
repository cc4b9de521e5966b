//! Error types for service resolution
//!
//! Every failure belongs to one of three kinds (see [`ErrorKind`]). Resolution
//! entry points pass `NotFound` and `BindingResolution` failures through
//! unchanged and wrap everything else exactly once in [`DiError::Container`].

use std::sync::Arc;
use thiserror::Error;

/// Boxed error type accepted from user factories and closures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`DiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No known way to produce the identifier.
    NotFound,
    /// The identifier is known but construction could not complete.
    BindingResolution,
    /// Any other failure, wrapped with the identifier being resolved.
    Container,
}

/// Errors that can occur while registering or resolving services
#[derive(Error, Debug, Clone)]
pub enum DiError {
    /// Nothing is bound, cached or defined under the identifier
    #[error("Service not found: {id}")]
    NotFound { id: String },

    /// The identifier was requested again while it was still being resolved
    #[error("Circular dependency detected: {}", .path.join(" -> "))]
    CircularDependency { path: Vec<String> },

    /// The resolution stack grew past the fixed ceiling
    #[error(
        "Maximum resolution depth of {limit} exceeded while resolving {id}, probable runaway recursion: {}",
        .path.join(" -> ")
    )]
    DepthExceeded {
        id: String,
        limit: usize,
        path: Vec<String>,
    },

    /// A constructor parameter had no override, no resolvable type and no default
    #[error("Unresolvable parameter `{parameter}` while building {id}")]
    UnresolvableParameter { id: String, parameter: String },

    /// The identifier names an interface-like definition that cannot be built
    #[error("Target {id} is not instantiable")]
    NotInstantiable { id: String },

    /// Wrapper around any other failure surfaced during resolution
    #[error("Error while resolving {id}: {source}")]
    Container {
        id: String,
        #[source]
        source: Box<DiError>,
    },

    /// A resolved instance did not have the requested type
    #[error("Service {id} is not of type {expected}")]
    TypeMismatch { id: String, expected: &'static str },

    /// A lazy proxy outlived the container that produced it
    #[error("Container has been dropped")]
    ContainerDropped,

    /// A lazy proxy could not be generated for the type
    #[error("Cannot create lazy proxy for {id}: {reason}")]
    ProxyCreation { id: String, reason: String },

    /// Invalid scanner or container configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Filesystem failure during a scan
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// Failure raised by user code (factories, closures, build functions)
    #[error("{message}")]
    Custom {
        message: String,
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl DiError {
    /// Create a NotFound error
    #[inline]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a TypeMismatch error for `T`
    #[inline]
    pub fn type_mismatch<T: ?Sized + 'static>(id: impl Into<String>) -> Self {
        Self::TypeMismatch {
            id: id.into(),
            expected: std::any::type_name::<T>(),
        }
    }

    /// Create a custom error from a message
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
            source: None,
        }
    }

    /// Create a custom error carrying an arbitrary cause
    pub fn other(error: impl Into<BoxError>) -> Self {
        let error: BoxError = error.into();
        Self::Custom {
            message: error.to_string(),
            source: Some(Arc::from(error)),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::CircularDependency { .. }
            | Self::DepthExceeded { .. }
            | Self::UnresolvableParameter { .. }
            | Self::NotInstantiable { .. } => ErrorKind::BindingResolution,
            _ => ErrorKind::Container,
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    #[inline]
    pub fn is_binding_resolution(&self) -> bool {
        self.kind() == ErrorKind::BindingResolution
    }

    /// Wrap the error for the top of a resolution call.
    ///
    /// Not-found and binding-resolution errors pass through, as does an error
    /// that is already wrapped.
    pub(crate) fn wrap(self, id: &str) -> Self {
        match self {
            err @ Self::Container { .. } => err,
            err if err.kind() != ErrorKind::Container => err,
            err => Self::Container {
                id: id.to_owned(),
                source: Box::new(err),
            },
        }
    }

    /// The innermost error, looking through `Container` wrappers
    pub fn root_cause(&self) -> &DiError {
        match self {
            Self::Container { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for container operations
pub type Result<T> = std::result::Result<T, DiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(DiError::not_found("a").kind(), ErrorKind::NotFound);
        assert_eq!(
            DiError::CircularDependency { path: vec![] }.kind(),
            ErrorKind::BindingResolution
        );
        assert_eq!(DiError::msg("boom").kind(), ErrorKind::Container);
    }

    #[test]
    fn test_wrap_passes_through_resolution_errors() {
        let err = DiError::UnresolvableParameter {
            id: "Mailer".into(),
            parameter: "host".into(),
        }
        .wrap("App");
        assert!(matches!(err, DiError::UnresolvableParameter { .. }));
    }

    #[test]
    fn test_wrap_once() {
        let err = DiError::msg("boom").wrap("Inner").wrap("Outer");
        match &err {
            DiError::Container { id, source } => {
                assert_eq!(id, "Inner");
                assert!(matches!(**source, DiError::Custom { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.root_cause().to_string(), "boom");
    }

    #[test]
    fn test_cycle_message_contains_path() {
        let err = DiError::CircularDependency {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "Circular dependency detected: A -> B -> A");
    }

    #[test]
    fn test_other_keeps_source() {
        let io = std::io::Error::other("disk full");
        let err = DiError::other(io);
        assert_eq!(err.to_string(), "disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}
