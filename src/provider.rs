//! Provider traits and lifecycle definitions
//!
//! These define what can be stored in the container and how long a resolved
//! instance lives.

use std::any::Any;
use std::sync::Arc;

/// Type-erased shared service instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Marker trait for types that can be stored in and resolved from the container.
///
/// This is automatically implemented for all types that are `Send + Sync + 'static`.
/// You never need to implement this manually.
pub trait Injectable: Send + Sync + 'static {
    /// Returns the identifier used for this type by the typed helpers
    #[inline]
    fn service_id() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}

// Blanket implementation - everything that's Send + Sync + 'static is Injectable
impl<T: Send + Sync + 'static> Injectable for T {}

/// Identifier of `T` as used by `resolve::<T>()` and friends.
#[inline]
pub fn service_id<T: Injectable>() -> &'static str {
    T::service_id()
}

/// How long a resolved instance is reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifecycle {
    /// New instance created on every resolve
    #[default]
    Transient,

    /// Single instance shared for the lifetime of the container
    Singleton,

    /// One instance per scope
    Scoped,
}

impl Lifecycle {
    /// Lowercase name used in logs and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Transient => "transient",
            Lifecycle::Singleton => "singleton",
            Lifecycle::Scoped => "scoped",
        }
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Lifecycle {
    type Err = crate::DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transient" => Ok(Lifecycle::Transient),
            "singleton" => Ok(Lifecycle::Singleton),
            "scoped" => Ok(Lifecycle::Scoped),
            other => Err(crate::DiError::Config(format!("unknown lifecycle `{other}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_parse() {
        assert_eq!("Singleton".parse::<Lifecycle>().unwrap(), Lifecycle::Singleton);
        assert_eq!("scoped".parse::<Lifecycle>().unwrap(), Lifecycle::Scoped);
        assert!("forever".parse::<Lifecycle>().is_err());
        assert_eq!(Lifecycle::default(), Lifecycle::Transient);
    }

    #[test]
    fn test_service_id_is_type_name() {
        struct Mailer;
        assert_eq!(service_id::<Mailer>(), std::any::type_name::<Mailer>());
    }
}
