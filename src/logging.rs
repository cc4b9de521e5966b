//! Logging setup for service-container
//!
//! The container emits `tracing` events under the `service_container` target:
//! registrations and scope changes at DEBUG, cache hits and autowiring steps
//! at TRACE, proxy fallbacks at WARN, and the scan summary at INFO. This module
//! installs a `tracing-subscriber` for applications that do not bring their own.
//!
//! # Features
//!
//! - `logging` - Emit events (default)
//! - `logging-json` - JSON structured output
//! - `logging-pretty` - Multi-line human readable output
//!
//! # Example
//!
//! ```rust,ignore
//! use service_container::logging;
//!
//! logging::builder()
//!     .trace()
//!     .container_only()
//!     .compact()
//!     .init();
//! ```

use crate::{DiError, Result};
use tracing::Level;

/// Target used by every event the crate emits
pub const TARGET: &str = "service_container";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON lines (production default)
    #[default]
    Json,
    /// Multi-line output (development)
    Pretty,
    /// Single-line output
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(DiError::Config(format!("unknown log format `{other}`"))),
        }
    }
}

/// Builder for the global subscriber
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
    directives: Vec<String>,
    with_file: bool,
    with_line_number: bool,
    with_thread_ids: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::default(),
            target: None,
            directives: Vec::new(),
            with_file: false,
            with_line_number: false,
            with_thread_ids: false,
        }
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn trace(self) -> Self {
        self.with_level(Level::TRACE)
    }

    pub fn debug(self) -> Self {
        self.with_level(Level::DEBUG)
    }

    pub fn info(self) -> Self {
        self.with_level(Level::INFO)
    }

    pub fn warn(self) -> Self {
        self.with_level(Level::WARN)
    }

    /// Only show events from one target
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show events emitted by this crate
    pub fn container_only(self) -> Self {
        self.with_target_filter(TARGET)
    }

    /// Add a raw `EnvFilter` directive, e.g. `"my_app=info"`
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn with_file(mut self) -> Self {
        self.with_file = true;
        self
    }

    pub fn with_line_number(mut self) -> Self {
        self.with_line_number = true;
        self
    }

    pub fn with_thread_ids(mut self) -> Self {
        self.with_thread_ids = true;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn json(self) -> Self {
        self.format(LogFormat::Json)
    }

    pub fn pretty(self) -> Self {
        self.format(LogFormat::Pretty)
    }

    pub fn compact(self) -> Self {
        self.format(LogFormat::Compact)
    }

    /// The `EnvFilter` directive string this builder installs
    pub fn filter_directives(&self) -> String {
        let base = match self.target {
            Some(target) => format!("{}={}", target, self.level),
            None => self.level.to_string(),
        };

        std::iter::once(base)
            .chain(self.directives.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Install the subscriber, failing if one is already set.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn try_init(self) -> Result<()> {
        use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

        let filter = EnvFilter::try_new(self.filter_directives())
            .map_err(|e| DiError::Config(e.to_string()))?;

        let base = fmt::layer()
            .with_file(self.with_file)
            .with_line_number(self.with_line_number)
            .with_thread_ids(self.with_thread_ids)
            .with_target(true);

        let layer = match self.format {
            #[cfg(feature = "logging-json")]
            LogFormat::Json => base.json().boxed(),
            // Without JSON support fall back to the default line format
            #[cfg(not(feature = "logging-json"))]
            LogFormat::Json => base.boxed(),
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Compact => base.compact().boxed(),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .map_err(|e| DiError::Config(e.to_string()))
    }

    /// No subscriber backend compiled in; events go to whatever is installed.
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn try_init(self) -> Result<()> {
        Ok(())
    }

    /// Install the subscriber, ignoring an already installed one.
    pub fn init(self) {
        let _ = self.try_init();
    }
}

pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Install the default subscriber: JSON with `logging-json`, pretty otherwise
pub fn init() {
    #[cfg(feature = "logging-json")]
    builder().json().init();

    #[cfg(not(feature = "logging-json"))]
    builder().pretty().init();
}

/// Install a subscriber that shows only this crate's events
pub fn init_container_only() {
    builder().container_only().init();
}
