//! Directory-scanning service registration
//!
//! The scanner walks source directories, maps each file to a type identifier
//! and, for every defined type whose metadata carries the injectable marker,
//! registers a binding under the type's alias with its lifecycle. Types
//! classified as heavy are registered through a lazy proxy.
//!
//! Nothing a scan encounters is propagated as an error: failures are logged
//! and collected in the returned [`ScanReport`].

use crate::binding::Concrete;
use crate::constructor::Constructor;
use crate::factory::ConstructFactory;
use crate::lazy::LazyProxyGenerator;
use crate::{Container, DiError, Lifecycle};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[cfg(feature = "logging")]
use tracing::{debug, info, trace, warn};

/// File stems that never name a type
const CRATE_ROOTS: &[&str] = &["lib", "main"];

/// Heavy-service classification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LazyConfig {
    /// Master switch for lazy registration
    pub enabled: bool,
    /// Type identifiers or aliases always treated as heavy
    pub heavy_services: Vec<String>,
    /// Type identifiers or aliases never treated as heavy
    pub excluded: Vec<String>,
    /// Classify by constructor parameter count
    pub auto_detect: bool,
    /// Parameter count above which a type is heavy when `auto_detect` is on
    pub param_threshold: usize,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            heavy_services: Vec::new(),
            excluded: Vec::new(),
            auto_detect: true,
            param_threshold: 5,
        }
    }
}

impl LazyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with lazy registration switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn heavy(mut self, id: impl Into<String>) -> Self {
        self.heavy_services.push(id.into());
        self
    }

    pub fn exclude(mut self, id: impl Into<String>) -> Self {
        self.excluded.push(id.into());
        self
    }

    pub fn auto_detect(mut self, enabled: bool) -> Self {
        self.auto_detect = enabled;
        self
    }

    pub fn param_threshold(mut self, threshold: usize) -> Self {
        self.param_threshold = threshold;
        self
    }

    /// Whether a type should be registered lazily.
    ///
    /// Lists match either the type identifier or the alias.
    pub fn is_heavy(&self, type_id: &str, alias: &str, param_count: usize) -> bool {
        let listed = |list: &[String]| list.iter().any(|id| id == type_id || id == alias);

        self.enabled
            && !listed(&self.excluded)
            && (listed(&self.heavy_services)
                || (self.auto_detect && param_count > self.param_threshold))
    }
}

/// Scanner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ScannerConfig {
    /// File extensions considered source files, without the dot
    pub extensions: Vec<String>,
    pub follow_links: bool,
    /// Skip files and directories whose name starts with `.`
    pub skip_hidden: bool,
    pub lazy: LazyConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["rs".to_owned()],
            follow_links: false,
            skip_hidden: true,
            lazy: LazyConfig::default(),
        }
    }
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    pub fn lazy(mut self, lazy: LazyConfig) -> Self {
        self.lazy = lazy;
        self
    }

    /// Parse a TOML document.
    ///
    /// ```rust
    /// use service_container::ScannerConfig;
    ///
    /// let config = ScannerConfig::from_toml_str(r#"
    ///     extensions = ["rs"]
    ///
    ///     [lazy]
    ///     heavy_services = ["app::reports::Generator"]
    ///     param_threshold = 3
    /// "#).unwrap();
    ///
    /// assert_eq!(config.lazy.param_threshold, 3);
    /// assert!(config.lazy.enabled);
    /// ```
    #[cfg(feature = "config")]
    pub fn from_toml_str(source: &str) -> crate::Result<Self> {
        toml::from_str(source).map_err(|e| DiError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| DiError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// What a scan found out about one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredService {
    pub file_path: PathBuf,
    pub type_name: String,
    pub injectable: bool,
    pub lifecycle: Lifecycle,
    /// Identifier the type is registered under
    pub alias: String,
    pub heavy: bool,
}

/// How a discovered type ended up in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Plain binding
    Direct,
    /// Binding producing a lazy proxy
    Proxied,
    /// Proxy creation failed; a construct-on-use factory was registered
    Fallback,
    /// Not injectable, or the alias was already registered
    Skipped,
}

/// Summary of one scan. Diagnostic only.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Source files visited
    pub files: usize,
    /// Files that mapped to a defined type
    pub discovered: Vec<(DiscoveredService, Registration)>,
    /// Failures that were logged and skipped
    pub errors: Vec<DiError>,
}

impl ScanReport {
    fn count(&self, kind: Registration) -> usize {
        self.discovered.iter().filter(|(_, r)| *r == kind).count()
    }

    /// Types bound by the scan, proxied or not
    pub fn registered(&self) -> usize {
        self.discovered.len() - self.count(Registration::Skipped)
    }

    pub fn proxied(&self) -> usize {
        self.count(Registration::Proxied)
    }

    pub fn fallbacks(&self) -> usize {
        self.count(Registration::Fallback)
    }

    /// Registration outcome for a type identifier
    pub fn outcome(&self, type_name: &str) -> Option<Registration> {
        self.discovered
            .iter()
            .find(|(service, _)| service.type_name == type_name)
            .map(|(_, r)| *r)
    }
}

/// Populates a container from source directories.
///
/// # Examples
///
/// ```rust,no_run
/// use service_container::{Constructor, Container, Lifecycle, ScannerConfig, ServiceScanner};
///
/// struct Mailer;
///
/// let container = Container::new();
/// container.define(
///     Constructor::named("app::services::Mailer")
///         .injectable()
///         .lifecycle(Lifecycle::Singleton)
///         .alias("mailer")
///         .build(|_| Ok(Mailer)),
/// );
///
/// // src/services/mailer.rs maps to app::services::Mailer
/// let report = ServiceScanner::new(&container, ScannerConfig::default()).scan(["src"], "app");
/// assert_eq!(report.registered(), 1);
/// assert!(container.has("mailer"));
/// ```
pub struct ServiceScanner<'c> {
    container: &'c Container,
    config: ScannerConfig,
}

impl<'c> ServiceScanner<'c> {
    pub fn new(container: &'c Container, config: ScannerConfig) -> Self {
        Self { container, config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Walk every directory and register the injectable types found.
    pub fn scan<I, P>(&self, directories: I, namespace_root: &str) -> ScanReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = ScanReport::default();

        for root in directories {
            self.scan_root(root.as_ref(), namespace_root, &mut report);
        }

        #[cfg(feature = "logging")]
        info!(
            target: "service_container",
            files = report.files,
            registered = report.registered(),
            proxied = report.proxied(),
            fallbacks = report.fallbacks(),
            errors = report.errors.len(),
            "Service scan complete"
        );

        report
    }

    fn scan_root(&self, root: &Path, namespace_root: &str, report: &mut ScanReport) {
        let skip_hidden = self.config.skip_hidden;
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(skip_hidden && is_hidden(entry)));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());

                    #[cfg(feature = "logging")]
                    warn!(
                        target: "service_container",
                        path = %path,
                        error = %e,
                        "Skipping unreadable directory entry"
                    );

                    report.errors.push(DiError::Io {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.config.accepts(entry.path()) {
                continue;
            }
            report.files += 1;

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };

            let Some(constructor) = self.lookup(relative, namespace_root) else {
                #[cfg(feature = "logging")]
                trace!(
                    target: "service_container",
                    path = %entry.path().display(),
                    "File does not name a defined type"
                );
                continue;
            };

            let service = self.describe(entry.path(), &constructor);
            let outcome = self.register(&service, &constructor, report);
            report.discovered.push((service, outcome));
        }
    }

    /// Find the defined type a file maps to, trying each naming strategy in turn.
    fn lookup(&self, relative: &Path, namespace_root: &str) -> Option<std::sync::Arc<Constructor>> {
        type_candidates(relative, namespace_root)
            .into_iter()
            .find_map(|candidate| self.container.constructor(&candidate))
    }

    fn describe(&self, path: &Path, constructor: &Constructor) -> DiscoveredService {
        let meta = constructor.service_meta();
        let type_name = constructor.type_id().to_owned();
        let alias = meta.alias.clone().unwrap_or_else(|| type_name.clone());
        let heavy = self
            .config
            .lazy
            .is_heavy(&type_name, &alias, constructor.param_count());

        DiscoveredService {
            file_path: path.to_path_buf(),
            type_name,
            injectable: meta.injectable,
            lifecycle: meta.lifecycle.unwrap_or_default(),
            alias,
            heavy,
        }
    }

    fn register(
        &self,
        service: &DiscoveredService,
        constructor: &Constructor,
        report: &mut ScanReport,
    ) -> Registration {
        if !service.injectable {
            #[cfg(feature = "logging")]
            trace!(
                target: "service_container",
                service = %service.type_name,
                "Type is not injectable, skipping"
            );
            return Registration::Skipped;
        }

        if self.container.has(&service.alias) {
            #[cfg(feature = "logging")]
            debug!(
                target: "service_container",
                service = %service.type_name,
                alias = %service.alias,
                "Alias already registered, keeping existing registration"
            );
            return Registration::Skipped;
        }

        if !service.heavy || !constructor.is_instantiable() {
            self.container.register_binding(
                service.alias.as_str(),
                Concrete::Type(service.type_name.clone()),
                service.lifecycle,
            );
            return Registration::Direct;
        }

        match LazyProxyGenerator::create(self.container, constructor) {
            Ok(proxy) => {
                self.container
                    .register_binding(service.alias.as_str(), proxy, service.lifecycle);
                Registration::Proxied
            }
            Err(e) => {
                #[cfg(feature = "logging")]
                warn!(
                    target: "service_container",
                    service = %service.type_name,
                    error = %e,
                    "Lazy proxy unavailable, registering construct-on-use factory"
                );

                // The binding only carries the lifecycle; the factory wins.
                self.container
                    .factory(service.alias.as_str(), ConstructFactory::new(service.type_name.as_str()));
                self.container.register_binding(
                    service.alias.as_str(),
                    Concrete::Type(service.type_name.clone()),
                    service.lifecycle,
                );
                report.errors.push(e);
                Registration::Fallback
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Type identifiers a source file may define, in the order they are tried.
///
/// `services/http_client.rs` under `app` yields `app::services::HttpClient`;
/// `services/mailer/mod.rs` yields `app::services::Mailer`.
pub fn type_candidates(relative: &Path, namespace_root: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for component in relative.parent().into_iter().flat_map(Path::components) {
        match component.as_os_str().to_str() {
            Some(segment) => segments.push(segment.to_owned()),
            None => return Vec::new(),
        }
    }

    let Some(stem) = relative.file_stem().and_then(|s| s.to_str()) else {
        return Vec::new();
    };
    if CRATE_ROOTS.contains(&stem) {
        return Vec::new();
    }

    let qualify = |modules: &[String], name: String| {
        namespace_root
            .split("::")
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .chain(modules.iter().cloned())
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join("::")
    };

    let mut candidates = vec![qualify(&segments, pascal_case(stem))];

    if stem == "mod" {
        if let Some((dir, modules)) = segments.split_last() {
            candidates.push(qualify(modules, pascal_case(dir)));
        }
    }

    candidates
}

/// `http_client` becomes `HttpClient`.
pub fn pascal_case(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
