//! Example demonstrating logging capabilities
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-json
//! ```
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```

use service_container::{Constructor, Container, LazyProxyGenerator, Lifecycle, Parameters};
use std::sync::Arc;

#[allow(dead_code)]
struct Database {
    url: String,
}

#[allow(dead_code)]
struct UserService {
    db: Arc<Database>,
}

#[allow(dead_code)]
struct ReportEngine {
    pages: u32,
}

fn main() {
    // JSON with logging-json, pretty with logging-pretty, TRACE so cache hits show
    service_container::logging::builder()
        .trace()
        .container_only()
        .init();

    println!("=== Service Container Logging Demo ===\n");

    // logs: "Creating new service container"
    let container = Container::new();

    // logs: "Registering instance", "Defining constructor", "Registering binding"
    container.bind_instance("db", Database {
        url: "postgres://localhost/mydb".into(),
    });
    container.define(
        Constructor::named("users")
            .service_id("db", "db")
            .build(|args| Ok(UserService { db: args.service("db")? })),
    );
    container.bind_self("users", Lifecycle::Singleton);

    // logs: "Autowiring constructor", then "Service resolved from instance cache"
    let _users = container.get::<UserService>("users").unwrap();
    let _again = container.get::<UserService>("users").unwrap();

    // logs: "Service resolution failed"
    assert!(container.get_any("missing").is_err());

    // logs: "Generated lazy proxy binding", later "Lazy proxy initializing on first access"
    let reports = Constructor::named("reports")
        .value_or("pages", 10u32)
        .build(|args| {
            println!("  [App] Report engine being built...");
            Ok(ReportEngine { pages: args.value("pages")? })
        });
    container.define(reports.clone());
    container.singleton("reports", LazyProxyGenerator::create(&container, &reports).unwrap());

    let lazy = container.lazy::<ReportEngine>("reports").unwrap();
    println!("  [App] Proxy resolved, engine built: {}", lazy.is_initialized());
    let _engine = lazy.get().unwrap();

    // The cached singleton wins over overrides
    let cached = container
        .make_with::<ReportEngine>("reports", &Parameters::new().with("pages", 3u32))
        .unwrap();
    assert_eq!(cached.pages, 10);

    // logs: "Entering scope", "Ending scope"
    let scope = container.begin_scope();
    container.scoped_fn("request", |resolver, _| Ok(resolver.scope()));
    let _request = container.get::<service_container::Scope>("request").unwrap();
    container.end_scope(scope);

    // logs: "Flushing container"
    container.flush();

    println!("\n=== Demo Complete ===");
    println!("Check the log output above to see structured logging in action!");
    println!("\nTip: Use --features logging-json for production (JSON output)");
    println!("     Use --features logging-pretty for development (colorful output)");
}
