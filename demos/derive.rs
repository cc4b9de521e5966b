//! Example demonstrating the #[derive(Autowire)] macro
//!
//! Run with:
//!   cargo run --example derive --features derive

use service_container::{Autowire, Container, Lazy, Parameters, service_id};
use std::sync::Arc;

// Dependencies
#[allow(dead_code)]
struct Database {
    url: String,
}

#[allow(dead_code)]
struct Logger {
    level: String,
}

#[derive(Autowire)]
struct Cache {
    #[param(default = 1024)]
    size: usize,
}

// Service with injected dependencies
#[derive(Autowire)]
#[autowire(injectable, singleton, alias = "users")]
struct UserService {
    #[inject]
    db: Arc<Database>,
    #[inject]
    cache: Lazy<Cache>,
    #[inject]
    logger: Option<Arc<Logger>>,
    // Value parameter with a default, overridable through make_with
    #[param(default)]
    request_count: u64,
}

impl UserService {
    fn describe(&self) -> String {
        let logger_status = if self.logger.is_some() {
            "with logging"
        } else {
            "without logging"
        };
        let cache_size = self.cache.get().map(|c| c.size).unwrap_or_default();
        format!(
            "UserService connected to {} with cache size {} ({}, requests: {})",
            self.db.url, cache_size, logger_status, self.request_count
        )
    }
}

fn main() {
    println!("=== Service Container Derive Macro Demo ===\n");

    let container = Container::new();
    container.bind_instance(service_id::<Database>(), Database {
        url: "postgres://localhost:5432/myapp".into(),
    });
    container.register_type::<Cache>();
    container.register_type::<UserService>();
    // Note: Logger is NOT registered, so it will be None

    println!("Resolving UserService...");
    let user_service = container.resolve::<UserService>().expect("Failed to resolve UserService");
    println!("  {}", user_service.describe());
    println!();

    container.bind_instance(service_id::<Logger>(), Logger {
        level: "DEBUG".into(),
    });

    println!("Resolving UserService with Logger and an override...");
    let with_log = container
        .make_with::<UserService>(
            service_id::<UserService>(),
            &Parameters::new().with("request_count", 42u64),
        )
        .expect("Failed to resolve UserService");
    println!("  {}", with_log.describe());
    println!();

    let meta = UserService::constructor().service_meta().clone();
    println!("=== Demo Complete ===");
    println!("\nThe #[derive(Autowire)] macro generated a constructor that:");
    println!("  - Resolves #[inject] fields through the container");
    println!("  - Keeps Lazy<T> fields deferred until first use");
    println!("  - Leaves Option<Arc<T>> fields empty when unresolvable");
    println!("  - Takes value fields from overrides or their defaults");
    println!("  - Carries scanner metadata: {meta:?}");
}
