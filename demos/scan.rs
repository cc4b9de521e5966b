//! Example demonstrating directory-scanning registration
//!
//! Run with:
//!   cargo run --example scan

use service_container::{
    Constructor, Container, LazyConfig, Lifecycle, ScannerConfig, ServiceScanner,
};
use std::fs;

#[allow(dead_code)]
struct Mailer {
    host: String,
}

#[allow(dead_code)]
struct ReportGenerator;

struct Helpers;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Lay out a small source tree to scan
    let root = std::env::temp_dir().join(format!("service-scan-{}", std::process::id()));
    fs::create_dir_all(root.join("services/reports"))?;
    fs::write(root.join("services/mailer.rs"), "pub struct Mailer;\n")?;
    fs::write(root.join("services/reports/mod.rs"), "pub struct Reports;\n")?;
    fs::write(root.join("services/helpers.rs"), "pub struct Helpers;\n")?;

    let container = Container::new();
    container.define(
        Constructor::named("app::services::Mailer")
            .injectable()
            .lifecycle(Lifecycle::Singleton)
            .alias("mailer")
            .value_or("host", "localhost".to_string())
            .build(|args| Ok(Mailer { host: args.value("host")? })),
    );
    container.define(
        Constructor::named("app::services::Reports")
            .injectable()
            .build(|_| {
                println!("  [App] Building report generator");
                Ok(ReportGenerator)
            }),
    );
    // Defined but not injectable: found, never registered
    container.define(Constructor::named("app::services::Helpers").build(|_| Ok(Helpers)));

    let config = ScannerConfig::new().lazy(LazyConfig::new().heavy("app::services::Reports"));
    let report = ServiceScanner::new(&container, config).scan([&root], "app");

    println!("Scanned {} files", report.files);
    for (service, outcome) in &report.discovered {
        println!("  {} as {} -> {:?}", service.type_name, service.alias, outcome);
    }

    let mailer = container.get::<Mailer>("mailer")?;
    println!("mailer host: {}", mailer.host);

    let reports = container.lazy::<ReportGenerator>("app::services::Reports")?;
    println!("reports built before first use: {}", reports.is_initialized());
    reports.get()?;
    println!("reports built after first use: {}", reports.is_initialized());

    println!("helpers registered: {}", container.has("app::services::Helpers"));

    fs::remove_dir_all(&root)?;
    Ok(())
}
