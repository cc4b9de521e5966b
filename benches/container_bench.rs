//! Benchmarks for the service container

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use service_container::{Constructor, Container, LazyProxyGenerator, Lifecycle, Parameters};
use std::hint::black_box;

#[allow(dead_code)]
struct SmallService {
    value: i32,
}

#[allow(dead_code)]
struct Repository {
    small: std::sync::Arc<SmallService>,
    limit: u32,
}

fn define(container: &Container) {
    container.define(Constructor::named("small").build(|_| Ok(SmallService { value: 42 })));
    container.define(
        Constructor::named("repository")
            .service_id("small", "small")
            .value_or("limit", 100u32)
            .build(|args| {
                Ok(Repository {
                    small: args.service("small")?,
                    limit: args.value("limit")?,
                })
            }),
    );
}

/// `len` defined types where `node{i}` depends on `node{i+1}`
fn chain(container: &Container, len: usize) {
    for i in 0..len {
        let mut ctor = Constructor::named(format!("node{i}"));
        if i + 1 < len {
            ctor = ctor.service_id("next", format!("node{}", i + 1));
        }
        container.define(ctor.build(|_| Ok(())));
    }
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");

    group.bench_function("bind", |b| {
        b.iter(|| {
            let container = Container::new();
            container.bind("cache", "redis");
            black_box(container)
        })
    });

    group.bench_function("instance", |b| {
        b.iter(|| {
            let container = Container::new();
            container.bind_instance("small", SmallService { value: 42 });
            black_box(container)
        })
    });

    group.bench_function("define_and_bind_10", |b| {
        b.iter(|| {
            let container = Container::new();
            for i in 0..10 {
                container.define(Constructor::named(format!("svc{i}")).build(|_| Ok(())));
                container.bind_self(format!("svc{i}"), Lifecycle::Singleton);
            }
            black_box(container)
        })
    });

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    group.throughput(Throughput::Elements(1));

    let container = Container::new();
    define(&container);
    container.singleton("small", "small");

    group.bench_function("cached_singleton", |b| {
        b.iter(|| black_box(container.get::<SmallService>("small").unwrap()))
    });

    group.bench_function("autowire_transient", |b| {
        b.iter(|| black_box(container.get::<Repository>("repository").unwrap()))
    });

    group.bench_function("make_with_override", |b| {
        let params = Parameters::new().with("limit", 5u32);
        b.iter(|| black_box(container.make_with::<Repository>("repository", &params).unwrap()))
    });

    group.bench_function("has", |b| b.iter(|| black_box(container.has("small"))));

    group.bench_function("not_found", |b| {
        b.iter(|| black_box(container.get_any("missing").is_err()))
    });

    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth");

    for len in [10usize, 50] {
        let container = Container::new();
        chain(&container, len);
        group.bench_function(format!("chain_{len}"), |b| {
            b.iter(|| black_box(container.get_any("node0").unwrap()))
        });
    }

    let container = Container::new();
    container.define(Constructor::named("a").service_id("b", "b").build(|_| Ok(())));
    container.define(Constructor::named("b").service_id("a", "a").build(|_| Ok(())));
    group.bench_function("cycle_detection", |b| {
        b.iter(|| black_box(container.get_any("a").is_err()))
    });

    group.finish();
}

fn bench_scoped(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoped");

    group.bench_function("begin_resolve_end", |b| {
        let container = Container::new();
        define(&container);
        container.scoped("small", "small");

        b.iter(|| {
            let scope = container.begin_scope();
            let service = container.get::<SmallService>("small").unwrap();
            black_box(service);
            container.end_scope(scope)
        })
    });

    group.bench_function("scoped_view_cached", |b| {
        let container = Container::new();
        define(&container);
        container.scoped("small", "small");
        let view = container.scoped_view(container.begin_scope());

        b.iter(|| black_box(view.get::<SmallService>("small").unwrap()))
    });

    group.finish();
}

fn bench_lazy(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy");

    let container = Container::new();
    define(&container);
    let ctor = container.constructor("repository").unwrap();
    container.bind("repository", LazyProxyGenerator::create(&container, &ctor).unwrap());

    group.bench_function("create_proxy", |b| {
        b.iter(|| black_box(container.lazy::<Repository>("repository").unwrap()))
    });

    group.bench_function("create_and_force", |b| {
        b.iter(|| black_box(container.get::<Repository>("repository").unwrap()))
    });

    group.finish();
}

fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");

    group.bench_function("concurrent_reads_4", |b| {
        let container = Container::new();
        define(&container);
        container.singleton("small", "small");

        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let c = container.clone();
                    thread::spawn(move || {
                        for _ in 0..100 {
                            let _ = c.get::<SmallService>("small").unwrap();
                        }
                    })
                })
                .collect();

            for h in handles {
                h.join().unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_registration,
    bench_resolution,
    bench_depth,
    bench_scoped,
    bench_lazy,
    bench_concurrent,
);

criterion_main!(benches);
