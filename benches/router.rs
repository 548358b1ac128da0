use chunk_router::{Action, BoxError, Params, Router};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn value(v: usize) -> Action<usize> {
    Action::callable(move |_: Params| -> Result<usize, BoxError> { Ok(v) })
}

fn many_routes(n: usize) -> Router<usize> {
    let mut router = Router::new();
    for i in 0..n {
        router.get(&format!("/api/r{}/{{id:int}}", i), value(i));
    }
    router.compile().unwrap();
    router
}

fn router_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("router-find");

    group.bench_function("single-route", |b| {
        let mut router: Router<usize> = Router::new();
        router.get("/hello/{name}", value(1));
        b.iter_with_large_drop(|| router.find("GET", "/hello/world"))
    });

    group.bench_function("static-route", |b| {
        let mut router: Router<usize> = Router::new();
        router.get("/hello/world", value(1));
        b.iter_with_large_drop(|| router.find("GET", "/hello/world"))
    });

    for &n in &[10_usize, 100] {
        let router = many_routes(n);
        let last = format!("/api/r{}/42", n - 1);
        group.bench_function(format!("last-of-{}", n), |b| {
            b.iter_with_large_drop(|| router.find("GET", &last))
        });
    }
}

fn router_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("router-insert");

    group.bench_function("single-route", |b| {
        b.iter_batched_ref(
            Router::new,
            |router: &mut Router<usize>| {
                router.get("/hello/{name}", value(1));
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, router_find, router_insert);
criterion_main!(benches);
