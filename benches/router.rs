use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use trellis_router::{HttpRouter, Method, Tree};

const ROUTES: &[&str] = &[
    "/",
    "/users",
    "/users/:id:int",
    "/users/:id:int/posts/:slug",
    "/orgs/:org/repos/:repo",
    "/static/*",
    "/assets/*.*",
    "/search/:q([a-z]+)",
];

fn tree_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree-find");

    group.bench_function("single-route", |b| {
        let mut tree: Tree<usize> = Tree::new();
        tree.insert("/hello/:name", 1);
        b.iter_with_large_drop(|| tree.find("/hello/world"))
    });

    let mut tree: Tree<usize> = Tree::new();
    for (i, pattern) in ROUTES.iter().enumerate() {
        tree.insert(pattern, i);
    }

    group.bench_function("typed-nested", |b| {
        b.iter_with_large_drop(|| tree.find("/users/42/posts/hello"))
    });

    group.bench_function("catch-all", |b| {
        b.iter_with_large_drop(|| tree.find("/static/css/site/main.css"))
    });
}

fn http_router_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("http-router-find");

    let mut router: HttpRouter<usize> = HttpRouter::new();
    for (i, pattern) in ROUTES.iter().enumerate() {
        router.get(pattern, i);
    }

    group.bench_function("static-fast-path", |b| {
        b.iter_with_large_drop(|| router.find(&Method::GET, "/users"))
    });

    group.bench_function("dynamic", |b| {
        b.iter_with_large_drop(|| router.find(&Method::GET, "/orgs/rust-lang/repos/regex"))
    });
}

fn tree_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree-insert");

    group.bench_function("single-route", |b| {
        b.iter_batched_ref(
            Tree::new,
            |tree: &mut Tree<usize>| {
                tree.insert("/hello/:name", 1);
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("route-table", |b| {
        b.iter_batched_ref(
            Tree::new,
            |tree: &mut Tree<usize>| {
                for (i, pattern) in ROUTES.iter().enumerate() {
                    tree.insert(pattern, i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, tree_find, http_router_find, tree_insert);
criterion_main!(benches);
