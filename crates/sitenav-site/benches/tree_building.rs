//! Benchmarks for navigation tree building.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sitenav_site::{NavigationSettings, NavigationTreeBuilder, UrlResolver};
use sitenav_store::{AssetId, AttributeSet, MockStore};

/// Create a site plan with specified depth and breadth.
fn create_site_plan(depth: u32, breadth: i64) -> MockStore {
    fn create_level(
        store: MockStore,
        parent: i64,
        next_id: &mut i64,
        current_depth: u32,
        max_depth: u32,
        breadth: i64,
    ) -> MockStore {
        if current_depth > max_depth {
            return store;
        }

        let mut store = store;
        for rank in 0..breadth {
            *next_id += 1;
            let node_id = *next_id;
            let page = AssetId::new("Page", node_id);
            let attributes = AttributeSet::new(page.clone())
                .with_text("name", format!("Page {node_id}"))
                .with_text("template", "Layout")
                .with_text("path", format!("/level-{current_depth}/page-{node_id}"));
            store = store
                .with_node(node_id, parent, page, rank)
                .with_asset(attributes);
            store = create_level(store, node_id, next_id, current_depth + 1, max_depth, breadth);
        }
        store
    }

    let mut next_id = 1;
    create_level(MockStore::new().with_site("BenchSite", 1), 1, &mut next_id, 0, depth, breadth)
}

fn bench_roots_for_site(c: &mut Criterion) {
    let mut group = c.benchmark_group("roots_for_site");

    for (depth, breadth) in [(2, 5), (3, 5), (5, 3)] {
        let store = create_site_plan(depth, breadth);
        let builder = NavigationTreeBuilder::new(
            &store,
            &store,
            UrlResolver::default(),
            NavigationSettings::default(),
        )
        .unwrap();

        group.bench_with_input(
            BenchmarkId::new("unbounded", format!("{depth}x{breadth}")),
            &builder,
            |b, builder| b.iter(|| builder.roots_for_site("BenchSite", -1).unwrap()),
        );
        group.bench_with_input(
            BenchmarkId::new("depth_1", format!("{depth}x{breadth}")),
            &builder,
            |b, builder| b.iter(|| builder.roots_for_site("BenchSite", 1).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_roots_for_site);
criterion_main!(benches);
