use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tui_repotree::{NodeId, PathForest, TreeModel, TreeViewState, build_tree};

fn synthetic_paths(dirs: usize, files_per_dir: usize) -> Vec<String> {
    let mut paths = Vec::with_capacity(dirs * files_per_dir);
    for dir in 0..dirs {
        for file in 0..files_per_dir {
            paths.push(format!("src/module_{}/sub_{}/file_{file}.rs", dir / 8, dir % 8));
        }
    }
    paths
}

fn open_all(forest: &PathForest, state: &mut TreeViewState<NodeId>) {
    for (_, node) in forest.iter() {
        if node.is_dir() {
            state.set_open(&node.id, true);
        }
    }
}

fn bench_build_tree(c: &mut Criterion) {
    let paths = synthetic_paths(256, 40);
    c.bench_function("build_tree_10k", |b| {
        b.iter(|| build_tree(black_box(&paths), "bench"));
    });
}

fn bench_visible_rows(c: &mut Criterion) {
    let forest = build_tree(synthetic_paths(256, 40), "bench");
    let mut state = TreeViewState::with_capacity(forest.size_hint());
    open_all(&forest, &mut state);

    c.bench_function("visible_rows_expanded_10k", |b| {
        b.iter(|| {
            state.invalidate();
            state.ensure_visible_nodes(black_box(&forest));
            black_box(state.visible_len())
        });
    });
}

criterion_group!(benches, bench_build_tree, bench_visible_rows);
criterion_main!(benches);
