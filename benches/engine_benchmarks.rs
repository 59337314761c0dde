use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use im::Vector;
use ramus::search::engine::DfsEngine;
use ramus::search::options::Options;
use ramus::search::statistics::Statistics;
use ramus::space::{BranchDesc, Space, SpaceStatus};

// Scripted tree space copied from tests/dfs_engine.rs

#[derive(Debug, Clone)]
enum Node {
    Failed,
    Branch(Vec<Node>),
}

fn all_failing(depth: usize) -> Node {
    if depth == 0 {
        Node::Failed
    } else {
        Node::Branch(vec![all_failing(depth - 1), all_failing(depth - 1)])
    }
}

#[derive(Debug)]
struct TreeChoice {
    width: u32,
}

impl BranchDesc for TreeChoice {
    fn alternatives(&self) -> u32 {
        self.width
    }
}

#[derive(Debug, Clone)]
struct TreeSpace {
    script: Arc<Node>,
    trail: Vector<u32>,
}

impl TreeSpace {
    fn new(script: Node) -> Self {
        Self {
            script: Arc::new(script),
            trail: Vector::new(),
        }
    }

    fn node(&self) -> &Node {
        let mut node: &Node = &self.script;
        for &alt in &self.trail {
            match node {
                Node::Branch(children) => node = &children[alt as usize],
                _ => break,
            }
        }
        node
    }
}

impl Space for TreeSpace {
    type Branch = TreeChoice;

    fn status(&mut self, stats: &mut Statistics) -> SpaceStatus {
        stats.propagations += 1;
        match self.node() {
            Node::Failed => SpaceStatus::Failed,
            Node::Branch(_) => SpaceStatus::Branch,
        }
    }

    fn description(&mut self) -> TreeChoice {
        let width = match self.node() {
            Node::Branch(children) => children.len() as u32,
            _ => 1,
        };
        TreeChoice { width }
    }

    fn clone_space(&self, _share: bool) -> Self {
        self.clone()
    }

    fn commit(&mut self, _desc: &TreeChoice, alt: u32) {
        self.trail.push_back(alt);
    }
}

fn exhaustive_search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Exhaustive DFS");
    for workers in [1, 2, 4].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            workers,
            |b, &workers| {
                let root = TreeSpace::new(all_failing(10));
                b.iter(|| {
                    let options = Options::default().with_workers(workers);
                    let mut engine =
                        DfsEngine::new(black_box(root.clone()), options).unwrap();
                    while engine.next().is_some() {}
                    black_box(engine.statistics().nodes)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, exhaustive_search_benchmark);
criterion_main!(benches);
