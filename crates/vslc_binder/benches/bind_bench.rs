//! Benchmark harness for the binder.
//!
//! Uses criterion for reliable benchmarking.
//! Run with: cargo bench -p vslc_binder

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use vslc_ast::types::{Operator, RelationOp};
use vslc_ast::{NodeId, NodeKind, SyntaxTree, TreeBuilder};
use vslc_binder::CompilationUnit;
use vslc_options::BindOptions;

/// Generate a program with `num_globals` globals and `num_functions`
/// functions, each with nested blocks, a loop and a few string literals.
fn generate_program(num_globals: usize, num_functions: usize) -> SyntaxTree {
    let mut b = TreeBuilder::new();
    let mut items = Vec::new();

    let names: Vec<String> = (0..num_globals).map(|i| format!("g{i}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    items.push(b.global_vars(&names));

    for i in 0..num_functions {
        let decl = b.local_vars(&["i", "acc"]);

        let counter = b.identifier("i");
        let limit = b.identifier("n");
        let condition = b.node(NodeKind::Relation(RelationOp::Lt), [counter, limit]);
        let inner_decl = b.local_vars(&["t"]);
        let t = b.identifier("t");
        let acc = b.identifier("acc");
        let global = b.identifier(&format!("g{}", i % num_globals.max(1)));
        let sum = b.binary(Operator::Add, acc, global);
        let assign = b.assign(t, sum);
        let text = b.string("\"step\"");
        let t_use = b.identifier("t");
        let print = b.print([text, t_use]);
        let loop_body = b.block([inner_decl, assign, print]);
        let loop_stmt = b.node(NodeKind::WhileStatement, [condition, loop_body]);

        let callee = format!("f{}", (i + 1) % num_functions);
        let arg = b.identifier("acc");
        let call = b.call(&callee, [arg]);
        let ret = b.node(NodeKind::ReturnStatement, [call]);

        let body = b.block([decl, loop_stmt, ret]);
        items.push(b.function(&format!("f{i}"), &["n"], body));
    }

    let root: NodeId = b.program(items);
    b.finish(root)
}

// ============================================================================
// Binder Benchmarks
// ============================================================================

fn bench_create_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_tables");

    for (globals, functions) in [(10, 10), (100, 100), (500, 1000)] {
        let tree = generate_program(globals, functions);
        group.bench_with_input(
            BenchmarkId::from_parameter(functions),
            &tree,
            |b, tree| {
                b.iter_batched(
                    || CompilationUnit::new(tree.clone(), BindOptions::default()),
                    |mut unit| {
                        unit.create_tables().unwrap();
                        black_box(unit)
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_destroy_tables(c: &mut Criterion) {
    let tree = generate_program(100, 100);
    c.bench_function("destroy_tables", |b| {
        b.iter_batched(
            || {
                let mut unit = CompilationUnit::new(tree.clone(), BindOptions::default());
                unit.create_tables().unwrap();
                unit
            },
            |unit| black_box(unit.destroy_tables()),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_create_tables, bench_destroy_tables);
criterion_main!(benches);
