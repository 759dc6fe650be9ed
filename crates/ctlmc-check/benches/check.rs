//! Criterion benchmarks for the checker.
//!
//! Run with: cargo bench -p ctlmc-check

use criterion::{criterion_group, criterion_main, Criterion};
use ctlmc_check::Model;
use ctlmc_syntax::parse;
use ctlmc_ts::{SystemBuilder, TransitionSystem};

/// Directed ring of `n` states. Every state is labelled `p` except the one
/// opposite the origin, which is labelled `goal`, so eventuality formulas
/// have to propagate around the whole ring.
fn ring(n: u32) -> TransitionSystem {
    let goal = n / 2;
    let mut builder = SystemBuilder::new();
    for s in 0..n {
        let labels = if s == goal {
            vec!["goal".to_string()]
        } else {
            vec!["p".to_string()]
        };
        builder = builder.explored(s, labels, vec![(s + 1) % n]);
    }
    builder.build().unwrap()
}

/// Same ring, but the state just before `goal` lost its outgoing edge to
/// truncation, splitting the ring into a decided and an undetermined arc.
fn truncated_ring(n: u32) -> TransitionSystem {
    let goal = n / 2;
    let mut builder = SystemBuilder::new();
    for s in 0..n {
        let labels = if s == goal {
            vec!["goal".to_string()]
        } else {
            vec!["p".to_string()]
        };
        builder = if s == goal - 1 {
            builder.truncated(s, labels, vec![])
        } else {
            builder.explored(s, labels, vec![(s + 1) % n])
        };
    }
    builder.build().unwrap()
}

/// `w` by `h` grid flowing right and down, every maximal path ending in
/// the bottom-right terminal corner. The corner is labelled `goal`, every
/// other cell `p`.
fn grid(w: u32, h: u32) -> TransitionSystem {
    let corner = h * w - 1;
    let mut builder = SystemBuilder::new();
    for y in 0..h {
        for x in 0..w {
            let id = y * w + x;
            let labels = if id == corner {
                vec!["goal".to_string()]
            } else {
                vec!["p".to_string()]
            };
            let mut successors = Vec::new();
            if x + 1 < w {
                successors.push(id + 1);
            }
            if y + 1 < h {
                successors.push(id + w);
            }
            builder = builder.explored(id, labels, successors);
        }
    }
    builder.build().unwrap()
}

fn bench_check(c: &mut Criterion, name: &str, system: &TransitionSystem, formula: &str) {
    let formula = parse(formula).unwrap().simplify();
    c.bench_function(name, |b| b.iter(|| Model::new(system).check(&formula)));
}

fn benchmarks(c: &mut Criterion) {
    let ring1024 = ring(1024);
    let ring4096 = ring(4096);
    let cut1024 = truncated_ring(1024);
    let grid32 = grid(32, 32);

    // Reachability and invariants on a long cycle
    bench_check(c, "ring1024_ef_goal", &ring1024, "EF goal");
    bench_check(c, "ring1024_ag_p", &ring1024, "AG p");
    bench_check(c, "ring1024_p_eu_goal", &ring1024, "p EU goal");
    bench_check(c, "ring1024_p_au_goal", &ring1024, "p AU goal");
    bench_check(c, "ring4096_ef_goal", &ring4096, "EF goal");

    // Truncated exploration: the undetermined arc dominates
    bench_check(c, "ring1024_truncated_ef_goal", &cut1024, "EF goal");

    // Terminal-bound grid: every path funnels into the corner
    bench_check(c, "grid32_af_goal", &grid32, "AF goal");
    bench_check(c, "grid32_response", &grid32, "AG (p -> EF goal)");
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
