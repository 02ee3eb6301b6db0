use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use determinize::{
    prelude::*,
    random::{random_nfa, RandomNfa},
};

fn automata(states: usize) -> Vec<Automaton> {
    let mut rng = fastrand::Rng::with_seed(states as u64);
    let params = RandomNfa {
        states,
        symbols: 3,
        ..Default::default()
    };
    (0..10).map(|_| random_nfa(&mut rng, &params)).collect()
}

fn subset_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset construction");
    for states in [4, 8, 12] {
        let inputs = automata(states);
        group.bench_with_input(BenchmarkId::from_parameter(states), &inputs, |b, inputs| {
            b.iter(|| {
                for nfa in inputs {
                    black_box(generate_dfa(nfa, StepLimit::Unlimited));
                }
            })
        });
    }
    group.finish();
}

fn minimization(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimization");
    for strategy in [
        MinimizationStrategy::SinglePass,
        MinimizationStrategy::Fixpoint,
        MinimizationStrategy::PartitionRefinement,
    ] {
        let dfas: Vec<Automaton> = automata(8).iter().map(Automaton::determinize).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{strategy:?}")),
            &dfas,
            |b, dfas| {
                b.iter(|| {
                    for dfa in dfas {
                        black_box(minimize_dfa(dfa.clone(), strategy));
                    }
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, subset_construction, minimization);
criterion_main!(benches);
