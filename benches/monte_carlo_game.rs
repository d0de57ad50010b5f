#[macro_use]
extern crate criterion;
extern crate holdem_equity;

use criterion::Criterion;
use holdem_equity::core::Hand;
use holdem_equity::holdem::{EquityCalculator, MonteCarloGame};
use rand::{SeedableRng, rngs::StdRng};

fn hole(s: &str) -> Vec<holdem_equity::core::Card> {
    Hand::new_from_str(s)
        .expect("Should be able to create a hand.")
        .iter()
        .collect()
}

fn simulate_heads_up(c: &mut Criterion) {
    let g = MonteCarloGame::new(&hole("AdAh"), &[], 2).expect("Should be able to create a game.");
    let mut deck = g.working_deck();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("Simulate AdAh vs one", move |b| {
        b.iter(|| g.simulate(&mut deck, &mut rng))
    });
}

fn simulate_full_ring(c: &mut Criterion) {
    let g = MonteCarloGame::new(&hole("KsKd"), &[], 10).expect("Should be able to create a game.");
    let mut deck = g.working_deck();
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("Simulate KsKd vs nine", move |b| {
        b.iter(|| g.simulate(&mut deck, &mut rng))
    });
}

fn parallel_run(c: &mut Criterion) {
    let calc = EquityCalculator::default()
        .hero(&hole("QhJh"))
        .num_players(6)
        .num_simulations(10_000)
        .seed(3);

    c.bench_function("Parallel 10k trials QhJh six handed", move |b| {
        b.iter(|| calc.run().expect("Should be able to run."))
    });
}

criterion_group!(benches, simulate_heads_up, simulate_full_ring, parallel_run);
criterion_main!(benches);
