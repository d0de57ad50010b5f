#[macro_use]
extern crate criterion;
extern crate holdem_equity;

use criterion::Criterion;
use holdem_equity::core::{Deck, Evaluator, FlatDeck, Rankable};
use rand::{SeedableRng, rngs::StdRng};

fn rank_one(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut d: FlatDeck = Deck::default().into();
    let hand = d.draw(5, &mut rng).to_vec();
    c.bench_function("Rank one 5 card hand", move |b| b.iter(|| hand.rank()));
}

fn rank_best_seven(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let mut d: FlatDeck = Deck::default().into();
    let hand = d.draw(7, &mut rng).to_vec();
    c.bench_function("Rank best 5card hand from 7", move |b| {
        b.iter(|| Evaluator::shared().rank_best(&hand))
    });
}

fn build_tables(c: &mut Criterion) {
    c.bench_function("Build rank tables", |b| b.iter(Evaluator::new));
}

criterion_group!(benches, rank_one, rank_best_seven, build_tables);
criterion_main!(benches);
