#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate holdem_equity;
use holdem_equity::core::Card;
use holdem_equity::holdem::EquityCalculator;
use libfuzzer_sys::arbitrary;
use rand::{SeedableRng, rngs::StdRng};

#[derive(Debug, arbitrary::Arbitrary)]
struct Input {
    hero: [u8; 2],
    board: Vec<u8>,
    num_players: u8,
    seed: u64,
}

fuzz_target!(|input: Input| {
    let to_cards = |bytes: &[u8]| -> Vec<Card> { bytes.iter().map(|b| Card::from(b % 52)).collect() };
    let result = EquityCalculator::default()
        .hero(&to_cards(&input.hero))
        .board(&to_cards(&input.board))
        .num_players(input.num_players as usize)
        .num_simulations(64)
        .run_with_rng(&mut StdRng::seed_from_u64(input.seed));
    if let Ok(report) = result {
        let s = report.summary;
        assert_eq!(64, report.tally.completed());
        assert!((s.win_rate + s.tie_rate + s.loss_rate - 100.0).abs() < 0.1);
    }
});
