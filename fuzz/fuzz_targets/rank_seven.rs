#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate holdem_equity;
use holdem_equity::core::{Card, CardIter, Evaluator, Hand, Rankable};
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = str::from_utf8(data) {
        if let Ok(h) = Hand::new_from_str(s) {
            if h.count() == 7 {
                let cards: Vec<Card> = h.iter().collect();
                let r_seven = h.rank().unwrap();
                let r_five_best = CardIter::new(&cards, 5)
                    .map(|five| Evaluator::shared().rank_best(&five))
                    .min()
                    .unwrap();
                assert_eq!(r_five_best, r_seven);
            }
        }
    }
});
