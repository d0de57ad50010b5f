//! This is the core module. It exports the cards, decks and hand ranking
//! that the equity simulation is built on. Nothing in here knows about
//! opponents or trials.

/// card.rs has value and suit, and the two character card codec.
mod card;
/// Re-export Card, Value, and Suit
pub use self::card::{Card, Suit, Value};

/// The error type shared by the whole crate.
mod error;
pub use self::error::EquityError;

/// 52 bit card sets.
mod card_bit_set;
pub use self::card_bit_set::{CardBitSet, CardBitSetIter};

/// Code related to cards in hands.
mod hand;
pub use self::hand::Hand;

/// We want to be able to iterate over five card hands.
mod card_iter;
pub use self::card_iter::CardIter;

/// Deck is the normal 52 card deck.
mod deck;
pub use self::deck::Deck;

/// Flattened deck used for sampling.
mod flat_deck;
pub use self::flat_deck::FlatDeck;

/// 5 to 7 card hand ranking code.
mod rank;
/// Export the evaluator, the trait and the results.
pub use self::rank::{Evaluator, HandCategory, HandRank, NUM_HAND_RANKS, Rankable};
