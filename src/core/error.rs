use thiserror::Error;

use super::Card;

/// This is the core error type for the equity engine.
/// It uses `thiserror` to provide readable error messages.
///
/// Every variant is a validation failure raised while setting up a
/// simulation. Once a simulation starts the trial loop can't fail.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EquityError {
    #[error("Invalid card {0:?}: expected a rank from 23456789TJQKA followed by a suit from shdc")]
    InvalidCardFormat(String),
    #[error("Card {0} was supplied twice or is no longer in the deck")]
    DuplicateOrUnavailableCard(Card),
    #[error("Requested {requested} cards but only {remaining} remain in the deck")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Player count {0} is out of range")]
    InvalidPlayerCount(usize),
    #[error("Hero must hold exactly two hole cards, got {0}")]
    InvalidHoleCards(usize),
    #[error("At most five board cards can be known, got {0}")]
    TooManyBoardCards(usize),
    #[error("Hands must have between 5 and 7 cards to be ranked, got {0}")]
    InvalidHandSize(usize),
    #[error("The number of simulations must be greater than zero")]
    InvalidSimulationCount,
    #[error("The simulation was cancelled before any trial completed")]
    NoTrialsCompleted,
}
