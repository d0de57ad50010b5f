//! Holdem Equity estimates how often a Texas hold'em hand wins.
//!
//! Given the hero's two hole cards, any known community cards, and the
//! number of players at the table, it deals out the unknown cards many
//! times at random and counts how the hero's best five card hand does
//! against every opponent.
//!
//! ```
//! use holdem_equity::holdem::evaluate_win_probability;
//!
//! let p = evaluate_win_probability(["As", "Ah"], &[], 2, 20_000).unwrap();
//! assert!(p.win_rate > 80.0 && p.win_rate < 90.0);
//! ```

/// Cards, decks and hand ranking. Everything in core is agnostic to how
/// many players there are or how a trial is played.
pub mod core;
/// Allow all the holdem specific simulation code to be used externally.
pub mod holdem;
