use rand::Rng;
use tracing::event;

use crate::core::{Card, Deck, EquityError, Evaluator, FlatDeck, HandRank};

use super::{SimulationTally, StopCondition, TrialOutcome};

/// How many trials run between checks of the stop condition.
pub const CHECK_INTERVAL: u64 = 256;

/// Number of community cards in a finished board.
const BOARD_SIZE: usize = 5;

/// Everything known about one hero hand before the simulation starts.
///
/// The base deck has the hero's hole cards and the known board removed
/// once, here. Trials never touch it: each trial draws from a working
/// `FlatDeck` owned by whoever is running the trial.
#[derive(Debug, Clone)]
pub struct MonteCarloGame {
    hero: [Card; 2],
    board: Vec<Card>,
    num_players: usize,
    deck: Deck,
}

impl MonteCarloGame {
    /// Set up a game for `hero` against `num_players - 1` random hands.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdem_equity::core::Card;
    /// use holdem_equity::holdem::MonteCarloGame;
    ///
    /// let hero = [Card::parse("As").unwrap(), Card::parse("Ad").unwrap()];
    /// let game = MonteCarloGame::new(&hero, &[], 3).unwrap();
    ///
    /// // Two opponents need four hole cards and the board needs five.
    /// assert_eq!(9, game.cards_needed());
    /// ```
    pub fn new(hero: &[Card], board: &[Card], num_players: usize) -> Result<Self, EquityError> {
        let hero: [Card; 2] = hero
            .try_into()
            .map_err(|_| EquityError::InvalidHoleCards(hero.len()))?;
        if board.len() > BOARD_SIZE {
            return Err(EquityError::TooManyBoardCards(board.len()));
        }
        if num_players < 2 {
            return Err(EquityError::InvalidPlayerCount(num_players));
        }

        let mut deck = Deck::new();
        deck.remove(hero.iter().chain(board).copied())?;

        // Build the rank tables before any trial runs.
        Evaluator::shared();

        let game = Self {
            hero,
            board: board.to_vec(),
            num_players,
            deck,
        };

        let requested = game.cards_needed();
        if requested > deck.len() {
            return Err(EquityError::DeckExhausted {
                requested,
                remaining: deck.len(),
            });
        }

        event!(
            tracing::Level::DEBUG,
            hero = %format_cards(&game.hero),
            board = %format_cards(&game.board),
            num_players,
            remaining = deck.len(),
            "Created monte carlo game"
        );
        Ok(game)
    }

    /// The deck with the hero's cards and the known board removed.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Cards dealt per trial: two for every opponent plus the rest of the
    /// board.
    pub fn cards_needed(&self) -> usize {
        self.opponent_cards() + self.board_needed()
    }

    fn opponent_cards(&self) -> usize {
        2 * (self.num_players - 1)
    }

    fn board_needed(&self) -> usize {
        BOARD_SIZE - self.board.len()
    }

    /// A fresh working copy of the base deck for a worker to draw from.
    pub fn working_deck(&self) -> FlatDeck {
        self.deck.into()
    }

    /// Deal one trial's unknown cards: every opponent's hole cards, two
    /// at a time, then the rest of the board.
    ///
    /// `deck` must be a working copy of this game's deck. Its order is
    /// shuffled as a side effect, which doesn't matter to later trials
    /// since every draw is a fresh uniform sample.
    pub fn deal<'d, R: Rng>(
        &self,
        deck: &'d mut FlatDeck,
        rng: &mut R,
    ) -> (&'d [Card], &'d [Card]) {
        deck.draw(self.cards_needed(), rng).split_at(self.opponent_cards())
    }

    /// Play out one trial.
    pub fn simulate<R: Rng>(&self, deck: &mut FlatDeck, rng: &mut R) -> TrialOutcome {
        let (opponents, runout) = self.deal(deck, rng);

        // Hole cards go in the first two slots, the full board after.
        let mut seven = [self.hero[0]; 7];
        seven[..2].copy_from_slice(&self.hero);
        seven[2..2 + self.board.len()].copy_from_slice(&self.board);
        seven[2 + self.board.len()..].copy_from_slice(runout);

        let evaluator = Evaluator::shared();
        let hero_rank = evaluator.rank_best(&seven);

        let mut best = HandRank::WORST;
        let mut sharing = 0;
        for hole in opponents.chunks_exact(2) {
            seven[..2].copy_from_slice(hole);
            let rank = evaluator.rank_best(&seven);
            if rank.beats(best) {
                best = rank;
                sharing = 1;
            } else if rank == best {
                sharing += 1;
            }
        }

        if hero_rank.beats(best) {
            TrialOutcome::Win
        } else if hero_rank == best {
            TrialOutcome::Tie { ways: sharing + 1 }
        } else {
            TrialOutcome::Loss
        }
    }

    /// Run `num_simulations` trials on the calling thread.
    ///
    /// Given the same seeded rng this always produces the same tally.
    pub fn run<R: Rng>(&self, num_simulations: u64, rng: &mut R) -> SimulationTally {
        let mut deck = self.working_deck();
        self.run_on(&mut deck, num_simulations, rng, &StopCondition::never())
    }

    /// Run up to `num_simulations` trials with a caller supplied working
    /// deck, checking `stop` every `CHECK_INTERVAL` trials.
    ///
    /// The returned tally covers only the trials that finished.
    pub fn run_on<R: Rng>(
        &self,
        deck: &mut FlatDeck,
        num_simulations: u64,
        rng: &mut R,
        stop: &StopCondition,
    ) -> SimulationTally {
        let mut tally = SimulationTally::new(num_simulations);
        for trial in 0..num_simulations {
            if trial % CHECK_INTERVAL == 0 && stop.should_stop() {
                event!(
                    tracing::Level::DEBUG,
                    completed = trial,
                    requested = num_simulations,
                    "Stopping trials early"
                );
                break;
            }
            tally.record(self.simulate(deck, rng));
        }
        tally
    }
}

fn format_cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::core::Hand;
    use crate::holdem::CancelToken;

    fn cards(s: &str) -> Vec<Card> {
        Hand::new_from_str(s).unwrap().iter().collect()
    }

    #[test]
    fn test_new_validation() {
        let hero = cards("AsAh");
        assert_eq!(
            Err(EquityError::InvalidHoleCards(1)),
            MonteCarloGame::new(&hero[..1], &[], 2).map(|_| ())
        );
        assert_eq!(
            Err(EquityError::TooManyBoardCards(6)),
            MonteCarloGame::new(&hero, &cards("2c3c4c5c6c7c"), 2).map(|_| ())
        );
        assert_eq!(
            Err(EquityError::InvalidPlayerCount(1)),
            MonteCarloGame::new(&hero, &[], 1).map(|_| ())
        );
        let ace = Card::parse("As").unwrap();
        assert_eq!(
            Err(EquityError::DuplicateOrUnavailableCard(ace)),
            MonteCarloGame::new(&hero, &[ace], 2).map(|_| ())
        );
    }

    #[test]
    fn test_deck_exhausted() {
        let hero = cards("AsAh");
        // 23 opponents need 46 cards, plus the turn and river, but only
        // 47 cards are left after the flop.
        let board = cards("2c3c4d");
        assert_eq!(
            Err(EquityError::DeckExhausted {
                requested: 48,
                remaining: 47
            }),
            MonteCarloGame::new(&hero, &board, 24).map(|_| ())
        );
        // Exactly enough cards is fine.
        assert!(MonteCarloGame::new(&hero, &board, 23).is_ok());
    }

    #[test]
    fn test_base_deck() {
        let hero = cards("AsAh");
        let board = cards("Kd7c2s");
        let game = MonteCarloGame::new(&hero, &board, 4).unwrap();
        assert_eq!(47, game.deck().len());
        for card in hero.iter().chain(&board) {
            assert!(!game.deck().contains(card));
        }
        assert_eq!(6 + 2, game.cards_needed());
    }

    #[test]
    fn test_deal_never_repeats_cards() {
        let hero = cards("KsKd");
        let board = cards("Qh");
        let game = MonteCarloGame::new(&hero, &board, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let mut deck = game.working_deck();
        for _ in 0..500 {
            let (opponents, runout) = game.deal(&mut deck, &mut rng);
            assert_eq!(10, opponents.len());
            assert_eq!(4, runout.len());

            let mut seen = Hand::new_with_cards(hero.iter().chain(&board).copied()).unwrap();
            for &card in opponents.iter().chain(runout) {
                assert!(seen.insert(card), "{card} dealt twice");
            }
            assert_eq!(2 + 1 + 10 + 4, seen.count());
        }
        assert_eq!(game.deck().len(), deck.len());
    }

    #[test]
    fn test_nuts_never_loses() {
        // Royal flush on the board for the hero; nobody can beat it.
        let hero = cards("AsKs");
        let board = cards("QsJsTs2d3c");
        let game = MonteCarloGame::new(&hero, &board, 9).unwrap();
        let tally = game.run(2_000, &mut StdRng::seed_from_u64(1));
        assert_eq!(2_000, tally.wins);
    }

    #[test]
    fn test_board_plays_always_ties() {
        // Royal flush on the board. Everyone plays the board.
        let hero = cards("2c3d");
        let board = cards("AsKsQsJsTs");
        let game = MonteCarloGame::new(&hero, &board, 3).unwrap();
        let tally = game.run(1_000, &mut StdRng::seed_from_u64(2));
        assert_eq!(0, tally.wins);
        assert_eq!(0, tally.losses);
        assert_eq!(1_000, tally.ties[3]);
    }

    #[test]
    fn test_full_board_only_deals_opponents() {
        let hero = cards("AhKh");
        let board = cards("2c7d9sJcQh");
        let game = MonteCarloGame::new(&hero, &board, 2).unwrap();
        assert_eq!(2, game.cards_needed());

        let tally = game.run(5_000, &mut StdRng::seed_from_u64(3));
        assert_eq!(5_000, tally.completed());
        // Ace high on a dry board loses to any pair, so it's far from
        // always winning but the result is a mix.
        assert!(tally.wins > 0);
        assert!(tally.losses > 0);
    }

    #[test]
    fn test_seeded_run_is_deterministic() {
        let hero = cards("Th9h");
        let game = MonteCarloGame::new(&hero, &cards("8h2c"), 4).unwrap();
        let one = game.run(3_000, &mut StdRng::seed_from_u64(42));
        let two = game.run(3_000, &mut StdRng::seed_from_u64(42));
        assert_eq!(one, two);
        assert_eq!(3_000, one.completed());
    }

    #[test_log::test]
    fn test_cancelled_run_is_short() {
        let game = MonteCarloGame::new(&cards("QcQd"), &[], 2).unwrap();
        let token = CancelToken::new();
        token.cancel();
        let stop = StopCondition::never().with_token(token);
        let mut deck = game.working_deck();
        let tally = game.run_on(&mut deck, 10_000, &mut StdRng::seed_from_u64(4), &stop);
        assert_eq!(10_000, tally.requested);
        assert_eq!(0, tally.completed());
        assert!(!tally.is_complete());
    }
}
