use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{event, trace_span};

use crate::core::{Card, EquityError};

use super::{
    CancelToken, DEFAULT_PRECISION, EquitySummary, MonteCarloGame, SimulationTally,
    StopCondition, WinProbability,
};

/// Trials simulated when the caller doesn't say.
pub const DEFAULT_NUM_SIMULATIONS: usize = 10_000;
/// Fewest players at the table, hero included.
pub const MIN_PLAYERS: usize = 2;
/// Most players at the table, hero included.
pub const MAX_PLAYERS: usize = 10;
/// Trials per independently seeded batch.
///
/// Work is split into batches of this size no matter how many threads
/// run them, so a seeded run gives the same tally on any machine.
pub const BATCH_SIZE: u64 = 1_024;

/// Tunables for an equity run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EquityConfig {
    /// Players at the table, hero included.
    pub num_players: usize,
    pub num_simulations: usize,
    /// Seed for a reproducible run. A random seed is picked when unset.
    pub seed: Option<u64>,
    /// Size of a dedicated thread pool. The global rayon pool is used
    /// when unset.
    pub workers: Option<usize>,
    /// Stop early after this many milliseconds.
    pub timeout_ms: Option<u64>,
    /// Decimal digits kept in the reported percentages.
    pub precision: u32,
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            num_players: MIN_PLAYERS,
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            seed: None,
            workers: None,
            timeout_ms: None,
            precision: DEFAULT_PRECISION,
        }
    }
}

/// The outcome of an equity run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EquityReport {
    pub summary: EquitySummary,
    pub tally: SimulationTally,
    /// The seed the run's base seed was drawn from, when the run picked it.
    pub seed: Option<u64>,
}

/// # EquityCalculator
///
/// Builder for a parallel Monte Carlo equity run. Hero cards are
/// required; everything else has a default.
///
/// Trials are split into batches. Each batch gets its own `StdRng`,
/// seeded from one base seed and the batch index, and its own copy of
/// the deck. The batches run on a rayon pool and their tallies are
/// summed. Once the run is cancelled or times out no new batch starts.
///
/// ## Examples
///
/// ```
/// use holdem_equity::core::Card;
/// use holdem_equity::holdem::EquityCalculator;
///
/// let hero = ["As", "Ah"].map(|t| Card::parse(t).unwrap());
/// let report = EquityCalculator::default()
///     .hero(&hero)
///     .num_players(2)
///     .num_simulations(5_000)
///     .seed(420)
///     .run()
///     .unwrap();
///
/// assert!(report.summary.win_rate > 75.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EquityCalculator {
    hero: Vec<Card>,
    board: Vec<Card>,
    config: EquityConfig,
    cancel: Option<CancelToken>,
}

impl EquityCalculator {
    /// Start from a loaded config.
    pub fn with_config(config: EquityConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the hero's two hole cards.
    pub fn hero(mut self, cards: &[Card]) -> Self {
        self.hero = cards.to_vec();
        self
    }

    /// Set the known community cards, zero to five.
    pub fn board(mut self, cards: &[Card]) -> Self {
        self.board = cards.to_vec();
        self
    }

    pub fn num_players(mut self, num_players: usize) -> Self {
        self.config.num_players = num_players;
        self
    }

    pub fn num_simulations(mut self, num_simulations: usize) -> Self {
        self.config.num_simulations = num_simulations;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = Some(workers);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.config.precision = precision;
        self
    }

    /// Let another thread stop the run early.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &EquityConfig {
        &self.config
    }

    /// Run with the configured seed, or a fresh random one.
    pub fn run(&self) -> Result<EquityReport, EquityError> {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut report = self.run_with_rng(&mut rng)?;
        report.seed = Some(seed);
        Ok(report)
    }

    /// Run, drawing the base seed for every batch from `rng`.
    ///
    /// The configured seed is ignored. Two runs given identically seeded
    /// rngs produce identical tallies.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<EquityReport, EquityError> {
        let config = &self.config;
        if self.board.len() > 5 {
            return Err(EquityError::TooManyBoardCards(self.board.len()));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&config.num_players) {
            return Err(EquityError::InvalidPlayerCount(config.num_players));
        }
        if config.num_simulations == 0 {
            return Err(EquityError::InvalidSimulationCount);
        }
        let game = MonteCarloGame::new(&self.hero, &self.board, config.num_players)?;

        let mut stop = StopCondition::never();
        if let Some(token) = &self.cancel {
            stop = stop.with_token(token.clone());
        }
        if let Some(ms) = config.timeout_ms {
            stop = stop.with_timeout(Duration::from_millis(ms));
        }

        let plan = BatchPlan::new(config.num_simulations as u64, rng.random());
        let span = trace_span!("equity_run", batches = plan.num_batches());
        let _enter = span.enter();

        let mut tally = match config.workers.map(build_pool) {
            Some(Some(pool)) => pool.install(|| run_batches(&game, &plan, &stop)),
            _ => run_batches(&game, &plan, &stop),
        };
        // Batches skipped after a stop never report what they were asked for.
        tally.requested = plan.num_simulations;

        let summary = EquitySummary::from_tally(&tally, config.precision);
        event!(
            tracing::Level::DEBUG,
            completed = tally.completed(),
            requested = tally.requested,
            win_rate = summary.win_rate,
            tie_rate = summary.tie_rate,
            "Finished equity run"
        );

        Ok(EquityReport {
            summary,
            tally,
            seed: None,
        })
    }
}

/// How a run is cut into batches.
///
/// Nothing is materialized up front: the trial count and seed of a batch
/// are computed from its index, so the plan is the same no matter which
/// thread runs which batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BatchPlan {
    num_simulations: u64,
    base_seed: u64,
}

impl BatchPlan {
    fn new(num_simulations: u64, base_seed: u64) -> Self {
        Self {
            num_simulations,
            base_seed,
        }
    }

    fn num_batches(&self) -> u64 {
        self.num_simulations.div_ceil(BATCH_SIZE)
    }

    /// Trials in batch `index`. Only the last batch can be short.
    fn trials(&self, index: u64) -> u64 {
        (self.num_simulations - index * BATCH_SIZE).min(BATCH_SIZE)
    }

    /// `seed_from_u64` scrambles its input, so neighbouring seeds still
    /// give unrelated streams.
    fn seed(&self, index: u64) -> u64 {
        self.base_seed.wrapping_add(index)
    }
}

fn build_pool(workers: usize) -> Option<rayon::ThreadPool> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            event!(
                tracing::Level::WARN,
                workers,
                error = %e,
                "Unable to build a thread pool, using the global pool"
            );
            None
        }
    }
}

fn run_batches(
    game: &MonteCarloGame,
    plan: &BatchPlan,
    stop: &StopCondition,
) -> SimulationTally {
    (0..plan.num_batches())
        .into_par_iter()
        .map(|index| {
            if stop.should_stop() {
                return None;
            }
            let seed = plan.seed(index);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut deck = game.working_deck();
            let tally = game.run_on(&mut deck, plan.trials(index), &mut rng, stop);
            event!(
                tracing::Level::TRACE,
                index,
                seed,
                completed = tally.completed(),
                "Batch done"
            );
            Some(tally)
        })
        .while_some()
        .reduce(SimulationTally::default, |a, b| a + b)
}

/// Estimate how often `hero` wins against `num_players - 1` random hands.
///
/// `hero` and `board` are two character card tokens like `"As"` or
/// `"Td"`. `num_players` counts the hero and must be between 2 and 10.
///
/// Ties are reported separately from wins: `win_rate` only counts trials
/// where the hero's hand is strictly the best.
///
/// # Examples
///
/// ```
/// use holdem_equity::holdem::evaluate_win_probability;
///
/// let p = evaluate_win_probability(["As", "Ks"], &["Qs", "Js", "Ts"], 4, 2_000).unwrap();
/// assert_eq!(100.0, p.win_rate);
/// assert_eq!(0.0, p.tie_rate);
/// ```
pub fn evaluate_win_probability(
    hero: [&str; 2],
    board: &[&str],
    num_players: usize,
    num_simulations: usize,
) -> Result<WinProbability, EquityError> {
    let hero = parse_cards(&hero)?;
    let board = parse_cards(board)?;
    let report = EquityCalculator::default()
        .hero(&hero)
        .board(&board)
        .num_players(num_players)
        .num_simulations(num_simulations)
        .run()?;

    if report.tally.completed() == 0 {
        return Err(EquityError::NoTrialsCompleted);
    }
    Ok(report.summary.into())
}

/// Parse a list of card tokens, failing on the first bad one.
pub fn parse_cards<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Card>, EquityError> {
    tokens.iter().map(|t| Card::parse(t.as_ref())).collect()
}
