/// Win, tie and loss counts and the percentages derived from them.
mod tally;
/// Export the tally and the summaries built from it
pub use self::tally::{
    DEFAULT_PRECISION, EquitySummary, SimulationTally, TrialOutcome, WinProbability,
};

/// Stopping a run from another thread or after a deadline.
mod cancel;
pub use self::cancel::{CancelToken, StopCondition};

/// Module for `MonteCarloGame` that holds the hero's hand, the known board,
/// and the deck left over for simulation.
mod monte_carlo_game;
/// Export `MonteCarloGame`
pub use self::monte_carlo_game::{CHECK_INTERVAL, MonteCarloGame};

/// Parallel equity runs and the simple string based entry point.
mod equity;
pub use self::equity::{
    BATCH_SIZE, DEFAULT_NUM_SIMULATIONS, EquityCalculator, EquityConfig, EquityReport,
    MAX_PLAYERS, MIN_PLAYERS, evaluate_win_probability, parse_cards,
};
