use std::ops::{Add, AddAssign};

/// How a single trial ended for the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrialOutcome {
    /// The hero's hand was strictly better than every opponent.
    Win,
    /// The hero shared the best hand. `ways` counts every hand in the
    /// split, the hero included, so it is always at least 2.
    Tie { ways: usize },
    /// Some opponent had a strictly better hand.
    Loss,
}

/// Running counts of trial outcomes.
///
/// Individual trials are never kept. Tallies from different workers are
/// combined with `+`.
///
/// Ties are counted separately from wins and bucketed by how many hands
/// split the pot, so both the tie rate and split pot equity can be
/// reported.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationTally {
    /// How many trials were asked for.
    pub requested: u64,
    pub wins: u64,
    pub losses: u64,
    /// `ties[ways]` is the number of trials split `ways` ways.
    pub ties: Vec<u64>,
}

impl SimulationTally {
    pub fn new(requested: u64) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: TrialOutcome) {
        match outcome {
            TrialOutcome::Win => self.wins += 1,
            TrialOutcome::Loss => self.losses += 1,
            TrialOutcome::Tie { ways } => {
                if self.ties.len() <= ways {
                    self.ties.resize(ways + 1, 0);
                }
                self.ties[ways] += 1;
            }
        }
    }

    /// Total number of tied trials, regardless of how many ways.
    pub fn tie_count(&self) -> u64 {
        self.ties.iter().sum()
    }

    /// Number of trials that actually ran. This is less than `requested`
    /// when the simulation was stopped early.
    pub fn completed(&self) -> u64 {
        self.wins + self.losses + self.tie_count()
    }

    pub fn is_complete(&self) -> bool {
        self.completed() >= self.requested
    }

    /// Pots won, with each split pot credited as `1 / ways`.
    pub fn pot_share(&self) -> f64 {
        let split: f64 = self
            .ties
            .iter()
            .enumerate()
            .filter(|(ways, _)| *ways > 0)
            .map(|(ways, &count)| count as f64 / ways as f64)
            .sum();
        self.wins as f64 + split
    }
}

impl AddAssign for SimulationTally {
    fn add_assign(&mut self, rhs: Self) {
        self.requested += rhs.requested;
        self.wins += rhs.wins;
        self.losses += rhs.losses;
        if self.ties.len() < rhs.ties.len() {
            self.ties.resize(rhs.ties.len(), 0);
        }
        for (mine, theirs) in self.ties.iter_mut().zip(rhs.ties) {
            *mine += theirs;
        }
    }
}

impl Add for SimulationTally {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

/// Decimal digits kept when rounding percentages for display.
pub const DEFAULT_PRECISION: u32 = 2;

/// Percentages summarizing a tally.
///
/// `win_rate + tie_rate + loss_rate` is 100 up to rounding. `equity` is
/// the split pot aware share of the pot, also as a percentage.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EquitySummary {
    /// Trials the rates are computed over.
    pub trials: u64,
    pub win_rate: f64,
    pub tie_rate: f64,
    pub loss_rate: f64,
    pub equity: f64,
}

fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}

impl EquitySummary {
    /// Summarize over completed trials. A tally with no completed trials
    /// gives all zero rates.
    ///
    /// ```
    /// use holdem_equity::holdem::{EquitySummary, SimulationTally, TrialOutcome};
    ///
    /// let mut tally = SimulationTally::new(3);
    /// tally.record(TrialOutcome::Win);
    /// tally.record(TrialOutcome::Loss);
    /// tally.record(TrialOutcome::Tie { ways: 2 });
    ///
    /// let summary = EquitySummary::from_tally(&tally, 2);
    /// assert_eq!(33.33, summary.win_rate);
    /// assert_eq!(50.0, summary.equity);
    /// ```
    pub fn from_tally(tally: &SimulationTally, precision: u32) -> Self {
        let trials = tally.completed();
        if trials == 0 {
            return Self::default();
        }
        let pct = |count: f64| round_to(100.0 * count / trials as f64, precision);
        Self {
            trials,
            win_rate: pct(tally.wins as f64),
            tie_rate: pct(tally.tie_count() as f64),
            loss_rate: pct(tally.losses as f64),
            equity: pct(tally.pot_share()),
        }
    }
}

impl From<&SimulationTally> for EquitySummary {
    fn from(tally: &SimulationTally) -> Self {
        Self::from_tally(tally, DEFAULT_PRECISION)
    }
}

/// The answer handed back to a caller asking for a win probability.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinProbability {
    /// Percentage of trials the hero won outright.
    pub win_rate: f64,
    /// Percentage of trials the hero split the pot.
    pub tie_rate: f64,
}

impl From<EquitySummary> for WinProbability {
    fn from(summary: EquitySummary) -> Self {
        Self {
            win_rate: summary.win_rate,
            tie_rate: summary.tie_rate,
        }
    }
}
