use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use holdem_equity::core::EquityError;
use holdem_equity::holdem::{
    DEFAULT_NUM_SIMULATIONS, DEFAULT_PRECISION, EquityCalculator, EquityConfig, EquityReport,
    parse_cards,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "equity",
    about = "Estimate the win probability of a hold'em hand",
    long_about = "Deal out the unknown cards many times at random and report how often \n\
                  the hero's hand wins, ties, or loses against random opponents."
)]
struct Args {
    /// The hero's two hole cards (e.g. "As" "Kd")
    #[arg(num_args = 2, required = true)]
    hero: Vec<String>,

    /// Known community cards, up to five (e.g. "Qs" "Jh" "9d")
    #[arg(short, long, num_args = 0..=5)]
    board: Vec<String>,

    /// Players at the table, hero included
    #[arg(short = 'p', long, default_value_t = 2)]
    players: usize,

    /// Number of simulations to run
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_SIMULATIONS)]
    simulations: usize,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads. Defaults to one per core.
    #[arg(long)]
    workers: Option<usize>,

    /// Stop after this many milliseconds and report what finished
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Decimal digits in the reported percentages
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    precision: u32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// More logging. Repeat for trace output. Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn init_tracing(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    fn config(&self) -> EquityConfig {
        EquityConfig {
            num_players: self.players,
            num_simulations: self.simulations,
            seed: self.seed,
            workers: self.workers,
            timeout_ms: self.timeout_ms,
            precision: self.precision,
        }
    }
}

fn run(args: &Args) -> Result<EquityReport, EquityError> {
    let hero = parse_cards(&args.hero)?;
    let board = parse_cards(&args.board)?;
    let report = EquityCalculator::with_config(args.config())
        .hero(&hero)
        .board(&board)
        .run()?;
    if report.tally.completed() == 0 {
        return Err(EquityError::NoTrialsCompleted);
    }
    Ok(report)
}

fn print_report(args: &Args, report: &EquityReport) {
    let s = &report.summary;
    println!("Hero:    {}", args.hero.join(" "));
    if !args.board.is_empty() {
        println!("Board:   {}", args.board.join(" "));
    }
    println!("Players: {}", args.players);
    if let Some(seed) = report.seed {
        println!("Seed:    {seed}");
    }
    println!();
    println!("Results:");
    println!("========");
    println!("Trials:  {} of {}", s.trials, report.tally.requested);
    println!("Win:     {:.*}%", args.precision as usize, s.win_rate);
    println!("Tie:     {:.*}%", args.precision as usize, s.tie_rate);
    println!("Loss:    {:.*}%", args.precision as usize, s.loss_rate);
    println!("Equity:  {:.*}%", args.precision as usize, s.equity);
}

fn main() -> ExitCode {
    let args = Args::parse();
    args.init_tracing();

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if report.tally.completed() < report.tally.requested {
        tracing::warn!(
            completed = report.tally.completed(),
            requested = report.tally.requested,
            timeout = ?args.timeout_ms.map(Duration::from_millis),
            "Stopped before every trial finished"
        );
    }

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: unable to serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&args, &report);
    }
    ExitCode::SUCCESS
}
