use bankroll_sim::config::{DoubleOption, ShuffleOption, SplitOption, SurrenderOption};
use bankroll_sim::write::{write_histogram, write_json, write_summary, SimulationReport};
use bankroll_sim::{BlackjackSimulator, SimulatorConfig, SimulatorConfigBuilder};
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Monte Carlo estimate of bankroll outcomes for a flat betting blackjack player.
#[derive(Parser, Debug)]
#[command(name = "bankroll_sim", version)]
struct Cli {
    /// JSON file with configuration values, command line options take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    num_decks: Option<usize>,
    /// every_hand or continuous
    #[arg(long)]
    shuffle_option: Option<ShuffleOption>,
    /// Cards left in a continuously dealt shoe before it is replaced
    #[arg(long)]
    penetration_threshold: Option<usize>,
    /// any, ten_or_eleven, eleven_only or none
    #[arg(long)]
    double_option: Option<DoubleOption>,
    /// Only none is supported
    #[arg(long)]
    split_option: Option<SplitOption>,
    /// Only none is supported
    #[arg(long)]
    surrender_option: Option<SurrenderOption>,
    #[arg(long)]
    surrender_return: Option<f32>,
    /// Dealer stands on soft 17 instead of hitting it
    #[arg(long)]
    stand_soft_17: bool,
    #[arg(long)]
    blackjack_payout: Option<f32>,
    #[arg(short = 'n', long)]
    num_simulations: Option<u32>,
    #[arg(long)]
    num_hands_per_session: Option<u32>,
    #[arg(long)]
    initial_balance: Option<f32>,
    #[arg(long)]
    bet_amount: Option<f32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Number of worker threads, defaults to the number of CPUs
    #[arg(short = 'j', long)]
    workers: Option<usize>,
    /// Number of bins in the distribution of final balances
    #[arg(long, default_value_t = 20)]
    bins: usize,
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, builder: &mut SimulatorConfigBuilder) {
        if let Some(decks) = self.num_decks {
            builder.num_decks(decks);
        }
        if let Some(option) = self.shuffle_option {
            builder.shuffle_option(option);
        }
        if let Some(cards) = self.penetration_threshold {
            builder.penetration_threshold(cards);
        }
        if let Some(option) = self.double_option {
            builder.double_option(option);
        }
        if let Some(option) = self.split_option {
            builder.split_option(option);
        }
        if let Some(option) = self.surrender_option {
            builder.surrender_option(option);
        }
        if let Some(fraction) = self.surrender_return {
            builder.surrender_return(fraction);
        }
        if self.stand_soft_17 {
            builder.dealer_hits_soft_17(false);
        }
        if let Some(payout) = self.blackjack_payout {
            builder.blackjack_payout(payout);
        }
        if let Some(n) = self.num_simulations {
            builder.num_simulations(n);
        }
        if let Some(hands) = self.num_hands_per_session {
            builder.num_hands_per_session(hands);
        }
        if let Some(balance) = self.initial_balance {
            builder.initial_balance(balance);
        }
        if let Some(bet) = self.bet_amount {
            builder.bet_amount(bet);
        }
        if let Some(seed) = self.seed {
            builder.seed(seed);
        }
        if let Some(workers) = self.workers {
            builder.num_workers(workers);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut builder = match &cli.config {
        Some(path) => match SimulatorConfig::from_json_file(path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => SimulatorConfig::new(),
    };
    cli.apply(&mut builder);

    let config = match builder.build() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let simulator = BlackjackSimulator::new(config);
    let run = match simulator.run() {
        Ok(run) => run,
        Err(e) => {
            log::error!("simulation aborted: {e}");
            std::process::exit(1);
        }
    };

    let Some(report) = SimulationReport::new(simulator.config(), &run, cli.bins) else {
        eprintln!("error: no sessions were simulated");
        std::process::exit(1);
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = if cli.json {
        write_json(&mut out, &report)
    } else {
        write_summary(&mut out, &report).and_then(|_| write_histogram(&mut out, &report.histogram))
    };
    if let Err(e) = written.and_then(|_| out.flush()) {
        eprintln!("error: unable to write results: {e}");
        std::process::exit(1);
    }
}
