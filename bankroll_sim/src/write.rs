use crate::stats::{histogram, BankrollStats, HistogramBin};
use crate::{SimulationRun, SimulatorConfig};
use serde::Serialize;
use std::io::Write;

const WIDTH: usize = 80;
const TEXT_WIDTH: usize = "number of player blackjacks".len() + 20;
const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
const BAR_WIDTH: usize = 40;

/// Everything worth reporting about a run, in a form that serializes straight to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub config: SimulatorConfig,
    pub seed: u64,
    pub stats: BankrollStats,
    pub histogram: Vec<HistogramBin>,
}

impl SimulationReport {
    /// Summarizes `run`, returns `None` if it holds no sessions.
    pub fn new(config: &SimulatorConfig, run: &SimulationRun, bins: usize) -> Option<Self> {
        let stats = BankrollStats::from_results(&run.results)?;
        Some(SimulationReport {
            config: config.clone(),
            seed: run.seed,
            stats,
            histogram: histogram(&run.results, bins),
        })
    }
}

/// A public function to write the summary of a run, i.e. the `BankrollStats` of the run, to a writer
pub fn write_summary(mut writer: impl Write, report: &SimulationReport) -> std::io::Result<()> {
    let config = &report.config;
    let stats = &report.stats;
    let total_hands = stats.total_hands.max(1) as f64;

    writeln!(writer, "{}", "-".repeat(WIDTH))?;
    writeln!(writer, "{:-^WIDTH$}", " simulation results ")?;
    writeln!(writer, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "number of simulations", stats.sessions)?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
        "hands per session", config.num_hands_per_session
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
        "initial balance", config.initial_balance
    )?;
    writeln!(writer, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}", "bet amount", config.bet_amount)?;
    writeln!(writer, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "seed", report.seed)?;
    writeln!(writer, "{}", "-".repeat(WIDTH))?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
        "average final balance", stats.mean_final_bankroll
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
        "median final balance", stats.median_final_bankroll
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
        "minimum final balance", stats.min_final_bankroll
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
        "maximum final balance", stats.max_final_bankroll
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}",
        "standard deviation", stats.std_dev_final_bankroll
    )?;
    writeln!(writer, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "hands won", stats.total_wins)?;
    writeln!(writer, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "hands pushed", stats.total_pushes)?;
    writeln!(writer, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "hands lost", stats.total_losses)?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
        "number of player blackjacks", stats.player_blackjacks
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
        "number of early endings", stats.early_endings
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.4}",
        "win percentage",
        stats.total_wins as f64 / total_hands
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.4}",
        "loss percentage",
        stats.total_losses as f64 / total_hands
    )?;
    writeln!(
        writer,
        "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.4}",
        "average winnings per hand",
        stats.average_winnings_per_hand(config.initial_balance)
    )?;
    writeln!(writer, "{}", "-".repeat(WIDTH))?;
    Ok(())
}

/// Writes the distribution of final balances as a horizontal bar chart.
pub fn write_histogram(mut writer: impl Write, bins: &[HistogramBin]) -> std::io::Result<()> {
    let most = bins.iter().map(|b| b.count).max().unwrap_or(0);
    writeln!(writer, "{:-^WIDTH$}", " distribution of final balances ")?;
    for bin in bins {
        let bar = if most == 0 {
            0
        } else {
            (bin.count * BAR_WIDTH + most - 1) / most
        };
        writeln!(
            writer,
            "{:>10.2} .. {:>10.2} {:>8} {}",
            bin.lower,
            bin.upper,
            bin.count,
            "#".repeat(bar)
        )?;
    }
    writeln!(writer, "{}", "-".repeat(WIDTH))?;
    Ok(())
}

/// Writes `report` as pretty printed JSON.
pub fn write_json(mut writer: impl Write, report: &SimulationReport) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}
