//! Summary statistics over the sessions of a run.

use crate::SimulationResult;
use serde::Serialize;

/// Aggregate view of a run: the distribution of final bankrolls and the hand tallies summed over
/// every session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankrollStats {
    pub sessions: usize,
    pub mean_final_bankroll: f64,
    pub median_final_bankroll: f64,
    pub min_final_bankroll: f64,
    pub max_final_bankroll: f64,
    pub std_dev_final_bankroll: f64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub total_pushes: u64,
    pub total_hands: u64,
    pub player_blackjacks: u64,
    pub early_endings: u64,
}

impl BankrollStats {
    /// Returns `None` when there are no results to summarize.
    pub fn from_results(results: &[SimulationResult]) -> Option<BankrollStats> {
        if results.is_empty() {
            return None;
        }

        let mut bankrolls: Vec<f64> = results.iter().map(|r| r.final_bankroll as f64).collect();
        bankrolls.sort_by(|a, b| a.total_cmp(b));

        let n = bankrolls.len();
        let mean = bankrolls.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (bankrolls[n / 2 - 1] + bankrolls[n / 2]) / 2.0
        } else {
            bankrolls[n / 2]
        };
        let variance = bankrolls.iter().map(|b| (b - mean).powi(2)).sum::<f64>() / n as f64;

        let sum = |f: fn(&SimulationResult) -> u64| results.iter().map(f).sum::<u64>();

        Some(BankrollStats {
            sessions: n,
            mean_final_bankroll: mean,
            median_final_bankroll: median,
            min_final_bankroll: bankrolls[0],
            max_final_bankroll: bankrolls[n - 1],
            std_dev_final_bankroll: variance.sqrt(),
            total_wins: sum(|r| r.wins as u64),
            total_losses: sum(|r| r.losses as u64),
            total_pushes: sum(|r| r.pushes as u64),
            total_hands: sum(|r| r.hands_played as u64),
            player_blackjacks: sum(|r| r.player_blackjacks as u64),
            early_endings: sum(|r| r.ended_early as u64),
        })
    }

    /// Average amount won per hand played, negative when the house is ahead.
    pub fn average_winnings_per_hand(&self, initial_balance: f32) -> f64 {
        if self.total_hands == 0 {
            return 0.0;
        }
        let total_winnings = (self.mean_final_bankroll - initial_balance as f64) * self.sessions as f64;
        total_winnings / self.total_hands as f64
    }
}

/// One bar of the final bankroll frequency distribution, covering `[lower, upper)`. The last bin
/// also includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Sorts the final bankrolls into `bins` equal width bins spanning the smallest to the largest
/// value. When every session ended on the same bankroll there is a single bin.
pub fn histogram(results: &[SimulationResult], bins: usize) -> Vec<HistogramBin> {
    if results.is_empty() || bins == 0 {
        return vec![];
    }

    let values: Vec<f64> = results.iter().map(|r| r.final_bankroll as f64).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        histogram[idx].count += 1;
    }
    histogram
}
