pub mod config;
pub mod game;
pub mod stats;
pub mod write;

pub use config::{ConfigError, SimulatorConfig, SimulatorConfigBuilder};
pub use game::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

pub mod prelude {
    pub use super::{
        config::{DoubleOption, ShuffleOption, SplitOption, SurrenderOption},
        game::prelude::*,
        run_session, session_rng, BlackjackSimulator, ConfigError, SimulationError,
        SimulationResult, SimulationRun, SimulatorConfig, SimulatorConfigBuilder,
    };
}

/// What happened to the bankroll over a single session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationResult {
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub final_bankroll: f32,
    pub hands_played: u32,
    pub player_blackjacks: u32,
    /// True when the bankroll ran out before the hand budget did.
    pub ended_early: bool,
}

/// The results of every session of a run, in session order, with the seed that reproduces them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    pub seed: u64,
    pub results: Vec<SimulationResult>,
}

#[derive(thiserror::Error, Debug)]
pub enum SimulationError {
    #[error("session {session} failed: {source}")]
    GameError {
        session: usize,
        source: BlackjackGameError,
    },
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error("unable to send session results: {0}")]
    SendingError(String),
    #[error("simulation worker #{0} panicked")]
    WorkerPanicked(usize),
    #[error("only {received} of {expected} sessions reported a result")]
    IncompleteRun { expected: usize, received: usize },
    #[error("unable to write results: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Random source for session number `index` of a run seeded with `seed`. Every session reads its
/// own ChaCha stream, so the cards a session sees depend only on the seed and its index.
pub fn session_rng(seed: u64, index: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index);
    rng
}

/// Plays one complete session under `config` with the heuristic strategy.
pub fn run_session<R: Rng>(
    config: &SimulatorConfig,
    rng: R,
) -> Result<SimulationResult, BlackjackGameError> {
    let strategy = HeuristicStrategy::new(config.double_option);
    BlackjackGameSim::from_config(config, strategy, rng).run()
}

/// Struct for running a number of independent sessions under one configuration.
/// Sessions are spread over `num_workers` threads, each session with its own shoe, bankroll and
/// random stream, and the results are gathered back in session order.
#[derive(Debug, Clone)]
pub struct BlackjackSimulator {
    config: SimulatorConfig,
}

impl BlackjackSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        BlackjackSimulator { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs every session. Uses the configured seed, or a random one when none is configured; the
    /// seed used is logged and returned with the results.
    pub fn run(&self) -> Result<SimulationRun, SimulationError> {
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
        self.run_with_seed(seed)
    }

    /// Runs every session from `seed`. The same seed always produces the same results, whatever
    /// the number of workers.
    pub fn run_with_seed(&self, seed: u64) -> Result<SimulationRun, SimulationError> {
        let num_sessions = self.config.num_simulations as usize;
        let num_workers = self.config.num_workers.clamp(1, num_sessions.max(1));
        log::info!(
            "running {} sessions of up to {} hands on {} workers (seed {})",
            num_sessions,
            self.config.num_hands_per_session,
            num_workers,
            seed
        );
        let start = Instant::now();

        // Open channel
        let (result_sender, result_receiver) =
            mpsc::channel::<(usize, Result<SimulationResult, BlackjackGameError>)>();
        let abort = AtomicBool::new(false);
        let config = &self.config;

        let results = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(num_workers);
            for worker in 0..num_workers {
                let sender = result_sender.clone();
                let abort = &abort;
                handles.push(scope.spawn(move || -> Result<(), SimulationError> {
                    for session in (worker..num_sessions).step_by(num_workers) {
                        if abort.load(Ordering::Relaxed) {
                            break;
                        }
                        let result = run_session(config, session_rng(seed, session as u64));
                        if result.is_err() {
                            abort.store(true, Ordering::Relaxed);
                        }
                        sender
                            .send((session, result))
                            .map_err(|e| SimulationError::SendingError(e.to_string()))?;
                    }
                    Ok(())
                }));
            }
            // Only the workers hold senders now, the receiver finishes once they are all done
            drop(result_sender);

            let mut results: Vec<Option<SimulationResult>> = vec![None; num_sessions];
            let mut first_error: Option<SimulationError> = None;
            for (session, result) in result_receiver {
                match result {
                    Ok(summary) => {
                        log::debug!(
                            "session #{}: {} hands, final bankroll {:.2}",
                            session + 1,
                            summary.hands_played,
                            summary.final_bankroll
                        );
                        results[session] = Some(summary);
                    }
                    Err(source) => {
                        log::error!("session #{} failed: {}", session + 1, source);
                        first_error.get_or_insert(SimulationError::GameError { session, source });
                    }
                }
            }

            for (worker, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        log::error!("simulation worker #{} panicked", worker);
                        first_error.get_or_insert(SimulationError::WorkerPanicked(worker));
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(results),
            }
        })?;

        let received = results.iter().filter(|r| r.is_some()).count();
        let results = results
            .into_iter()
            .collect::<Option<Vec<SimulationResult>>>()
            .ok_or(SimulationError::IncompleteRun {
                expected: num_sessions,
                received,
            })?;

        log::info!(
            "finished {} sessions in {:.2?}",
            results.len(),
            start.elapsed()
        );
        Ok(SimulationRun { seed, results })
    }
}
