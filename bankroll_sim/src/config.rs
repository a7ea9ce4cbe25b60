//! Configuration of a simulation run.
//!
//! A `SimulatorConfig` is only ever produced by `SimulatorConfigBuilder::build`, which fills in
//! defaults and validates every field, so the rest of the crate can take a `&SimulatorConfig` and
//! trust what it reads.

use blackjack_lib::CARDS_PER_DECK;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Smallest number of undealt cards the continuous shuffle may run down to before a new shoe is
/// brought in. No single hand can use this many cards.
pub const MIN_PENETRATION_THRESHOLD: usize = 20;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("{option} = {value} is not implemented by the simulator, use 'none'")]
    Unsupported {
        option: &'static str,
        value: String,
    },
    #[error("unrecognized value '{value}' for {option}")]
    UnknownOption {
        option: &'static str,
        value: String,
    },
    #[error("unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// When the table replaces its shoe with a freshly shuffled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleOption {
    /// A brand new shuffled shoe before every hand.
    EveryHand,
    /// Keep dealing from the same shoe until it runs below the penetration threshold.
    Continuous,
}

/// Which two card totals the player is allowed to double down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoubleOption {
    Any,
    TenOrEleven,
    ElevenOnly,
    None,
}

impl DoubleOption {
    pub fn allows(&self, total: u8) -> bool {
        match self {
            DoubleOption::Any => true,
            DoubleOption::TenOrEleven => total == 10 || total == 11,
            DoubleOption::ElevenOnly => total == 11,
            DoubleOption::None => false,
        }
    }
}

/// Splitting is declared so configurations written for other simulators can be read, but only
/// `None` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitOption {
    None,
    Any,
}

/// Like `SplitOption`, only `None` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurrenderOption {
    None,
    Early,
    Late,
}

macro_rules! option_names {
    ($ty:ident, $option:literal, $($variant:ident => $name:literal),+ $(,)?) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(ConfigError::UnknownOption {
                        option: $option,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

option_names!(ShuffleOption, "shuffle_option", EveryHand => "every_hand", Continuous => "continuous");
option_names!(
    DoubleOption,
    "double_option",
    Any => "any",
    TenOrEleven => "ten_or_eleven",
    ElevenOnly => "eleven_only",
    None => "none",
);
option_names!(SplitOption, "split_option", None => "none", Any => "any");
option_names!(
    SurrenderOption,
    "surrender_option",
    None => "none",
    Early => "early",
    Late => "late",
);

/// Validated configuration for a `BlackjackSimulator`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatorConfig {
    pub num_decks: usize,
    pub shuffle_option: ShuffleOption,
    pub penetration_threshold: usize,
    pub double_option: DoubleOption,
    pub split_option: SplitOption,
    pub surrender_option: SurrenderOption,
    /// Fraction of the bet returned on surrender. Accepted and reported, but has no effect while
    /// surrender is unsupported.
    pub surrender_return: f32,
    pub dealer_hits_soft_17: bool,
    pub blackjack_payout: f32,
    pub num_simulations: u32,
    pub num_hands_per_session: u32,
    pub initial_balance: f32,
    pub bet_amount: f32,
    pub seed: Option<u64>,
    pub num_workers: usize,
}

impl SimulatorConfig {
    /// Associated method for returning a new `SimulatorConfigBuilder` object. Every option starts
    /// out unset and falls back to its default when `build()` is called.
    pub fn new() -> SimulatorConfigBuilder {
        SimulatorConfigBuilder::default()
    }

    /// Reads a JSON configuration file into a builder, so command line options can still be
    /// layered on top before building.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<SimulatorConfigBuilder, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let file: SimulatorConfigFile = serde_json::from_str(&contents)?;
        Ok(SimulatorConfigBuilder::from(file))
    }

    /// Total number of cards in a freshly built shoe.
    pub fn shoe_size(&self) -> usize {
        CARDS_PER_DECK * self.num_decks
    }
}

/// Serialized form of the configuration, every field optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfigFile {
    pub num_decks: Option<usize>,
    pub shuffle_option: Option<ShuffleOption>,
    pub penetration_threshold: Option<usize>,
    pub double_option: Option<DoubleOption>,
    pub split_option: Option<SplitOption>,
    pub surrender_option: Option<SurrenderOption>,
    pub surrender_return: Option<f32>,
    pub dealer_hits_soft_17: Option<bool>,
    pub blackjack_payout: Option<f32>,
    pub num_simulations: Option<u32>,
    pub num_hands_per_session: Option<u32>,
    pub initial_balance: Option<f32>,
    pub bet_amount: Option<f32>,
    pub seed: Option<u64>,
    pub num_workers: Option<usize>,
}

/// Struct to implement builder pattern for `SimulatorConfig`
#[derive(Debug, Default, Clone)]
pub struct SimulatorConfigBuilder {
    num_decks: Option<usize>,
    shuffle_option: Option<ShuffleOption>,
    penetration_threshold: Option<usize>,
    double_option: Option<DoubleOption>,
    split_option: Option<SplitOption>,
    surrender_option: Option<SurrenderOption>,
    surrender_return: Option<f32>,
    dealer_hits_soft_17: Option<bool>,
    blackjack_payout: Option<f32>,
    num_simulations: Option<u32>,
    num_hands_per_session: Option<u32>,
    initial_balance: Option<f32>,
    bet_amount: Option<f32>,
    seed: Option<u64>,
    num_workers: Option<usize>,
}

impl From<SimulatorConfigFile> for SimulatorConfigBuilder {
    fn from(file: SimulatorConfigFile) -> Self {
        SimulatorConfigBuilder {
            num_decks: file.num_decks,
            shuffle_option: file.shuffle_option,
            penetration_threshold: file.penetration_threshold,
            double_option: file.double_option,
            split_option: file.split_option,
            surrender_option: file.surrender_option,
            surrender_return: file.surrender_return,
            dealer_hits_soft_17: file.dealer_hits_soft_17,
            blackjack_payout: file.blackjack_payout,
            num_simulations: file.num_simulations,
            num_hands_per_session: file.num_hands_per_session,
            initial_balance: file.initial_balance,
            bet_amount: file.bet_amount,
            seed: file.seed,
            num_workers: file.num_workers,
        }
    }
}

impl SimulatorConfigBuilder {
    /// Method for choosing the number of decks in the shoe
    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    pub fn shuffle_option(&mut self, option: ShuffleOption) -> &mut Self {
        self.shuffle_option = Some(option);
        self
    }

    /// Method for setting how few cards may remain in a continuously dealt shoe before it is
    /// replaced, defaults to 20 cards per deck.
    pub fn penetration_threshold(&mut self, cards: usize) -> &mut Self {
        self.penetration_threshold = Some(cards);
        self
    }

    pub fn double_option(&mut self, option: DoubleOption) -> &mut Self {
        self.double_option = Some(option);
        self
    }

    pub fn split_option(&mut self, option: SplitOption) -> &mut Self {
        self.split_option = Some(option);
        self
    }

    pub fn surrender_option(&mut self, option: SurrenderOption) -> &mut Self {
        self.surrender_option = Some(option);
        self
    }

    pub fn surrender_return(&mut self, fraction: f32) -> &mut Self {
        self.surrender_return = Some(fraction);
        self
    }

    /// Method for setting the flag that determines if the dealer must hit soft seventeens, default is true
    pub fn dealer_hits_soft_17(&mut self, hits: bool) -> &mut Self {
        self.dealer_hits_soft_17 = Some(hits);
        self
    }

    /// Method for setting the multiplier paid on a winning natural
    pub fn blackjack_payout(&mut self, payout: f32) -> &mut Self {
        self.blackjack_payout = Some(payout);
        self
    }

    /// Method for setting the number of sessions simulated.
    pub fn num_simulations(&mut self, n: u32) -> &mut Self {
        self.num_simulations = Some(n);
        self
    }

    /// Method for setting the maximum number of hands that will be played in each session
    pub fn num_hands_per_session(&mut self, hands: u32) -> &mut Self {
        self.num_hands_per_session = Some(hands);
        self
    }

    /// Method for changing the starting bankroll of the player.
    pub fn initial_balance(&mut self, balance: f32) -> &mut Self {
        self.initial_balance = Some(balance);
        self
    }

    /// Method for setting the flat bet placed on every hand
    pub fn bet_amount(&mut self, bet: f32) -> &mut Self {
        self.bet_amount = Some(bet);
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    pub fn num_workers(&mut self, workers: usize) -> &mut Self {
        self.num_workers = Some(workers);
        self
    }

    /// Method for building a `SimulatorConfig` object from the given `SimulatorConfigBuilder`.
    /// Fails if any value is out of range or selects a rule the simulator does not implement.
    pub fn build(&self) -> Result<SimulatorConfig, ConfigError> {
        let num_decks = self.num_decks.unwrap_or(1);
        let config = SimulatorConfig {
            num_decks,
            shuffle_option: self.shuffle_option.unwrap_or(ShuffleOption::EveryHand),
            penetration_threshold: self
                .penetration_threshold
                .unwrap_or(MIN_PENETRATION_THRESHOLD * num_decks),
            double_option: self.double_option.unwrap_or(DoubleOption::Any),
            split_option: self.split_option.unwrap_or(SplitOption::None),
            surrender_option: self.surrender_option.unwrap_or(SurrenderOption::None),
            surrender_return: self.surrender_return.unwrap_or(0.5),
            dealer_hits_soft_17: self.dealer_hits_soft_17.unwrap_or(true),
            blackjack_payout: self.blackjack_payout.unwrap_or(1.25),
            num_simulations: self.num_simulations.unwrap_or(100_000),
            num_hands_per_session: self.num_hands_per_session.unwrap_or(100),
            initial_balance: self.initial_balance.unwrap_or(1000.0),
            bet_amount: self.bet_amount.unwrap_or(50.0),
            seed: self.seed,
            num_workers: self.num_workers.unwrap_or_else(num_cpus::get),
        };
        validate(&config)?;

        if config.blackjack_payout < 1.0 {
            log::warn!(
                "blackjack payout of {} pays a natural less than an ordinary win",
                config.blackjack_payout
            );
        }
        if config.bet_amount > config.initial_balance {
            log::warn!(
                "bet amount {} exceeds the initial balance {}, sessions can end on the first loss",
                config.bet_amount,
                config.initial_balance
            );
        }

        Ok(config)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive_amount(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be a positive amount", value)))
    }
}

fn validate(config: &SimulatorConfig) -> Result<(), ConfigError> {
    if config.num_decks == 0 {
        return Err(invalid("num_decks", "at least one deck is required"));
    }
    if config.num_simulations == 0 {
        return Err(invalid("num_simulations", "at least one simulation is required"));
    }
    if config.num_hands_per_session == 0 {
        return Err(invalid(
            "num_hands_per_session",
            "at least one hand per session is required",
        ));
    }
    if config.num_workers == 0 {
        return Err(invalid("num_workers", "at least one worker is required"));
    }
    positive_amount("blackjack_payout", config.blackjack_payout)?;
    positive_amount("initial_balance", config.initial_balance)?;
    positive_amount("bet_amount", config.bet_amount)?;

    if !(0.0..=1.0).contains(&config.surrender_return) {
        return Err(invalid(
            "surrender_return",
            format!("{} is not a fraction between 0 and 1", config.surrender_return),
        ));
    }

    let shoe_size = config.shoe_size();
    if config.penetration_threshold < MIN_PENETRATION_THRESHOLD
        || config.penetration_threshold >= shoe_size
    {
        return Err(invalid(
            "penetration_threshold",
            format!(
                "{} must be at least {} and less than the {} cards in the shoe",
                config.penetration_threshold, MIN_PENETRATION_THRESHOLD, shoe_size
            ),
        ));
    }

    if config.split_option != SplitOption::None {
        return Err(ConfigError::Unsupported {
            option: "split_option",
            value: config.split_option.to_string(),
        });
    }
    if config.surrender_option != SurrenderOption::None {
        return Err(ConfigError::Unsupported {
            option: "surrender_option",
            value: config.surrender_option.to_string(),
        });
    }

    Ok(())
}
