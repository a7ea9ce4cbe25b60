//! Module that focuses on the simulation of a single session of blackjack. In otherwords,
//!  this module provides all the functionality needed to play one bankroll through a bounded number of hands.

pub mod dealer;
pub mod player;
pub mod strategy;
pub mod table;
pub mod prelude {
    pub use super::BlackjackGameSim;
    pub use crate::game::dealer::DealersHandSim;
    pub use crate::game::player::PlayerSim;
    pub use crate::game::strategy::{self, Decision, DecisionStrategy, HeuristicStrategy};
    pub use crate::game::table::{BlackjackTableSim, HandOutcome, TableRules};
    pub use blackjack_lib::{BlackjackGameError, Card, Deck, Hand};
}

pub use prelude::*;

use crate::config::SimulatorConfig;
use crate::SimulationResult;
use rand::Rng;

/// Struct that provides the functionality to simulate one session of blackjack: a single bankroll
/// betting a flat amount on every hand until either the hand budget is used up or the bankroll is
/// gone. The session is consumed by `run()`, a new one is built for every simulation.
pub struct BlackjackGameSim<D, R>
where
    D: DecisionStrategy,
    R: Rng,
{
    table: BlackjackTableSim<R>,
    player: PlayerSim,
    strategy: D,
    bet_amount: f32,
    num_hands: u32,
    hands_played: u32,
}

impl<D, R> BlackjackGameSim<D, R>
where
    D: DecisionStrategy,
    R: Rng,
{
    /// Associated method for building a new session.
    /// `table` is the `BlackjackTableSim` struct that will deal the cards and settle the bets,
    /// `strategy` decides how every hand is played, `starting_balance` is the bankroll the session
    /// begins with and `bet_amount` the flat bet placed on each hand.
    /// `num_hands` is the most hands that will be played, the session only ends sooner if the
    /// bankroll runs out.
    pub fn new(
        table: BlackjackTableSim<R>,
        strategy: D,
        starting_balance: f32,
        bet_amount: f32,
        num_hands: u32,
    ) -> BlackjackGameSim<D, R> {
        BlackjackGameSim {
            table,
            player: PlayerSim::new(starting_balance),
            strategy,
            bet_amount,
            num_hands,
            hands_played: 0,
        }
    }

    /// Builds a session at a freshly opened table following the rules of `config`.
    pub fn from_config(config: &SimulatorConfig, strategy: D, rng: R) -> BlackjackGameSim<D, R> {
        let table = BlackjackTableSim::new(TableRules::from(config), rng);
        BlackjackGameSim::new(
            table,
            strategy,
            config.initial_balance,
            config.bet_amount,
            config.num_hands_per_session,
        )
    }

    /// Plays a single hand from the deal to the settlement of the bet.
    pub fn play_hand(&mut self) -> Result<(HandOutcome, f32), BlackjackGameError> {
        self.player.place_bet(self.bet_amount);
        let dealers_up_card = self.table.deal_hand(&mut self.player)?;

        // Let player decide options until they are no longer able to
        while !self.player.turn_is_over() {
            let decision = self
                .strategy
                .decide_option(&self.player.hand, &dealers_up_card);
            self.table.play_option(&mut self.player, decision)?;
        }

        let settled = self.table.finish_hand(&mut self.player)?;
        log::trace!(
            "player {} against dealer {}: {:?} {:+.2}",
            self.player.hand,
            self.table.dealers_hand.hand,
            settled.0,
            settled.1
        );

        self.player.reset();
        self.table.reset();
        self.hands_played += 1;
        Ok(settled)
    }

    /// Method that runs the session to completion and returns what happened to the bankroll.
    pub fn run(mut self) -> Result<SimulationResult, BlackjackGameError> {
        let mut ended_early = false;
        while self.hands_played < self.num_hands {
            self.play_hand()?;
            if !self.player.continue_play() {
                ended_early = self.hands_played < self.num_hands;
                break;
            }
        }

        Ok(SimulationResult {
            wins: self.player.wins,
            losses: self.player.losses,
            pushes: self.player.pushes,
            final_bankroll: self.player.balance(),
            hands_played: self.hands_played,
            player_blackjacks: self.player.blackjacks,
            ended_early,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{DoubleOption, ShuffleOption};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn stacked_session(
        cards: &[&str],
        balance: f32,
        bet: f32,
        hands: u32,
    ) -> BlackjackGameSim<HeuristicStrategy, ChaCha8Rng> {
        let deck = Deck::from_cards(cards.iter().map(|s| s.parse::<Card>().unwrap()).collect());
        let rules = TableRules {
            num_decks: 1,
            shuffle_option: ShuffleOption::Continuous,
            penetration_threshold: 0,
            dealer_hits_soft_17: true,
            blackjack_payout: 1.25,
        };
        let table = BlackjackTableSim::with_deck(deck, rules, ChaCha8Rng::seed_from_u64(0));
        BlackjackGameSim::new(
            table,
            HeuristicStrategy::new(DoubleOption::Any),
            balance,
            bet,
            hands,
        )
    }

    #[test]
    fn natural_wins_blackjack_payout() {
        let session = stacked_session(&["Ah", "Ks", "10c", "9d"], 1000.0, 50.0, 1);
        let result = session.run().unwrap();
        assert_eq!(result.final_bankroll, 1062.5);
        assert_eq!((result.wins, result.losses), (1, 0));
        assert_eq!(result.player_blackjacks, 1);
        assert_eq!(result.hands_played, 1);
        assert!(!result.ended_early);
    }

    #[test]
    fn equal_totals_push() {
        let session = stacked_session(&["10h", "Ks", "Qc", "Jd"], 1000.0, 50.0, 1);
        let result = session.run().unwrap();
        assert_eq!(result.final_bankroll, 1000.0);
        assert_eq!((result.wins, result.losses, result.pushes), (0, 0, 1));
    }

    #[test]
    fn doubled_eleven_wins_twice_the_bet() {
        // player 5 6, dealer 10 7, the double draws a 10 for 21 against a hard 17
        let session = stacked_session(&["5h", "6s", "10c", "7d", "10h"], 1000.0, 50.0, 1);
        let result = session.run().unwrap();
        assert_eq!(result.final_bankroll, 1100.0);
        assert_eq!(result.wins, 1);
    }

    #[test]
    fn player_hits_until_standing_then_dealer_hits_soft_seventeen() {
        // player 10 2 against an up card of 3 hits, draws a 6 for 18 and stands.
        // dealer A 3 draws a 3 to reach soft 17, hits again and draws a 2 for 19.
        let session = stacked_session(
            &["10h", "2s", "Ac", "3d", "6h", "3s", "2c"],
            1000.0,
            50.0,
            1,
        );
        let result = session.run().unwrap();
        assert_eq!(result.losses, 1);
        assert_eq!(result.final_bankroll, 950.0);
    }

    #[test]
    fn bust_is_a_loss() {
        // 10 6 against an up card of 10 hits and busts on a king
        let session = stacked_session(&["10h", "6s", "9c", "10d", "Kh"], 1000.0, 50.0, 1);
        let result = session.run().unwrap();
        assert_eq!(result.losses, 1);
        assert_eq!(result.final_bankroll, 950.0);
    }

    #[test]
    fn session_stops_when_bankroll_is_gone() {
        // two hands of 17 against 19 lose the whole bankroll
        let session = stacked_session(
            &["10h", "7s", "10c", "9d", "10s", "7h", "10d", "9c"],
            100.0,
            50.0,
            10,
        );
        let result = session.run().unwrap();
        assert_eq!(result.final_bankroll, 0.0);
        assert_eq!(result.hands_played, 2);
        assert_eq!(result.losses, 2);
        assert!(result.ended_early);
    }

    #[test]
    fn ruin_on_the_last_hand_is_not_an_early_ending() {
        let session = stacked_session(&["10h", "7s", "10c", "9d"], 50.0, 50.0, 1);
        let result = session.run().unwrap();
        assert_eq!(result.final_bankroll, 0.0);
        assert!(!result.ended_early);
    }

    #[test]
    fn bankroll_can_go_negative_on_a_doubled_loss() {
        // 5 6 doubles against a 7 up card, draws a 2 for 13 and loses to 17
        let session = stacked_session(&["5h", "6s", "10c", "7d", "2h"], 50.0, 50.0, 5);
        let result = session.run().unwrap();
        assert_eq!(result.final_bankroll, -50.0);
        assert_eq!(result.hands_played, 1);
    }

    #[test]
    fn exhausted_shoe_stops_the_session() {
        let session = stacked_session(&["10h", "7s", "10c", "9d", "10s"], 1000.0, 50.0, 2);
        assert!(matches!(
            session.run(),
            Err(BlackjackGameError::DeckExhausted { .. })
        ));
    }

    #[test]
    fn full_session_from_config() {
        let config = crate::SimulatorConfig::new()
            .num_hands_per_session(100)
            .build()
            .unwrap();
        let session = BlackjackGameSim::from_config(
            &config,
            HeuristicStrategy::new(config.double_option),
            ChaCha8Rng::seed_from_u64(11),
        );
        let result = session.run().unwrap();
        assert!(result.hands_played <= 100);
        assert_eq!(
            result.wins + result.losses + result.pushes,
            result.hands_played
        );
        if result.hands_played < 100 {
            assert!(result.final_bankroll <= 0.0);
        }
    }
}
