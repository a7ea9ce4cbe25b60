use blackjack_lib::{Card, Hand};
use std::fmt::Display;

/// Struct for a simulated player. Tracks the hand being played, the bet riding on it and the
/// player's bankroll, along with the running tallies of a session.
#[derive(Debug, Clone)]
pub struct PlayerSim {
    pub hand: Hand,
    current_bet: f32,
    pub balance: f32,
    turn_over: bool,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub blackjacks: u32,
}

impl PlayerSim {
    /// Associated function to create a new `PlayerSim` struct.
    pub fn new(starting_balance: f32) -> PlayerSim {
        PlayerSim {
            hand: Hand::new(),
            current_bet: 0.0,
            balance: starting_balance,
            turn_over: false,
            wins: 0,
            losses: 0,
            pushes: 0,
            blackjacks: 0,
        }
    }

    /// Method for determining whether or not the players turn is over
    pub fn turn_is_over(&self) -> bool {
        self.turn_over
    }

    /// Method for determining whether the player still has a bankroll to play with
    pub fn continue_play(&self) -> bool {
        self.balance > 0.0
    }

    /// Getter method for the players current bet
    pub fn current_bet(&self) -> f32 {
        self.current_bet
    }

    /// Getter method for the players current balance.
    pub fn balance(&self) -> f32 {
        self.balance
    }

    /// Places the flat bet for the next hand. The bet is only settled against the balance once the
    /// hand is finished, so a bet larger than the balance is allowed.
    pub fn place_bet(&mut self, bet: f32) {
        self.current_bet = bet;
    }

    pub fn receive_card(&mut self, card: Card) {
        self.hand.receive_card(card);
    }

    /// Doubles the bet riding on the hand. The caller deals the single extra card.
    pub fn double_down(&mut self) {
        self.current_bet *= 2.0;
    }

    pub fn stand(&mut self) {
        self.turn_over = true;
    }

    pub fn busted(&self) -> bool {
        self.hand.is_bust()
    }

    pub fn has_blackjack(&self) -> bool {
        self.hand.is_natural()
    }

    /// Settles a won hand, a natural is paid at `blackjack_payout` times the bet.
    pub fn win_hand(&mut self, blackjack_payout: f32) -> f32 {
        let winnings = if self.has_blackjack() {
            self.blackjacks += 1;
            self.current_bet * blackjack_payout
        } else {
            self.current_bet
        };
        self.wins += 1;
        self.balance += winnings;
        winnings
    }

    pub fn lose_hand(&mut self) -> f32 {
        self.losses += 1;
        self.balance -= self.current_bet;
        -self.current_bet
    }

    pub fn push_hand(&mut self) -> f32 {
        self.pushes += 1;
        0.0
    }

    /// Clears the hand and bet for the next deal, the balance and tallies are kept.
    pub fn reset(&mut self) {
        self.hand.clear();
        self.current_bet = 0.0;
        self.turn_over = false;
    }
}

impl Display for PlayerSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hand: {}, bet: {:.2}, balance: {:.2}",
            self.hand, self.current_bet, self.balance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with(cards: &[&str], bet: f32) -> PlayerSim {
        let mut player = PlayerSim::new(1000.0);
        player.place_bet(bet);
        for card in cards {
            player.receive_card(card.parse().unwrap());
        }
        player
    }

    #[test]
    fn natural_pays_blackjack_multiplier() {
        let mut player = player_with(&["Ah", "Ks"], 50.0);
        assert_eq!(player.win_hand(1.25), 62.5);
        assert_eq!(player.balance(), 1062.5);
        assert_eq!(player.wins, 1);
        assert_eq!(player.blackjacks, 1);
    }

    #[test]
    fn three_card_twenty_one_pays_even_money() {
        let mut player = player_with(&["7h", "7s", "7c"], 50.0);
        assert_eq!(player.win_hand(1.25), 50.0);
        assert_eq!(player.balance(), 1050.0);
        assert_eq!(player.blackjacks, 0);
    }

    #[test]
    fn doubled_bet_is_lost_in_full() {
        let mut player = player_with(&["5h", "6s", "2c"], 50.0);
        player.double_down();
        assert_eq!(player.current_bet(), 100.0);
        assert_eq!(player.lose_hand(), -100.0);
        assert_eq!(player.balance(), 900.0);
        assert_eq!(player.losses, 1);
    }

    #[test]
    fn push_leaves_balance_alone() {
        let mut player = player_with(&["Kh", "Qs"], 50.0);
        assert_eq!(player.push_hand(), 0.0);
        assert_eq!(player.balance(), 1000.0);
        assert_eq!((player.wins, player.losses, player.pushes), (0, 0, 1));
    }

    #[test]
    fn reset_keeps_balance_and_tallies() {
        let mut player = player_with(&["Kh", "Qs"], 50.0);
        player.stand();
        player.win_hand(1.5);
        player.reset();
        assert!(player.hand.is_empty());
        assert!(!player.turn_is_over());
        assert_eq!(player.current_bet(), 0.0);
        assert_eq!(player.balance(), 1050.0);
        assert_eq!(player.wins, 1);
    }
}
