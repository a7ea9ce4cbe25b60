use crate::config::{ShuffleOption, SimulatorConfig};
use crate::game::dealer::DealersHandSim;
use crate::game::player::PlayerSim;
use crate::game::strategy::Decision;
use blackjack_lib::{BlackjackGameError, Card, Deck};
use rand::Rng;
use serde::Serialize;

/// The house rules a `BlackjackTableSim` deals by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRules {
    pub num_decks: usize,
    pub shuffle_option: ShuffleOption,
    pub penetration_threshold: usize,
    pub dealer_hits_soft_17: bool,
    pub blackjack_payout: f32,
}

impl From<&SimulatorConfig> for TableRules {
    fn from(config: &SimulatorConfig) -> Self {
        TableRules {
            num_decks: config.num_decks,
            shuffle_option: config.shuffle_option,
            penetration_threshold: config.penetration_threshold,
            dealer_hits_soft_17: config.dealer_hits_soft_17,
            blackjack_payout: config.blackjack_payout,
        }
    }
}

/// How a single hand ended for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandOutcome {
    Win,
    Blackjack,
    Push,
    Loss,
}

/// Struct for a simulated blackjack table. Owns the shoe and the random source used to shuffle
/// it, and applies the table's reshuffle policy between hands.
pub struct BlackjackTableSim<R: Rng> {
    deck: Deck,
    rng: R,
    pub dealers_hand: DealersHandSim,
    rules: TableRules,
    pub num_shuffles: u32,
}

impl<R: Rng> BlackjackTableSim<R> {
    /// Opens a table with a freshly shuffled shoe.
    pub fn new(rules: TableRules, mut rng: R) -> Self {
        let deck = Deck::shuffled(rules.num_decks, &mut rng);
        BlackjackTableSim::with_deck(deck, rules, rng)
    }

    /// Opens a table that deals from `deck` until the reshuffle policy replaces it.
    pub fn with_deck(deck: Deck, rules: TableRules, rng: R) -> Self {
        BlackjackTableSim {
            deck,
            rng,
            dealers_hand: DealersHandSim::new(rules.dealer_hits_soft_17),
            rules,
            num_shuffles: 0,
        }
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    /// Number of cards left in the shoe.
    pub fn remaining_cards(&self) -> usize {
        self.deck.remaining()
    }

    /// Replaces the shoe with a freshly shuffled one when the reshuffle policy calls for it.
    fn prepare_shoe(&mut self) {
        let reshuffle = match self.rules.shuffle_option {
            ShuffleOption::EveryHand => true,
            ShuffleOption::Continuous => self.deck.remaining() < self.rules.penetration_threshold,
        };
        if reshuffle {
            log::trace!(
                "reshuffling with {} cards remaining",
                self.deck.remaining()
            );
            self.deck = Deck::shuffled(self.rules.num_decks, &mut self.rng);
            self.num_shuffles += 1;
        }
    }

    /// Simulates dealing a hand of blackjack: two cards to the player, then two to the dealer.
    /// Returns the dealer's face up card, which is the second card the dealer receives.
    pub fn deal_hand(&mut self, player: &mut PlayerSim) -> Result<Card, BlackjackGameError> {
        self.prepare_shoe();

        let first = self.deck.draw()?;
        let second = self.deck.draw()?;
        player.receive_card(first);
        player.receive_card(second);

        let hole_card = self.deck.draw()?;
        let face_up_card = self.deck.draw()?;
        self.dealers_hand.receive_card(hole_card);
        self.dealers_hand.receive_card(face_up_card);

        Ok(face_up_card)
    }

    /// Plays the option `decision` for `player`.
    pub fn play_option(
        &mut self,
        player: &mut PlayerSim,
        decision: Decision,
    ) -> Result<(), BlackjackGameError> {
        match decision {
            Decision::Hit => self.hit(player),
            Decision::Stand => {
                player.stand();
                Ok(())
            }
            Decision::DoubleDown => self.double_down(player),
        }
    }

    /// Deals a card to the player, a busted player's turn is over.
    fn hit(&mut self, player: &mut PlayerSim) -> Result<(), BlackjackGameError> {
        player.receive_card(self.deck.draw()?);
        if player.busted() {
            player.stand();
        }
        Ok(())
    }

    /// Doubles the player's bet in exchange for exactly one more card.
    fn double_down(&mut self, player: &mut PlayerSim) -> Result<(), BlackjackGameError> {
        player.double_down();
        player.receive_card(self.deck.draw()?);
        player.stand();
        Ok(())
    }

    /// Method for finishing the hand and settling the player's bet. The dealer only plays out
    /// their hand when the player has not busted. Returns the outcome and the amount won, which is
    /// negative for a loss.
    pub fn finish_hand(
        &mut self,
        player: &mut PlayerSim,
    ) -> Result<(HandOutcome, f32), BlackjackGameError> {
        if player.busted() {
            return Ok((HandOutcome::Loss, player.lose_hand()));
        }

        let natural = player.has_blackjack();
        let players_total = player.hand.value();
        let dealers_total = self.dealers_hand.play(&mut self.deck)?;

        let settled = if self.dealers_hand.hand.is_bust() || players_total > dealers_total {
            let winnings = player.win_hand(self.rules.blackjack_payout);
            if natural {
                (HandOutcome::Blackjack, winnings)
            } else {
                (HandOutcome::Win, winnings)
            }
        } else if players_total < dealers_total {
            (HandOutcome::Loss, player.lose_hand())
        } else {
            (HandOutcome::Push, player.push_hand())
        };

        Ok(settled)
    }

    /// Method for reseting the table for another round, does not reshuffle deck.
    pub fn reset(&mut self) {
        self.dealers_hand.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn stacked(cards: &[&str]) -> Deck {
        Deck::from_cards(cards.iter().map(|s| s.parse::<Card>().unwrap()).collect())
    }

    fn rules(shuffle_option: ShuffleOption, penetration_threshold: usize) -> TableRules {
        TableRules {
            num_decks: 1,
            shuffle_option,
            penetration_threshold,
            dealer_hits_soft_17: true,
            blackjack_payout: 1.25,
        }
    }

    fn stacked_table(cards: &[&str]) -> BlackjackTableSim<ChaCha8Rng> {
        BlackjackTableSim::with_deck(
            stacked(cards),
            rules(ShuffleOption::Continuous, 0),
            ChaCha8Rng::seed_from_u64(1),
        )
    }

    #[test]
    fn deal_gives_player_first_two_cards_and_dealer_next_two() {
        let mut table = stacked_table(&["2h", "3h", "4h", "5h"]);
        let mut player = PlayerSim::new(100.0);
        let up = table.deal_hand(&mut player).unwrap();
        assert_eq!(player.hand.value(), 5);
        assert_eq!(table.dealers_hand.hand.value(), 9);
        assert_eq!(up, "5h".parse::<Card>().unwrap());
        assert_eq!(table.remaining_cards(), 0);
    }

    #[test]
    fn double_down_takes_exactly_one_card() {
        let mut table = stacked_table(&["5h", "6h", "10c", "7d", "10s", "9s"]);
        let mut player = PlayerSim::new(100.0);
        player.place_bet(10.0);
        table.deal_hand(&mut player).unwrap();
        table.play_option(&mut player, Decision::DoubleDown).unwrap();
        assert!(player.turn_is_over());
        assert_eq!(player.hand.len(), 3);
        assert_eq!(player.current_bet(), 20.0);
        assert_eq!(table.remaining_cards(), 1);

        assert_eq!(
            table.finish_hand(&mut player).unwrap(),
            (HandOutcome::Win, 20.0)
        );
        assert_eq!(player.balance(), 120.0);
    }

    #[test]
    fn busted_player_loses_without_dealer_drawing() {
        let mut table = stacked_table(&["10h", "6h", "10c", "2d", "Ks", "9s"]);
        let mut player = PlayerSim::new(100.0);
        player.place_bet(10.0);
        table.deal_hand(&mut player).unwrap();
        table.play_option(&mut player, Decision::Hit).unwrap();
        assert!(player.busted());
        assert!(player.turn_is_over());

        assert_eq!(
            table.finish_hand(&mut player).unwrap(),
            (HandOutcome::Loss, -10.0)
        );
        assert_eq!(table.dealers_hand.hand.len(), 2);
        assert_eq!(table.remaining_cards(), 1);
    }

    #[test]
    fn natural_is_settled_at_blackjack_payout() {
        let mut table = stacked_table(&["Ah", "Kh", "10c", "9d"]);
        let mut player = PlayerSim::new(1000.0);
        player.place_bet(50.0);
        table.deal_hand(&mut player).unwrap();
        table.play_option(&mut player, Decision::Stand).unwrap();
        assert_eq!(
            table.finish_hand(&mut player).unwrap(),
            (HandOutcome::Blackjack, 62.5)
        );
        assert_eq!(player.balance(), 1062.5);
    }

    #[test]
    fn natural_against_dealer_twenty_one_pushes() {
        let mut table = stacked_table(&["Ah", "Kh", "Ac", "Qd"]);
        let mut player = PlayerSim::new(1000.0);
        player.place_bet(50.0);
        table.deal_hand(&mut player).unwrap();
        assert_eq!(
            table.finish_hand(&mut player).unwrap(),
            (HandOutcome::Push, 0.0)
        );
        assert_eq!(player.balance(), 1000.0);
    }

    #[test]
    fn every_hand_policy_replaces_the_shoe() {
        let mut table = BlackjackTableSim::new(
            rules(ShuffleOption::EveryHand, 20),
            ChaCha8Rng::seed_from_u64(3),
        );
        let mut player = PlayerSim::new(100.0);
        for _ in 0..5 {
            table.deal_hand(&mut player).unwrap();
            assert_eq!(table.remaining_cards(), 48);
            player.reset();
            table.reset();
        }
        assert_eq!(table.num_shuffles, 5);
    }

    #[test]
    fn continuous_policy_reshuffles_below_threshold() {
        let mut table = BlackjackTableSim::new(
            rules(ShuffleOption::Continuous, 20),
            ChaCha8Rng::seed_from_u64(3),
        );
        let mut player = PlayerSim::new(100.0);
        let mut remaining_before = vec![];
        for _ in 0..20 {
            remaining_before.push(table.remaining_cards());
            table.deal_hand(&mut player).unwrap();
            assert!(table.remaining_cards() >= 16);
            player.reset();
            table.reset();
        }
        // 52 cards, 4 per deal: the shoe is replaced once 16 remain
        assert_eq!(table.num_shuffles, 2);
        assert_eq!(remaining_before[9], 16);
        assert_eq!(remaining_before[10], 48);
    }

    #[test]
    fn exhausted_shoe_is_reported() {
        let mut table = stacked_table(&["2h", "3h", "4h"]);
        let mut player = PlayerSim::new(100.0);
        assert!(matches!(
            table.deal_hand(&mut player),
            Err(BlackjackGameError::DeckExhausted { .. })
        ));
    }
}
