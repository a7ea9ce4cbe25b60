use crate::Card;
use std::fmt::Display;

/// The best possible hand value.
pub const BLACKJACK: u8 = 21;

/// Computes the value of `cards` and whether the value is soft.
///
/// Every ace starts out counting eleven. While the total is over 21 and an ace is still counted
/// as eleven, that ace is reduced to one. The returned flag is true when at least one ace is still
/// counted as eleven after the reduction. The total can exceed 21 when no ace is left to absorb
/// the excess.
pub fn hand_value(cards: &[Card]) -> (u8, bool) {
    let mut total: u32 = cards.iter().map(|c| c.val() as u32).sum();
    let mut soft_aces = cards.iter().filter(|c| c.is_ace()).count();
    while total > BLACKJACK as u32 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    (u8::try_from(total).unwrap_or(u8::MAX), soft_aces > 0)
}

/// The cards held by a single party, player or dealer, for the duration of one deal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand { cards: Vec::new() }
    }

    pub fn receive_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn value(&self) -> u8 {
        hand_value(&self.cards).0
    }

    /// True when an ace is still being counted as eleven.
    pub fn is_soft(&self) -> bool {
        hand_value(&self.cards).1
    }

    pub fn is_bust(&self) -> bool {
        self.value() > BLACKJACK
    }

    /// A two card 21.
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.value() == BLACKJACK
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Hand { cards }
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "[{}] ({})", cards, self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};
    use proptest::prelude::*;

    fn hand(cards: &[&str]) -> Hand {
        Hand::from(
            cards
                .iter()
                .map(|s| s.parse::<Card>().unwrap())
                .collect::<Vec<Card>>(),
        )
    }

    #[test]
    fn two_aces_and_nine_is_twenty_one() {
        let h = hand(&["Ah", "As", "9c"]);
        assert_eq!(h.value(), 21);
        assert!(h.is_soft());
        assert!(!h.is_bust());
        assert!(!h.is_natural());
    }

    #[test]
    fn aces_reduce_only_as_far_as_needed() {
        assert_eq!(hand(&["Ah", "As"]).value(), 12);
        assert_eq!(hand(&["Ah", "As", "Ac", "Ad"]).value(), 14);
        assert_eq!(hand(&["Ah", "6s"]).value(), 17);
        assert!(hand(&["Ah", "6s"]).is_soft());
        assert_eq!(hand(&["Ah", "6s", "Kd"]).value(), 17);
        assert!(!hand(&["Ah", "6s", "Kd"]).is_soft());
    }

    #[test]
    fn bust_reports_true_total() {
        let h = hand(&["Kh", "Qs", "5c"]);
        assert_eq!(h.value(), 25);
        assert!(h.is_bust());
        assert_eq!(hand(&["Kh", "Qs", "Ac", "Ad"]).value(), 22);
    }

    #[test]
    fn natural_needs_exactly_two_cards() {
        assert!(hand(&["Ah", "Ks"]).is_natural());
        assert!(hand(&["As", "10d"]).is_natural());
        assert!(!hand(&["7h", "7s", "7c"]).is_natural());
    }

    #[test]
    fn empty_hand_is_zero() {
        let h = Hand::new();
        assert_eq!(h.value(), 0);
        assert!(!h.is_soft());
        assert!(h.is_empty());
    }

    fn any_card() -> impl Strategy<Value = Card> {
        (0usize..13, 0usize..4).prop_map(|(r, s)| Card::new(Rank::ALL[r], Suit::ALL[s]))
    }

    proptest! {
        #[test]
        fn value_is_reduced_whenever_an_ace_can_absorb(cards in prop::collection::vec(any_card(), 0..12)) {
            let (value, soft) = hand_value(&cards);
            let hard_total: u32 = cards.iter().map(|c| if c.is_ace() { 1 } else { c.val() as u32 }).sum();
            let aces = cards.iter().filter(|c| c.is_ace()).count();

            if hard_total <= 21 {
                prop_assert!(value <= 21);
            } else {
                prop_assert_eq!(value as u32, hard_total);
                prop_assert!(!soft);
            }
            if soft {
                prop_assert!(aces > 0);
                prop_assert_eq!(value as u32, hard_total + 10);
            }
        }

        #[test]
        fn valuation_is_idempotent(cards in prop::collection::vec(any_card(), 0..8)) {
            let h = Hand::from(cards.clone());
            prop_assert_eq!(h.value(), h.value());
            prop_assert_eq!(hand_value(&cards), hand_value(&cards));
        }
    }
}
