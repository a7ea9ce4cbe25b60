use crate::{BlackjackGameError, Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::Rng;

pub const CARDS_PER_DECK: usize = 52;

/// A shoe made of one or more standard decks.
///
/// The cards live in a fixed buffer and a cursor marks the next card to be dealt, so drawing never
/// moves the remaining cards and a drawn card is simply copied out into whichever hand receives it.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// Builds an unshuffled shoe of `num_decks` decks. Within each deck the cards are ordered by
    /// rank, and by suit within a rank.
    ///
    /// ```
    /// use blackjack_lib::Deck;
    ///
    /// let deck = Deck::new(2);
    /// assert_eq!(deck.remaining(), 104);
    /// ```
    pub fn new(num_decks: usize) -> Deck {
        let mut cards = Vec::with_capacity(CARDS_PER_DECK * num_decks);
        for _ in 0..num_decks {
            for &rank in Rank::ALL.iter() {
                for &suit in Suit::ALL.iter() {
                    cards.push(Card::new(rank, suit));
                }
            }
        }
        Deck { cards, next: 0 }
    }

    /// Builds a fresh shoe of `num_decks` decks and shuffles it with `rng`.
    pub fn shuffled<R: Rng + ?Sized>(num_decks: usize, rng: &mut R) -> Deck {
        let mut deck = Deck::new(num_decks);
        deck.shuffle(rng);
        deck
    }

    /// Builds a deck that deals `cards` in the given order, first element first. Mostly useful for
    /// replaying a known sequence of cards.
    pub fn from_cards(cards: Vec<Card>) -> Deck {
        Deck { cards, next: 0 }
    }

    /// Shuffles the cards that have not been dealt yet into a uniformly random order.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards[self.next..].shuffle(rng);
    }

    /// Deals the next card.
    pub fn draw(&mut self) -> Result<Card, BlackjackGameError> {
        match self.cards.get(self.next) {
            Some(&card) => {
                self.next += 1;
                Ok(card)
            }
            None => Err(BlackjackGameError::DeckExhausted {
                drawn: self.next,
                size: self.cards.len(),
            }),
        }
    }

    /// Number of cards left to deal.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }

    /// Number of cards the deck was built with.
    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
