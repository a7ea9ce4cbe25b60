use blackjack_lib::{BlackjackGameError, Card, Deck, Hand};

/// The value the dealer must reach before standing.
pub const DEALER_STANDS_ON: u8 = 17;

/// The dealer's side of the table for one hand.
#[derive(Debug, Clone)]
pub struct DealersHandSim {
    pub hand: Hand,
    hits_soft_seventeen: bool,
}

impl DealersHandSim {
    /// Associated function to create a new `DealersHandSim` struct
    pub fn new(hits_soft_seventeen: bool) -> Self {
        DealersHandSim {
            hand: Hand::new(),
            hits_soft_seventeen,
        }
    }

    pub fn receive_card(&mut self, card: Card) {
        self.hand.receive_card(card);
    }

    /// The dealer's face up card. By this table's convention that is the second card dealt to the
    /// dealer, the first one stays face down.
    pub fn face_up_card(&self) -> Option<&Card> {
        self.hand.cards().get(1)
    }

    /// Whether house rules force the dealer to take another card.
    pub fn must_hit(&self) -> bool {
        let value = self.hand.value();
        value < DEALER_STANDS_ON
            || (self.hits_soft_seventeen && value == DEALER_STANDS_ON && self.hand.is_soft())
    }

    /// Draws from `deck` until the dealer must stand, and returns the final value of the hand.
    pub fn play(&mut self, deck: &mut Deck) -> Result<u8, BlackjackGameError> {
        while self.must_hit() {
            self.hand.receive_card(deck.draw()?);
        }
        Ok(self.hand.value())
    }

    /// Method to reset the hand after a complete hand
    pub fn reset(&mut self) {
        self.hand.clear();
    }
}
