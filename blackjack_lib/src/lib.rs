//! Core card types for simulating games of blackjack.
//!
//! The crate provides the pieces every blackjack table needs regardless of how it is played:
//! cards with their blackjack values, a multi-deck shoe that is consumed card by card, and a hand
//! that knows how to value itself with soft aces. Game flow, strategies and betting live in the
//! simulator crates built on top of this one.

pub mod card;
pub mod deck;
pub mod error;
pub mod hand;

pub use card::{Card, Rank, Suit};
pub use deck::{Deck, CARDS_PER_DECK};
pub use error::BlackjackGameError;
pub use hand::{hand_value, Hand, BLACKJACK};
