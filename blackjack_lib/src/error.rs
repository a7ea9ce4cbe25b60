/// Errors raised by the core game types.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlackjackGameError {
    /// A card was requested from a deck with nothing left in it. The reshuffle policy of the table
    /// is responsible for never letting this happen, so seeing it means the penetration threshold
    /// is too small for the game being played.
    #[error("deck exhausted after {drawn} of {size} cards were drawn")]
    DeckExhausted { drawn: usize, size: usize },
    #[error("invalid card: '{0}'")]
    InvalidCard(String),
}
