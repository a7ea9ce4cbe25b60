use crate::config::DoubleOption;
use blackjack_lib::{Card, Hand, BLACKJACK};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;

/// The options a player may choose to play their current hand with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hit,
    Stand,
    DoubleDown,
}

impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Hit => write!(f, "hit"),
            Decision::Stand => write!(f, "stand"),
            Decision::DoubleDown => write!(f, "double down"),
        }
    }
}

/// Trait for a generic decision strategy. Has only one required method `decide_option()`, which
/// takes the player's current hand and the dealer's up card and returns how the hand should be
/// played. Implementations must be pure, the same inputs always give the same decision.
pub trait DecisionStrategy {
    fn decide_option(&self, hand: &Hand, dealers_up_card: &Card) -> Decision;
}

impl<D: DecisionStrategy + ?Sized> DecisionStrategy for Box<D> {
    fn decide_option(&self, hand: &Hand, dealers_up_card: &Card) -> Decision {
        (**self).decide_option(hand, dealers_up_card)
    }
}

lazy_static! {
    /// Decisions by (hand total, dealer up card value) once the double down rules have been
    /// checked. Covers totals 4 through 21 against every up card.
    static ref TOTALS: HashMap<(u8, u8), Decision> = build_totals_table();
}

fn build_totals_table() -> HashMap<(u8, u8), Decision> {
    let mut totals = HashMap::new();
    for total in 4..=BLACKJACK {
        for up_card in 2..=11 {
            let decision = match total {
                12 => match up_card {
                    2 | 3 | 7..=11 => Decision::Hit,
                    _ => Decision::Stand,
                },
                13..=16 => match up_card {
                    7..=11 => Decision::Hit,
                    _ => Decision::Stand,
                },
                17..=21 => Decision::Stand,
                _ => Decision::Hit,
            };
            totals.insert((total, up_card), decision);
        }
    }
    totals
}

/// Looks up the non doubling decision for a hand `total` against a dealer up card worth
/// `up_card`. Returns `None` outside of the table.
pub fn lookup_total(total: u8, up_card: u8) -> Option<Decision> {
    TOTALS.get(&(total, up_card)).copied()
}

/// A fixed heuristic close to basic strategy for hard totals. Doubles on two card 9, 10 and 11
/// against favourable up cards, when the table's double option allows it, and otherwise plays by
/// hand total alone. Soft totals are played like hard ones and hands are never split.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicStrategy {
    double_option: DoubleOption,
}

impl HeuristicStrategy {
    pub fn new(double_option: DoubleOption) -> HeuristicStrategy {
        HeuristicStrategy { double_option }
    }

    fn double_or_hit(&self, total: u8) -> Decision {
        if self.double_option.allows(total) {
            Decision::DoubleDown
        } else {
            Decision::Hit
        }
    }
}

impl Default for HeuristicStrategy {
    fn default() -> Self {
        HeuristicStrategy::new(DoubleOption::Any)
    }
}

impl DecisionStrategy for HeuristicStrategy {
    fn decide_option(&self, hand: &Hand, dealers_up_card: &Card) -> Decision {
        let total = hand.value();
        let up_card = dealers_up_card.val();

        if hand.len() == 2 {
            match total {
                11 => return self.double_or_hit(total),
                10 if up_card <= 9 => return self.double_or_hit(total),
                9 if (3..=6).contains(&up_card) => return self.double_or_hit(total),
                _ => {}
            }
        }

        match lookup_total(total, up_card) {
            Some(decision) => decision,
            None if total > BLACKJACK => Decision::Stand,
            None => Decision::Hit,
        }
    }
}

impl Display for HeuristicStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "heuristic (double: {})", self.double_option)
    }
}
