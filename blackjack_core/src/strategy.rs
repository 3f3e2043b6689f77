use crate::card::Card;
use crate::hand::Hand;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};

/// The closed set of plays a seat can make for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Double => "double down",
            Action::Split => "split",
        };
        write!(f, "{}", label)
    }
}

lazy_static! {
    /// Shared basic-strategy tables; the advisor is a pure lookup over them.
    pub static ref BASIC_STRATEGY: BasicStrategy = BasicStrategy::new();
}

/// Fixed multi-deck basic strategy for a dealer who hits soft 17. The three
/// lookup tables are keyed by (player total or pair-card value, dealer
/// up-card value), with the ace keyed as 11.
pub struct BasicStrategy {
    hard_totals: HashMap<(u8, u8), Action>,
    soft_totals: HashMap<(u8, u8), Action>,
    pair_totals: HashMap<(u8, u8), Action>,
}

impl BasicStrategy {
    fn build_lookup_tables() -> (
        HashMap<(u8, u8), Action>,
        HashMap<(u8, u8), Action>,
        HashMap<(u8, u8), Action>,
    ) {
        // Hard totals
        let mut hard_totals: HashMap<(u8, u8), Action> = HashMap::new();
        for i in 4..=21 {
            for j in 2..=11 {
                let action = match i {
                    9 => match j {
                        3..=6 => Action::Double,
                        _ => Action::Hit,
                    },
                    10 => match j {
                        2..=9 => Action::Double,
                        _ => Action::Hit,
                    },
                    11 => Action::Double,
                    12 => match j {
                        4..=6 => Action::Stand,
                        _ => Action::Hit,
                    },
                    13..=16 => match j {
                        2..=6 => Action::Stand,
                        _ => Action::Hit,
                    },
                    17..=21 => Action::Stand,
                    _ => Action::Hit,
                };
                hard_totals.insert((i, j), action);
            }
        }

        // Soft totals, i.e. an ace still counted as 11. Keyed by the full
        // soft total (A,6 is 17). Soft 12 is a pair of aces played as a
        // non-pair when splitting is unavailable.
        let mut soft_totals: HashMap<(u8, u8), Action> = HashMap::new();
        for i in 12..=21 {
            for j in 2..=11 {
                let action = match i {
                    13 | 14 => match j {
                        5 | 6 => Action::Double,
                        _ => Action::Hit,
                    },
                    15 | 16 => match j {
                        4..=6 => Action::Double,
                        _ => Action::Hit,
                    },
                    17 => match j {
                        3..=6 => Action::Double,
                        _ => Action::Hit,
                    },
                    18 => match j {
                        3..=6 => Action::Double,
                        2 | 7 | 8 => Action::Stand,
                        _ => Action::Hit,
                    },
                    19..=21 => Action::Stand,
                    _ => Action::Hit,
                };
                soft_totals.insert((i, j), action);
            }
        }

        // Pairs, keyed by the value of one card of the pair. Non-split
        // entries mirror the hard/soft play for the same total so the chart
        // can be printed straight from this table.
        let mut pair_totals: HashMap<(u8, u8), Action> = HashMap::new();
        for i in [2u8, 3, 4, 5, 6, 7, 8, 9, 10, 11] {
            for j in 2..=11 {
                let action = match i {
                    11 | 8 => Action::Split,
                    9 => match j {
                        7 | 10 | 11 => Action::Stand,
                        _ => Action::Split,
                    },
                    10 => Action::Stand,
                    7 => match j {
                        2..=7 => Action::Split,
                        _ => Action::Hit,
                    },
                    6 => match j {
                        2..=6 => Action::Split,
                        _ => Action::Hit,
                    },
                    5 => match j {
                        2..=9 => Action::Double,
                        _ => Action::Hit,
                    },
                    4 => match j {
                        5 | 6 => Action::Split,
                        _ => Action::Hit,
                    },
                    _ => match j {
                        2..=7 => Action::Split,
                        _ => Action::Hit,
                    },
                };
                pair_totals.insert((i, j), action);
            }
        }

        (hard_totals, soft_totals, pair_totals)
    }

    pub fn new() -> BasicStrategy {
        let (hard_totals, soft_totals, pair_totals) = BasicStrategy::build_lookup_tables();
        BasicStrategy {
            hard_totals,
            soft_totals,
            pair_totals,
        }
    }

    /// The recommended play for a hand against a dealer up-card: pairs
    /// first, then soft totals, then hard totals.
    pub fn recommend(&self, hand: &Hand, dealer_up: Card) -> Action {
        self.lookup(hand, dealer_up, hand.can_split())
    }

    /// Like `recommend`, but constrained to the legal set: an unavailable
    /// split falls through to the soft/hard tables, and an unavailable
    /// double falls back to a hit.
    pub fn recommend_filtered(
        &self,
        hand: &Hand,
        dealer_up: Card,
        legal: &HashSet<Action>,
    ) -> Action {
        let mut action = self.lookup(hand, dealer_up, legal.contains(&Action::Split));
        if action == Action::Double && !legal.contains(&Action::Double) {
            action = Action::Hit;
        }
        action
    }

    fn lookup(&self, hand: &Hand, dealer_up: Card, allow_split: bool) -> Action {
        let dealer = dealer_up.rank.value();
        if allow_split && hand.can_split() {
            let pair = hand.cards[0].rank.value();
            if self.pair_totals.get(&(pair, dealer)) == Some(&Action::Split) {
                return Action::Split;
            }
        }
        let value = hand.value();
        if hand.is_soft() {
            if let Some(action) = self.soft_totals.get(&(value, dealer)) {
                return *action;
            }
        }
        match self.hard_totals.get(&(value, dealer)) {
            Some(action) => *action,
            None if value < 17 => Action::Hit,
            None => Action::Stand,
        }
    }

    pub fn hard_entry(&self, total: u8, dealer: u8) -> Option<Action> {
        self.hard_totals.get(&(total, dealer)).copied()
    }

    pub fn soft_entry(&self, total: u8, dealer: u8) -> Option<Action> {
        self.soft_totals.get(&(total, dealer)).copied()
    }

    pub fn pair_entry(&self, pair_value: u8, dealer: u8) -> Option<Action> {
        self.pair_totals.get(&(pair_value, dealer)).copied()
    }
}

impl Default for BasicStrategy {
    fn default() -> Self {
        BasicStrategy::new()
    }
}

/// Convenience wrapper over the shared tables.
pub fn recommend(hand: &Hand, dealer_up: Card) -> Action {
    BASIC_STRATEGY.recommend(hand, dealer_up)
}

/// Count-driven bet sizing for automated seats: scale the minimum bet by the
/// floored true count when the count is favourable, clamped to the wallet.
pub fn count_bet(min_bet: u32, true_count: f32, wallet: f32) -> u32 {
    let bet = if true_count > 1.0 {
        min_bet * true_count.floor() as u32
    } else {
        min_bet
    };
    u32::min(bet, wallet as u32)
}
