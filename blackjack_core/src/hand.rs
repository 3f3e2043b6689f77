use crate::card::{Card, Rank};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStatus {
    Playing,
    Stand,
    Bust,
    Blackjack,
}

/// A single bet-bearing hand. `Blackjack`, `Bust` and `Stand` are terminal
/// for the round; only the table moves a hand out of `Playing`, except for
/// the automatic bust transition in `add_card`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub bet: u32,
    pub status: HandStatus,
    pub insurance: f32,
    split: bool,
}

impl Hand {
    pub fn new(bet: u32) -> Hand {
        Hand {
            cards: Vec::new(),
            bet,
            status: HandStatus::Playing,
            insurance: 0.0,
            split: false,
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        if self.value() > 21 {
            self.status = HandStatus::Bust;
        }
    }

    /// Point total with the soft reduction: aces count 11, then drop to 1
    /// one at a time while the total is over 21. Order-independent.
    pub fn value(&self) -> u8 {
        let mut total: u8 = self.cards.iter().map(|c| c.rank.value()).sum();
        let mut aces = self.cards.iter().filter(|c| c.rank == Rank::Ace).count();
        while total > 21 && aces > 0 {
            total -= 10;
            aces -= 1;
        }
        total
    }

    /// True while an ace is still counted as 11.
    pub fn is_soft(&self) -> bool {
        let hard: u8 = self
            .cards
            .iter()
            .map(|c| if c.rank == Rank::Ace { 1 } else { c.rank.value() })
            .sum();
        self.cards.iter().any(|c| c.rank == Rank::Ace) && hard + 10 == self.value()
    }

    /// A natural: two cards totalling 21 on a hand that did not come from a
    /// split. A split hand reaching 21 with two cards is a plain 21.
    pub fn is_natural(&self) -> bool {
        !self.split && self.cards.len() == 2 && self.value() == 21
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].rank == self.cards[1].rank
    }

    pub fn is_from_split(&self) -> bool {
        self.split
    }

    pub fn stand(&mut self) {
        self.status = HandStatus::Stand;
    }

    /// Splits a two-card pair: moves the second card into a sibling hand
    /// carrying the same bet, and flags both so a later two-card 21 settles
    /// as a plain 21.
    pub fn split_off(&mut self) -> Hand {
        debug_assert!(self.can_split());
        self.split = true;
        let mut sibling = Hand::new(self.bet);
        sibling.split = true;
        if let Some(card) = self.cards.pop() {
            sibling.cards.push(card);
        }
        sibling
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{}", cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn hand_of(ranks: &[Rank]) -> Hand {
        let mut hand = Hand::new(10);
        for &rank in ranks {
            hand.add_card(Card::new(rank, Suit::Diamonds));
        }
        hand
    }

    #[test]
    fn value_is_stable_under_card_order() {
        let a = hand_of(&[Rank::Ace, Rank::Nine, Rank::Five]);
        let b = hand_of(&[Rank::Five, Rank::Ace, Rank::Nine]);
        let c = hand_of(&[Rank::Nine, Rank::Five, Rank::Ace]);
        assert_eq!(a.value(), 15);
        assert_eq!(a.value(), b.value());
        assert_eq!(b.value(), c.value());
    }

    #[test]
    fn soft_reduction_handles_multiple_aces() {
        assert_eq!(hand_of(&[Rank::Ace, Rank::Ace]).value(), 12);
        assert_eq!(hand_of(&[Rank::Ace, Rank::Ace, Rank::Nine]).value(), 21);
        assert_eq!(hand_of(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::King]).value(), 13);
    }

    #[test]
    fn soft_reduction_never_drops_below_hard_minimum() {
        let hand = hand_of(&[Rank::Ace, Rank::Ace, Rank::King, Rank::Nine]);
        // hard minimum counts every ace as 1
        let hard: u8 = 1 + 1 + 10 + 9;
        assert_eq!(hand.value(), hard);
    }

    #[test]
    fn soft_hand_detection() {
        assert!(hand_of(&[Rank::Ace, Rank::Six]).is_soft());
        assert!(!hand_of(&[Rank::Ace, Rank::Six, Rank::Nine]).is_soft());
        assert!(!hand_of(&[Rank::King, Rank::Six]).is_soft());
    }

    #[test]
    fn two_card_twenty_one_is_a_natural() {
        assert!(hand_of(&[Rank::Ace, Rank::King]).is_natural());
        assert!(!hand_of(&[Rank::Seven, Rank::Seven, Rank::Seven]).is_natural());
    }

    #[test]
    fn split_hands_never_count_as_naturals() {
        let mut hand = hand_of(&[Rank::Ace, Rank::Ace]);
        let mut sibling = hand.split_off();
        hand.add_card(Card::new(Rank::King, Suit::Spades));
        sibling.add_card(Card::new(Rank::Queen, Suit::Spades));
        assert_eq!(hand.value(), 21);
        assert_eq!(sibling.value(), 21);
        assert!(!hand.is_natural());
        assert!(!sibling.is_natural());
    }

    #[test]
    fn split_off_moves_the_second_card_and_copies_the_bet() {
        let mut hand = hand_of(&[Rank::Eight, Rank::Eight]);
        let sibling = hand.split_off();
        assert_eq!(hand.cards.len(), 1);
        assert_eq!(sibling.cards.len(), 1);
        assert_eq!(sibling.bet, hand.bet);
        assert!(hand.is_from_split());
        assert!(sibling.is_from_split());
    }

    #[test]
    fn adding_a_card_over_twenty_one_busts() {
        let mut hand = hand_of(&[Rank::King, Rank::Nine]);
        assert_eq!(hand.status, HandStatus::Playing);
        hand.add_card(Card::new(Rank::Five, Suit::Hearts));
        assert_eq!(hand.status, HandStatus::Bust);
    }

    #[test]
    fn can_split_requires_exactly_two_equal_ranks() {
        assert!(hand_of(&[Rank::Eight, Rank::Eight]).can_split());
        assert!(!hand_of(&[Rank::King, Rank::Queen]).can_split());
        assert!(!hand_of(&[Rank::Eight, Rank::Eight, Rank::Eight]).can_split());
    }
}
