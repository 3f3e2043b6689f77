use crate::card::{Card, RANKS, SUITS};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A dealing shoe backed by `num_decks` standard 52-card decks.
///
/// Cards come off the top in an order fixed by the shuffle. The shoe never
/// runs dry from the caller's point of view: the table rebuilds it whenever
/// the remaining fraction drops below the penetration threshold, and `draw`
/// rebuilds on its own as a last resort.
pub struct Shoe {
    pub(crate) cards: Vec<Card>,
    num_decks: u32,
    pub(crate) penetration: f32,
    rng: StdRng,
}

impl Shoe {
    pub fn new(num_decks: u32, penetration: f32) -> Shoe {
        Shoe::from_rng(num_decks, penetration, StdRng::from_entropy())
    }

    /// A shoe with a deterministic shuffle order, for reproducible sessions.
    pub fn with_seed(num_decks: u32, penetration: f32, seed: u64) -> Shoe {
        Shoe::from_rng(num_decks, penetration, StdRng::seed_from_u64(seed))
    }

    fn from_rng(num_decks: u32, penetration: f32, rng: StdRng) -> Shoe {
        let mut shoe = Shoe {
            cards: Vec::with_capacity(52 * num_decks as usize),
            num_decks,
            penetration,
            rng,
        };
        shoe.rebuild();
        shoe
    }

    /// Refills the shoe to `52 * num_decks` cards and reshuffles.
    pub fn rebuild(&mut self) {
        self.cards.clear();
        for _ in 0..self.num_decks {
            for suit in SUITS {
                for rank in RANKS {
                    self.cards.push(Card::new(rank, suit));
                }
            }
        }
        self.cards.shuffle(&mut self.rng);
        info!("shoe rebuilt with {} cards", self.cards.len());
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Card {
        if self.cards.is_empty() {
            self.rebuild();
        }
        self.cards.pop().expect("a rebuilt shoe holds at least one deck")
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn capacity(&self) -> usize {
        52 * self.num_decks as usize
    }

    pub fn remaining_fraction(&self) -> f32 {
        self.cards.len() as f32 / self.capacity() as f32
    }

    /// True once the remaining fraction has dropped below the penetration
    /// threshold. Checked by the table before every round.
    pub fn needs_shuffle(&self) -> bool {
        self.remaining_fraction() < self.penetration
    }

    /// Deck-equivalents still in the shoe, for true-count normalisation.
    pub fn decks_remaining(&self) -> f32 {
        self.cards.len() as f32 / 52.0
    }

    pub fn num_decks(&self) -> u32 {
        self.num_decks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_is_a_multiple_of_fifty_two() {
        for decks in 1..=8 {
            let shoe = Shoe::with_seed(decks, 0.25, 7);
            assert_eq!(shoe.len(), 52 * decks as usize);
            assert_eq!(shoe.len() % 52, 0);
        }
    }

    #[test]
    fn draw_removes_exactly_one_card() {
        let mut shoe = Shoe::with_seed(2, 0.25, 7);
        let before = shoe.len();
        shoe.draw();
        assert_eq!(shoe.len(), before - 1);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let mut a = Shoe::with_seed(1, 0.25, 99);
        let mut b = Shoe::with_seed(1, 0.25, 99);
        for _ in 0..52 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn penetration_half_trips_below_twenty_six_cards() {
        let mut shoe = Shoe::with_seed(1, 0.5, 42);
        for _ in 0..26 {
            shoe.draw();
        }
        // exactly half left: not yet below the threshold
        assert_eq!(shoe.len(), 26);
        assert!(!shoe.needs_shuffle());
        shoe.draw();
        assert!(shoe.needs_shuffle());
        shoe.rebuild();
        assert_eq!(shoe.len(), 52);
    }

    #[test]
    fn draw_on_an_empty_shoe_rebuilds() {
        let mut shoe = Shoe::with_seed(1, 0.25, 3);
        for _ in 0..52 {
            shoe.draw();
        }
        assert!(shoe.is_empty());
        shoe.draw();
        assert_eq!(shoe.len(), 51);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut shoe = Shoe::with_seed(3, 0.25, 11);
        assert_eq!(shoe.capacity(), 156);
        for _ in 0..200 {
            shoe.draw();
            assert!(shoe.len() <= shoe.capacity());
        }
    }
}
