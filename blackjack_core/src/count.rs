use crate::card::Card;

/// Hi-Lo running count over every card that has become visible.
///
/// The dealer hole card is a deferred observation: the table feeds it in at
/// reveal time, never earlier and never skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiLoCount {
    running: i32,
}

impl HiLoCount {
    pub fn new() -> HiLoCount {
        HiLoCount { running: 0 }
    }

    pub fn observe(&mut self, card: Card) {
        self.running += card.rank.hi_lo();
    }

    pub fn running_count(&self) -> i32 {
        self.running
    }

    /// Running count normalised by decks remaining, floored at one
    /// deck-equivalent. An empty shoe reads as 0.
    pub fn true_count(&self, decks_remaining: f32) -> f32 {
        if decks_remaining <= 0.0 {
            return 0.0;
        }
        self.running as f32 / decks_remaining.max(1.0)
    }

    pub fn reset(&mut self) {
        self.running = 0;
    }
}
