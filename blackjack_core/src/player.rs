use crate::hand::Hand;

/// A seated player: one human or automated seat with a wallet and the hands
/// it holds this round. The dealer's hand is owned by the table, not by a
/// `Player`.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub is_human: bool,
    pub wallet: f32,
    pub hands: Vec<Hand>,
}

impl Player {
    pub fn new(name: impl Into<String>, is_human: bool, wallet: f32) -> Player {
        Player {
            name: name.into(),
            is_human,
            wallet,
            hands: Vec::new(),
        }
    }

    /// Whether the player can cover the table minimum this round.
    pub fn can_play(&self, min_bet: u32) -> bool {
        self.wallet >= min_bet as f32
    }

    pub fn clear_hands(&mut self) {
        self.hands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_play_compares_wallet_to_the_minimum() {
        let mut player = Player::new("You", true, 12.0);
        assert!(player.can_play(10));
        player.wallet = 9.5;
        assert!(!player.can_play(10));
    }
}
