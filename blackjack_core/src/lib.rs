pub mod card;
pub mod count;
pub mod error;
pub mod hand;
pub mod player;
pub mod shoe;
pub mod strategy;
pub mod table;

pub mod prelude {
    pub use super::card::{Card, Rank, Suit, RANKS, SUITS};
    pub use super::count::HiLoCount;
    pub use super::error::GameError;
    pub use super::hand::{Hand, HandStatus};
    pub use super::player::Player;
    pub use super::shoe::Shoe;
    pub use super::strategy::{count_bet, recommend, Action, BasicStrategy, BASIC_STRATEGY};
    pub use super::table::{
        BlackjackTable, Decider, HandResult, Outcome, RoundOutcome, RoundSummary, SeatLedger,
        TableEvent, TurnState,
    };
    pub use super::{GameConfig, GameConfigBuilder};
}

use error::GameError;

/// Table rules and limits for one session. A bet is bounded below by
/// `min_bet` and above only by the seat's wallet.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub num_decks: u32,
    pub num_cpu_players: u32,
    pub penetration: f32,
    pub min_bet: u32,
    pub starting_wallet: f32,
    pub hits_soft_17: bool,
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Returns a new `GameConfigBuilder`; unset fields take the standard
    /// six-deck table defaults.
    pub fn new() -> GameConfigBuilder {
        GameConfigBuilder {
            num_decks: None,
            num_cpu_players: None,
            penetration: None,
            min_bet: None,
            starting_wallet: None,
            hits_soft_17: None,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(1..=8).contains(&self.num_decks) {
            return Err(GameError::InvalidConfig(format!(
                "num_decks must be between 1 and 8, got {}",
                self.num_decks
            )));
        }
        if self.num_cpu_players > 4 {
            return Err(GameError::InvalidConfig(format!(
                "at most 4 automated seats are supported, got {}",
                self.num_cpu_players
            )));
        }
        if !(0.1..=0.8).contains(&self.penetration) {
            return Err(GameError::InvalidConfig(format!(
                "penetration must be between 0.1 and 0.8, got {}",
                self.penetration
            )));
        }
        if self.min_bet == 0 {
            return Err(GameError::InvalidConfig(
                "the minimum bet must be at least 1".to_string(),
            ));
        }
        if self.starting_wallet < self.min_bet as f32 {
            return Err(GameError::InvalidConfig(format!(
                "starting wallet {} cannot cover the minimum bet {}",
                self.starting_wallet, self.min_bet
            )));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::new().build()
    }
}

/// Builder for `GameConfig`.
#[derive(Debug, Clone, Copy)]
pub struct GameConfigBuilder {
    num_decks: Option<u32>,
    num_cpu_players: Option<u32>,
    penetration: Option<f32>,
    min_bet: Option<u32>,
    starting_wallet: Option<f32>,
    hits_soft_17: Option<bool>,
    seed: Option<u64>,
}

impl GameConfigBuilder {
    /// Number of decks in the shoe, 1 through 8.
    pub fn num_decks(&mut self, decks: u32) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    /// Number of automated seats playing alongside the human.
    pub fn num_cpu_players(&mut self, players: u32) -> &mut Self {
        self.num_cpu_players = Some(players);
        self
    }

    /// Remaining-shoe fraction below which the table reshuffles between
    /// rounds, e.g. 0.25 for a quarter of the shoe.
    pub fn penetration(&mut self, penetration: f32) -> &mut Self {
        self.penetration = Some(penetration);
        self
    }

    pub fn min_bet(&mut self, bet: u32) -> &mut Self {
        self.min_bet = Some(bet);
        self
    }

    /// Bankroll every seat starts the session with.
    pub fn starting_wallet(&mut self, wallet: f32) -> &mut Self {
        self.starting_wallet = Some(wallet);
        self
    }

    /// Whether the dealer hits a soft seventeen.
    pub fn hits_soft_17(&mut self, hits: bool) -> &mut Self {
        self.hits_soft_17 = Some(hits);
        self
    }

    /// Fixes the shuffle order for reproducible sessions.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(&mut self) -> GameConfig {
        GameConfig {
            num_decks: self.num_decks.unwrap_or(6),
            num_cpu_players: self.num_cpu_players.unwrap_or(2),
            penetration: self.penetration.unwrap_or(0.25),
            min_bet: self.min_bet.unwrap_or(10),
            starting_wallet: self.starting_wallet.unwrap_or(1000.0),
            hits_soft_17: self.hits_soft_17.unwrap_or(true),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_six_deck_table() {
        let config = GameConfig::default();
        assert_eq!(config.num_decks, 6);
        assert_eq!(config.min_bet, 10);
        assert!(config.hits_soft_17);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides_stick() {
        let config = GameConfig::new()
            .num_decks(2)
            .num_cpu_players(4)
            .penetration(0.5)
            .min_bet(25)
            .starting_wallet(250.0)
            .seed(7)
            .build();
        assert_eq!(config.num_decks, 2);
        assert_eq!(config.num_cpu_players, 4);
        assert_eq!(config.penetration, 0.5);
        assert_eq!(config.min_bet, 25);
        assert_eq!(config.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_settings() {
        assert!(GameConfig::new().num_decks(0).build().validate().is_err());
        assert!(GameConfig::new().num_decks(9).build().validate().is_err());
        assert!(GameConfig::new().num_cpu_players(5).build().validate().is_err());
        assert!(GameConfig::new().penetration(0.95).build().validate().is_err());
        assert!(GameConfig::new().min_bet(0).build().validate().is_err());
        assert!(GameConfig::new().starting_wallet(5.0).build().validate().is_err());
    }
}
