use crate::strategy::Action;
use thiserror::Error;

/// Errors surfaced by the table to its caller. Automated seats never
/// trigger these; they come from human input or bad configuration.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("bet of {bet} is outside the allowed range [{min}, {max}]")]
    InvalidBet { bet: u32, min: u32, max: u32 },

    #[error("{action} is not a legal action for this hand")]
    IllegalAction { action: Action },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_values() {
        let err = GameError::InvalidBet { bet: 5, min: 10, max: 1000 };
        assert_eq!(err.to_string(), "bet of 5 is outside the allowed range [10, 1000]");
        let err = GameError::IllegalAction { action: Action::Split };
        assert_eq!(err.to_string(), "split is not a legal action for this hand");
    }
}
