use thiserror::Error;

use crate::player::StrategyMode;

/// Errors raised by the simulation core.
#[derive(Debug, Error)]
pub enum WakkaError {
    /// A player strategy setting did not name any known strategy.
    #[error("invalid player strategy mode: {0}")]
    InvalidStrategyMode(i32),

    /// The selected strategy has no implementation.
    #[error("player strategy {0:?} is not implemented")]
    StrategyNotImplemented(StrategyMode),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A serialized configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T, E = WakkaError> = std::result::Result<T, E>;
