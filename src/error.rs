//! Error types for content loading and battle sessions.
//!
//! The engine's transition functions never fail; these cover the edges where
//! bad content or a misused session can be caught early.

use crate::session::BattlePhase;
use thiserror::Error;

/// Problems found while loading or validating skill and demon content.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate skill id: {0}")]
    DuplicateSkill(String),

    #[error("Duplicate demon id: {0}")]
    DuplicateDemon(String),

    #[error("Demon {demon} references unknown skill {skill}")]
    UnknownSkill { demon: String, skill: String },

    #[error("Unknown demon: {0}")]
    UnknownDemon(String),

    #[error("Demon {0} has an empty move-set")]
    EmptyMoveSet(String),

    #[error("Invalid stat for {owner}: {reason}")]
    InvalidStat { owner: String, reason: String },
}

impl ConfigError {
    pub fn invalid_stat(owner: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStat {
            owner: owner.into(),
            reason: reason.into(),
        }
    }
}

/// Misuse of a battle session.
#[derive(Debug, Error)]
pub enum BattleError {
    #[error("{operation} is not allowed during {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: BattlePhase,
    },

    #[error("No battle is in progress")]
    NoActiveBattle,

    #[error("Input is locked")]
    InputLocked,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BattleError {
    pub fn invalid_phase(operation: &'static str, phase: BattlePhase) -> Self {
        Self::InvalidPhase { operation, phase }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::UnknownSkill {
            demon: "overdraft".to_string(),
            skill: "nope".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Demon overdraft references unknown skill nope"
        );

        let err = BattleError::invalid_phase("emit_outcome", BattlePhase::Idle);
        assert_eq!(err.to_string(), "emit_outcome is not allowed during Idle");
    }

    #[test]
    fn test_config_error_converts() {
        let err: BattleError = ConfigError::UnknownDemon("x".to_string()).into();
        assert!(matches!(
            err,
            BattleError::Config(ConfigError::UnknownDemon(_))
        ));
    }
}
