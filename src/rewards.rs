//! Battle rewards.

use crate::core::balance::{
    xp_for_level, GOLD_BASE, GOLD_PER_LEVEL, LEVELS_PER_SHARD, XP_REWARD_DIVISOR,
};
use serde::{Deserialize, Serialize};

/// What a finished battle pays out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub xp: u64,
    pub gold: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relics: Option<Vec<String>>,
}

impl Rewards {
    /// Nothing at all. Used for losses and escapes.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.xp == 0
            && self.gold == 0
            && self.shards.unwrap_or(0) == 0
            && self.relics.as_ref().map_or(true, Vec::is_empty)
    }
}

/// Rewards for a victory at the given player level.
pub fn rewards_for_level(level: u32) -> Rewards {
    let level = level.max(1);
    let shards = level / LEVELS_PER_SHARD;
    Rewards {
        xp: xp_for_level(level) / XP_REWARD_DIVISOR,
        gold: GOLD_BASE + GOLD_PER_LEVEL * level as u64,
        shards: (shards > 0).then_some(shards),
        relics: None,
    }
}
