//! Battle balance simulator.
//!
//! Plays thousands of seeded battles to analyze:
//! - Win/lose/flee rates for a demon against a player build
//! - How many rounds fights take
//! - How much HP the player walks away with
//!
//! Battles run through `BattleSession`, so results match real play. A fixed
//! master seed reproduces the same report, log fingerprints included.

mod config;
mod report;
mod runner;

pub use config::{default_player, SimConfig, SimPolicy};
pub use report::{fingerprint_log, RunStats, SimReport};
pub use runner::{run_simulation, simulate_single_battle};
