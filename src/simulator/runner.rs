//! Main simulation runner.
//!
//! Every battle goes through `BattleSession`, so simulated battles follow the
//! same round order, outcome checks, and rewards as real ones.

use super::config::SimConfig;
use super::report::{fingerprint_log, RunStats, SimReport};
use crate::catalog::Catalog;
use crate::error::BattleError;
use crate::session::{BattleEntities, BattleSession, SessionConfig, SystemClock};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, info};

/// Run the full simulation and return a report.
pub fn run_simulation(
    config: &SimConfig,
    catalog: Arc<Catalog>,
) -> Result<SimReport, BattleError> {
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut session = BattleSession::new(catalog, Arc::new(SystemClock), SessionConfig::headless());
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let battle_seed: u32 = rng.gen();
        let run = simulate_single_battle(&mut session, config, battle_seed)?;

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - seed {}, {:?} after {} rounds, player HP {}",
                run_idx + 1,
                config.num_runs,
                run.seed,
                run.outcome,
                run.rounds,
                run.player_hp_left
            );
        }
        all_runs.push(run);
    }

    let report = SimReport::from_runs(all_runs, config);
    info!(
        runs = report.num_runs,
        wins = report.wins,
        losses = report.losses,
        "simulation finished"
    );
    Ok(report)
}

/// Play one battle to its end or to the round cap.
pub fn simulate_single_battle(
    session: &mut BattleSession,
    config: &SimConfig,
    seed: u32,
) -> Result<RunStats, BattleError> {
    session.reset_battle();
    session.start_battle(
        &config.demon_id,
        BattleEntities {
            player: config.player.clone(),
            player_level: config.player_level,
            seed: Some(seed),
        },
    )?;

    let mut outcome = None;
    while outcome.is_none() {
        let Some(engine) = session.engine() else {
            return Err(BattleError::NoActiveBattle);
        };
        if engine.round > config.max_rounds {
            debug!(seed, "battle timed out");
            break;
        }
        let action = config.policy.choose(engine);
        outcome = session.submit(action)?;
    }

    let engine = session.engine().ok_or(BattleError::NoActiveBattle)?;
    Ok(RunStats {
        seed,
        outcome,
        rounds: if outcome.is_some() {
            engine.round
        } else {
            engine.round - 1
        },
        player_hp_left: engine.player.hp,
        damage_dealt: engine.demon.max_hp.saturating_sub(engine.demon.hp),
        xp_gained: session.rewards().map_or(0, |r| r.xp),
        log_fingerprint: fingerprint_log(&engine.log),
    })
}
