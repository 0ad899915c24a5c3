//! Simulation report generation.

use super::config::{SimConfig, SimPolicy};
use crate::combat::types::BattleOutcome;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;

/// Stats from one simulated battle.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub seed: u32,
    /// `None` when the battle hit the round cap.
    pub outcome: Option<BattleOutcome>,
    pub rounds: u32,
    pub player_hp_left: u32,
    pub damage_dealt: u32,
    pub xp_gained: u64,
    /// SHA-256 of the battle log, oldest line first.
    pub log_fingerprint: String,
}

/// Aggregated results from multiple simulated battles.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub demon_id: String,
    pub policy: SimPolicy,
    pub num_runs: u32,
    pub wins: u32,
    pub losses: u32,
    pub fled: u32,
    pub timed_out: u32,

    pub win_rate: f64,
    pub avg_rounds: f64,
    pub avg_rounds_to_win: f64,
    pub avg_player_hp_left: f64,
    pub avg_damage_dealt: f64,

    /// Fingerprint of the first battle; identical across runs with the same seed.
    pub first_fingerprint: Option<String>,

    pub runs: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, config: &SimConfig) -> Self {
        let num_runs = runs.len() as u32;
        let count = |outcome: Option<BattleOutcome>| {
            runs.iter().filter(|r| r.outcome == outcome).count() as u32
        };
        let wins = count(Some(BattleOutcome::Win));
        let losses = count(Some(BattleOutcome::Lose));
        let fled = count(Some(BattleOutcome::Flee));
        let timed_out = count(None);

        let divisor = num_runs.max(1) as f64;
        let avg_rounds = runs.iter().map(|r| r.rounds as f64).sum::<f64>() / divisor;
        let avg_rounds_to_win = runs
            .iter()
            .filter(|r| r.outcome == Some(BattleOutcome::Win))
            .map(|r| r.rounds as f64)
            .sum::<f64>()
            / wins.max(1) as f64;
        let avg_player_hp_left =
            runs.iter().map(|r| r.player_hp_left as f64).sum::<f64>() / divisor;
        let avg_damage_dealt = runs.iter().map(|r| r.damage_dealt as f64).sum::<f64>() / divisor;

        Self {
            demon_id: config.demon_id.clone(),
            policy: config.policy.clone(),
            num_runs,
            wins,
            losses,
            fled,
            timed_out,
            win_rate: wins as f64 / divisor,
            avg_rounds,
            avg_rounds_to_win,
            avg_player_hp_left,
            avg_damage_dealt,
            first_fingerprint: runs.first().map(|r| r.log_fingerprint.clone()),
            runs,
        }
    }

    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Demon: {}   Policy: {:?}\n",
            self.demon_id, self.policy
        ));
        report.push_str(&format!(
            "Runs: {} total, {} won, {} lost, {} fled, {} timed out\n\n",
            self.num_runs, self.wins, self.losses, self.fled, self.timed_out
        ));

        report.push_str("── BATTLES ──────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Win Rate:            {:.1}%\n",
            self.win_rate * 100.0
        ));
        report.push_str(&format!("  Avg Rounds:          {:.1}\n", self.avg_rounds));
        report.push_str(&format!(
            "  Avg Rounds to Win:   {:.1}\n",
            self.avg_rounds_to_win
        ));
        report.push_str(&format!(
            "  Avg Player HP Left:  {:.1}\n",
            self.avg_player_hp_left
        ));
        report.push_str(&format!(
            "  Avg Damage Dealt:    {:.1}\n\n",
            self.avg_damage_dealt
        ));

        if let Some(fingerprint) = &self.first_fingerprint {
            report.push_str("── REPLAY ───────────────────────────────────────────────────────\n");
            report.push_str(&format!("  First Battle Log:    {}\n", fingerprint));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Hash a newest-first battle log in chronological order.
pub fn fingerprint_log(log: &VecDeque<String>) -> String {
    let mut hasher = Sha256::new();
    for line in log.iter().rev() {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(outcome: Option<BattleOutcome>, rounds: u32) -> RunStats {
        RunStats {
            seed: 1,
            outcome,
            rounds,
            player_hp_left: 50,
            damage_dealt: 40,
            xp_gained: 0,
            log_fingerprint: format!("fp{rounds}"),
        }
    }

    #[test]
    fn test_report_aggregates() {
        let runs = vec![
            run(Some(BattleOutcome::Win), 2),
            run(Some(BattleOutcome::Win), 4),
            run(Some(BattleOutcome::Lose), 6),
            run(None, 8),
        ];
        let report = SimReport::from_runs(runs, &SimConfig::default());
        assert_eq!(report.wins, 2);
        assert_eq!(report.losses, 1);
        assert_eq!(report.fled, 0);
        assert_eq!(report.timed_out, 1);
        assert_eq!(report.win_rate, 0.5);
        assert_eq!(report.avg_rounds, 5.0);
        assert_eq!(report.avg_rounds_to_win, 3.0);
        assert_eq!(report.first_fingerprint.as_deref(), Some("fp2"));
    }

    #[test]
    fn test_empty_report_does_not_divide_by_zero() {
        let report = SimReport::from_runs(vec![], &SimConfig::default());
        assert_eq!(report.num_runs, 0);
        assert_eq!(report.avg_rounds, 0.0);
        assert!(report.first_fingerprint.is_none());
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        let a: VecDeque<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        let b: VecDeque<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_ne!(fingerprint_log(&a), fingerprint_log(&b));
        assert_eq!(fingerprint_log(&a), fingerprint_log(&a.clone()));
        assert_eq!(fingerprint_log(&a).len(), 64);
    }

    #[test]
    fn test_json_contains_counts() {
        let report = SimReport::from_runs(
            vec![run(Some(BattleOutcome::Flee), 1)],
            &SimConfig::default(),
        );
        let json = report.to_json();
        assert!(json.contains("\"fled\": 1"));
        assert!(json.contains("\"outcome\": \"flee\""));
    }
}
