//! Battle balance simulator CLI.
//!
//! Run seeded battles to analyze demon balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # 1000 runs vs the imp
//!   cargo run --bin simulate -- -n 100 -d mortgage_wyrm --boss
//!   cargo run --bin simulate -- --seed 42 --policy cautious
//!   cargo run --bin simulate -- --skills my_skills.json --demons my_demons.json

use demon_duel::simulator::{run_simulation, SimConfig, SimPolicy};
use demon_duel::{Catalog, DemonRegistry, SkillRegistry};
use std::env;
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct CliArgs {
    config: SimConfig,
    skills_path: Option<String>,
    demons_path: Option<String>,
    write_json: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args);
    init_tracing(cli.config.log_level());

    let catalog = match load_catalog(&cli) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            eprintln!("Failed to load content: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = &cli.config;
    if config.shows_banner() {
        print_banner(config);
    }

    let report = match run_simulation(config, catalog) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", report.to_text());

    if cli.write_json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        if let Err(e) = fs::write(&filename, report.to_json()) {
            eprintln!("Failed to write JSON report: {e}");
            return ExitCode::FAILURE;
        }
        println!("JSON report saved to: {}", filename);
    }

    ExitCode::SUCCESS
}

fn print_banner(config: &SimConfig) {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              DEMON DUEL BALANCE SIMULATOR                     ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Demon:          {}", config.demon_id);
    println!("  Player Level:   {}", config.player_level);
    println!("  Policy:         {:?}", config.policy);
    println!("  Max Rounds:     {}", config.max_rounds);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_catalog(cli: &CliArgs) -> Result<Catalog, Box<dyn std::error::Error>> {
    match (&cli.skills_path, &cli.demons_path) {
        (None, None) => Ok(Catalog::builtin()?),
        (skills, demons) => {
            let builtin = Catalog::builtin()?;
            let skills = match skills {
                Some(path) => SkillRegistry::from_json(&fs::read_to_string(path)?)?,
                None => builtin.skills,
            };
            let demons = match demons {
                Some(path) => DemonRegistry::from_json(&fs::read_to_string(path)?)?,
                None => builtin.demons,
            };
            Ok(Catalog::new(skills, demons)?)
        }
    }
}

fn parse_args(args: &[String]) -> CliArgs {
    let mut config = SimConfig::default();
    let mut skills_path = None;
    let mut demons_path = None;
    let mut write_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-d" | "--demon" => {
                if i + 1 < args.len() {
                    config.demon_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-l" | "--level" => {
                if i + 1 < args.len() {
                    config.player_level = args[i + 1].parse().unwrap_or(1);
                    i += 1;
                }
            }
            "-r" | "--rounds" => {
                if i + 1 < args.len() {
                    config.max_rounds = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "-p" | "--policy" => {
                if i + 1 < args.len() {
                    match SimPolicy::parse(&args[i + 1]) {
                        Some(policy) => config.policy = policy,
                        None => eprintln!("Unknown policy {}, keeping current", args[i + 1]),
                    }
                    i += 1;
                }
            }
            "--boss" => {
                let boss = SimConfig::boss_test();
                config.player = boss.player;
                config.player_level = boss.player_level;
                config.policy = boss.policy;
            }
            "--skills" => {
                if i + 1 < args.len() {
                    skills_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--demons" => {
                if i + 1 < args.len() {
                    demons_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--json" => {
                write_json = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = config.verbosity.saturating_add(1);
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    CliArgs {
        config,
        skills_path,
        demons_path,
        write_json,
    }
}

fn print_help() {
    println!("Demon Duel Balance Simulator");
    println!();
    println!("USAGE:");
    println!("  simulate [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -n, --runs <N>       Number of battles (default: 1000)");
    println!("  -d, --demon <ID>     Demon to fight (default: minimum_payment_imp)");
    println!("  -s, --seed <SEED>    Master seed for reproducible runs");
    println!("  -l, --level <N>      Player level (default: 1)");
    println!("  -r, --rounds <N>     Round cap per battle (default: 200)");
    println!("  -p, --policy <P>     attack | cautious | skill:<id>");
    println!("  --boss               Use the geared boss-fight player build");
    println!("  --skills <FILE>      Load skills from a JSON file");
    println!("  --demons <FILE>      Load demons from a JSON file");
    println!("  --json               Save a JSON report");
    println!("  -v, --verbose        More output (repeatable)");
    println!("  -q, --quiet          Only the report");
    println!("  -h, --help           Show this help");
}
