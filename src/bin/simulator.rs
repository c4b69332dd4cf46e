//! Gacha Arena Headless Balance Simulator
//!
//! Runs pulls and auto-battles without any game client, using the same pull,
//! battle and reward functions the game uses.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --pulls N         Pulls to simulate (default: 10000)
//!   --multi           Pull in batches of ten
//!   --pity N          Starting pity counter (default: 0)
//!   --battles N       Auto-battles to run (default: 100)
//!   --difficulty D    easy | normal | hard | nightmare (default: normal)
//!   --seed N          RNG seed (default: 42)
//!   --data FILE       Catalog and banner JSON (default: built-in sample)
//!   --banner ID       Banner to pull on (default: first banner)
//!   --verbose         Per-battle lines and debug logging
//!   --quiet           Only final summary line

use gacha_arena::config::GameData;
use gacha_arena::rewards::types::Difficulty;
use gacha_arena::simulator::{run_simulation, sample_game_data, SimConfig};
use tracing_subscriber::EnvFilter;

// ── CLI Configuration ────────────────────────────────────────────────

struct CliConfig {
    sim: SimConfig,
    data_path: Option<String>,
    banner: Option<String>,
    quiet: bool,
}

fn parse_difficulty(name: &str) -> Difficulty {
    match name.to_lowercase().as_str() {
        "easy" => Difficulty::Easy,
        "normal" => Difficulty::Normal,
        "hard" => Difficulty::Hard,
        "nightmare" => Difficulty::Nightmare,
        other => {
            eprintln!("Unknown difficulty: {other}");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn parse_args() -> CliConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = CliConfig {
        sim: SimConfig {
            seed: Some(42),
            ..Default::default()
        },
        data_path: None,
        banner: None,
        quiet: false,
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--pulls" => {
                i += 1;
                config.sim.pulls = args[i].parse().expect("--pulls requires a number");
            }
            "--multi" => config.sim.multi = true,
            "--pity" => {
                i += 1;
                config.sim.starting_pity = args[i].parse().expect("--pity requires a number");
            }
            "--battles" => {
                i += 1;
                config.sim.battles = args[i].parse().expect("--battles requires a number");
            }
            "--difficulty" => {
                i += 1;
                config.sim.difficulty = parse_difficulty(&args[i]);
            }
            "--seed" => {
                i += 1;
                config.sim.seed = Some(args[i].parse().expect("--seed requires a number"));
            }
            "--data" => {
                i += 1;
                config.data_path = Some(args[i].clone());
            }
            "--banner" => {
                i += 1;
                config.banner = Some(args[i].clone());
            }
            "--verbose" => config.sim.verbosity = 2,
            "--quiet" => {
                config.quiet = true;
                config.sim.verbosity = 0;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn print_usage() {
    eprintln!(
        "Gacha Arena Headless Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --pulls N         Pulls to simulate (default: 10000)\n\
         \x20 --multi           Pull in batches of ten\n\
         \x20 --pity N          Starting pity counter (default: 0)\n\
         \x20 --battles N       Auto-battles to run (default: 100)\n\
         \x20 --difficulty D    easy | normal | hard | nightmare (default: normal)\n\
         \x20 --seed N          RNG seed (default: 42)\n\
         \x20 --data FILE       Catalog and banner JSON (default: built-in sample)\n\
         \x20 --banner ID       Banner to pull on (default: first banner)\n\
         \x20 --verbose         Per-battle lines and debug logging\n\
         \x20 --quiet           Only final summary line\n\
         \x20 --help, -h        Show this help"
    );
}

fn init_tracing(verbosity: u8) {
    let default_level = if verbosity >= 2 { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let config = parse_args();
    init_tracing(config.sim.verbosity);

    let data = match &config.data_path {
        Some(path) => match GameData::from_path(path) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("Failed to load {path}: {err}");
                std::process::exit(1);
            }
        },
        None => sample_game_data(),
    };

    if !config.quiet {
        eprintln!(
            "Gacha Arena Simulator: {} pull(s){} from pity {}, {} battle(s) on {:?}, seed={}",
            config.sim.pulls,
            if config.sim.multi { " in 10-pulls" } else { "" },
            config.sim.starting_pity,
            config.sim.battles,
            config.sim.difficulty,
            config.sim.seed.unwrap_or_default(),
        );
    }

    match run_simulation(&config.sim, &data, config.banner.as_deref()) {
        Ok(report) if config.quiet => println!("{}", report.summary_line()),
        Ok(report) => print!("{}", report.to_text()),
        Err(err) => {
            eprintln!("Simulation failed: {err}");
            std::process::exit(1);
        }
    }
}
