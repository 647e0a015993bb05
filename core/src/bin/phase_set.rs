//! Prints a generated phase set as JSON.
//!
//! ```text
//! phase_set --phase assessment --count 10 --seed 42 [--parallel]
//! ```
//!
//! Honors `RUST_LOG`, `RAYON_NUM_THREADS`, `KNAPSACK_MAX_ATTEMPTS` and
//! `KNAPSACK_ENUMERATION_BUDGET`.

use std::process;

use log::{error, info};

use knapsack_core::{GeneratorSettings, Phase, PhaseSetBuilder};

struct Args {
    phase: Phase,
    count: usize,
    seed: u32,
    parallel: bool,
}

fn usage() -> ! {
    eprintln!("Usage: phase_set --phase <introductory|calibration|assessment> [--count N] [--seed S] [--parallel]");
    process::exit(2);
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    match value.and_then(|v| v.parse().ok()) {
        Some(parsed) => parsed,
        None => {
            eprintln!("Invalid {} value: {:?}", flag, value);
            usage();
        }
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut phase: Option<Phase> = None;
    let mut count = 10usize;
    let mut seed = 42u32;
    let mut parallel = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--phase" => {
                i += 1;
                phase = Some(parse_value("--phase", args.get(i)));
            }
            "--count" => {
                i += 1;
                count = parse_value("--count", args.get(i));
            }
            "--seed" => {
                i += 1;
                seed = parse_value("--seed", args.get(i));
            }
            "--parallel" => parallel = true,
            "--help" | "-h" => usage(),
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
            }
        }
        i += 1;
    }

    let phase = phase.unwrap_or_else(|| usage());
    Args {
        phase,
        count,
        seed,
        parallel,
    }
}

/// Sizes the global rayon pool from `RAYON_NUM_THREADS`; rayon's own
/// default applies when unset.
fn init_rayon_threads() {
    let threads = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok());
    if let Some(threads) = threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            error!("Failed to size rayon pool: {}", e);
        }
    }
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let settings = GeneratorSettings::from_env();
    info!(
        "settings: max_attempts={} enumeration_budget={}",
        settings.max_attempts, settings.enumeration_budget
    );

    let builder = PhaseSetBuilder::new(settings);
    let result = if args.parallel {
        init_rayon_threads();
        builder.build_parallel(args.phase, args.count, args.seed)
    } else {
        builder.build(args.phase, args.count, args.seed)
    };

    let set = match result {
        Ok(set) => set,
        Err(e) => {
            error!("Could not produce a valid question set: {}", e);
            process::exit(1);
        }
    };

    match set.to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize phase set: {}", e);
            process::exit(1);
        }
    }
}
