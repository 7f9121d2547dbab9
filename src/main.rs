// EDCA contention simulator CLI
//
// Usage:
//   edca_sim <stas-per-group> <rounds> <ap-aifs> <ap-cw-min> <ap-cw-max> \
//            <sta-aifs> <sta-cw-min> <sta-cw-max> [--seed HEX]
//   edca_sim --scenario experiment.yaml [--seed HEX]

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use log::info;
use simple_logger::SimpleLogger;

use edca_sim::{AccessClass, ContentionParams, ContentionSim, SimConfig};

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Simulation configuration
    config: ScenarioConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ScenarioConfig {
    rounds: usize,

    #[serde(default = "default_groups")]
    groups: usize,

    stas_per_group: usize,

    ap: ClassSpec,
    sta: ClassSpec,
}

#[derive(Debug, serde::Deserialize)]
struct ClassSpec {
    aifs: u32,
    cw_min: u32,
    cw_max: u32,
}

fn default_groups() -> usize {
    2
}

fn main() {
    SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
        process::exit(1);
    }

    let seed = parse_seed_flag(&args);

    let config = if args[1] == "--scenario" {
        if args.len() < 3 {
            usage(&args[0]);
            process::exit(1);
        }
        load_scenario(Path::new(&args[2]), seed)
    } else {
        parse_positional(&args, seed)
    };

    let sim = ContentionSim::new(config).unwrap_or_else(|e| {
        eprintln!("[arguments error] {}", e);
        process::exit(1);
    });

    let result = sim.run();
    result.print_summary();
    info!("reproduce with --seed {}", seed_hex(&result.seed_used));
}

fn usage(bin: &str) {
    eprintln!(
        "Usage: {} <stas-per-group> <rounds> <ap-aifs> <ap-cw-min> <ap-cw-max> \
         <sta-aifs> <sta-cw-min> <sta-cw-max> [--seed HEX]",
        bin
    );
    eprintln!("       {} --scenario <file.yaml> [--seed HEX]", bin);
}

/// Parse the classic eight-integer argument form.
fn parse_positional(args: &[String], seed: Option<[u8; 32]>) -> SimConfig {
    if args.len() < 9 {
        usage(&args[0]);
        process::exit(1);
    }

    let ints: Vec<u64> = args[1..9]
        .iter()
        .map(|a| {
            a.parse().unwrap_or_else(|_| {
                eprintln!("[arguments error] arguments must be non-negative integers");
                process::exit(1);
            })
        })
        .collect();

    SimConfig {
        stas_per_group: ints[0] as usize,
        rounds: ints[1] as usize,
        groups: 2,
        ap: class_params(AccessClass::Ap, ints[2], ints[3], ints[4]),
        sta: class_params(AccessClass::Sta, ints[5], ints[6], ints[7]),
        seed,
    }
}

fn load_scenario(path: &Path, seed: Option<[u8; 32]>) -> SimConfig {
    let yaml_content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path.display(), e);
        process::exit(1);
    });

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml_content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", path.display(), e);
        process::exit(1);
    });

    if let Some(ref name) = scenario.meta.name {
        info!("scenario: {}", name);
    }
    if let Some(ref description) = scenario.meta.description {
        info!("{}", description);
    }

    SimConfig {
        rounds: scenario.config.rounds,
        groups: scenario.config.groups,
        stas_per_group: scenario.config.stas_per_group,
        ap: class_params(
            AccessClass::Ap,
            u64::from(scenario.config.ap.aifs),
            u64::from(scenario.config.ap.cw_min),
            u64::from(scenario.config.ap.cw_max),
        ),
        sta: class_params(
            AccessClass::Sta,
            u64::from(scenario.config.sta.aifs),
            u64::from(scenario.config.sta.cw_min),
            u64::from(scenario.config.sta.cw_max),
        ),
        seed,
    }
}

fn class_params(class: AccessClass, aifs: u64, cw_min: u64, cw_max: u64) -> ContentionParams {
    let narrow = |v: u64| {
        u32::try_from(v).unwrap_or_else(|_| {
            eprintln!("[arguments error] {} parameter {} is out of range", class, v);
            process::exit(1);
        })
    };
    ContentionParams::new(class, narrow(aifs), narrow(cw_min), narrow(cw_max)).unwrap_or_else(|e| {
        eprintln!("[arguments error] {}", e);
        process::exit(1);
    })
}

fn parse_seed_flag(args: &[String]) -> Option<[u8; 32]> {
    args.iter()
        .position(|a| a == "--seed")
        .map(|i| match args.get(i + 1) {
            Some(hex) => parse_seed_hex(hex),
            None => {
                eprintln!("[arguments error] --seed needs a hex value");
                process::exit(1);
            }
        })
}

fn parse_seed_hex(hex: &str) -> [u8; 32] {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut seed = [0u8; 32];

    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        if i >= 32 {
            break;
        }
        let byte_str = std::str::from_utf8(chunk).unwrap_or_else(|_| {
            eprintln!("[arguments error] invalid hex seed");
            process::exit(1);
        });
        seed[i] = u8::from_str_radix(byte_str, 16).unwrap_or_else(|e| {
            eprintln!("[arguments error] invalid hex seed: {}", e);
            process::exit(1);
        });
    }

    seed
}

fn seed_hex(seed: &[u8; 32]) -> String {
    let mut out = String::with_capacity(66);
    out.push_str("0x");
    for byte in seed {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}
