//! # World Check
//!
//! Builds an authoritative and a presentation instance from the same config,
//! independently, and verifies they agree bit for bit.
//!
//! ## Usage
//!
//! ```bash
//! # Default config
//! ./world_check
//!
//! # Config file
//! ./world_check world.toml
//!
//! # Seed override
//! ./world_check world.toml 1337
//! ```
//!
//! Exits with status 1 on any divergence and 2 on a bad config.

use std::process::ExitCode;
use std::time::Instant;

use highland::{compare, World, WorldConfig};
use highland_procedural::{plateaus, WorldSeed};

fn load_config(args: &[String]) -> Result<WorldConfig, String> {
    let mut config = match args.get(1) {
        Some(path) => WorldConfig::from_toml_file(path).map_err(|e| format!("{path}: {e}"))?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.get(2) {
        let seed: u64 = seed.parse().map_err(|e| format!("seed {seed:?}: {e}"))?;
        config.seed = WorldSeed::new(seed);
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn build(label: &str, config: &WorldConfig) -> Option<World> {
    let start = Instant::now();
    match World::new(config) {
        Ok(world) => {
            println!(
                "   ✓ {label:<14} fingerprint {}  ({:.1} ms)",
                world.fingerprint(),
                start.elapsed().as_secs_f64() * 1000.0
            );
            Some(world)
        }
        Err(e) => {
            eprintln!("   ✗ {label}: {e}");
            None
        }
    }
}

fn main() -> ExitCode {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    HIGHLAND WORLD CHECK v0.1.0");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("   ✗ FATAL: {e}");
            return ExitCode::from(2);
        }
    };

    println!("  Seed:       {}", config.seed.value());
    println!("  Size:       {} x {}", config.width, config.height);
    println!("  Tile size:  {}", config.tile_size);
    println!("  Biomes:     {:?}", config.generation.climate.mode);
    println!();

    println!("🌍 Building instances ...");
    let Some(authoritative) = build("authoritative", &config) else {
        return ExitCode::from(2);
    };
    let Some(presentation) = build("presentation", &config) else {
        return ExitCode::from(2);
    };
    println!();

    let generated = authoritative.generated();
    let mask = authoritative.mask();
    let cells = mask.width() * mask.height();
    println!("📊 World summary");
    println!("  Plateaus:   {}", plateaus(&generated.elevation).len());
    println!("  Elevated:   {} cells", generated.elevation.elevated_count());
    println!("  Stairs:     {} placements, {} cells", generated.stairs.placements().len(), generated.stairs.record_count());
    println!("  Walkable:   {} / {} cells", mask.walkable_count(), cells);
    println!("  Transport:  {} bytes compressed", mask.to_compressed().len());
    println!();

    let divergences = compare(&authoritative, &presentation);
    if divergences.is_empty() {
        println!("═══════════════════════════════════════════════════════════════════");
        println!("  ✓ INSTANCES AGREE");
        println!("═══════════════════════════════════════════════════════════════════");
        ExitCode::SUCCESS
    } else {
        println!("═══════════════════════════════════════════════════════════════════");
        println!("  ✗ {} DIVERGENCE(S)", divergences.len());
        for divergence in &divergences {
            println!("    - {divergence}");
        }
        println!("═══════════════════════════════════════════════════════════════════");
        ExitCode::FAILURE
    }
}
