//! Runs the simulation without a renderer and prints the final board.
//!
//! Usage:
//!   RUST_LOG=wakka_rs=debug wakka_headless --seed 7 --ticks 5000

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use wakka_rs::{Configuration, Game};

#[derive(Parser)]
#[command(name = "wakka-headless")]
#[command(about = "Run the maze-chase simulation headless for a fixed number of ticks")]
struct Args {
    /// JSON configuration file; missing fields use defaults
    #[arg(long)]
    config: Option<String>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Surface width in pixels
    #[arg(long, default_value_t = 1080.0)]
    width: f32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 1920.0)]
    height: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json =
                fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
            Configuration::from_json(&json)
                .with_context(|| format!("invalid configuration in {path}"))?
        }
        None => Configuration::default(),
    };

    let mut game = Game::with_configuration(config, args.width, args.height, args.seed)
        .context("failed to start game")?;
    let mut highest_level = game.level();
    for tick in 0..args.ticks {
        game.tick()
            .with_context(|| format!("simulation failed at tick {tick}"))?;
        highest_level = highest_level.max(game.level());
    }

    println!("{game}");
    println!();
    println!("=== RESULTS ===");
    println!("  Ticks:         {}", args.ticks);
    println!("  Score:         {}", game.score());
    println!("  Lives:         {}", game.lives());
    println!("  Level:         {}", game.level());
    println!("  Highest level: {highest_level}");
    println!("  Dots left:     {}", game.dots_remaining());
    Ok(())
}
