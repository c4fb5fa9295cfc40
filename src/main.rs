use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::modes::PlayMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Single-player snake on a grid, in the terminal")]
struct Cli {
    /// Board width in pixels
    #[arg(long, default_value = "400")]
    width: i32,

    /// Board height in pixels
    #[arg(long, default_value = "400")]
    height: i32,

    /// Cell edge length in pixels; width and height must be multiples of it
    #[arg(long, default_value = "20")]
    cell_size: i32,

    /// Delay between ticks in milliseconds
    #[arg(long, default_value = "100")]
    tick_delay_ms: u64,

    /// Read the board configuration from a JSON file instead of the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let config = match &self.config {
            Some(path) => load_config(path)?,
            None => GameConfig::new(self.width, self.height, self.cell_size, self.tick_delay_ms)?,
        };
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: GameConfig =
        serde_json::from_str(&json).context("Failed to deserialize config")?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs only go to a file
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed)?,
        None => GameEngine::new(config)?,
    };

    let mut play_mode = PlayMode::new(engine);
    play_mode.run().await?;

    Ok(())
}
