mod config;
mod controller;
mod food;
mod game;
mod geometry;
mod input;
mod logger;
mod render;
mod rng;
mod session;
mod snake;
mod step;
mod term;
mod timer;

use std::path::Path;

use clap::Parser;
use config::{GameConfig, GridConfig, Validate};
use term::{TermColors, TermManager};

#[derive(Parser)]
#[command(name = "snake_trail", about = "Terminal snake with lives and rising difficulty")]
struct Args {
    /// YAML config file. Missing file means defaults.
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: String,

    /// Fixed number of grid columns (needs --rows).
    #[arg(long, requires = "rows")]
    columns: Option<u32>,

    /// Fixed number of grid rows (needs --columns).
    #[arg(long, requires = "columns")]
    rows: Option<u32>,

    #[arg(long)]
    lives: Option<u32>,

    #[arg(long)]
    food: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    log_file: Option<String>,

    /// Print the default config as YAML and exit.
    #[arg(long)]
    print_default_config: bool,
}

impl Args {
    fn apply(&self, config: &mut GameConfig) {
        if let (Some(columns), Some(rows)) = (self.columns, self.rows) {
            config.grid = GridConfig::Fixed { columns, rows };
        }
        if let Some(lives) = self.lives {
            config.total_lives = lives;
        }
        if let Some(food) = self.food {
            config.food_count = food;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.log_file.is_some() {
            config.log_file = self.log_file.clone();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", config::serialize_config(&GameConfig::default())?);
        return Ok(());
    }

    let mut config = config::load_config(&args.config)?;
    args.apply(&mut config);
    config.validate().map_err(|e| format!("Config validation error: {}", e))?;

    if let Some(ref log_file) = config.log_file {
        logger::init_logger(Path::new(log_file), None)?;
    }
    log!("Starting with config from {}", args.config);

    let colors = TermColors::from_palette(&config.palette)?;
    let term = TermManager::new(colors)?;

    // The game loop takes care of restoring the terminal on the way out
    game::SnakeGame::new(term, &config).run()?;

    log!("Exited cleanly");
    Ok(())
}
