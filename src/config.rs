use std::io::ErrorKind;

use crossterm::style::Color;
use serde::{Deserialize, Serialize};

use crate::geometry::{Grid, Viewport, MAX_GRID_SIDE};

pub const CONFIG_FILE: &str = "snake_trail.yaml";

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub food_count: u32,
    pub total_lives: u32,
    pub base_tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    pub difficulty_increment: u32,
    pub seed: Option<u64>,
    pub log_file: Option<String>,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::FromViewport { cell_width: 2, cell_height: 1 },
            food_count: 1,
            total_lives: 5,
            base_tick_interval_ms: 100,
            min_tick_interval_ms: 20,
            difficulty_increment: 5,
            seed: None,
            log_file: None,
            palette: Palette::default(),
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        self.grid.validate()?;
        if !(1..=50).contains(&self.food_count) {
            return Err("food_count must be between 1 and 50".to_string());
        }
        if self.total_lives == 0 {
            return Err("total_lives must be at least 1".to_string());
        }
        if self.min_tick_interval_ms == 0 {
            return Err("min_tick_interval_ms must be greater than 0".to_string());
        }
        if self.base_tick_interval_ms <= self.min_tick_interval_ms {
            return Err("base_tick_interval_ms must be greater than min_tick_interval_ms".to_string());
        }
        if self.difficulty_increment == 0 {
            return Err("difficulty_increment must be at least 1".to_string());
        }
        if self.difficulty_increment as u64 >= self.base_tick_interval_ms {
            return Err("difficulty_increment must be smaller than base_tick_interval_ms".to_string());
        }
        self.palette.validate()?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GridConfig {
    Fixed { columns: u32, rows: u32 },
    FromViewport { cell_width: u32, cell_height: u32 },
}

impl GridConfig {
    pub fn resolve(&self, viewport: Viewport) -> Grid {
        match *self {
            GridConfig::Fixed { columns, rows } => Grid::new(columns, rows),
            GridConfig::FromViewport { cell_width, cell_height } => {
                Grid::from_viewport(viewport, cell_width, cell_height)
            }
        }
    }
}

impl Validate for GridConfig {
    fn validate(&self) -> Result<(), String> {
        match *self {
            GridConfig::Fixed { columns, rows } => {
                if columns == 0 || rows == 0 {
                    return Err("grid columns and rows must be at least 1".to_string());
                }
                if columns > MAX_GRID_SIDE || rows > MAX_GRID_SIDE {
                    return Err(format!("grid columns and rows must be at most {}", MAX_GRID_SIDE));
                }
            }
            GridConfig::FromViewport { cell_width, cell_height } => {
                if cell_width == 0 || cell_height == 0 {
                    return Err("grid cell_width and cell_height must be at least 1".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Colors as `#rrggbb` or crossterm color names such as `dark_red`.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Palette {
    pub background: String,
    pub body: String,
    pub food: String,
    pub game_over: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#222222".to_string(),
            body: "#1fad1a".to_string(),
            food: "#ffa500".to_string(),
            game_over: "red".to_string(),
        }
    }
}

impl Validate for Palette {
    fn validate(&self) -> Result<(), String> {
        for color in [&self.background, &self.body, &self.food, &self.game_over] {
            parse_color(color)?;
        }
        Ok(())
    }
}

pub fn parse_color(value: &str) -> Result<Color, String> {
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("Invalid color '{}': expected #rrggbb", value));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("Invalid color '{}'", value))
        };
        return Ok(Color::Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? });
    }

    Color::try_from(value).map_err(|_| format!("Unknown color name '{}'", value))
}

pub fn serialize_config(config: &GameConfig) -> Result<String, String> {
    serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))
}

pub fn deserialize_config(content: &str) -> Result<GameConfig, String> {
    serde_yaml_ng::from_str(content).map_err(|e| format!("Failed to deserialize config: {}", e))
}

/// Reads the config at `path`. A missing file means defaults. Callers validate
/// after applying their overrides.
pub fn load_config(path: &str) -> Result<GameConfig, String> {
    match std::fs::read_to_string(path) {
        Ok(content) => deserialize_config(&content),
        Err(err) => match err.kind() {
            ErrorKind::NotFound => Ok(GameConfig::default()),
            _ => Err(format!("Failed to read config file: {}", err)),
        },
    }
}
