use std::fmt;
use std::time::Duration;

use clap::Parser;

/// Animated depth first maze carving
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Surface width and height in pixels
    #[arg(long, default_value_t = 600)]
    size: u32,

    /// Surface width in pixels, overrides --size
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels, overrides --size
    #[arg(long)]
    height: Option<u32>,

    /// Blocks per row and per column
    #[arg(long, default_value_t = 20)]
    blocks: usize,

    /// Blocks per row, overrides --blocks
    #[arg(long)]
    columns: Option<usize>,

    /// Blocks per column, overrides --blocks
    #[arg(long)]
    rows: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long, default_value_t = 10)]
    interval: u64,

    /// Generation steps per tick
    #[arg(long, default_value_t = 1)]
    steps: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Entry block as X,Y
    #[arg(long, value_parser = parse_start)]
    start: Option<(usize, usize)>,
}

fn parse_start(value: &str) -> Result<(usize, usize), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", value))?;
    let coord = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("bad coordinate '{}': {}", part, e))
    };

    Ok((coord(x)?, coord(y)?))
}

impl Args {
    /// Resolves overrides and checks what the parser can't.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let config = Config {
            surface_width: self.width.unwrap_or(self.size),
            surface_height: self.height.unwrap_or(self.size),
            columns: self.columns.unwrap_or(self.blocks),
            rows: self.rows.unwrap_or(self.blocks),
            interval: Duration::from_millis(self.interval),
            steps_per_tick: self.steps,
            seed: self.seed,
            start: self.start,
        };

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Zero(&'static str),
    StartOutOfBounds { x: usize, y: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Zero(what) => write!(f, "{} must be at least 1", what),
            ConfigError::StartOutOfBounds { x, y } => {
                write!(f, "start block ({}, {}) is outside the grid", x, y)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything a maze session needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub surface_width: u32,
    pub surface_height: u32,
    pub columns: usize,
    pub rows: usize,
    /// time between ticks
    pub interval: Duration,
    pub steps_per_tick: usize,
    pub seed: Option<u64>,
    /// forced entry block, random when unset
    pub start: Option<(usize, usize)>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface_width == 0 {
            return Err(ConfigError::Zero("surface width"));
        }
        if self.surface_height == 0 {
            return Err(ConfigError::Zero("surface height"));
        }
        if self.columns == 0 {
            return Err(ConfigError::Zero("columns"));
        }
        if self.rows == 0 {
            return Err(ConfigError::Zero("rows"));
        }
        if self.steps_per_tick == 0 {
            return Err(ConfigError::Zero("steps per tick"));
        }
        if let Some((x, y)) = self.start {
            if x >= self.columns || y >= self.rows {
                return Err(ConfigError::StartOutOfBounds { x, y });
            }
        }

        Ok(())
    }
}
