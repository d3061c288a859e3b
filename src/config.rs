//! Runtime settings, read from the environment (and `.env` when present).

use std::path::PathBuf;
use std::time::Duration;

use crate::color::{parse_hex, Rgba, CYAN, MAGENTA};
use crate::error::ConfigError;

pub const MIN_DOTS: usize = 100;
pub const MAX_DOTS: usize = 1000;
pub const DOT_STEP: usize = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub dots: usize,
    pub frame_interval: Duration,
    pub rotation_period: Duration,
    pub dot_color: Rgba,
    pub picker_color: Rgba,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dots: MAX_DOTS,
            frame_interval: Duration::from_millis(50),
            rotation_period: Duration::from_millis(20_000),
            dot_color: MAGENTA,
            picker_color: CYAN,
            log_file: None,
        }
    }
}

impl Config {
    /// Loads `.env` if there is one, then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("DOTGLOBE_DOTS") {
            let dots = number("DOTGLOBE_DOTS", &value, MIN_DOTS as u64, MAX_DOTS as u64)? as usize;
            // snap to the +/- key grid
            config.dots = (dots + DOT_STEP / 2) / DOT_STEP * DOT_STEP;
        }
        if let Some(value) = lookup("DOTGLOBE_FRAME_MS") {
            config.frame_interval =
                Duration::from_millis(number("DOTGLOBE_FRAME_MS", &value, 10, 1000)?);
        }
        if let Some(value) = lookup("DOTGLOBE_PERIOD_MS") {
            config.rotation_period =
                Duration::from_millis(number("DOTGLOBE_PERIOD_MS", &value, 1000, 600_000)?);
        }
        if let Some(value) = lookup("DOTGLOBE_DOT_COLOR") {
            config.dot_color = color("DOTGLOBE_DOT_COLOR", &value)?;
        }
        if let Some(value) = lookup("DOTGLOBE_PICKER_COLOR") {
            config.picker_color = color("DOTGLOBE_PICKER_COLOR", &value)?;
        }
        if let Some(value) = lookup("DOTGLOBE_LOG") {
            if !value.trim().is_empty() {
                config.log_file = Some(PathBuf::from(value.trim()));
            }
        }

        Ok(config)
    }
}

fn number(key: &'static str, value: &str, min: u64, max: u64) -> Result<u64, ConfigError> {
    let parsed = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })?;
    if parsed < min || parsed > max {
        return Err(ConfigError::OutOfRange {
            key,
            value: parsed,
            min,
            max,
        });
    }
    Ok(parsed)
}

fn color(key: &'static str, value: &str) -> Result<Rgba, ConfigError> {
    parse_hex(value).map_err(|source| ConfigError::InvalidColor { key, source })
}
