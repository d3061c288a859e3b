use thiserror::Error;

/// Input validation failures raised by the color and clamp primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("{channel} channel value {value} is outside 0..=255")]
    InvalidChannel { channel: &'static str, value: i32 },

    #[error("invalid hex color '{0}': expected rrggbb or rrggbbaa")]
    InvalidHex(String),
}

/// An environment value that could not be turned into a setting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{key}: '{value}' is not a number")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key}: {source}")]
    InvalidColor {
        key: &'static str,
        #[source]
        source: ColorError,
    },

    #[error("{key}: {value} is outside {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}
