//! Typed element attributes.
//!
//! The host feeds configuration as `name`/`value` string pairs. They are
//! parsed here into typed values so malformed input is rejected up front
//! instead of being coerced.

use std::num::NonZeroUsize;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing element configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Particle count that is zero, negative or not a number.
    #[error("invalid particle count: {0:?}")]
    InvalidCount(String),

    /// Surface dimension that is negative, too large or not a number.
    #[error("invalid {name}: {value:?}")]
    InvalidDimension { name: &'static str, value: String },

    /// Tuning value outside its meaningful range.
    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),

    /// Attribute the element does not observe.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

/// Largest accepted surface width or height, in pixels.
///
/// A surface stores four `f32` channels per pixel, so the largest square
/// surface takes 256 MiB.
pub const MAX_DIMENSION: u32 = 4096;

/// Names of the observed attributes.
pub const OBSERVED_ATTRIBUTES: [&str; 3] = ["width", "height", "num"];

/// A parsed configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Surface width in pixels.
    Width(u32),
    /// Surface height in pixels.
    Height(u32),
    /// Number of particles.
    Num(NonZeroUsize),
}

impl Attribute {
    /// Parse an attribute change.
    pub fn parse(name: &str, value: &str) -> Result<Self, ConfigError> {
        match name {
            "width" => parse_dimension("width", value).map(Self::Width),
            "height" => parse_dimension("height", value).map(Self::Height),
            "num" => parse_count(value).map(Self::Num),
            other => Err(ConfigError::UnknownAttribute(other.to_string())),
        }
    }
}

fn parse_dimension(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    u32::from_str(value.trim())
        .ok()
        .filter(|&v| v <= MAX_DIMENSION)
        .ok_or_else(|| ConfigError::InvalidDimension {
            name,
            value: value.to_string(),
        })
}

/// Parse a particle count, rejecting anything that is not a positive integer.
pub fn parse_count(value: &str) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::from_str(value.trim()).map_err(|_| ConfigError::InvalidCount(value.to_string()))
}
