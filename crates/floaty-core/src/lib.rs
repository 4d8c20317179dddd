//! Core types for the floaty particle animation.

mod attribute;
pub mod math;
mod tuning;

pub use attribute::{Attribute, ConfigError, MAX_DIMENSION, OBSERVED_ATTRIBUTES, parse_count};
pub use math::{Point, Rect};
pub use tuning::Tuning;
