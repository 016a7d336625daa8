//! Schema module - Configuration and data types for evolutionary runs.

mod config;
mod genome;
mod pattern;

pub use config::*;
pub use genome::*;
pub use pattern::*;
