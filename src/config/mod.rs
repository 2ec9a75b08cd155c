//! Configuration: CLI options and operational constants.

mod constants;
mod types;

pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
