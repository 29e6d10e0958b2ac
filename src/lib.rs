#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod checker;
pub mod config;
pub mod error;
pub mod gate;
pub mod notifier;
pub mod orchestrator;
mod process;
pub mod state;
pub mod telemetry;
pub mod types;

pub type Result<T> = std::result::Result<T, error::Error>;
