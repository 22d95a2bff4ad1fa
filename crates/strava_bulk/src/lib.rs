//! Bulk creation of templated Strava activities and CSV export of history.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod schedule;
pub mod template;

pub use cli::{Args, RunOptions};
pub use config::Configuration;
pub use error::{CliError, CliResult};
