//! devtime CLI library.
//!
//! This crate provides the CLI interface for estimating development time.

mod cli;
pub mod commands;
mod config;
pub mod git;

pub use cli::{Cli, Commands};
pub use config::Config;
