//! CLI module for install-helper-scripts.
//!
//! Defines command-line argument parsing.

pub mod args;

pub use args::Cli;
