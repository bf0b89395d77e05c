//! term-tools library - installer for personal terminal helper scripts.
//!
//! This crate provides the pieces behind `install-helper-scripts`: naming
//! validation and discovery of the scripts in `bin/`, copying or linking them
//! into an install directory, and extending `PATH` in the user's shell
//! startup file.

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod install;
pub mod logging;
pub mod prompt;
pub mod scripts;
pub mod shell;

pub use config::InstallOptions;
pub use error::InstallError;
pub use install::{InstallReport, Installer};
