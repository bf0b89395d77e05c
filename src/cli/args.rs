//! Command-line argument definitions.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Install scripts from this repository's bin directory into a user bin
/// directory (default: ~/bin).
#[derive(Parser, Debug)]
#[command(name = "install-helper-scripts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Installation directory for scripts [default: ~/bin].
    #[arg(short = 'd', long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Install symlinks to repository scripts instead of copying files.
    ///
    /// Useful when installed tools should track repository updates.
    #[arg(short, long)]
    pub symlink: bool,

    /// Auto-confirm prompts, including overwrites and the PATH update.
    #[arg(short = 'y', long = "assume-yes", visible_alias = "yes")]
    pub assume_yes: bool,

    /// Directory holding the scripts to install [default: bin/ of the
    /// enclosing checkout].
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Bash startup file to consider, relative to home. Repeat to set the
    /// order of preference; the first one is created if none exist.
    #[arg(long = "bash-rc", value_name = "FILE")]
    pub bash_rc: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
