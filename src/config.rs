//! Resolved run configuration.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::env::{expand_tilde, Environment};
use crate::error::InstallError;
use crate::install::InstallMode;
use crate::scripts::locate_source_dir;
use crate::shell::ProfilePolicy;

/// Default install directory, relative to home.
pub const DEFAULT_INSTALL_SUBDIR: &str = "bin";

/// Everything an install run needs, with paths made absolute.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub source_dir: PathBuf,
    pub install_dir: PathBuf,
    pub mode: InstallMode,
    pub assume_yes: bool,
    pub profile_policy: ProfilePolicy,
}

impl InstallOptions {
    /// Resolve command-line arguments against the environment.
    ///
    /// `cwd` anchors relative paths; `exe_dir` is a second starting point
    /// when looking for the source directory.
    pub fn from_cli<E: Environment + ?Sized>(
        cli: &Cli,
        env: &E,
        cwd: &Path,
        exe_dir: Option<&Path>,
    ) -> Result<Self, InstallError> {
        let home = env.home_dir();

        let install_dir = match &cli.install_dir {
            Some(dir) => absolutize(&expand_tilde(dir, home.as_deref()), cwd),
            None => home
                .as_deref()
                .ok_or(InstallError::NoHomeDirectory)?
                .join(DEFAULT_INSTALL_SUBDIR),
        };

        let source_dir = match &cli.source_dir {
            Some(dir) => absolutize(&expand_tilde(dir, home.as_deref()), cwd),
            None => locate_source_dir(cwd, exe_dir, &install_dir),
        };

        let mode = if cli.symlink {
            InstallMode::Symlink
        } else {
            InstallMode::Copy
        };

        Ok(Self {
            source_dir,
            install_dir,
            mode,
            assume_yes: cli.assume_yes,
            profile_policy: ProfilePolicy::with_bash_startup_files(cli.bash_rc.clone()),
        })
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
