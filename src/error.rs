//! Error types for the installer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code for filenames that break the naming rule.
pub const EXIT_VALIDATION: u8 = 2;

/// Exit code for I/O failures and partially failed runs.
pub const EXIT_FAILURE: u8 = 1;

/// Errors raised while installing scripts.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("scripts in {} do not follow lowercase kebab-case naming: {}", dir.display(), names.join(", "))]
    InvalidNames { dir: PathBuf, names: Vec<String> },

    #[error("cannot read source directory {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create install directory {}: {source}", path.display())]
    CreateInstallDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot determine home directory")]
    NoHomeDirectory,

    #[error("source directory {} is also the install directory", .0.display())]
    SourceIsInstallDir(PathBuf),

    #[error("cannot replace directory with script file: {}", .0.display())]
    DestinationIsDirectory(PathBuf),

    #[error("{} already is the source script", .0.display())]
    SameFile(PathBuf),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    /// Build an [`InstallError::Io`] for `path`.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidNames { .. } => EXIT_VALIDATION,
            _ => EXIT_FAILURE,
        }
    }
}
