//! Source directory discovery.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::naming::is_valid_script_name;
use crate::error::InstallError;

/// Name of the directory holding user-facing scripts.
pub const SOURCE_DIR_NAME: &str = "bin";

/// A script found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateScript {
    /// Filename, also the installed command name.
    pub name: String,
    /// Path of the script in the source directory.
    pub path: PathBuf,
}

/// Result of listing the source directory.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Scripts with valid names, sorted by name.
    pub scripts: Vec<CandidateScript>,
    /// Filenames that break the naming rule.
    pub invalid: Vec<String>,
}

impl Discovery {
    /// Valid scripts, or an error naming every invalid file.
    pub fn into_valid(self, source_dir: &Path) -> Result<Vec<CandidateScript>, InstallError> {
        if self.invalid.is_empty() {
            Ok(self.scripts)
        } else {
            Err(InstallError::InvalidNames {
                dir: source_dir.to_path_buf(),
                names: self.invalid,
            })
        }
    }
}

/// List regular, non-hidden files directly inside `source_dir`.
pub fn discover(source_dir: &Path) -> Result<Discovery, InstallError> {
    let mut discovery = Discovery::default();

    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|err| InstallError::SourceUnreadable {
            path: source_dir.to_path_buf(),
            source: err.into(),
        })?;

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.path().is_file() {
            debug!(path = %entry.path().display(), "Skipping source entry");
            continue;
        }

        if entry.file_name().to_str().is_some_and(is_valid_script_name) {
            debug!(%name, "Found script");
            discovery.scripts.push(CandidateScript {
                name,
                path: entry.into_path(),
            });
        } else {
            discovery.invalid.push(name);
        }
    }

    Ok(discovery)
}

/// Find the `bin/` directory of the nearest checkout above `cwd`, then above
/// `exe_dir`.
///
/// Only ancestors holding a `.git` entry count as a checkout, and a match
/// equal to `install_dir` is skipped so an installed copy of the installer
/// never treats the install target as its source.
pub fn locate_source_dir(cwd: &Path, exe_dir: Option<&Path>, install_dir: &Path) -> PathBuf {
    let install_dir = canonical(install_dir);
    let starts = std::iter::once(cwd).chain(exe_dir);

    for start in starts {
        for ancestor in start.ancestors() {
            let candidate = ancestor.join(SOURCE_DIR_NAME);
            if ancestor.join(".git").exists()
                && candidate.is_dir()
                && canonical(&candidate) != install_dir
            {
                return candidate;
            }
        }
    }

    cwd.join(SOURCE_DIR_NAME)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
