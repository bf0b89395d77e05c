//! Command-search path checks and startup file edits.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::detect::{detect_shell, startup_file, DetectedShell, ProfilePolicy};
use crate::env::{expand_tilde, Environment};
use crate::error::InstallError;

/// Trailing comment identifying lines written by the installer.
pub const PATH_UPDATE_MARKER: &str = "# Added by term-tools install-helper-scripts";

/// Whether `dir` is one of the entries of a `PATH`-style value.
///
/// Entries are `~`-expanded and canonicalized; empty entries and entries
/// that do not resolve are ignored.
pub fn is_on_search_path(dir: &Path, search_path: Option<&str>, home: Option<&Path>) -> bool {
    let Some(search_path) = search_path else {
        return false;
    };
    let Ok(target) = dir.canonicalize() else {
        return false;
    };

    std::env::split_paths(search_path)
        .filter(|entry| !entry.as_os_str().is_empty())
        .filter_map(|entry| expand_tilde(&entry, home).canonicalize().ok())
        .any(|entry| entry == target)
}

/// Render `dir` for a startup file, as `$HOME/...` when it lies under home.
pub fn shell_path_value(dir: &Path, home: &Path) -> String {
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    let home = home.canonicalize().unwrap_or_else(|_| home.to_path_buf());

    match dir.strip_prefix(&home) {
        Ok(rel) if rel.as_os_str().is_empty() => "$HOME".to_string(),
        Ok(rel) => format!("$HOME/{}", rel.display()),
        Err(_) => dir.display().to_string(),
    }
}

/// A proposed `PATH` extension for one startup file.
#[derive(Debug, Clone)]
pub struct PathUpdate {
    pub shell: DetectedShell,
    pub startup_file: PathBuf,
    /// The full line to append, marker included.
    pub line: String,
    /// Spellings of the install directory that count as already configured.
    tokens: Vec<String>,
}

impl PathUpdate {
    /// Work out which file to edit and what to write for `install_dir`.
    pub fn plan<E: Environment + ?Sized>(
        install_dir: &Path,
        env: &E,
        policy: &ProfilePolicy,
    ) -> Result<Self, InstallError> {
        let home = env.home_dir().ok_or(InstallError::NoHomeDirectory)?;
        let shell = detect_shell(env);
        let startup_file = startup_file(shell.shell, &home, policy);

        let value = shell_path_value(install_dir, &home);
        let escaped = value.replace('"', "\\\"");
        let command = if shell.shell.is_fish() {
            format!("fish_add_path \"{escaped}\"")
        } else {
            format!("export PATH=\"{escaped}:$PATH\"")
        };

        let mut tokens = vec![value];
        let absolute = install_dir.display().to_string();
        if !tokens.contains(&absolute) {
            tokens.push(absolute);
        }

        debug!(shell = %shell, file = %startup_file.display(), "Planned PATH update");
        Ok(Self {
            shell,
            startup_file,
            line: format!("{command} {PATH_UPDATE_MARKER}"),
            tokens,
        })
    }

    /// Whether the startup file already extends `PATH` with the directory.
    ///
    /// A missing file counts as not configured. Bytes that are not valid
    /// UTF-8 are read lossily.
    pub fn is_configured(&self) -> io::Result<bool> {
        let bytes = match fs::read(&self.startup_file) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err),
        };
        let content = String::from_utf8_lossy(&bytes);

        Ok(content.lines().map(str::trim).any(|line| {
            if line == self.line {
                return true;
            }
            if line.is_empty() || line.starts_with('#') {
                return false;
            }
            if !line.contains("PATH") && !line.contains("fish_add_path") {
                return false;
            }
            self.tokens.iter().any(|token| mentions_dir(line, token))
        }))
    }

    /// Append the line, creating the file and its parents if needed.
    pub fn apply(&self) -> io::Result<()> {
        if let Some(parent) = self.startup_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let needs_separator = fs::read(&self.startup_file)
            .map(|existing| !existing.is_empty() && !existing.ends_with(b"\n"))
            .unwrap_or(false);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.startup_file)?;
        if needs_separator {
            writeln!(file)?;
        }
        writeln!(file, "{}", self.line)
    }
}

/// `token` occurs in `line` as a whole path, not as part of a longer one.
fn mentions_dir(line: &str, token: &str) -> bool {
    line.match_indices(token).any(|(start, _)| {
        let starts_path = line[..start]
            .chars()
            .next_back()
            .map_or(true, |prev| prev.is_whitespace() || matches!(prev, '"' | '\'' | ':' | '='));
        let ends_path = line[start + token.len()..]
            .chars()
            .next()
            .map_or(true, |next| {
                !(next.is_alphanumeric() || matches!(next, '-' | '_' | '.' | '/'))
            });
        starts_path && ends_path
    })
}
