//! Shell detection and startup file selection.
//!
//! Both steps are pure lookups over small tables so they can be tested
//! without touching the real environment.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::env::Environment;

/// Shells with a known startup file and `PATH` syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
    /// Anything else; treated as a POSIX shell reading `~/.profile`.
    Other,
}

/// Shell executable names, matched against the basename of `$SHELL`.
const SHELL_NAMES: &[(&str, Shell)] = &[
    ("zsh", Shell::Zsh),
    ("bash", Shell::Bash),
    ("fish", Shell::Fish),
];

/// Variables a running shell may export, checked when `$SHELL` is unset.
const SHELL_VERSION_VARS: &[(&str, Shell)] = &[
    ("ZSH_VERSION", Shell::Zsh),
    ("BASH_VERSION", Shell::Bash),
    ("FISH_VERSION", Shell::Fish),
];

/// Bash startup files in order of preference.
pub const DEFAULT_BASH_STARTUP_FILES: &[&str] = &[".bashrc", ".bash_profile", ".profile"];

impl Shell {
    /// Look up a shell by executable name or path (`/usr/bin/zsh`, `fish`).
    pub fn from_name(name: &str) -> Self {
        let base = basename(name).to_lowercase();
        SHELL_NAMES
            .iter()
            .find(|(known, _)| *known == base)
            .map(|(_, shell)| *shell)
            .unwrap_or(Shell::Other)
    }

    /// Whether the shell uses `fish_add_path` rather than `export PATH=`.
    pub fn is_fish(self) -> bool {
        self == Shell::Fish
    }
}

/// A detected shell and the name it was detected by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedShell {
    pub shell: Shell,
    /// Lowercased executable name, or `unknown`.
    pub name: String,
}

impl fmt::Display for DetectedShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Detect the user's shell from `$SHELL`, falling back to version variables.
pub fn detect_shell<E: Environment + ?Sized>(env: &E) -> DetectedShell {
    if let Some(shell_var) = env.non_empty_var("SHELL") {
        return DetectedShell {
            shell: Shell::from_name(&shell_var),
            name: basename(&shell_var).to_lowercase(),
        };
    }

    for (var, shell) in SHELL_VERSION_VARS {
        if env.non_empty_var(var).is_some() {
            let name = SHELL_NAMES
                .iter()
                .find(|(_, known)| known == shell)
                .map(|(name, _)| *name)
                .unwrap_or("unknown");
            return DetectedShell {
                shell: *shell,
                name: name.to_string(),
            };
        }
    }

    DetectedShell {
        shell: Shell::Other,
        name: "unknown".to_string(),
    }
}

/// Which startup files to consider for shells with more than one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePolicy {
    /// Bash startup files relative to home; the first existing one wins and
    /// the first entry is used when none exist.
    pub bash_startup_files: Vec<String>,
}

impl Default for ProfilePolicy {
    fn default() -> Self {
        Self {
            bash_startup_files: DEFAULT_BASH_STARTUP_FILES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl ProfilePolicy {
    /// Policy with custom bash startup files; an empty list keeps the default.
    pub fn with_bash_startup_files(files: Vec<String>) -> Self {
        if files.is_empty() {
            Self::default()
        } else {
            Self {
                bash_startup_files: files,
            }
        }
    }
}

/// Startup file that should carry the `PATH` extension for `shell`.
pub fn startup_file(shell: Shell, home: &Path, policy: &ProfilePolicy) -> PathBuf {
    match shell {
        Shell::Zsh => home.join(".zshrc"),
        Shell::Fish => home.join(".config").join("fish").join("config.fish"),
        Shell::Bash => {
            let candidates = &policy.bash_startup_files;
            candidates
                .iter()
                .map(|name| home.join(name))
                .find(|path| path.exists())
                .or_else(|| candidates.first().map(|name| home.join(name)))
                .unwrap_or_else(|| home.join(".bashrc"))
        }
        Shell::Other => home.join(".profile"),
    }
}

/// Final path component, ignoring trailing separators.
fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("")
}
