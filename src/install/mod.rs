//! The install run.
//!
//! An [`Installer`] validates the source directory, puts every script in
//! place and offers to extend `PATH`. Validation happens before any file
//! system change; after that, failures are collected per file and the run
//! carries on.

pub mod placement;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub use placement::{destination_exists, place, InstallMode};

use crate::config::InstallOptions;
use crate::env::Environment;
use crate::error::{InstallError, EXIT_FAILURE};
use crate::prompt::Prompt;
use crate::scripts::{discover, CandidateScript};
use crate::shell::{is_on_search_path, PathUpdate};

/// A script that was put in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledEntry {
    pub name: String,
    pub destination: PathBuf,
    pub mode: InstallMode,
}

/// A script that could not be put in place.
#[derive(Debug)]
pub struct FailedEntry {
    pub name: String,
    pub error: InstallError,
}

/// What happened to the `PATH` configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// The install directory is already on `PATH`.
    OnPath,
    /// The startup file already extends `PATH` with the directory.
    AlreadyConfigured,
    /// The line was appended.
    Updated,
    /// The user declined the edit.
    Declined,
    /// Appending failed; the user was told to add the line by hand.
    UpdateFailed,
}

/// Outcome of an install run.
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<InstalledEntry>,
    /// Scripts the user chose not to overwrite.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedEntry>,
    /// `None` when nothing was installed.
    pub path_status: Option<PathStatus>,
    pub path_update: Option<PathUpdate>,
}

impl InstallReport {
    /// Process exit code: failure if any script could not be installed.
    pub fn exit_code(&self) -> u8 {
        if self.failed.is_empty() {
            0
        } else {
            EXIT_FAILURE
        }
    }
}

/// Runs one installation against injected environment, prompt and output.
pub struct Installer<'a> {
    options: &'a InstallOptions,
    env: &'a dyn Environment,
    prompt: &'a mut dyn Prompt,
    out: &'a mut dyn Write,
}

impl<'a> Installer<'a> {
    pub fn new(
        options: &'a InstallOptions,
        env: &'a dyn Environment,
        prompt: &'a mut dyn Prompt,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            options,
            env,
            prompt,
            out,
        }
    }

    /// Install every script, then check `PATH`.
    pub fn run(&mut self) -> Result<InstallReport, InstallError> {
        let options = self.options;
        let source_dir = &options.source_dir;
        let scripts = discover(source_dir)?.into_valid(source_dir)?;

        let mut report = InstallReport::default();
        if scripts.is_empty() {
            writeln!(self.out, "No installable scripts found in {}.", source_dir.display())?;
            return Ok(report);
        }

        let install_dir = &options.install_dir;
        std::fs::create_dir_all(install_dir).map_err(|source| InstallError::CreateInstallDir {
            path: install_dir.clone(),
            source,
        })?;
        let install_dir = install_dir
            .canonicalize()
            .unwrap_or_else(|_| install_dir.clone());
        let canonical_source = source_dir
            .canonicalize()
            .unwrap_or_else(|_| source_dir.clone());
        if canonical_source == install_dir {
            return Err(InstallError::SourceIsInstallDir(install_dir));
        }
        info!(dir = %install_dir.display(), count = scripts.len(), "Installing scripts");

        for script in &scripts {
            self.install_one(script, &install_dir, &mut report)?;
        }

        writeln!(
            self.out,
            "Installed {} script(s) into {} using {} mode.",
            report.installed.len(),
            install_dir.display(),
            options.mode
        )?;
        for entry in &report.installed {
            writeln!(self.out, "  - {}", entry.destination.display())?;
        }
        if !report.skipped.is_empty() {
            writeln!(self.out, "Skipped: {}", report.skipped.join(", "))?;
        }
        for failure in &report.failed {
            writeln!(self.out, "Failed to install {}: {}", failure.name, failure.error)?;
        }

        self.offer_path_update(&install_dir, &mut report)?;
        Ok(report)
    }

    fn install_one(
        &mut self,
        script: &CandidateScript,
        install_dir: &Path,
        report: &mut InstallReport,
    ) -> Result<(), InstallError> {
        let destination = install_dir.join(&script.name);

        if destination_exists(&destination) {
            if self.options.assume_yes {
                writeln!(self.out, "Replacing {}.", destination.display())?;
            } else {
                let question = format!("Overwrite {}?", destination.display());
                if !self.prompt.confirm(&question)? {
                    info!(name = %script.name, "Skipped by user");
                    report.skipped.push(script.name.clone());
                    return Ok(());
                }
            }
        }

        match place(&script.path, &destination, self.options.mode) {
            Ok(()) => {
                info!(name = %script.name, dest = %destination.display(), "Installed");
                report.installed.push(InstalledEntry {
                    name: script.name.clone(),
                    destination,
                    mode: self.options.mode,
                });
            }
            Err(error) => {
                warn!(name = %script.name, %error, "Install failed");
                report.failed.push(FailedEntry {
                    name: script.name.clone(),
                    error,
                });
            }
        }
        Ok(())
    }

    fn offer_path_update(
        &mut self,
        install_dir: &Path,
        report: &mut InstallReport,
    ) -> Result<(), InstallError> {
        let home = self.env.home_dir();
        let search_path = self.env.var("PATH");
        if is_on_search_path(install_dir, search_path.as_deref(), home.as_deref()) {
            writeln!(self.out, "{} is already on PATH.", install_dir.display())?;
            report.path_status = Some(PathStatus::OnPath);
            return Ok(());
        }

        let update = PathUpdate::plan(install_dir, self.env, &self.options.profile_policy)?;
        let file = update.startup_file.display().to_string();
        writeln!(
            self.out,
            "{} is not currently on PATH in this shell session (detected shell: {}).",
            install_dir.display(),
            update.shell
        )?;
        writeln!(self.out, "Suggested line for {file}:")?;
        writeln!(self.out, "  {}", update.line)?;

        let configured = match update.is_configured() {
            Ok(configured) => configured,
            Err(err) => {
                warn!(%file, error = %err, "Startup file unreadable");
                writeln!(self.out, "Failed to read {file}: {err}")?;
                writeln!(self.out, "Add the suggested line manually to your shell startup file.")?;
                report.path_status = Some(PathStatus::UpdateFailed);
                report.path_update = Some(update);
                return Ok(());
            }
        };

        let status = if configured {
            writeln!(
                self.out,
                "{file} already appears to include this PATH entry. \
                 Open a new shell or source the file to apply it."
            )?;
            PathStatus::AlreadyConfigured
        } else if self.options.assume_yes
            || self.prompt.confirm(&format!("Add this line to {file}?"))?
        {
            match update.apply() {
                Ok(()) => {
                    info!(%file, "Updated startup file");
                    writeln!(self.out, "Updated {file}.")?;
                    writeln!(self.out, "Open a new shell or run: source {file}")?;
                    PathStatus::Updated
                }
                Err(err) => {
                    warn!(%file, error = %err, "Startup file update failed");
                    writeln!(self.out, "Failed to update {file}: {err}")?;
                    writeln!(self.out, "Add the suggested line manually to your shell startup file.")?;
                    PathStatus::UpdateFailed
                }
            }
        } else {
            writeln!(self.out, "Skipped PATH update.")?;
            writeln!(self.out, "Add the suggested line manually to {file}.")?;
            PathStatus::Declined
        };

        report.path_status = Some(status);
        report.path_update = Some(update);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvironment;
    use crate::prompt::ScriptedPrompt;
    use crate::shell::ProfilePolicy;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        source: PathBuf,
        home: PathBuf,
    }

    impl Fixture {
        fn new(scripts: &[&str]) -> Self {
            let temp = TempDir::new().unwrap();
            let root = temp.path().canonicalize().unwrap();
            let source = root.join("repo/bin");
            let home = root.join("home");
            fs::create_dir_all(&source).unwrap();
            fs::create_dir_all(&home).unwrap();
            for name in scripts {
                fs::write(source.join(name), format!("#!/bin/sh\necho {name}\n")).unwrap();
            }
            Self {
                _temp: temp,
                source,
                home,
            }
        }

        fn bin(&self) -> PathBuf {
            self.home.join("bin")
        }

        fn options(&self, mode: InstallMode, assume_yes: bool) -> InstallOptions {
            InstallOptions {
                source_dir: self.source.clone(),
                install_dir: self.bin(),
                mode,
                assume_yes,
                profile_policy: ProfilePolicy::default(),
            }
        }

        fn env(&self, path: &str) -> MapEnvironment {
            MapEnvironment::new()
                .with_home(&self.home)
                .with_var("SHELL", "/bin/zsh")
                .with_var("PATH", path)
        }
    }

    fn run(
        options: &InstallOptions,
        env: &MapEnvironment,
        prompt: &mut ScriptedPrompt,
    ) -> (Result<InstallReport, InstallError>, String) {
        let mut out = Vec::new();
        let result = Installer::new(options, env, prompt, &mut out).run();
        (result, String::from_utf8(out).unwrap())
    }

    fn marker_lines(file: &Path) -> usize {
        fs::read_to_string(file)
            .unwrap_or_default()
            .lines()
            .filter(|line| line.contains(crate::shell::PATH_UPDATE_MARKER))
            .count()
    }

    fn marker_lines_lossy(file: &Path) -> usize {
        String::from_utf8_lossy(&fs::read(file).unwrap())
            .lines()
            .filter(|line| line.contains(crate::shell::PATH_UPDATE_MARKER))
            .count()
    }

    #[test]
    fn test_invalid_name_aborts_before_writing() {
        let fx = Fixture::new(&["skill", "Bad_Name"]);
        let options = fx.options(InstallMode::Copy, true);

        let (result, _) = run(&options, &fx.env("/usr/bin"), &mut ScriptedPrompt::default());

        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Bad_Name"));
        assert!(!fx.bin().exists());
    }

    #[test]
    fn test_empty_source_installs_nothing() {
        let fx = Fixture::new(&[]);
        let options = fx.options(InstallMode::Copy, true);

        let (result, out) = run(&options, &fx.env("/usr/bin"), &mut ScriptedPrompt::default());
        let report = result.unwrap();
        assert!(report.installed.is_empty());
        assert!(report.path_status.is_none());
        assert!(out.contains("No installable scripts"));
        assert!(!fx.bin().exists());
    }

    #[test]
    fn test_copy_install_is_idempotent() {
        let fx = Fixture::new(&["skill"]);
        let options = fx.options(InstallMode::Copy, true);
        let env = fx.env("/usr/bin");

        for _ in 0..2 {
            let (result, _) = run(&options, &env, &mut ScriptedPrompt::default());
            let report = result.unwrap();
            assert_eq!(report.exit_code(), 0);
            assert_eq!(report.installed.len(), 1);
        }

        let entries: Vec<_> = fs::read_dir(fx.bin()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            fs::read(fx.bin().join("skill")).unwrap(),
            fs::read(fx.source.join("skill")).unwrap()
        );
        assert_eq!(marker_lines(&fx.home.join(".zshrc")), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_install_points_at_source() {
        let fx = Fixture::new(&["skill"]);
        let options = fx.options(InstallMode::Symlink, true);

        let (result, out) = run(&options, &fx.env("/usr/bin"), &mut ScriptedPrompt::default());
        result.unwrap();

        let dest = fx.bin().join("skill");
        assert!(dest.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&dest).unwrap(), fx.source.join("skill"));
        assert!(out.contains("using symlink mode"));
    }

    #[test]
    fn test_declined_overwrite_skips_file() {
        let fx = Fixture::new(&["alpha", "beta"]);
        fs::create_dir_all(fx.bin()).unwrap();
        fs::write(fx.bin().join("alpha"), "mine").unwrap();
        let options = fx.options(InstallMode::Copy, false);
        let path = fx.bin().display().to_string();

        let mut prompt = ScriptedPrompt::new([false]);
        let (result, _) = run(&options, &fx.env(&path), &mut prompt);
        let report = result.unwrap();

        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.skipped, ["alpha"]);
        assert_eq!(report.installed.len(), 1);
        assert_eq!(fs::read_to_string(fx.bin().join("alpha")).unwrap(), "mine");
        assert_eq!(prompt.asked().len(), 1);
        assert!(prompt.asked()[0].starts_with("Overwrite "));
    }

    #[test]
    fn test_confirmed_overwrite_replaces_file() {
        let fx = Fixture::new(&["alpha"]);
        fs::create_dir_all(fx.bin()).unwrap();
        fs::write(fx.bin().join("alpha"), "mine").unwrap();
        let options = fx.options(InstallMode::Copy, false);
        let path = fx.bin().display().to_string();

        let (result, _) = run(&options, &fx.env(&path), &mut ScriptedPrompt::new([true]));
        result.unwrap();
        assert_eq!(
            fs::read_to_string(fx.bin().join("alpha")).unwrap(),
            "#!/bin/sh\necho alpha\n"
        );
    }

    #[test]
    fn test_directory_in_the_way_fails_only_that_file() {
        let fx = Fixture::new(&["alpha", "beta"]);
        fs::create_dir_all(fx.bin().join("alpha")).unwrap();
        let options = fx.options(InstallMode::Copy, true);

        let (result, out) = run(&options, &fx.env("/usr/bin"), &mut ScriptedPrompt::default());
        let report = result.unwrap();

        assert_eq!(report.exit_code(), EXIT_FAILURE);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "alpha");
        assert!(fx.bin().join("beta").is_file());
        assert!(out.contains("Failed to install alpha"));
    }

    #[test]
    fn test_source_dir_as_install_dir_is_refused() {
        let fx = Fixture::new(&["skill"]);
        let mut options = fx.options(InstallMode::Copy, true);
        options.install_dir = fx.source.clone();

        let (result, _) = run(&options, &fx.env("/usr/bin"), &mut ScriptedPrompt::default());

        let err = result.unwrap_err();
        assert!(matches!(err, InstallError::SourceIsInstallDir(_)));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
        assert_eq!(
            fs::read_to_string(fx.source.join("skill")).unwrap(),
            "#!/bin/sh\necho skill\n"
        );
    }

    #[test]
    fn test_on_path_leaves_startup_files_alone() {
        let fx = Fixture::new(&["skill"]);
        let options = fx.options(InstallMode::Copy, true);
        let path = format!("/usr/bin:{}", fx.bin().display());

        let (result, _) = run(&options, &fx.env(&path), &mut ScriptedPrompt::default());
        let report = result.unwrap();

        assert_eq!(report.path_status, Some(PathStatus::OnPath));
        assert!(!fx.home.join(".zshrc").exists());
        assert!(!fx.home.join(".profile").exists());
    }

    #[test]
    fn test_path_update_requires_confirmation() {
        let fx = Fixture::new(&["skill"]);
        let options = fx.options(InstallMode::Copy, false);
        let env = fx.env("/usr/bin");

        let mut prompt = ScriptedPrompt::new([false]);
        let (result, out) = run(&options, &env, &mut prompt);
        assert_eq!(result.unwrap().path_status, Some(PathStatus::Declined));
        assert!(prompt.asked()[0].starts_with("Add this line to "));
        assert!(out.contains("export PATH=\"$HOME/bin:$PATH\""));
        assert!(!fx.home.join(".zshrc").exists());

        let mut prompt = ScriptedPrompt::new([true, true]);
        let (result, _) = run(&options, &env, &mut prompt);
        assert_eq!(result.unwrap().path_status, Some(PathStatus::Updated));
        assert_eq!(marker_lines(&fx.home.join(".zshrc")), 1);
    }

    #[test]
    fn test_existing_entry_is_reported_not_duplicated() {
        let fx = Fixture::new(&["skill"]);
        fs::write(fx.home.join(".zshrc"), "export PATH=\"$HOME/bin:$PATH\"\n").unwrap();
        let options = fx.options(InstallMode::Copy, true);

        let (result, _) = run(&options, &fx.env("/usr/bin"), &mut ScriptedPrompt::default());
        assert_eq!(result.unwrap().path_status, Some(PathStatus::AlreadyConfigured));
        assert_eq!(
            fs::read_to_string(fx.home.join(".zshrc")).unwrap(),
            "export PATH=\"$HOME/bin:$PATH\"\n"
        );
    }

    #[test]
    fn test_non_utf8_startup_file_is_updated_once() {
        let fx = Fixture::new(&["skill"]);
        let zshrc = fx.home.join(".zshrc");
        fs::write(&zshrc, b"# caf\xe9\n").unwrap();
        let options = fx.options(InstallMode::Copy, true);
        let env = fx.env("/usr/bin");

        let (result, _) = run(&options, &env, &mut ScriptedPrompt::default());
        assert_eq!(result.unwrap().path_status, Some(PathStatus::Updated));
        let (result, _) = run(&options, &env, &mut ScriptedPrompt::default());
        assert_eq!(result.unwrap().path_status, Some(PathStatus::AlreadyConfigured));

        assert_eq!(marker_lines_lossy(&zshrc), 1);
        assert!(fs::read(&zshrc).unwrap().starts_with(b"# caf\xe9\n"));
    }

    #[test]
    fn test_unreadable_startup_file_is_not_appended() {
        let fx = Fixture::new(&["skill"]);
        fs::create_dir_all(fx.home.join(".zshrc")).unwrap();
        let options = fx.options(InstallMode::Copy, true);

        let (result, out) = run(&options, &fx.env("/usr/bin"), &mut ScriptedPrompt::default());
        let report = result.unwrap();
        assert_eq!(report.path_status, Some(PathStatus::UpdateFailed));
        assert_eq!(report.exit_code(), 0);
        assert!(out.contains("Failed to read"));
        assert!(fx.home.join(".zshrc").is_dir());
    }
}
