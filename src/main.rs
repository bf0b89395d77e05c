//! install-helper-scripts CLI - installs the scripts in bin/ onto PATH.

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use term_tools::cli::Cli;
use term_tools::env::ProcessEnvironment;
use term_tools::error::{InstallError, EXIT_FAILURE};
use term_tools::prompt::ConsolePrompt;
use term_tools::{logging, InstallOptions, Installer};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("install-helper-scripts: {err:#}");
    }

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("install-helper-scripts: {err:#}");
            let code = err
                .downcast_ref::<InstallError>()
                .map_or(EXIT_FAILURE, InstallError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let env = ProcessEnvironment;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let exe = std::env::current_exe().ok();
    let exe_dir = exe.as_deref().and_then(Path::parent);

    let options = InstallOptions::from_cli(cli, &env, &cwd, exe_dir)?;
    tracing::debug!(?options, "Resolved options");

    let mut prompt = ConsolePrompt::stdio();
    let mut stdout = io::stdout();
    let report = Installer::new(&options, &env, &mut prompt, &mut stdout).run()?;

    Ok(report.exit_code())
}
