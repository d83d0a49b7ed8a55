//! `netwatch-setup`: one-shot installer for the dashboard's system tools.
//!
//! Checks `PATH` for each tool the dashboard depends on, offers to install
//! whatever is missing through apt, then offers to write a default
//! configuration file if none exists yet.

mod install;
mod requirements;

use std::ffi::OsString;

use clap::Parser;
use color_eyre::eyre::{Result, bail, eyre};
use dialoguer::Confirm;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::requirements::{REQUIREMENTS, Requirement};

#[derive(Parser, Debug)]
#[command(name = "netwatch-setup", version, about)]
struct Cli {
    /// Only report missing tools; install nothing, write nothing
    #[arg(long)]
    check: bool,

    /// Answer yes to every prompt
    #[arg(short = 'y', long, conflicts_with = "check")]
    yes: bool,
}

/// Map a dialoguer failure into an eyre report.
fn prompt_err(e: dialoguer::Error) -> color_eyre::eyre::Report {
    eyre!("prompt failed: {e}")
}

fn confirm(cli: &Cli, prompt: String) -> Result<bool> {
    if cli.yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Offer to install each missing tool. Returns the required tools still missing.
fn install_missing<'a>(cli: &Cli, missing: &[&'a Requirement]) -> Result<Vec<&'a Requirement>> {
    let mut unresolved = Vec::new();
    for req in missing {
        let prompt = format!(
            "{} ({}) is not installed. Install package '{}'?",
            req.program, req.purpose, req.package
        );
        if !confirm(cli, prompt)? {
            println!("Installation of {} skipped.", req.package);
            if req.required {
                unresolved.push(*req);
            }
            continue;
        }

        match install::install(req.package) {
            Ok(()) => println!("{} installed successfully.", req.package),
            Err(e) => {
                warn!(package = req.package, error = %e, "install failed");
                println!(
                    "Failed to install {}: {e}. Check your permissions and try again.",
                    req.package
                );
                if req.required {
                    unresolved.push(*req);
                }
            }
        }
    }
    Ok(unresolved)
}

/// Offer to write the default configuration when none exists.
fn offer_default_config(cli: &Cli) -> Result<()> {
    let path = netwatch_config::config_path();
    if path.exists() {
        println!("Config file already exists at {}", path.display());
        return Ok(());
    }
    if cli.check {
        println!("No config file at {} (defaults apply)", path.display());
        return Ok(());
    }
    if confirm(cli, format!("Write default config to {}?", path.display()))? {
        let written = netwatch_config::save_config(&netwatch_config::Config::default())?;
        println!("Config saved to {}", written.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path_var = std::env::var_os("PATH").unwrap_or_else(OsString::new);

    for req in REQUIREMENTS {
        if requirements::find_in_path(req.program, &path_var).is_some() {
            println!("{} is already installed.", req.program);
        }
    }

    let missing = requirements::plan(REQUIREMENTS, &path_var);
    let unresolved: Vec<&Requirement> = if cli.check {
        for req in &missing {
            let kind = if req.required { "required" } else { "optional" };
            println!("{} is missing ({kind}, package '{}').", req.program, req.package);
        }
        missing.iter().copied().filter(|req| req.required).collect()
    } else {
        install_missing(&cli, &missing)?
    };

    offer_default_config(&cli)?;

    if !unresolved.is_empty() {
        let names: Vec<&str> = unresolved.iter().map(|req| req.program).collect();
        bail!("required tools missing: {}", names.join(", "));
    }
    Ok(())
}
